//! The inline text formatter.
//!
//! Converts one message's raw Slack markup into inline HTML through a
//! fixed sequence of substitutions. Order is load-bearing: every pass runs
//! on the *output* of the previous one, and later passes must not re-match
//! text introduced by earlier passes (newlines are gone before the code
//! block pass runs, so block contents keep their line breaks as `<br>`).
//!
//! The passes, in order:
//!
//! 1. `<@ID>` user reference → display name
//! 2. `<#ID>` channel reference → channel name
//! 3. `:name:` emoji shortcode → glyph; a shortcode spanning the whole
//!    message is wrapped in the large-emoji span
//! 4. newline → `<br>`
//! 5. triple-backtick block → `<pre>`
//! 6. single-backtick span → `<code>`
//! 7. `<url>` / `<url|label>` → hyperlink
//! 8. `_emphasis_` → `<em>`
//! 9. `*strong*` → `<strong>`
//! 10. `~strike~` → `<strike>`
//!
//! Unresolved references are hard errors, and so is a piped link that does
//! not split into exactly link and label. Nothing here escapes text
//! outside the matched spans; the renderer owns escaping for the message
//! shell.

use regex::{Captures, Regex};

use crate::context::ExportContext;
use crate::error::{Result, SlackviewError};

/// Compiled substitution patterns, built once per run.
pub struct MarkupRenderer {
    user_ref: Regex,
    channel_ref: Regex,
    emoji_ref: Regex,
    pre: Regex,
    code: Regex,
    url: Regex,
    italics: Regex,
    bold: Regex,
    strike: Regex,
}

impl MarkupRenderer {
    pub fn new() -> Self {
        Self {
            user_ref: Regex::new("<@([a-zA-Z0-9]+)>").unwrap(),
            channel_ref: Regex::new("<#([a-zA-Z0-9]+)>").unwrap(),
            emoji_ref: Regex::new(":([a-zA-Z0-9_]+):").unwrap(),
            pre: Regex::new(r"```(.*?)```").unwrap(),
            code: Regex::new(r"`(.*?)`").unwrap(),
            url: Regex::new(r"<(https?:.*?)>").unwrap(),
            italics: Regex::new(r"\b_([^_]*?)_\b").unwrap(),
            bold: Regex::new(r"\B\*\b([^\*]*?)\b\*\B").unwrap(),
            strike: Regex::new(r"\B~\b([^~]*?)\b~\B").unwrap(),
        }
    }

    /// Runs all passes over one message's raw text.
    pub fn render(&self, text: &str, ctx: &ExportContext) -> Result<String> {
        let text = replace_all(&self.user_ref, text, |caps| {
            Ok(ctx.user(&caps[1])?.display_name.clone())
        })?;

        let text = replace_all(&self.channel_ref, &text, |caps| {
            Ok(ctx.channel(&caps[1])?.name.clone())
        })?;

        let text = self.render_emoji(&text, ctx)?;

        let text = text.replace('\n', "<br>");

        let text = replace_all(&self.pre, &text, |caps| {
            Ok(format!("<pre class=\"blockpre\">{}</pre>", &caps[1]))
        })?;

        let text = replace_all(&self.code, &text, |caps| {
            Ok(format!("<code class=\"softcode\">{}</code>", &caps[1]))
        })?;

        let text = replace_all(&self.url, &text, |caps| {
            let body = &caps[1];
            if body.contains('|') {
                let parts: Vec<&str> = body.split('|').collect();
                if parts.len() != 2 {
                    return Err(SlackviewError::MalformedLink {
                        raw: body.to_string(),
                    });
                }
                Ok(format!("<a href=\"{}\">{}</a>", parts[0], parts[1]))
            } else {
                Ok(format!("<a href=\"{body}\">{body}</a>"))
            }
        })?;

        let text = replace_all(&self.italics, &text, |caps| {
            Ok(format!("<em>{}</em>", &caps[1]))
        })?;

        let text = replace_all(&self.bold, &text, |caps| {
            Ok(format!("<strong>{}</strong>", &caps[1]))
        })?;

        let text = replace_all(&self.strike, &text, |caps| {
            Ok(format!("<strike>{}</strike>", &caps[1]))
        })?;

        Ok(text)
    }

    /// The emoji pass needs the match position: a shortcode that spans the
    /// entire text (as it stands at this point in the chain) renders big.
    fn render_emoji(&self, text: &str, ctx: &ExportContext) -> Result<String> {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for caps in self.emoji_ref.captures_iter(text) {
            let whole = caps.get(0).unwrap();
            let glyph = ctx.emoji(&caps[1])?;
            out.push_str(&text[last..whole.start()]);
            if whole.start() == 0 && whole.end() == text.len() {
                out.push_str(&format!("<span class=\"bigemoji\">{glyph}</span>"));
            } else {
                out.push_str(glyph);
            }
            last = whole.end();
        }
        out.push_str(&text[last..]);
        Ok(out)
    }
}

impl Default for MarkupRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// `Regex::replace_all` with a fallible substitution closure.
fn replace_all<F>(re: &Regex, text: &str, mut substitute: F) -> Result<String>
where
    F: FnMut(&Captures) -> Result<String>,
{
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in re.captures_iter(text) {
        let whole = caps.get(0).unwrap();
        out.push_str(&text[last..whole.start()]);
        out.push_str(&substitute(&caps)?);
        last = whole.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Zone;
    use crate::context::{Channel, User};
    use crate::emoji::EmojiIndex;

    fn context() -> ExportContext {
        ExportContext::new(
            vec![User {
                id: "U1ALICE".into(),
                display_name: "alice".into(),
                avatar: None,
            }],
            vec![Channel {
                id: "C1GENERAL".into(),
                name: "general".into(),
                purpose: String::new(),
            }],
            EmojiIndex::from_pairs([("smile", "😄"), ("fire", "🔥")]),
            Zone::Local,
        )
    }

    fn render(text: &str) -> Result<String> {
        MarkupRenderer::new().render(text, &context())
    }

    #[test]
    fn test_user_reference() {
        assert_eq!(render("hi <@U1ALICE>!").unwrap(), "hi alice!");
    }

    #[test]
    fn test_unknown_user_reference_fails() {
        assert!(render("hi <@U404>").unwrap_err().is_resolution());
    }

    #[test]
    fn test_channel_reference() {
        assert_eq!(render("see <#C1GENERAL>").unwrap(), "see general");
    }

    #[test]
    fn test_unknown_channel_reference_fails() {
        assert!(render("see <#C404>").unwrap_err().is_resolution());
    }

    #[test]
    fn test_inline_emoji() {
        assert_eq!(render("so :smile: today").unwrap(), "so 😄 today");
    }

    #[test]
    fn test_whole_message_emoji_renders_big() {
        assert_eq!(
            render(":smile:").unwrap(),
            "<span class=\"bigemoji\">😄</span>"
        );
    }

    #[test]
    fn test_two_emoji_are_not_big() {
        assert_eq!(render(":smile::fire:").unwrap(), "😄🔥");
    }

    #[test]
    fn test_unknown_emoji_fails() {
        assert!(render(":nope:").unwrap_err().is_resolution());
    }

    #[test]
    fn test_newlines_become_breaks() {
        assert_eq!(render("a\nb").unwrap(), "a<br>b");
    }

    #[test]
    fn test_code_block() {
        // Newlines are already <br> by the time the block pass runs.
        assert_eq!(
            render("```let x = 1;\nlet y = 2;```").unwrap(),
            "<pre class=\"blockpre\">let x = 1;<br>let y = 2;</pre>"
        );
    }

    #[test]
    fn test_inline_code() {
        assert_eq!(
            render("run `cargo build` now").unwrap(),
            "run <code class=\"softcode\">cargo build</code> now"
        );
    }

    #[test]
    fn test_bare_url() {
        assert_eq!(
            render("<https://example.com/page>").unwrap(),
            "<a href=\"https://example.com/page\">https://example.com/page</a>"
        );
    }

    #[test]
    fn test_labeled_url() {
        assert_eq!(
            render("<https://example.com|the site>").unwrap(),
            "<a href=\"https://example.com\">the site</a>"
        );
    }

    #[test]
    fn test_doubly_piped_url_is_a_format_error() {
        let err = render("<https://example.com|a|b>").unwrap_err();
        assert!(matches!(err, SlackviewError::MalformedLink { .. }));
    }

    #[test]
    fn test_emphasis_strong_strike() {
        assert_eq!(render("_soft_").unwrap(), "<em>soft</em>");
        assert_eq!(render("*loud*").unwrap(), "<strong>loud</strong>");
        assert_eq!(render("~gone~").unwrap(), "<strike>gone</strike>");
    }

    #[test]
    fn test_emphasis_is_word_anchored() {
        // An underscore inside a word is not emphasis.
        assert_eq!(render("snake_case_name").unwrap(), "snake_case_name");
    }

    #[test]
    fn test_passes_compose() {
        let out = render("<@U1ALICE> says :smile: in <#C1GENERAL>: *see* <https://ex.com|this>")
            .unwrap();
        assert_eq!(
            out,
            "alice says 😄 in general: <strong>see</strong> <a href=\"https://ex.com\">this</a>"
        );
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(render("just words, 100% plain").unwrap(), "just words, 100% plain");
    }
}
