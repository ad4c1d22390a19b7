//! The HTML renderer.
//!
//! Walks a channel's root forest in timestamp order, depth-first through
//! thread nesting, and emits one message element per entry.
//!
//! # Grouping
//!
//! A text message renders in *compact* form — no avatar, username, or full
//! timestamp, just a hover time — when the immediately preceding rendered
//! message in the same flat sequence is also a text message by the same
//! author and no more than the grouping window older. Anything else (a
//! different author, an exceeded window, or any non-text message in
//! between) resets the run and renders in full form. Thread children are
//! their own sequence with their own grouping state.
//!
//! # Escaping
//!
//! The markup passes leave message text as-is; this module escapes the
//! untrusted freeform fields it places into the shell itself: display
//! names, file names, purposes, titles, and snippet bodies.

use crate::attachment::{Attachment, AttachmentKind};
use crate::config::GROUPING_WINDOW_SECS;
use crate::context::ExportContext;
use crate::error::Result;
use crate::file::{FileContent, FileKind};
use crate::markup::MarkupRenderer;
use crate::message::{Message, MessageKind};

/// Renders messages for one export run.
pub struct Renderer<'a> {
    ctx: &'a ExportContext,
    markup: MarkupRenderer,
}

impl<'a> Renderer<'a> {
    pub fn new(ctx: &'a ExportContext) -> Self {
        Self {
            ctx,
            markup: MarkupRenderer::new(),
        }
    }

    /// Renders a channel's full message list, one element per line.
    pub fn render_channel(&self, roots: &[Message]) -> Result<String> {
        let mut out = String::new();
        self.render_sequence(roots, &mut out)?;
        Ok(out)
    }

    /// Renders one flat sequence with its own grouping state.
    fn render_sequence(&self, messages: &[Message], out: &mut String) -> Result<()> {
        let mut prev: Option<&Message> = None;
        for message in messages {
            if compacts_after(message, prev) {
                out.push_str(&self.render_compact(message)?);
            } else {
                out.push_str(&self.render_full(message)?);
            }
            out.push('\n');
            prev = Some(message);
        }
        Ok(())
    }

    /// Full form: avatar, username, full timestamp, content, additions.
    fn render_full(&self, message: &Message) -> Result<String> {
        let avatar = message.author.avatar.as_deref().unwrap_or_default();
        let username = escape_html(&message.author.display_name);
        let time = message.ts.format_full(self.ctx.zone());

        let body = self.render_body(message)?;
        let content = match body.content {
            Some(content) => format!(
                "<div class=\"msg{}\">{}</div>",
                body.classes, content
            ),
            None => String::new(),
        };

        Ok(format!(
            "<div class=\"container\"><img class=\"avatar\" src=\"{avatar}\"/>\
             <div class=\"message\"><div class=\"username\">{username}</div>\
             <div class=\"time\">{time}</div>{content}{additions}{attachments}{thread}</div></div>",
            additions = body.additions,
            attachments = self.render_attachments(message),
            thread = self.render_thread(message)?,
        ))
    }

    /// Compact form: hover timestamp and content only.
    fn render_compact(&self, message: &Message) -> Result<String> {
        let time = message.ts.format_time(self.ctx.zone());
        let text = self.markup.render(&message.text, self.ctx)?;

        Ok(format!(
            "<div class=\"container\"><div class=\"imgplaceholder\">\
             <div class=\"hiddentime\">{time}</div></div>\
             <div class=\"message\"><div class=\"simplemsg\">{text}</div>\
             {attachments}{thread}</div></div>",
            attachments = self.render_attachments(message),
            thread = self.render_thread(message)?,
        ))
    }

    /// Per-variant content fragment, CSS classes, and additions.
    fn render_body(&self, message: &Message) -> Result<Body> {
        let body = match &message.kind {
            MessageKind::Text => Body {
                content: Some(self.markup.render(&message.text, self.ctx)?),
                classes: "",
                additions: String::new(),
            },
            MessageKind::Upload { files } => {
                let names: Vec<String> = files
                    .iter()
                    .map(|f| format!("«{}»", escape_html(&f.name)))
                    .collect();
                Body {
                    content: Some(format!("uploaded: {}", names.join(", "))),
                    classes: " sysmsg",
                    additions: files.iter().map(render_file).collect(),
                }
            }
            MessageKind::FilePreview { file } => Body {
                content: Some(format!("uploaded a file: «{}»", escape_html(&file.name))),
                classes: " sysmsg",
                additions: render_file(file),
            },
            MessageKind::Snippet { file } => Body {
                // A snippet is its own content; no message line above it.
                content: None,
                classes: "",
                additions: render_file(file),
            },
            MessageKind::Join => Body {
                content: Some("joined the channel".to_string()),
                classes: " sysmsg",
                additions: String::new(),
            },
            MessageKind::PurposeChanged { purpose } => Body {
                content: Some(format!(
                    "set the channel purpose: «{}»",
                    escape_html(purpose)
                )),
                classes: " sysmsg",
                additions: String::new(),
            },
            MessageKind::NameChanged { name, .. } => Body {
                content: Some(format!("renamed the channel to «{}»", escape_html(name))),
                classes: " sysmsg",
                additions: String::new(),
            },
        };
        Ok(body)
    }

    fn render_attachments(&self, message: &Message) -> String {
        message
            .attachments
            .iter()
            .map(|attachment| {
                format!(
                    "<div class=\"attachcontainer\">{}</div>",
                    render_attachment(attachment)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_thread(&self, message: &Message) -> Result<String> {
        if message.children.is_empty() {
            return Ok(String::new());
        }
        let mut inner = String::new();
        self.render_sequence(&message.children, &mut inner)?;
        Ok(format!("<div class=\"threadcontainer\">\n{inner}</div>"))
    }
}

/// Content fragment of one message variant.
struct Body {
    /// Inner HTML of the `msg` div, or `None` to omit the div entirely.
    content: Option<String>,
    /// Extra CSS classes on the `msg` div.
    classes: &'static str,
    /// File/preview markup placed after the content.
    additions: String,
}

/// Grouping rule: only a text message directly after a text message by the
/// same author, within the window, renders compact.
fn compacts_after(message: &Message, prev: Option<&Message>) -> bool {
    message.is_text()
        && prev.is_some_and(|prev| {
            prev.is_text()
                && prev.author.id == message.author.id
                && message.ts.seconds_between(prev.ts) <= GROUPING_WINDOW_SECS
        })
}

/// One file's preview fragment.
fn render_file(file: &FileContent) -> String {
    let link = file.link.as_deref().unwrap_or_default();
    match &file.kind {
        FileKind::Thumbnailed { thumb } => format!(
            "<a href=\"{link}\" target=\"_blank\"><img src=\"{}\" style=\"max-width: 480px;\"></a>",
            thumb.as_deref().unwrap_or_default()
        ),
        FileKind::Video => {
            format!("<video class=\"video\" src=\"{link}\" controls></video>")
        }
        FileKind::Snippet { text } => format!(
            "<pre class=\"prettyprint linenums\">{}</pre>",
            escape_html(text)
        ),
    }
}

/// One attachment's banner, title, and variant content.
fn render_attachment(attachment: &Attachment) -> String {
    format!(
        "{}{}{}",
        attachment_author_line(attachment),
        attachment_title(attachment),
        attachment_content(attachment)
    )
}

fn attachment_author_line(attachment: &Attachment) -> String {
    let icon = attachment
        .service_icon
        .as_deref()
        .map(|icon| format!("<img class=\"serviceicon\" src=\"{icon}\">"))
        .unwrap_or_default();
    let name = attachment
        .service_name
        .as_deref()
        .map(|name| format!("<span class=\"servicename\">{}</span>", escape_html(name)))
        .unwrap_or_default();
    let mut service = format!("{icon}{name}");
    if let Some(url) = &attachment.service_url {
        service = format!(
            "<a href=\"{url}\" target=\"_blank\" rel=\"noopener noreferrer\">{service}</a>"
        );
    }

    let mut author = attachment
        .author_name
        .as_deref()
        .map(|name| format!("<span class=\"authorname\">{}</span>", escape_html(name)))
        .unwrap_or_default();
    if let Some(link) = &attachment.author_link {
        author = format!(
            "<a href=\"{link}\" target=\"_blank\" rel=\"noopener noreferrer\">{author}</a>"
        );
    }

    let inlay = if !service.is_empty() && !author.is_empty() {
        "<span> | </span>"
    } else {
        ""
    };
    format!("<div class=\"attachauthor\">{service}{inlay}{author}</div>")
}

fn attachment_title(attachment: &Attachment) -> String {
    let title = attachment
        .title
        .as_deref()
        .map(escape_html)
        .unwrap_or_default();
    let content = match &attachment.title_link {
        Some(link) => format!(
            "<a href=\"{link}\" target=\"_blank\" rel=\"noopener noreferrer\">{title}</a>"
        ),
        None => title,
    };
    format!("<div class=\"attachtitle\">{content}</div>")
}

fn attachment_content(attachment: &Attachment) -> String {
    match &attachment.kind {
        AttachmentKind::RemoteVideo {
            embed_html,
            width,
            height,
        } => format!(
            "<div class=\"attachcontent attachvideocontent\" onclick=\"video_activate(this)\" \
             data-video-content=\"{}\" style=\"width: {width}px; height: {height}px;\">\
             <img src=\"{}\" class=\"videothumb\"></div>",
            escape_html(embed_html),
            attachment.thumb.as_deref().unwrap_or_default()
        ),
        AttachmentKind::SiteLink { text } => {
            format!("<div class=\"attachcontent\">{text}</div>")
        }
        AttachmentKind::Simple => String::new(),
    }
}

/// Minimal HTML escaping for text placed into the message shell.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::Attachment;
    use crate::config::Zone;
    use crate::context::User;
    use crate::emoji::EmojiIndex;
    use crate::timestamp::Ts;
    use chrono::FixedOffset;

    fn context() -> ExportContext {
        ExportContext::new(
            vec![],
            vec![],
            EmojiIndex::from_pairs([("smile", "😄")]),
            Zone::Fixed(FixedOffset::east_opt(0).unwrap()),
        )
    }

    fn user(id: &str, name: &str) -> User {
        User {
            id: id.into(),
            display_name: name.into(),
            avatar: Some(format!("cache/avatar.{name}.png")),
        }
    }

    fn text_message(author: &User, ts: &str, text: &str) -> Message {
        Message {
            author: author.clone(),
            text: text.into(),
            ts: Ts::parse(ts).unwrap(),
            thread_ts: None,
            reply_keys: Vec::new(),
            attachments: Vec::new(),
            children: Vec::new(),
            kind: MessageKind::Text,
        }
    }

    fn join_message(author: &User, ts: &str) -> Message {
        Message {
            kind: MessageKind::Join,
            ..text_message(author, ts, "")
        }
    }

    /// Containers rendered in compact form, in order of appearance.
    fn compact_flags(html: &str) -> Vec<bool> {
        html.lines()
            .filter(|line| line.starts_with("<div class=\"container\">"))
            .map(|line| line.contains("imgplaceholder"))
            .collect()
    }

    #[test]
    fn test_spec_grouping_scenario() {
        let ctx = context();
        let alice = user("U1", "alice");
        let bob = user("U2", "bob");

        // t, t+60s, t+4min from alice; t+4.5min from bob; then alice again.
        let messages = vec![
            text_message(&alice, "1000.0", "one"),
            text_message(&alice, "1060.0", "two"),
            text_message(&alice, "1240.0", "three"),
            text_message(&bob, "1270.0", "four"),
            text_message(&alice, "1275.0", "five"),
        ];

        let html = Renderer::new(&ctx).render_channel(&messages).unwrap();
        assert_eq!(compact_flags(&html), [false, true, true, false, false]);
    }

    #[test]
    fn test_window_exceeded_renders_full() {
        let ctx = context();
        let alice = user("U1", "alice");
        let messages = vec![
            text_message(&alice, "1000.0", "one"),
            // 301 seconds later: outside the 5-minute window.
            text_message(&alice, "1301.0", "two"),
        ];

        let html = Renderer::new(&ctx).render_channel(&messages).unwrap();
        assert_eq!(compact_flags(&html), [false, false]);
    }

    #[test]
    fn test_non_text_message_resets_grouping() {
        let ctx = context();
        let alice = user("U1", "alice");
        let messages = vec![
            text_message(&alice, "1000.0", "one"),
            join_message(&alice, "1010.0"),
            text_message(&alice, "1020.0", "two"),
        ];

        let html = Renderer::new(&ctx).render_channel(&messages).unwrap();
        // The join renders full, and so does the text right after it.
        assert_eq!(compact_flags(&html), [false, false, false]);
    }

    #[test]
    fn test_full_form_carries_chrome() {
        let ctx = context();
        let alice = user("U1", "alice");
        let html = Renderer::new(&ctx)
            .render_channel(&[text_message(&alice, "1000.0", "hello")])
            .unwrap();

        assert!(html.contains("<img class=\"avatar\" src=\"cache/avatar.alice.png\"/>"));
        assert!(html.contains("<div class=\"username\">alice</div>"));
        assert!(html.contains("<div class=\"time\">1970-01-01 00:16:40</div>"));
        assert!(html.contains("<div class=\"msg\">hello</div>"));
    }

    #[test]
    fn test_compact_form_has_hover_time_only() {
        let ctx = context();
        let alice = user("U1", "alice");
        let html = Renderer::new(&ctx)
            .render_channel(&[
                text_message(&alice, "1000.0", "one"),
                text_message(&alice, "1010.0", "two"),
            ])
            .unwrap();

        let compact = html.lines().nth(1).unwrap();
        assert!(compact.contains("<div class=\"hiddentime\">00:16:50</div>"));
        assert!(compact.contains("<div class=\"simplemsg\">two</div>"));
        assert!(!compact.contains("avatar"));
        assert!(!compact.contains("username"));
    }

    #[test]
    fn test_display_name_is_escaped() {
        let ctx = context();
        let evil = user("U9", "<script>alert(1)</script>");
        let html = Renderer::new(&ctx)
            .render_channel(&[text_message(&evil, "1000.0", "hi")])
            .unwrap();

        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>alert(1)"));
    }

    #[test]
    fn test_thread_children_render_nested_with_own_grouping() {
        let ctx = context();
        let alice = user("U1", "alice");
        let bob = user("U2", "bob");

        let mut root = text_message(&alice, "1000.0", "root");
        root.children = vec![
            text_message(&bob, "1005.0", "first reply"),
            text_message(&bob, "1010.0", "second reply"),
        ];

        let html = Renderer::new(&ctx).render_channel(&[root]).unwrap();
        assert!(html.contains("<div class=\"threadcontainer\">"));
        // The first reply opens a fresh sequence (full), the second groups.
        let inner: Vec<bool> = html
            .lines()
            .filter(|line| line.contains("first reply") || line.contains("second reply"))
            .map(|line| line.contains("imgplaceholder"))
            .collect();
        assert_eq!(inner, [false, true]);
    }

    #[test]
    fn test_system_notices() {
        let ctx = context();
        let alice = user("U1", "alice");

        let join = join_message(&alice, "1.0");
        let purpose = Message {
            kind: MessageKind::PurposeChanged {
                purpose: "be <kind>".into(),
            },
            ..text_message(&alice, "2.0", "")
        };
        let renamed = Message {
            kind: MessageKind::NameChanged {
                old_name: Some("old".into()),
                name: "new-name".into(),
            },
            ..text_message(&alice, "3.0", "")
        };

        let html = Renderer::new(&ctx)
            .render_channel(&[join, purpose, renamed])
            .unwrap();
        assert!(html.contains("<div class=\"msg sysmsg\">joined the channel</div>"));
        assert!(html.contains("set the channel purpose: «be &lt;kind&gt;»"));
        assert!(html.contains("renamed the channel to «new-name»"));
    }

    #[test]
    fn test_file_preview_fragment() {
        let file = FileContent {
            name: "photo.jpg".into(),
            link: Some("cache/photo.jpg".into()),
            comment: None,
            mime_type: Some("image/jpeg".into()),
            file_type: Some("jpg".into()),
            kind: FileKind::Thumbnailed {
                thumb: Some("cache/photo.thumb.jpg".into()),
            },
        };
        let html = render_file(&file);
        assert_eq!(
            html,
            "<a href=\"cache/photo.jpg\" target=\"_blank\">\
             <img src=\"cache/photo.thumb.jpg\" style=\"max-width: 480px;\"></a>"
        );
    }

    #[test]
    fn test_video_file_fragment() {
        let file = FileContent {
            name: "clip.mp4".into(),
            link: Some("cache/clip.mp4".into()),
            comment: None,
            mime_type: Some("video/mp4".into()),
            file_type: None,
            kind: FileKind::Video,
        };
        assert_eq!(
            render_file(&file),
            "<video class=\"video\" src=\"cache/clip.mp4\" controls></video>"
        );
    }

    #[test]
    fn test_snippet_fragment_is_escaped() {
        let file = FileContent {
            name: "x.rs".into(),
            link: None,
            comment: None,
            mime_type: None,
            file_type: None,
            kind: FileKind::Snippet {
                text: "if a < b && c > d {}".into(),
            },
        };
        assert_eq!(
            render_file(&file),
            "<pre class=\"prettyprint linenums\">if a &lt; b &amp;&amp; c &gt; d {}</pre>"
        );
    }

    #[test]
    fn test_upload_message_lists_every_file() {
        let ctx = context();
        let alice = user("U1", "alice");
        let file = |name: &str| FileContent {
            name: name.into(),
            link: Some(format!("cache/{name}")),
            comment: None,
            mime_type: Some("image/png".into()),
            file_type: None,
            kind: FileKind::Thumbnailed {
                thumb: Some(format!("cache/{name}.thumb")),
            },
        };
        let upload = Message {
            kind: MessageKind::Upload {
                files: vec![file("a.png"), file("b.png")],
            },
            ..text_message(&alice, "1.0", "")
        };

        let html = Renderer::new(&ctx).render_channel(&[upload]).unwrap();
        assert!(html.contains("uploaded: «a.png», «b.png»"));
        assert!(html.contains("cache/a.png.thumb"));
        assert!(html.contains("cache/b.png.thumb"));
    }

    #[test]
    fn test_site_link_attachment() {
        let mut attachment = Attachment::bare(AttachmentKind::SiteLink {
            text: "A blurb".into(),
        });
        attachment.title = Some("Example".into());
        attachment.title_link = Some("https://example.com".into());
        attachment.service_name = Some("Example News".into());
        attachment.service_icon = Some("cache/Example News.icon.ico".into());

        let html = render_attachment(&attachment);
        assert!(html.contains("<div class=\"attachauthor\">"));
        assert!(html.contains("<span class=\"servicename\">Example News</span>"));
        assert!(html.contains(
            "<a href=\"https://example.com\" target=\"_blank\" rel=\"noopener noreferrer\">Example</a>"
        ));
        assert!(html.contains("<div class=\"attachcontent\">A blurb</div>"));
    }

    #[test]
    fn test_remote_video_attachment_escapes_embed() {
        let mut attachment = Attachment::bare(AttachmentKind::RemoteVideo {
            embed_html: "<iframe src=\"https://tube/embed\"></iframe>".into(),
            width: 640,
            height: 480,
        });
        attachment.thumb = Some("cache/vid.thumb.jpg".into());

        let html = attachment_content(&attachment);
        assert!(html.contains("data-video-content=\"&lt;iframe"));
        assert!(html.contains("style=\"width: 640px; height: 480px;\""));
        assert!(html.contains("<img src=\"cache/vid.thumb.jpg\" class=\"videothumb\">"));
    }

    #[test]
    fn test_author_line_inlay_needs_both_sides() {
        let mut attachment = Attachment::bare(AttachmentKind::Simple);
        attachment.service_name = Some("Service".into());
        assert!(!attachment_author_line(&attachment).contains(" | "));

        attachment.author_name = Some("Author".into());
        assert!(attachment_author_line(&attachment).contains(" | "));
    }

    #[test]
    fn test_simple_attachment_has_no_content_div() {
        let attachment = Attachment::bare(AttachmentKind::Simple);
        assert_eq!(attachment_content(&attachment), "");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }
}
