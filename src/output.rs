//! Channel page output.
//!
//! A generated page is the bundled template with the rendered message list
//! spliced in at the `[CONTENT]` marker line: every template line before
//! the marker becomes the preamble, every line after it the postamble. The
//! bundled stylesheet is copied into the work directory once per run so
//! the pages are viewable in place.

use std::fs;
use std::path::Path;

use crate::config::{CONTENT_MARKER, ExportConfig};
use crate::error::{Result, SlackviewError};

/// The bundled page template.
pub const TEMPLATE: &str = include_str!("../assets/template.html");

/// The bundled stylesheet.
pub const STYLESHEET: &str = include_str!("../assets/slackview.css");

/// Splices rendered content into a template at the marker line.
pub fn splice_page(template: &str, content: &str) -> Result<String> {
    let mut out = String::with_capacity(template.len() + content.len());
    let mut lines = template.lines();
    let mut found = false;

    for line in lines.by_ref() {
        if line.trim() == CONTENT_MARKER {
            found = true;
            break;
        }
        out.push_str(line);
        out.push('\n');
    }
    if !found {
        return Err(SlackviewError::TemplateMarkerMissing {
            marker: CONTENT_MARKER,
        });
    }

    out.push_str(content);
    if !content.is_empty() && !content.ends_with('\n') {
        out.push('\n');
    }

    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    Ok(out)
}

/// Writes one channel's page from the bundled template.
pub fn write_channel_page(path: &Path, content: &str) -> Result<()> {
    let page = splice_page(TEMPLATE, content)?;
    fs::write(path, page)?;
    Ok(())
}

/// Copies the bundled stylesheet next to the generated pages.
pub fn copy_stylesheet(config: &ExportConfig) -> Result<()> {
    fs::write(config.stylesheet_path(), STYLESHEET)?;
    Ok(())
}
