//! Command-line interface definition using clap.

use std::path::PathBuf;

use clap::Parser;

/// Render an extracted Slack export archive into static HTML timelines.
#[derive(Parser, Debug, Clone)]
#[command(name = "slackview")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    slackview
    slackview /path/to/archive
    slackview /path/to/archive +03:00
    slackview . UTC

The work directory must contain an extracted Slack archive: users.json,
channels.json, and one directory of *.json message logs per channel.
Generated pages, the stylesheet, and the asset cache are written into the
same directory.")]
pub struct Args {
    /// Work directory containing the extracted archive
    #[arg(default_value = ".")]
    pub work_dir: PathBuf,

    /// Display time zone: a UTC offset like +03:00, or UTC
    pub timezone: Option<String>,
}
