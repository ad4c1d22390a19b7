//! The full export pipeline.
//!
//! One call to [`run_export`] processes an extracted archive end to end:
//! load the emoji data, open the asset cache, import users and channels,
//! then for every channel import → link → render → write, fully
//! sequentially. The first error anywhere terminates the run.

use crate::cache::AssetCache;
use crate::config::ExportConfig;
use crate::context::ExportContext;
use crate::emoji::EmojiIndex;
use crate::error::Result;
use crate::graph::link_messages;
use crate::import::{MessageImporter, read_channels, read_users};
use crate::output;
use crate::render::Renderer;

/// Counters reported after a successful run.
#[derive(Debug)]
pub struct ExportStats {
    /// Channels exported.
    pub channels: usize,
    /// Messages rendered across all channels.
    pub messages: usize,
    /// Distinct remote assets in the cache registry after the run.
    pub cached_assets: usize,
}

/// Exports every channel of the archive in the work directory.
pub fn run_export(config: &ExportConfig) -> Result<ExportStats> {
    let emoji = EmojiIndex::builtin()?;
    let mut cache = AssetCache::open(config.registry_path(), config.cache_dir())?;

    let users = read_users(&config.work_dir.join("users.json"), &mut cache)?;
    let channels = read_channels(&config.work_dir.join("channels.json"))?;
    let ctx = ExportContext::new(users, channels.clone(), emoji, config.zone);

    output::copy_stylesheet(config)?;

    let mut message_count = 0;
    for channel in &channels {
        println!("📄 Exporting #{}", channel.name);

        let messages = MessageImporter::new(&ctx, &mut cache)
            .read_channel_dir(&config.channel_dir(&channel.name))?;
        message_count += messages.len();

        let roots = link_messages(messages)?;
        let html = Renderer::new(&ctx).render_channel(&roots)?;
        output::write_channel_page(&config.page_path(&channel.name), &html)?;
    }

    Ok(ExportStats {
        channels: channels.len(),
        messages: message_count,
        cached_assets: cache.len(),
    })
}
