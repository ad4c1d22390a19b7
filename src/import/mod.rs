//! The archive importer.
//!
//! Turns the archive's raw JSON into the typed entity model:
//!
//! - [`read_users`] — `users.json`, registering avatars with the asset
//!   cache as it goes
//! - [`read_channels`] — `channels.json`, a straight field projection
//! - [`MessageImporter`] — per-channel message logs, dispatching on the
//!   `subtype` discriminator and sub-parsing files and attachments
//!
//! Dispatch is strict: an unrecognized subtype, file mode, or mime type
//! fails the run rather than silently dropping data. The single deliberate
//! exception is the `file_comment` subtype, which is skipped because
//! comment threads on files are not supported.

pub mod raw;

use std::fs;
use std::path::Path;

use crate::attachment::{Attachment, AttachmentKind, DEFAULT_VIDEO_SIZE};
use crate::cache::AssetCache;
use crate::context::{Channel, ExportContext, User};
use crate::error::{Result, SlackviewError};
use crate::file::{FileContent, FileKind};
use crate::message::{Message, MessageKind};
use crate::timestamp::Ts;

use raw::{RawAttachment, RawChannel, RawFile, RawMessage, RawUser};

/// Reads and projects `users.json`.
///
/// The display name falls back to the real name when the preferred one is
/// empty. Avatars are materialized through the cache under an
/// `avatar.<name><ext>` hint and stored as document-relative references.
pub fn read_users(path: &Path, cache: &mut AssetCache) -> Result<Vec<User>> {
    let data = fs::read_to_string(path)?;
    let raw_users: Vec<RawUser> =
        serde_json::from_str(&data).map_err(|e| SlackviewError::json_in(e, path))?;

    raw_users
        .into_iter()
        .map(|raw| parse_user(raw, cache))
        .collect()
}

fn parse_user(raw: RawUser, cache: &mut AssetCache) -> Result<User> {
    let display_name = match raw.profile.display_name {
        Some(name) if !name.is_empty() => name,
        _ => raw.profile.real_name.unwrap_or_default(),
    };

    let avatar = match raw.profile.image_72 {
        Some(url) => {
            let hint = format!("avatar.{display_name}{}", uri_extension(&url));
            Some(cache.cache_relative(&url, &hint)?)
        }
        None => None,
    };

    Ok(User {
        id: raw.id,
        display_name,
        avatar,
    })
}

/// Reads and projects `channels.json`.
pub fn read_channels(path: &Path) -> Result<Vec<Channel>> {
    let data = fs::read_to_string(path)?;
    let raw_channels: Vec<RawChannel> =
        serde_json::from_str(&data).map_err(|e| SlackviewError::json_in(e, path))?;

    Ok(raw_channels
        .into_iter()
        .map(|raw| Channel {
            id: raw.id,
            name: raw.name,
            purpose: raw.purpose.value,
        })
        .collect())
}

/// Parses a channel's message log files into typed messages.
pub struct MessageImporter<'a> {
    ctx: &'a ExportContext,
    cache: &'a mut AssetCache,
}

impl<'a> MessageImporter<'a> {
    pub fn new(ctx: &'a ExportContext, cache: &'a mut AssetCache) -> Self {
        Self { ctx, cache }
    }

    /// Reads every `*.json` log in a channel directory, merged into one
    /// flat list. Files are visited in name order (the archive names them
    /// by date), though the graph linker re-sorts by key anyway.
    pub fn read_channel_dir(&mut self, dir: &Path) -> Result<Vec<Message>> {
        let mut log_files: Vec<_> = fs::read_dir(dir)?
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        log_files.sort();

        let mut messages = Vec::new();
        for path in log_files {
            messages.extend(self.read_log_file(&path)?);
        }
        Ok(messages)
    }

    /// Reads one log file. Skipped entries (`file_comment`) simply do not
    /// appear in the result.
    pub fn read_log_file(&mut self, path: &Path) -> Result<Vec<Message>> {
        let data = fs::read_to_string(path)?;
        let raw_messages: Vec<RawMessage> =
            serde_json::from_str(&data).map_err(|e| SlackviewError::json_in(e, path))?;

        let mut messages = Vec::with_capacity(raw_messages.len());
        for raw in raw_messages {
            if let Some(message) = self.parse_message(raw)? {
                messages.push(message);
            }
        }
        Ok(messages)
    }

    /// Projects one raw entry, or `None` for the skipped subtype.
    fn parse_message(&mut self, raw: RawMessage) -> Result<Option<Message>> {
        let kind = match raw.subtype.as_deref() {
            // Comment threads on files are intentionally unsupported.
            Some("file_comment") => return Ok(None),
            None => {
                if raw.upload == Some(true) {
                    MessageKind::Upload {
                        files: self.gather_files(raw.files.as_ref())?,
                    }
                } else {
                    MessageKind::Text
                }
            }
            Some("channel_join") => MessageKind::Join,
            Some("channel_purpose") => MessageKind::PurposeChanged {
                purpose: raw.purpose.clone().unwrap_or_default(),
            },
            Some("channel_name") => MessageKind::NameChanged {
                old_name: raw.old_name.clone(),
                name: raw.name.clone().unwrap_or_default(),
            },
            Some("file_share") => {
                let raw_file = raw
                    .file
                    .as_ref()
                    .ok_or_else(|| SlackviewError::invalid_shape("file_share without a file"))?;
                let file = self.parse_file(raw_file)?;
                if file.is_snippet() {
                    MessageKind::Snippet { file }
                } else {
                    MessageKind::FilePreview { file }
                }
            }
            Some(other) => {
                return Err(SlackviewError::UnknownSubtype {
                    subtype: other.to_string(),
                });
            }
        };

        let user_id = raw
            .user
            .ok_or_else(|| SlackviewError::invalid_shape("message without a user id"))?;
        let author = self.ctx.user(&user_id)?.clone();

        let ts = Ts::parse(&raw.ts)?;
        let thread_ts = raw.thread_ts.as_deref().map(Ts::parse).transpose()?;
        let reply_keys = raw
            .replies
            .unwrap_or_default()
            .iter()
            .map(|reply| Ts::parse(&reply.ts))
            .collect::<Result<Vec<_>>>()?;

        let attachments = raw
            .attachments
            .unwrap_or_default()
            .iter()
            .map(|attachment| self.parse_attachment(attachment))
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(Message {
            author,
            text: raw.text.unwrap_or_default(),
            ts,
            thread_ts,
            reply_keys,
            attachments,
            children: Vec::new(),
            kind,
        }))
    }

    /// Resolves the `files` list of an upload message.
    fn gather_files(&mut self, files: Option<&serde_json::Value>) -> Result<Vec<FileContent>> {
        let value = files
            .ok_or_else(|| SlackviewError::invalid_shape("upload message without files"))?;
        let array = value.as_array().ok_or_else(|| {
            SlackviewError::invalid_shape("unsupported upload shape, expected an array of files")
        })?;

        array
            .iter()
            .map(|entry| {
                let raw: RawFile = serde_json::from_value(entry.clone())?;
                self.parse_file(&raw)
            })
            .collect()
    }

    /// Projects one file object, dispatching on its `mode`.
    fn parse_file(&mut self, raw: &RawFile) -> Result<FileContent> {
        let mode = raw
            .mode
            .as_deref()
            .ok_or_else(|| SlackviewError::invalid_shape("file without a mode"))?;

        match mode {
            "hosted" => self.parse_hosted_file(raw),
            "snippet" => self.parse_snippet_file(raw),
            other => Err(SlackviewError::UnknownFileMode {
                mode: other.to_string(),
            }),
        }
    }

    fn parse_hosted_file(&mut self, raw: &RawFile) -> Result<FileContent> {
        let name = raw.name.clone().unwrap_or_default();
        let mime = raw
            .mimetype
            .clone()
            .ok_or_else(|| SlackviewError::invalid_shape("hosted file without a mimetype"))?;

        let thumb_hint = thumb_name(&name);
        let kind = if mime.starts_with("image/") {
            // Largest thumbnail the archive offers wins.
            let source = raw
                .thumb_480
                .as_ref()
                .or(raw.thumb_360.as_ref())
                .or(raw.thumb_64.as_ref());
            FileKind::Thumbnailed {
                thumb: self.cache_optional(source, &thumb_hint)?,
            }
        } else if mime == "application/pdf" {
            FileKind::Thumbnailed {
                thumb: self.cache_optional(raw.thumb_pdf.as_ref(), &thumb_hint)?,
            }
        } else if mime.starts_with("video/") {
            FileKind::Video
        } else {
            return Err(SlackviewError::UnsupportedMime { mime });
        };

        let link = self.cache_optional(raw.url_private.as_ref(), &name)?;

        Ok(FileContent {
            name,
            link,
            comment: raw
                .initial_comment
                .as_ref()
                .and_then(|c| c.comment.clone()),
            mime_type: Some(mime),
            file_type: raw.filetype.clone(),
            kind,
        })
    }

    fn parse_snippet_file(&mut self, raw: &RawFile) -> Result<FileContent> {
        let name = match raw.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => "snippet".to_string(),
        };

        let text = if raw.lines_more.unwrap_or(0) != 0 {
            // The inline preview is truncated; fetch the full body.
            let uri = raw.url_private.as_deref().ok_or_else(|| {
                SlackviewError::invalid_shape("truncated snippet without a private url")
            })?;
            self.cache.cache_text(uri, &name)?
        } else {
            raw.preview.clone().unwrap_or_default()
        };

        Ok(FileContent {
            name,
            link: None,
            comment: None,
            mime_type: raw.mimetype.clone(),
            file_type: raw.filetype.clone(),
            kind: FileKind::Snippet { text },
        })
    }

    /// Projects one attachment, classifying it structurally.
    fn parse_attachment(&mut self, raw: &RawAttachment) -> Result<Attachment> {
        let kind = if let Some(embed_html) = &raw.video_html {
            let (width, height) = match (raw.video_html_width, raw.video_html_height) {
                (Some(w), Some(h)) => (w, h),
                _ => DEFAULT_VIDEO_SIZE,
            };
            AttachmentKind::RemoteVideo {
                embed_html: embed_html.clone(),
                width,
                height,
            }
        } else if let Some(text) = &raw.text {
            AttachmentKind::SiteLink { text: text.clone() }
        } else {
            AttachmentKind::Simple
        };

        let service = raw.service_name.as_deref().unwrap_or("service");
        let service_icon = match &raw.service_icon {
            Some(icon) => {
                let hint = format!("{service}.icon{}", uri_extension(icon));
                Some(self.cache.cache_relative(icon, &hint)?)
            }
            None => None,
        };
        let thumb = match &raw.thumb_url {
            Some(thumb) => {
                let hint = format!("{service}.thumb{}", uri_extension(thumb));
                Some(self.cache.cache_relative(thumb, &hint)?)
            }
            None => None,
        };

        Ok(Attachment {
            title: raw.title.clone(),
            title_link: raw.title_link.clone(),
            service_name: raw.service_name.clone(),
            service_icon,
            service_url: raw.service_url.clone(),
            author_name: raw.author_name.clone(),
            author_link: raw.author_link.clone(),
            from_url: raw.from_url.clone(),
            thumb,
            kind,
        })
    }

    fn cache_optional(&mut self, uri: Option<&String>, hint: &str) -> Result<Option<String>> {
        match uri {
            Some(uri) => Ok(Some(self.cache.cache_relative(uri, hint)?)),
            None => Ok(None),
        }
    }
}

/// Extension of a URI's path component, dot included, query ignored.
fn uri_extension(uri: &str) -> &str {
    let path = uri
        .split_once(['?', '#'])
        .map_or(uri, |(path, _)| path);
    let segment = path.rsplit('/').next().unwrap_or(path);
    match segment.rfind('.') {
        Some(idx) if idx > 0 => &segment[idx..],
        _ => "",
    }
}

/// Thumbnail name hint: `report.pdf` → `report.thumb.pdf`.
fn thumb_name(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}.thumb.{ext}"),
        _ => format!("{name}.thumb"),
    }
}
