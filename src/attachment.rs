//! Link/media attachments carried by messages.
//!
//! Attachments are unfurled previews of things linked from a message: a
//! video embed, a site summary, or a bare service banner. The archive does
//! not tag them explicitly; the importer classifies them structurally
//! (presence of an embeddable video payload, then presence of blurb text).

/// Variant payload of an [`Attachment`].
#[derive(Debug, Clone, PartialEq)]
pub enum AttachmentKind {
    /// An externally hosted, embeddable video.
    RemoteVideo {
        /// Raw embed markup supplied by the service
        embed_html: String,
        /// Pixel width of the embed area
        width: u32,
        /// Pixel height of the embed area
        height: u32,
    },
    /// A linked site with a text blurb.
    SiteLink {
        /// The blurb
        text: String,
    },
    /// Nothing beyond the shared banner fields.
    Simple,
}

/// One unfurled attachment.
///
/// All shared fields are optional; the renderer simply omits what is
/// absent. Icon and thumbnail references point into the asset cache.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub title: Option<String>,
    pub title_link: Option<String>,
    pub service_name: Option<String>,
    /// Cache-relative reference to the service icon.
    pub service_icon: Option<String>,
    pub service_url: Option<String>,
    pub author_name: Option<String>,
    pub author_link: Option<String>,
    /// URL the attachment was unfurled from.
    pub from_url: Option<String>,
    /// Cache-relative reference to the preview thumbnail.
    pub thumb: Option<String>,
    pub kind: AttachmentKind,
}

impl Attachment {
    /// An attachment with every shared field empty.
    pub fn bare(kind: AttachmentKind) -> Self {
        Self {
            title: None,
            title_link: None,
            service_name: None,
            service_icon: None,
            service_url: None,
            author_name: None,
            author_link: None,
            from_url: None,
            thumb: None,
            kind,
        }
    }
}

/// Embed area assumed when the service omits explicit dimensions.
pub const DEFAULT_VIDEO_SIZE: (u32, u32) = (480, 360);
