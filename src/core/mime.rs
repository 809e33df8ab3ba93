use anyhow::{Result, bail};
use std::collections::HashMap;

/// Registry key of the required fallback entry for unrecognized types.
pub const OTHER_KEY: &str = "other";

/// Pseudo-type for stored links. Links carry no meaningful file extension,
/// so the formatter leaves their names intact.
pub const LINK_MIME: &str = "x-pooled/link";

/// Display metadata for one MIME category. Labels arrive already localized;
/// the host resolves its i18n keys when it builds the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeDescriptor {
    pub label: String,
    pub icon: String,
}

impl MimeDescriptor {
    pub fn new(label: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            icon: icon.into(),
        }
    }
}

/// Typed mapping from MIME key to display descriptor. The "other" fallback is
/// mandatory and checked at construction, so lookups never dead-end.
#[derive(Debug, Clone)]
pub struct MimeRegistry {
    entries: HashMap<String, MimeDescriptor>,
}

impl MimeRegistry {
    pub fn new(entries: HashMap<String, MimeDescriptor>) -> Result<Self> {
        if !entries.contains_key(OTHER_KEY) {
            bail!("mime registry requires an \"{}\" fallback entry", OTHER_KEY);
        }
        Ok(Self { entries })
    }

    /// A small built-in table covering the common pooled-content types.
    pub fn with_defaults() -> Self {
        let mut entries = HashMap::new();
        entries.insert(
            OTHER_KEY.to_string(),
            MimeDescriptor::new("Other document", "/img/mimetypes/unknown.png"),
        );
        entries.insert(
            LINK_MIME.to_string(),
            MimeDescriptor::new("Link", "/img/mimetypes/link.png"),
        );
        entries.insert(
            "application/pdf".to_string(),
            MimeDescriptor::new("PDF document", "/img/mimetypes/pdf.png"),
        );
        entries.insert(
            "text/plain".to_string(),
            MimeDescriptor::new("Text document", "/img/mimetypes/txt.png"),
        );
        entries.insert(
            "text/html".to_string(),
            MimeDescriptor::new("HTML document", "/img/mimetypes/html.png"),
        );
        entries.insert(
            "image/png".to_string(),
            MimeDescriptor::new("PNG image", "/img/mimetypes/image.png"),
        );
        entries.insert(
            "image/jpeg".to_string(),
            MimeDescriptor::new("JPEG image", "/img/mimetypes/image.png"),
        );
        entries.insert(
            "video/mp4".to_string(),
            MimeDescriptor::new("Video", "/img/mimetypes/video.png"),
        );
        Self { entries }
    }

    pub fn descriptor(&self, mime: &str) -> Option<&MimeDescriptor> {
        self.entries.get(mime)
    }

    pub fn fallback(&self) -> &MimeDescriptor {
        self.entries
            .get(OTHER_KEY)
            .expect("construction guarantees the fallback entry")
    }
}
