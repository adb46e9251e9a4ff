//! Media payloads and archive assets

/// Fallback MIME type when neither the homeserver nor the event says otherwise
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Binary payload returned by a media source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaPayload {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl MediaPayload {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }

    /// File extension derived from the MIME subtype
    ///
    /// Parameters and structured-syntax suffixes are dropped
    /// (`image/svg+xml; charset=utf-8` becomes `svg`). Unknown or empty
    /// subtypes map to `bin`.
    pub fn extension(&self) -> String {
        let essence = self.mime_type.split(';').next().unwrap_or_default().trim();
        let subtype = essence
            .split_once('/')
            .map(|(_, sub)| sub)
            .unwrap_or_default();
        let subtype = subtype.split('+').next().unwrap_or_default().trim();

        let valid = !subtype.is_empty()
            && subtype
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');
        if valid {
            subtype.to_ascii_lowercase()
        } else {
            "bin".to_string()
        }
    }
}

/// A resolved media file ready to be placed in the archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Archive-relative path, e.g. `images/$abc.png`
    pub path: String,
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ext(mime: &str) -> String {
        MediaPayload::new(Vec::new(), mime).extension()
    }

    #[test]
    fn test_extension_from_subtype() {
        assert_eq!(ext("image/png"), "png");
        assert_eq!(ext("image/jpeg"), "jpeg");
        assert_eq!(ext("video/mp4"), "mp4");
        assert_eq!(ext("audio/ogg"), "ogg");
    }

    #[test]
    fn test_extension_strips_parameters_and_suffix() {
        assert_eq!(ext("image/svg+xml; charset=utf-8"), "svg");
        assert_eq!(ext("Audio/MPEG"), "mpeg");
    }

    #[test]
    fn test_extension_fallback() {
        assert_eq!(ext(""), "bin");
        assert_eq!(ext("garbage"), "bin");
        assert_eq!(ext("image/"), "bin");
        assert_eq!(ext("image/../../etc"), "bin");
    }
}
