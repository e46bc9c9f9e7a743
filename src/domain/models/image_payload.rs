use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

/// Media type assumed when the caller's payload carries none.
pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// A base64 image ready for transmission: no `data:` prefix, media type split out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    mime_type: String,
    data: String,
}

impl ImagePayload {
    /// Accept base64 text with or without a `data:<mime>;base64,` prefix.
    ///
    /// A recognised prefix is stripped and its media type kept. Anything else
    /// passes through untouched with the default media type.
    pub fn from_encoded(encoded: &str) -> Self {
        if let Some((mime, data)) = split_data_url(encoded) {
            let mime_type = if mime.is_empty() { DEFAULT_IMAGE_MIME } else { mime };
            return Self {
                mime_type: mime_type.to_string(),
                data: data.to_string(),
            };
        }

        Self {
            mime_type: DEFAULT_IMAGE_MIME.to_string(),
            data: encoded.to_string(),
        }
    }

    /// Encode raw image bytes.
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: BASE64_STANDARD.encode(bytes),
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.trim().is_empty()
    }
}

/// Guess an image media type from a file extension.
pub fn mime_type_for_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "png" => "image/png",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "heic" => "image/heic",
        _ => DEFAULT_IMAGE_MIME,
    }
}

fn split_data_url(encoded: &str) -> Option<(&str, &str)> {
    let rest = encoded.strip_prefix("data:")?;
    let (header, data) = rest.split_once(',')?;
    let mut params = header.split(';');
    let mime = params.next().unwrap_or_default().trim();
    match params.last() {
        Some(encoding) if encoding.trim().eq_ignore_ascii_case("base64") => Some((mime, data)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_data_url_prefix() {
        let payload = ImagePayload::from_encoded("data:image/png;base64,iVBORw0KGgo=");
        assert_eq!(payload.data(), "iVBORw0KGgo=");
        assert_eq!(payload.mime_type(), "image/png");
    }

    #[test]
    fn bare_base64_passes_through() {
        let payload = ImagePayload::from_encoded("/9j/4AAQSkZJRg==");
        assert_eq!(payload.data(), "/9j/4AAQSkZJRg==");
        assert_eq!(payload.mime_type(), DEFAULT_IMAGE_MIME);
    }

    #[test]
    fn non_base64_data_url_is_left_alone() {
        let raw = "data:text/plain,hello";
        let payload = ImagePayload::from_encoded(raw);
        assert_eq!(payload.data(), raw);
    }

    #[test]
    fn data_url_parameters_are_dropped_from_mime() {
        let payload = ImagePayload::from_encoded("data:image/png;charset=utf-8;base64,AAAA");
        assert_eq!(payload.mime_type(), "image/png");
        assert_eq!(payload.data(), "AAAA");
    }

    #[test]
    fn base64_marker_is_case_insensitive() {
        let payload = ImagePayload::from_encoded("data:image/webp;BASE64,AAAA");
        assert_eq!(payload.mime_type(), "image/webp");
        assert_eq!(payload.data(), "AAAA");

        let bare = ImagePayload::from_encoded("data:;base64,AAAA");
        assert_eq!(bare.mime_type(), DEFAULT_IMAGE_MIME);
        assert_eq!(bare.data(), "AAAA");
    }

    #[test]
    fn from_bytes_encodes() {
        let payload = ImagePayload::from_bytes(b"abc", "image/webp");
        assert_eq!(payload.data(), "YWJj");
        assert_eq!(payload.mime_type(), "image/webp");
    }

    #[test]
    fn extension_lookup_is_case_insensitive() {
        assert_eq!(mime_type_for_extension("PNG"), "image/png");
        assert_eq!(mime_type_for_extension("jpeg"), "image/jpeg");
    }
}
