//! Image payloads handed to the image host

use std::fmt;

/// Image formats accepted by the scan dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
        }
    }

    /// Detect the format from a MIME type, falling back to the file extension
    /// when the MIME type is missing or generic.
    pub fn detect(file_name: &str, content_type: &str) -> Option<Self> {
        match content_type.trim().to_ascii_lowercase().as_str() {
            "image/png" => return Some(ImageFormat::Png),
            "image/jpeg" | "image/jpg" | "image/pjpeg" => return Some(ImageFormat::Jpeg),
            "" | "application/octet-stream" => {}
            _ => return None,
        }

        let extension = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
        match extension.as_str() {
            "png" => Some(ImageFormat::Png),
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            _ => None,
        }
    }
}

/// A picked or dropped image file, held in memory until upload
#[derive(Clone, PartialEq, Eq)]
pub struct ImageBlob {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageBlob {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn format(&self) -> Option<ImageFormat> {
        ImageFormat::detect(&self.file_name, &self.content_type)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

// Raw bytes are never useful in logs
impl fmt::Debug for ImageBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageBlob")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_from_mime() {
        assert_eq!(ImageFormat::detect("x", "image/png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::detect("x", "IMAGE/JPEG"), Some(ImageFormat::Jpeg));
    }

    #[test]
    fn test_detect_from_extension_when_mime_missing() {
        assert_eq!(ImageFormat::detect("label.JPG", ""), Some(ImageFormat::Jpeg));
        assert_eq!(
            ImageFormat::detect("label.png", "application/octet-stream"),
            Some(ImageFormat::Png)
        );
        assert_eq!(ImageFormat::detect("label", ""), None);
    }

    #[test]
    fn test_unsupported_types_rejected() {
        assert_eq!(ImageFormat::detect("label.gif", "image/gif"), None);
        assert_eq!(ImageFormat::detect("label.png", "text/plain"), None);
        assert_eq!(ImageFormat::detect("label.webp", ""), None);
    }

    #[test]
    fn test_debug_omits_bytes() {
        let blob = ImageBlob::new("a.png", "image/png", vec![1, 2, 3]);
        let rendered = format!("{:?}", blob);
        assert!(rendered.contains("len: 3"));
        assert!(!rendered.contains("[1, 2, 3]"));
    }
}
