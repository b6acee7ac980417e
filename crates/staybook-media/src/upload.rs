use bytes::Bytes;
use std::collections::BTreeMap;
use std::path::Path;

/// Uploaded files grouped by multipart field name.
pub type UploadFields = BTreeMap<String, Vec<UploadedFile>>;

/// A file received in a multipart upload, held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub field_name: String,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn new(
        field_name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Whether the declared MIME type is an image type.
    pub fn is_image(&self) -> bool {
        self.content_type
            .trim()
            .to_ascii_lowercase()
            .starts_with("image/")
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// File name without its extension.
    pub fn stem(&self) -> &str {
        Path::new(&self.file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("upload")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image() {
        assert!(UploadedFile::new("f", "a.png", "image/png", vec![]).is_image());
        assert!(UploadedFile::new("f", "a.jpg", "IMAGE/JPEG", vec![]).is_image());
        assert!(!UploadedFile::new("f", "a.pdf", "application/pdf", vec![]).is_image());
        assert!(!UploadedFile::new("f", "a", "", vec![]).is_image());
    }

    #[test]
    fn test_name_parts() {
        let file = UploadedFile::new("photos", "Lobby.View.JPG", "image/jpeg", vec![1, 2, 3]);
        assert_eq!(file.stem(), "Lobby.View");
        assert_eq!(file.size(), 3);

        let bare = UploadedFile::new("photos", "", "image/png", vec![]);
        assert_eq!(bare.stem(), "upload");
    }
}
