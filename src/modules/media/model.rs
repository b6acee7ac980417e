use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// A stored upload and where to fetch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct StoredFile {
    pub key: String,
    pub url: String,
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct HotelImagesResponse {
    /// Stored files keyed by multipart field name
    pub files: BTreeMap<String, Vec<StoredFile>>,
    /// Stored thumbnails keyed by multipart field name
    pub thumbnails: BTreeMap<String, Vec<StoredFile>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AvatarResponse {
    pub file: StoredFile,
    pub thumbnail: Option<StoredFile>,
    /// False when the image could not be processed and was stored as sent
    pub transformed: bool,
}

/// Multipart form for hotel images; any field name is accepted.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct HotelImagesForm {
    #[schema(value_type = Vec<String>, format = Binary)]
    pub images: Vec<Vec<u8>>,
}

#[derive(ToSchema)]
#[allow(dead_code)]
pub struct AvatarForm {
    #[schema(value_type = String, format = Binary)]
    pub avatar: Vec<u8>,
}
