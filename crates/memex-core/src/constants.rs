//! Catalog-wide constants.

/// Key prefix under which ingested originals live. Only keys with this prefix
/// are considered for preview generation.
pub const SOURCE_PREFIX: &str = "images/";

/// Folder (key prefix without trailing slash) holding derived previews.
pub const PREVIEW_FOLDER: &str = "previews";

/// Width in pixels of every derived preview.
pub const PREVIEW_WIDTH: u32 = 200;

/// JPEG quality used when encoding previews.
pub const PREVIEW_JPEG_QUALITY: u8 = 75;

/// Content type stored with every derived preview.
pub const PREVIEW_CONTENT_TYPE: &str = "image/jpeg";

/// Declared content types starting with this prefix are treated as images.
pub const IMAGE_CONTENT_TYPE_PREFIX: &str = "image/";

/// `fileType` classification written by ingestion.
pub const FILE_TYPE_IMAGE: &str = "image";

pub const DEFAULT_AWS_REGION: &str = "us-east-1";
