//! Shared key derivation for originals and previews.

/// Final `/`-separated segment of a key; keys without `/` are returned whole.
pub fn basename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Key of the preview derived from `file_key`: `{preview_folder}/{basename(file_key)}`.
pub fn preview_key(preview_folder: &str, file_key: &str) -> String {
    format!("{}/{}", preview_folder, basename(file_key))
}

/// Key for a newly ingested original: `{source_prefix}{unix_seconds}-{filename}`.
pub fn source_key(source_prefix: &str, unix_seconds: i64, filename: &str) -> String {
    format!("{}{}-{}", source_prefix, unix_seconds, filename)
}
