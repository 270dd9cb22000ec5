//! Upload content-type policy
//!
//! The type is detected from the file's leading bytes, never from its name.

use std::path::Path;

/// MIME types accepted for upload
pub const ALLOWED_MIME_TYPES: [&str; 5] = [
    "image/bmp",
    "image/jpeg",
    "image/png",
    "image/webp",
    "video/mp4",
];

/// Reported for content that matches no known signature
pub const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";

/// Message logged when a file is rejected
pub const INVALID_TYPE_MESSAGE: &str =
    "Invalid file type. Allowed types: .bmp, .jpg, .jpeg, .png, .webp, .mp4";

/// Detect the MIME type of a file from its header
///
/// Only the first few kilobytes are read.
pub fn sniff_file(path: &Path) -> std::io::Result<&'static str> {
    Ok(infer::get_from_path(path)?.map_or(UNKNOWN_MIME_TYPE, |kind| kind.mime_type()))
}

/// Whether a MIME type may be uploaded
pub fn is_allowed(mime_type: &str) -> bool {
    ALLOWED_MIME_TYPES.contains(&mime_type)
}
