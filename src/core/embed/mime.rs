//! Image MIME types by file extension

use std::path::Path;

const MIME_TYPES: &[(&str, &str)] = &[
    ("gif", "image/gif"),
    ("pbm", "image/x-portable-bitmap"),
    ("pgm", "image/x-portable-graymap"),
    ("ppm", "image/x-portable-pixmap"),
    ("tiff", "image/tiff"),
    ("tif", "image/tiff"),
    ("xbm", "image/x-xbitmap"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("bmp", "image/x-ms-bmp"),
    ("png", "image/png"),
    ("svg", "image/svg+xml"),
    ("webp", "image/webp"),
];

/// MIME type for an image reference, judged by its extension
/// (case-insensitive). `None` for anything that is not a known image type.
pub fn mime_type(reference: &str) -> Option<&'static str> {
    let ext = Path::new(reference).extension()?.to_str()?.to_ascii_lowercase();
    MIME_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, mime)| *mime)
}
