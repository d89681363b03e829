//! Upload policy: accepted content types, size limits and object naming.
//!
//! Every check here runs before a byte is sent to object storage, so a
//! rejected upload never costs a network round-trip.

use uuid::Uuid;

use crate::error::CoreError;

/// Bucket holding approved-testimonial photos.
pub const BUCKET_TESTIMONIALS: &str = "testimonials";

/// Bucket holding downloadable library files.
pub const BUCKET_LIBRARY: &str = "library";

/// Maximum photo size (5 MiB).
pub const MAX_PHOTO_BYTES: usize = 5 * 1024 * 1024;

/// Maximum library file size (10 MiB).
pub const MAX_LIBRARY_FILE_BYTES: usize = 10 * 1024 * 1024;

/// Image types accepted for photos, with the extension used for storage.
const PHOTO_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
];

/// Document types accepted for the library, with the extension used for storage.
const LIBRARY_TYPES: &[(&str, &str)] = &[
    ("application/pdf", "pdf"),
    ("application/msword", "doc"),
    (
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "docx",
    ),
    ("application/vnd.ms-powerpoint", "ppt"),
    (
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "pptx",
    ),
    ("application/vnd.ms-excel", "xls"),
    (
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "xlsx",
    ),
    ("text/plain", "txt"),
    ("application/zip", "zip"),
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
];

/// What an upload is for; selects the policy applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadKind {
    Photo,
    LibraryFile,
}

impl UploadKind {
    fn max_bytes(self) -> usize {
        match self {
            UploadKind::Photo => MAX_PHOTO_BYTES,
            UploadKind::LibraryFile => MAX_LIBRARY_FILE_BYTES,
        }
    }

    fn types(self) -> &'static [(&'static str, &'static str)] {
        match self {
            UploadKind::Photo => PHOTO_TYPES,
            UploadKind::LibraryFile => LIBRARY_TYPES,
        }
    }

    fn label(self) -> &'static str {
        match self {
            UploadKind::Photo => "Photo",
            UploadKind::LibraryFile => "File",
        }
    }
}

/// Check an upload against its policy.
///
/// Returns the storage extension for the accepted content type.
pub fn validate_upload(
    kind: UploadKind,
    content_type: &str,
    size_bytes: usize,
) -> Result<&'static str, CoreError> {
    let max = kind.max_bytes();
    if size_bytes == 0 {
        return Err(CoreError::Validation(format!("{} is empty", kind.label())));
    }
    if size_bytes > max {
        return Err(CoreError::Validation(format!(
            "{} is too large ({}). Maximum size is {}",
            kind.label(),
            human_size(size_bytes),
            human_size(max)
        )));
    }

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    kind.types()
        .iter()
        .find(|(mime, _)| *mime == essence)
        .map(|(_, ext)| *ext)
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "{} type '{content_type}' is not allowed",
                kind.label()
            ))
        })
}

/// Generate a collision-resistant object name: `<prefix>/<uuid v4>.<ext>`.
///
/// The client's filename never reaches the object key.
pub fn object_name(prefix: &str, ext: &str) -> String {
    format!("{prefix}/{}.{ext}", Uuid::new_v4())
}

/// Format a byte count as MiB with one decimal (`"14.3 MB"`).
pub fn human_size(bytes: usize) -> String {
    format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifteen_megabyte_photo_is_rejected_with_size_message() {
        let err = validate_upload(UploadKind::Photo, "image/jpeg", 15 * 1024 * 1024)
            .unwrap_err()
            .to_string();
        assert!(err.contains("too large"), "{err}");
        assert!(err.contains("Maximum size is 5.0 MB"), "{err}");
    }

    #[test]
    fn photo_types() {
        assert_eq!(validate_upload(UploadKind::Photo, "image/png", 10).unwrap(), "png");
        assert_eq!(
            validate_upload(UploadKind::Photo, "IMAGE/JPEG; charset=binary", 10).unwrap(),
            "jpg"
        );
        assert!(validate_upload(UploadKind::Photo, "application/pdf", 10).is_err());
        assert!(validate_upload(UploadKind::Photo, "image/gif", 10).is_err());
    }

    #[test]
    fn library_accepts_documents_up_to_ten_megabytes() {
        assert_eq!(
            validate_upload(UploadKind::LibraryFile, "application/pdf", MAX_LIBRARY_FILE_BYTES)
                .unwrap(),
            "pdf"
        );
        assert!(validate_upload(
            UploadKind::LibraryFile,
            "application/pdf",
            MAX_LIBRARY_FILE_BYTES + 1
        )
        .is_err());
    }

    #[test]
    fn empty_upload_is_rejected() {
        assert!(validate_upload(UploadKind::Photo, "image/png", 0).is_err());
    }

    #[test]
    fn object_names_are_unique_and_prefixed() {
        let a = object_name("photos", "png");
        let b = object_name("photos", "png");
        assert_ne!(a, b);
        assert!(a.starts_with("photos/"));
        assert!(a.ends_with(".png"));
    }
}
