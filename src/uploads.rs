use std::path::Path;

pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif"];

/// Cap on the whole multipart request body.
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("No file was uploaded.")]
    NoFile,

    #[error("File type not allowed. Please upload a valid image file.")]
    TypeNotAllowed,

    #[error("Error saving file: {0}")]
    Io(#[from] std::io::Error),
}

/// Extension check against the allow-list; the extension is the text
/// after the last '.', compared case-insensitively.
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Strip path components and collapse characters outside [A-Za-z0-9._-]
/// so a client-supplied name cannot escape the uploads directory.
pub fn sanitize_filename(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    cleaned.trim_start_matches('.').to_string()
}

/// Validate and persist an uploaded image, returning the URL-style
/// reference the web layer serves it back under. A collision with an
/// existing file of the same sanitized name overwrites it.
pub fn store_upload(dir: &Path, original_name: &str, bytes: &[u8]) -> Result<String, UploadError> {
    if original_name.is_empty() {
        return Err(UploadError::NoFile);
    }
    if !allowed_file(original_name) {
        return Err(UploadError::TypeNotAllowed);
    }

    let filename = sanitize_filename(original_name);
    if filename.is_empty() {
        return Err(UploadError::NoFile);
    }

    std::fs::create_dir_all(dir)?;
    std::fs::write(dir.join(&filename), bytes)?;

    Ok(format!("/uploads/{}", filename))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_extensions_match_case_insensitively() {
        assert!(allowed_file("photo.png"));
        assert!(allowed_file("photo.PNG"));
        assert!(allowed_file("photo.JpEg"));
        assert!(allowed_file("photo.gif"));
    }

    #[test]
    fn disallowed_and_missing_extensions_are_rejected() {
        assert!(!allowed_file("photo.exe"));
        assert!(!allowed_file("photo.png.exe"));
        assert!(!allowed_file("photo"));
        assert!(!allowed_file(""));
    }

    #[test]
    fn sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("../../etc/passwd.png"), "passwd.png");
        assert_eq!(sanitize_filename("a\\b\\evil.png"), "evil.png");
        assert_eq!(sanitize_filename("..hidden.png"), "hidden.png");
    }

    #[test]
    fn sanitize_collapses_unsafe_characters() {
        assert_eq!(sanitize_filename("my photo (1).png"), "my_photo__1_.png");
        assert_eq!(sanitize_filename("name.PNG"), "name.PNG");
    }

    #[test]
    fn store_rejects_empty_name() {
        let tmp = tempfile::tempdir().unwrap();
        let err = store_upload(tmp.path(), "", b"data").unwrap_err();
        assert!(matches!(err, UploadError::NoFile));
    }

    #[test]
    fn store_rejects_disallowed_type() {
        let tmp = tempfile::tempdir().unwrap();
        let err = store_upload(tmp.path(), "photo.exe", b"data").unwrap_err();
        assert!(matches!(err, UploadError::TypeNotAllowed));
        assert!(std::fs::read_dir(tmp.path()).unwrap().next().is_none());
    }

    #[test]
    fn store_accepts_mixed_case_png() {
        let tmp = tempfile::tempdir().unwrap();
        let url = store_upload(tmp.path(), "photo.PNG", b"imagedata").unwrap();
        assert_eq!(url, "/uploads/photo.PNG");
        assert_eq!(
            std::fs::read(tmp.path().join("photo.PNG")).unwrap(),
            b"imagedata"
        );
    }

    #[test]
    fn store_writes_under_uploads_dir_even_for_traversal_names() {
        let tmp = tempfile::tempdir().unwrap();
        let url = store_upload(tmp.path(), "../escape.png", b"x").unwrap();
        assert_eq!(url, "/uploads/escape.png");
        assert!(tmp.path().join("escape.png").exists());
        assert!(!tmp.path().parent().unwrap().join("escape.png").exists());
    }

    #[test]
    fn store_overwrites_same_name() {
        let tmp = tempfile::tempdir().unwrap();
        store_upload(tmp.path(), "a.png", b"old").unwrap();
        store_upload(tmp.path(), "a.png", b"new").unwrap();
        assert_eq!(std::fs::read(tmp.path().join("a.png")).unwrap(), b"new");
    }
}
