use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum UploadError {
    #[error("No file selected")]
    Empty,

    #[error("Only image files can be uploaded (got {0})")]
    NotAnImage(String),
}

/// Turn an uploaded image into an inline `data:` reference.
///
/// The declared content type wins; a missing or generic one falls back to a
/// guess from the file name.
pub fn to_data_url(
    bytes: &[u8],
    content_type: Option<&str>,
    file_name: Option<&str>,
) -> Result<String, UploadError> {
    if bytes.is_empty() {
        return Err(UploadError::Empty);
    }

    let declared = content_type
        .map(str::trim)
        .filter(|ct| !ct.is_empty() && *ct != "application/octet-stream");
    let mime = match declared {
        Some(ct) => ct.to_string(),
        None => file_name
            .and_then(|name| mime_guess::from_path(name).first())
            .map(|m| m.essence_str().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string()),
    };

    if !mime.starts_with("image/") {
        return Err(UploadError::NotAnImage(mime));
    }

    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_type_is_used() {
        let url = to_data_url(b"png!", Some("image/png"), Some("a.jpg")).unwrap();
        assert_eq!(url, "data:image/png;base64,cG5nIQ==");
    }

    #[test]
    fn generic_type_falls_back_to_file_name() {
        let url = to_data_url(b"x", Some("application/octet-stream"), Some("photo.jpeg")).unwrap();
        assert!(url.starts_with("data:image/jpeg;base64,"));
        let url = to_data_url(b"x", None, Some("icon.webp")).unwrap();
        assert!(url.starts_with("data:image/webp;base64,"));
    }

    #[test]
    fn non_images_are_rejected() {
        assert_eq!(
            to_data_url(b"%PDF", Some("application/pdf"), None),
            Err(UploadError::NotAnImage("application/pdf".into()))
        );
        assert!(to_data_url(b"x", None, None).is_err());
    }

    #[test]
    fn empty_upload_is_rejected() {
        assert_eq!(to_data_url(b"", Some("image/png"), None), Err(UploadError::Empty));
    }
}
