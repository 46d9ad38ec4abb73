use thiserror::Error;

/// Errors raised while accepting a file for upload
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UploadError {
    /// The file is not an image
    #[error("Only image files are supported.")]
    NotAnImage(String),

    /// The file has no content
    #[error("The selected file is empty.")]
    Empty(String),
}

/// An image chosen by the user, held in memory until it is uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Display name, usually the file name without its directory
    pub name: String,

    /// MIME type sent with the upload
    pub mime_type: String,

    /// Raw file contents
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    /// Accept an image file, guessing its MIME type from the name.
    ///
    /// Anything that does not map to an `image/*` type is refused, the same
    /// restriction an image-only file picker applies.
    pub fn image(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, UploadError> {
        let name = name.into();
        let mime_type = mime_guess::from_path(&name)
            .first()
            .filter(|mime| mime.type_() == mime_guess::mime::IMAGE)
            .ok_or_else(|| UploadError::NotAnImage(name.clone()))?;

        if bytes.is_empty() {
            return Err(UploadError::Empty(name));
        }

        Ok(Self {
            name,
            mime_type: mime_type.essence_str().to_string(),
            bytes,
        })
    }

    /// Size of the file in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the file has no content
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_files_are_accepted() {
        let file = SelectedFile::image("scan.PNG", vec![1, 2, 3]).unwrap();
        assert_eq!(file.name, "scan.PNG");
        assert_eq!(file.mime_type, "image/png");
        assert_eq!(file.len(), 3);

        let file = SelectedFile::image("photo.jpeg", vec![0xff]).unwrap();
        assert_eq!(file.mime_type, "image/jpeg");
    }

    #[test]
    fn test_non_images_are_refused() {
        assert_eq!(
            SelectedFile::image("report.pdf", vec![1]),
            Err(UploadError::NotAnImage("report.pdf".to_string()))
        );
        assert!(SelectedFile::image("no_extension", vec![1]).is_err());
    }

    #[test]
    fn test_empty_files_are_refused() {
        let err = SelectedFile::image("scan.png", Vec::new()).unwrap_err();
        assert_eq!(err, UploadError::Empty("scan.png".to_string()));
        assert_eq!(err.to_string(), "The selected file is empty.");
    }
}
