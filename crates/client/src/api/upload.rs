//! Image upload endpoints.

use reqwest::multipart::{Form, Part};
use tracing::instrument;

use super::{ApiClient, ApiError, JsonEnvelope};

/// A file to upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// MIME type, e.g. `image/png`. Left to the server when absent.
    pub content_type: Option<String>,
}

impl UploadFile {
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
            content_type: None,
        }
    }

    fn into_part(self) -> Result<Part, ApiError> {
        let part = Part::bytes(self.bytes).file_name(self.file_name);
        match self.content_type {
            Some(mime) => part
                .mime_str(&mime)
                .map_err(|e| ApiError::InvalidRequest(format!("Invalid content type {mime}: {e}"))),
            None => Ok(part),
        }
    }
}

impl ApiClient {
    /// Upload one image. `kind` is the backend's `type` field
    /// (e.g. `profile`, `avatar`).
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, file), fields(file_name = %file.file_name, size = file.bytes.len()))]
    pub async fn upload_image(&self, file: UploadFile, kind: &str) -> Result<JsonEnvelope, ApiError> {
        let form = Form::new()
            .part("image", file.into_part()?)
            .text("type", kind.to_owned());
        let timeout = self.timeouts().upload;
        self.post_multipart("upload/image", form, timeout).await
    }

    /// Upload several images in one request.
    ///
    /// # Errors
    ///
    /// Returns error if the API request fails.
    #[instrument(skip(self, files), fields(count = files.len()))]
    pub async fn upload_images(
        &self,
        files: Vec<UploadFile>,
        kind: &str,
    ) -> Result<JsonEnvelope, ApiError> {
        let mut form = Form::new();
        for file in files {
            form = form.part("images", file.into_part()?);
        }
        let form = form.text("type", kind.to_owned());
        let timeout = self.timeouts().multiple_upload;
        self.post_multipart("upload/multiple", form, timeout).await
    }
}
