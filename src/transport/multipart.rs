use bytes::Bytes;
use reqwest::multipart::{Form, Part};

/// Builder for multipart/form-data requests
pub struct MultipartBuilder {
    form: Form,
}

impl MultipartBuilder {
    pub fn new() -> Self {
        Self { form: Form::new() }
    }

    /// Adds a file part; JSON-lines datasets are sent as application/octet-stream
    pub fn add_file(mut self, field_name: &str, file_name: &str, data: Bytes) -> Self {
        let part = Part::bytes(data.to_vec())
            .file_name(file_name.to_string())
            .mime_str("application/octet-stream")
            .unwrap_or_else(|_| Part::bytes(data.to_vec()).file_name(file_name.to_string()));

        self.form = self.form.part(field_name.to_string(), part);
        self
    }

    /// Adds a text part to the multipart form
    pub fn add_text(mut self, field_name: &str, value: &str) -> Self {
        self.form = self.form.text(field_name.to_string(), value.to_string());
        self
    }

    pub fn build(self) -> Form {
        self.form
    }
}

impl Default for MultipartBuilder {
    fn default() -> Self {
        Self::new()
    }
}
