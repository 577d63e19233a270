//! Multipart form payloads
//!
//! A `FormPayload` is the serialized form: ordered text fields (repeated
//! keys allowed, e.g. `author_first_name[]`) plus file attachments. It is
//! plain data so it can be inspected in tests before being turned into a
//! `reqwest` multipart body.

use super::ApiError;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use std::path::Path;

/// A file attached to a form
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub file_name: String,
    pub mime: String,
    pub bytes: Bytes,
}

impl Attachment {
    /// Read a file from disk, guessing its content type from the extension
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self {
            mime: guess_mime(path),
            file_name,
            bytes: Bytes::from(bytes),
        })
    }
}

/// Content type for a path, `application/octet-stream` when unknown
pub fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Text(String),
    File(Attachment),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormPayload {
    parts: Vec<(String, Value)>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field. Repeated names are kept in order.
    pub fn text(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.parts.push((name.into(), Value::Text(value.into())));
        self
    }

    pub fn file(&mut self, name: impl Into<String>, attachment: Attachment) -> &mut Self {
        self.parts.push((name.into(), Value::File(attachment)));
        self
    }

    /// First text value under `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|(n, v)| match v {
            Value::Text(t) if n == name => Some(t.as_str()),
            _ => None,
        })
    }

    /// All text values under `name`, in order
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.parts
            .iter()
            .filter_map(|(n, v)| match v {
                Value::Text(t) if n == name => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parts.iter().any(|(n, _)| n == name)
    }

    pub fn attachment(&self, name: &str) -> Option<&Attachment> {
        self.parts.iter().find_map(|(n, v)| match v {
            Value::File(a) if n == name => Some(a),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Build the multipart body
    pub fn into_multipart(self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for (name, value) in self.parts {
            form = match value {
                Value::Text(text) => form.text(name, text),
                Value::File(a) => {
                    let part = Part::bytes(a.bytes.to_vec())
                        .file_name(a.file_name)
                        .mime_str(&a.mime)?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}
