//! Submitted asset fields, whatever the body encoding
//!
//! Accepts urlencoded forms, multipart forms (with an optional
//! `file_upload` part) and JSON objects. A `model` field holding a JSON
//! object replaces the other text fields.

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde_json::Value;
use std::collections::HashMap;

use crate::error::ApiError;
use crate::ingest::{Submission, Upload};

/// Name of the multipart part carrying an uploaded file
pub const FILE_FIELD: &str = "file_upload";

#[derive(Debug, Clone, Default)]
pub struct SubmittedForm {
    pub fields: HashMap<String, String>,
    pub file: Option<Upload>,
}

impl SubmittedForm {
    /// Trimmed, non-empty field value
    pub fn get(&self, key: &str) -> Option<String> {
        crate::ingest::field(&self.fields, key)
    }

    pub fn submission(&self) -> Submission {
        Submission::from_fields(&self.fields, self.file.clone())
    }
}

#[async_trait]
impl<S> FromRequest<S> for SubmittedForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let mut form = if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            read_multipart(multipart).await?
        } else if content_type.starts_with("application/json") {
            let Json(value) = Json::<Value>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            SubmittedForm {
                fields: object_fields(value)?,
                file: None,
            }
        } else {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            SubmittedForm { fields, file: None }
        };

        if let Some(model) = form.fields.remove("model") {
            let value: Value = serde_json::from_str(&model)
                .map_err(|e| ApiError::BadRequest(format!("model is not valid JSON: {}", e)))?;
            form.fields = object_fields(value)?;
        }

        Ok(form)
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<SubmittedForm, ApiError> {
    let mut form = SubmittedForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == FILE_FIELD {
            let file_name = field.file_name().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            let upload = Upload {
                file_name,
                bytes: bytes.to_vec(),
            };
            if !upload.is_empty() {
                tracing::debug!("Received upload of {} bytes", upload.bytes.len());
                form.file = Some(upload);
            }
        } else {
            let text = field
                .text()
                .await
                .map_err(|e| ApiError::BadRequest(e.body_text()))?;
            form.fields.insert(name, text);
        }
    }

    Ok(form)
}

/// Flatten a JSON object into text fields; nulls are dropped
fn object_fields(value: Value) -> Result<HashMap<String, String>, ApiError> {
    let Value::Object(map) = value else {
        return Err(ApiError::BadRequest("expected a JSON object".to_string()));
    };

    Ok(map
        .into_iter()
        .filter_map(|(key, value)| match value {
            Value::Null => None,
            Value::String(s) => Some((key, s)),
            other => Some((key, other.to_string())),
        })
        .collect())
}
