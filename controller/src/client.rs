use crate::config::ControllerConfig;
use crate::error::SubmitError;
use crate::models::*;
use reqwest::multipart::{Form, Part};
use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;

/// Multipart field name the backend reads the document from.
pub const FILE_FIELD: &str = "file";

/// Body of a `/query` submission.
pub fn build_query_request(question: &Question) -> QueryRequest {
    QueryRequest {
        question: question.as_str().to_string(),
    }
}

/// Multipart payload of an `/upload` submission. Only the first file is
/// sent; with no selection the form has no parts at all.
pub fn build_upload_form(files: &[UploadFile]) -> Result<Form, SubmitError> {
    let form = Form::new();
    let Some(file) = files.first() else {
        return Ok(form);
    };

    let part = Part::bytes(file.bytes.clone())
        .file_name(file.file_name.clone())
        .mime_str(&file.content_type)?;

    Ok(form.part(FILE_FIELD, part))
}

/// The two round trips against the document Q&A backend.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    config: ControllerConfig,
}

impl BackendClient {
    pub fn new(config: ControllerConfig) -> Result<Self, SubmitError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub async fn query(&self, question: &Question) -> Result<AnswerText, SubmitError> {
        let url = self.config.endpoint("/query");
        let request = build_query_request(question);
        log::debug!("POST {} ({} chars)", url, request.question.chars().count());

        let response = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await?;

        let payload: QueryResponse = read_payload(response).await?;
        Ok(AnswerText(payload.answer))
    }

    pub async fn upload(&self, files: &[UploadFile]) -> Result<UploadResponse, SubmitError> {
        let url = self.config.endpoint("/upload");
        let form = build_upload_form(files)?;
        match files.first() {
            Some(file) => log::debug!("POST {} ({}, {} bytes)", url, file.file_name, file.bytes.len()),
            None => log::debug!("POST {} without a file", url),
        }

        let response = self.client.post(url).multipart(form).send().await?;
        read_payload(response).await
    }
}

/// The body is decoded as JSON before the status is looked at, so a non-JSON
/// error page ends up as a parse failure rather than a server error.
async fn read_payload<T: DeserializeOwned>(response: Response) -> Result<T, SubmitError> {
    let status = response.status();
    let body = response.bytes().await?;
    let value: serde_json::Value = serde_json::from_slice(&body)?;

    if status.is_success() {
        Ok(serde_json::from_value(value)?)
    } else {
        let error: ErrorResponse = serde_json::from_value(value)?;
        log::warn!("Backend returned {}: {}", status, error.error);
        Err(SubmitError::Server {
            status,
            message: error.error,
        })
    }
}
