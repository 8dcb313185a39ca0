use crate::client::BackendClient;
use crate::config::{ControllerConfig, ResponseOrder};
use crate::error::SubmitError;
use crate::messages::MessageId;
use crate::models::*;
use crate::page::{Notice, Page, Renderer, Severity, Update};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;

/// Cancels an in-flight submission. Clones share the same signal.
#[derive(Debug, Clone)]
pub struct CancelToken {
    signal: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (signal, _) = watch::channel(false);
        Self {
            signal: Arc::new(signal),
        }
    }

    pub fn cancel(&self) {
        self.signal.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.signal.borrow()
    }

    pub async fn cancelled(&self) {
        let mut rx = self.signal.subscribe();
        // the sender lives in self, so wait_for only returns once cancelled
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Wires the question form and the upload form to the backend.
///
/// Cloning is cheap; clones drive the same page. Submissions are not
/// serialized against each other: two overlapping queries both run to
/// completion, and with [`ResponseOrder::LastResolved`] whichever resolves
/// last owns the answer display.
#[derive(Clone)]
pub struct FormController {
    client: BackendClient,
    page: Arc<Mutex<Page>>,
    renderer: Arc<dyn Renderer>,
    issued: Arc<AtomicU64>,
}

impl FormController {
    pub fn new(config: ControllerConfig, renderer: Arc<dyn Renderer>) -> Result<Self, SubmitError> {
        Ok(Self {
            client: BackendClient::new(config)?,
            page: Arc::new(Mutex::new(Page::default())),
            renderer,
            issued: Arc::new(AtomicU64::new(0)),
        })
    }

    pub fn config(&self) -> &ControllerConfig {
        self.client.config()
    }

    /// Snapshot of the current page.
    pub fn page(&self) -> Page {
        self.page.lock().clone()
    }

    pub fn set_question(&self, question: Question) {
        self.apply(Update::SetQuestion(question));
    }

    pub fn select_files(&self, files: Vec<UploadFile>) {
        self.apply(Update::SelectFiles(files));
    }

    /// Fills the question input and submits it.
    pub async fn ask(&self, question: Question) -> Result<AnswerText, SubmitError> {
        self.set_question(question.clone());
        self.send_query(question, &CancelToken::new()).await
    }

    /// Submits whatever the question input currently holds.
    pub async fn submit_query(&self) -> Result<AnswerText, SubmitError> {
        self.submit_query_with(&CancelToken::new()).await
    }

    pub async fn submit_query_with(&self, cancel: &CancelToken) -> Result<AnswerText, SubmitError> {
        let question = self.page.lock().question.clone();
        self.send_query(question, cancel).await
    }

    async fn send_query(
        &self,
        question: Question,
        cancel: &CancelToken,
    ) -> Result<AnswerText, SubmitError> {
        let ticket = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
        log::info!("Submitting question #{}", ticket);

        self.apply(Update::SetAnswer(AnswerText(MessageId::Searching.text().to_string())));

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(SubmitError::Cancelled),
            result = self.client.query(&question) => result,
        };

        let display = match &result {
            Ok(answer) => {
                log::info!("Question #{} answered ({} chars)", ticket, answer.as_str().chars().count());
                answer.clone()
            }
            Err(err) => {
                log::warn!("Question #{} failed: {}", ticket, err);
                AnswerText(query_error_text(err))
            }
        };

        let rendered = {
            let mut page = self.page.lock();
            if self.is_superseded(ticket) {
                log::info!("Dropping response to question #{}: a newer question was submitted", ticket);
                return result;
            }
            let region = page.apply(Update::SetAnswer(display));
            (region, page.clone())
        };
        self.renderer.render(rendered.0, &rendered.1);

        result
    }

    /// Submits the upload form with the current file selection.
    pub async fn submit_upload(&self) -> Result<UploadResponse, SubmitError> {
        self.submit_upload_with(&CancelToken::new()).await
    }

    pub async fn submit_upload_with(&self, cancel: &CancelToken) -> Result<UploadResponse, SubmitError> {
        let files = self.page.lock().selected_files.clone();
        self.send_upload(files, cancel).await
    }

    /// Selects `files` and submits them. The files sent are the ones passed
    /// here, even if the selection changes before the request goes out.
    pub async fn upload(&self, files: Vec<UploadFile>) -> Result<UploadResponse, SubmitError> {
        self.select_files(files.clone());
        self.send_upload(files, &CancelToken::new()).await
    }

    async fn send_upload(
        &self,
        files: Vec<UploadFile>,
        cancel: &CancelToken,
    ) -> Result<UploadResponse, SubmitError> {
        match files.first() {
            Some(file) => log::info!("Uploading {} ({} selected)", file.file_name, files.len()),
            None => log::info!("Uploading with no file selected"),
        }

        self.apply(Update::SetStatus(Notice::new(
            Severity::Info,
            MessageId::Uploading.text(),
        )));

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(SubmitError::Cancelled),
            result = self.client.upload(&files) => result,
        };

        match &result {
            Ok(response) => {
                log::info!(
                    "Upload accepted: {}",
                    response.message.as_deref().unwrap_or("no message")
                );
                self.apply(Update::SetStatus(Notice::new(
                    Severity::Success,
                    MessageId::UploadSucceeded.text(),
                )));
                self.apply(Update::ClearFiles);
            }
            Err(err) => {
                log::warn!("Upload failed: {}", err);
                self.apply(Update::SetStatus(Notice::new(Severity::Error, upload_error_text(err))));
            }
        }

        result
    }

    fn is_superseded(&self, ticket: u64) -> bool {
        self.config().response_order == ResponseOrder::LatestIssued
            && self.issued.load(Ordering::SeqCst) != ticket
    }

    /// The renderer gets a snapshot taken after the lock is released, so it
    /// may call back into the controller.
    fn apply(&self, update: Update) {
        let (region, snapshot) = {
            let mut page = self.page.lock();
            let region = page.apply(update);
            (region, page.clone())
        };
        self.renderer.render(region, &snapshot);
    }
}

/// Text the answer display shows for a failed query.
pub fn query_error_text(err: &SubmitError) -> String {
    match err {
        SubmitError::Server { message, .. } => MessageId::ErrorPrefix.with_detail(message),
        other => MessageId::QueryFailed.with_detail(&other.to_string()),
    }
}

/// Text the status region shows for a failed upload.
pub fn upload_error_text(err: &SubmitError) -> String {
    match err {
        SubmitError::Server { message, .. } => MessageId::ErrorPrefix.with_detail(message),
        other => MessageId::UploadFailed.with_detail(&other.to_string()),
    }
}
