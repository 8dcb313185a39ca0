use crate::models::{AnswerText, Question, UploadFile};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// A message in the status region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub text: String,
}

impl Notice {
    pub fn new(severity: Severity, text: impl Into<String>) -> Self {
        Self {
            severity,
            text: text.into(),
        }
    }
}

/// The part of the page an update touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Question,
    Answer,
    Status,
    FileInput,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    SetQuestion(Question),
    SetAnswer(AnswerText),
    SetStatus(Notice),
    SelectFiles(Vec<UploadFile>),
    ClearFiles,
}

/// Everything the two forms show or hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub question: Question,
    pub answer: AnswerText,
    pub status: Option<Notice>,
    pub selected_files: Vec<UploadFile>,
}

impl Page {
    /// The only way page state changes.
    pub fn apply(&mut self, update: Update) -> Region {
        match update {
            Update::SetQuestion(question) => {
                self.question = question;
                Region::Question
            }
            Update::SetAnswer(answer) => {
                self.answer = answer;
                Region::Answer
            }
            Update::SetStatus(notice) => {
                self.status = Some(notice);
                Region::Status
            }
            Update::SelectFiles(files) => {
                self.selected_files = files;
                Region::FileInput
            }
            Update::ClearFiles => {
                self.selected_files.clear();
                Region::FileInput
            }
        }
    }

    pub fn answer_text(&self) -> &str {
        self.answer.as_str()
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|notice| notice.text.as_str())
    }
}

/// Draws the page after every update. `page` is a snapshot; no lock is held
/// while `render` runs.
pub trait Renderer: Send + Sync {
    fn render(&self, region: Region, page: &Page);
}

/// Renderer for callers that only read the page afterwards.
pub struct NoopRenderer;

impl Renderer for NoopRenderer {
    fn render(&self, _region: Region, _page: &Page) {}
}
