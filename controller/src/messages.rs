//! User-facing strings, keyed by identifier.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageId {
    Searching,
    ErrorPrefix,
    QueryFailed,
    Uploading,
    UploadSucceeded,
    UploadFailed,
}

impl MessageId {
    pub fn text(self) -> &'static str {
        match self {
            MessageId::Searching => "प्रश्नाचे उत्तर शोधत आहे...",
            MessageId::ErrorPrefix => "त्रुटी: ",
            MessageId::QueryFailed => "प्रश्न विचारताना त्रुटी आली: ",
            MessageId::Uploading => "दस्तऐवज अपलोड होत आहे...",
            MessageId::UploadSucceeded => "दस्तऐवज यशस्वीरित्या अपलोड झाला!",
            MessageId::UploadFailed => "दस्तऐवज अपलोड करताना त्रुटी आली: ",
        }
    }

    /// Prefix followed by `detail`, for the messages that carry one.
    pub fn with_detail(self, detail: &str) -> String {
        format!("{}{}", self.text(), detail)
    }
}
