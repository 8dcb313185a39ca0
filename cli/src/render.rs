use form_controller::{Page, Region, Renderer, Severity};

/// Prints each page update on its own line.
pub struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    fn render(&self, region: Region, page: &Page) {
        match region {
            Region::Answer => println!("[answer] {}", page.answer_text()),
            Region::Status => {
                if let Some(notice) = &page.status {
                    let tag = match notice.severity {
                        Severity::Info => "status",
                        Severity::Success => "ok",
                        Severity::Error => "error",
                    };
                    println!("[{}] {}", tag, notice.text);
                }
            }
            Region::FileInput => match page.selected_files.first() {
                Some(file) => println!("[file] {}", file.file_name),
                None => println!("[file] -"),
            },
            Region::Question => {}
        }
    }
}

pub fn page_json(page: &Page) -> serde_json::Value {
    serde_json::json!({
        "question": page.question.as_str(),
        "answer": page.answer_text(),
        "status": page.status_text(),
        "selected_files": page
            .selected_files
            .iter()
            .map(|f| f.file_name.as_str())
            .collect::<Vec<_>>(),
    })
}
