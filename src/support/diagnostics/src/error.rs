use crate::{Diagnostic, Severity, Subject, show::Show};
use colored::Colorize;

#[derive(Debug)]
pub struct ErrorDiagnostic {
    message: String,
    subject: Subject,
}

impl ErrorDiagnostic {
    pub fn new(message: impl ToString, subject: Subject) -> Self {
        Self {
            message: message.to_string(),
            subject,
        }
    }
}

impl Show for ErrorDiagnostic {
    fn show(&self, w: &mut dyn std::fmt::Write) -> std::fmt::Result {
        write!(
            w,
            "{}: {} {}",
            self.subject,
            "error:".red().bold(),
            self.message
        )
    }
}

impl Diagnostic for ErrorDiagnostic {
    fn severity(&self) -> Severity {
        Severity::Error
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn subject(&self) -> &Subject {
        &self.subject
    }
}
