use crate::{Diagnostic, Severity, Subject, show::Show};
use colored::Colorize;

#[derive(Debug)]
pub struct WarningDiagnostic {
    message: String,
    subject: Subject,
}

impl WarningDiagnostic {
    pub fn new(message: impl ToString, subject: Subject) -> Self {
        Self {
            message: message.to_string(),
            subject,
        }
    }
}

impl Show for WarningDiagnostic {
    fn show(&self, w: &mut dyn std::fmt::Write) -> std::fmt::Result {
        write!(
            w,
            "{}: {} {}",
            self.subject,
            "warning:".yellow().bold(),
            self.message
        )
    }
}

impl Diagnostic for WarningDiagnostic {
    fn severity(&self) -> Severity {
        Severity::Warning
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn subject(&self) -> &Subject {
        &self.subject
    }
}
