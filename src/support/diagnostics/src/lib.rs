mod error;
mod show;
mod warning;

use core::fmt::Debug;
pub use error::ErrorDiagnostic;
use parking_lot::Mutex;
pub use show::Show;
use std::fmt::Display;
pub use warning::WarningDiagnostic;

pub trait Diagnostic: Show + Send + Sync {
    fn severity(&self) -> Severity;
    fn message(&self) -> &str;
    fn subject(&self) -> &Subject;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

/// The record (and optionally the member of it) a diagnostic is about.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Subject {
    pub record: String,
    pub member: Option<String>,
}

impl Subject {
    pub fn record(record: impl ToString) -> Self {
        Self {
            record: record.to_string(),
            member: None,
        }
    }

    pub fn member(record: impl ToString, member: impl ToString) -> Self {
        Self {
            record: record.to_string(),
            member: Some(member.to_string()),
        }
    }
}

impl Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.member {
            Some(member) => write!(f, "{}::{}", self.record, member),
            None => write!(f, "{}", self.record),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DiagnosticFlags {
    pub print_without_collecting: bool,
    pub warn_padded_field: bool,
    pub warn_padded_bitfield: bool,
    pub warn_padded_record: bool,
}

impl DiagnosticFlags {
    /// Keeps every diagnostic instead of printing it, with all warnings on.
    pub fn collect_all() -> Self {
        Self {
            print_without_collecting: false,
            warn_padded_field: true,
            warn_padded_bitfield: true,
            warn_padded_record: true,
        }
    }
}

impl Default for DiagnosticFlags {
    fn default() -> Self {
        Self {
            print_without_collecting: true,
            warn_padded_field: false,
            warn_padded_bitfield: false,
            warn_padded_record: false,
        }
    }
}

pub struct Diagnostics {
    diagnostics: Mutex<Vec<Box<dyn Diagnostic>>>,
    flags: DiagnosticFlags,
}

impl Debug for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagnostics").finish_non_exhaustive()
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(DiagnosticFlags::default())
    }
}

impl Diagnostics {
    pub fn new(flags: DiagnosticFlags) -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
            flags,
        }
    }

    pub fn flags(&self) -> &DiagnosticFlags {
        &self.flags
    }

    pub fn push(&self, diagnostic: impl Diagnostic + 'static) {
        if self.flags.print_without_collecting {
            self.print(&diagnostic);
        } else {
            self.diagnostics.lock().push(Box::new(diagnostic));
        }
    }

    pub fn print(&self, diagnostic: &dyn Diagnostic) {
        diagnostic.eprintln();
    }

    pub fn len(&self) -> usize {
        self.diagnostics.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .lock()
            .iter()
            .filter(|diagnostic| diagnostic.severity() == severity)
            .count()
    }

    /// Collected messages with their severity, in push order
    pub fn messages(&self) -> Vec<(Severity, String)> {
        self.diagnostics
            .lock()
            .iter()
            .map(|diagnostic| (diagnostic.severity(), diagnostic.message().to_string()))
            .collect()
    }
}

#[test]
fn test_collects_when_not_printing() {
    let diagnostics = Diagnostics::new(DiagnosticFlags::collect_all());
    diagnostics.push(WarningDiagnostic::new(
        "Padded field at index 1",
        Subject::member("S", "ch"),
    ));
    diagnostics.push(ErrorDiagnostic::new(
        "bitfield too wide",
        Subject::record("Bad"),
    ));

    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics.count(Severity::Error), 1);
    assert_eq!(
        diagnostics.messages()[0],
        (Severity::Warning, "Padded field at index 1".to_string())
    );
}

#[test]
fn test_subject_display() {
    assert_eq!(Subject::record("S1").to_string(), "S1");
    assert_eq!(Subject::member("S1", "ch").to_string(), "S1::ch");
}

#[test]
fn test_shows_subject_before_message() {
    colored::control::set_override(false);

    let warning = WarningDiagnostic::new("Padded field at index 1", Subject::member("S", "ch"));
    let mut shown = String::new();
    warning.show(&mut shown).unwrap();

    assert_eq!(warning.subject(), &Subject::member("S", "ch"));
    assert_eq!(shown, "S::ch: warning: Padded field at index 1");
}
