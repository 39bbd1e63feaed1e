use std::fmt;

use colored::Colorize;

use crate::infra::gcode_file::GcodeLoadError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Success,
    Warning,
    Error,
}

/// A short user-facing message, printed to the terminal.
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn gcode_loaded(file_name: &str) -> Self {
        Self::new(
            NoticeKind::Success,
            format!("G-code metadata loaded from {file_name}"),
        )
    }

    pub fn unexpected_extension(file_name: &str) -> Self {
        Self::new(
            NoticeKind::Warning,
            format!("{file_name} does not look like a G-code file, reading it anyway"),
        )
    }

    pub fn defaults_restored() -> Self {
        Self::new(NoticeKind::Info, "Parameters restored to their defaults")
    }

    pub fn parameters_saved() -> Self {
        Self::new(NoticeKind::Success, "Parameters saved")
    }

    pub fn generic_failure(err: impl fmt::Display) -> Self {
        Self::new(NoticeKind::Error, format!("Something went wrong: {err}"))
    }

    /// Prints to stderr so stdout stays clean for breakdowns and JSON.
    pub fn emit(&self) {
        eprintln!("{self}");
    }
}

impl From<&GcodeLoadError> for Notice {
    fn from(err: &GcodeLoadError) -> Self {
        match err {
            GcodeLoadError::MissingMetadata(_) => Notice::new(
                NoticeKind::Error,
                "The file has no usable slicer metadata (filament used / estimated printing time)",
            ),
            GcodeLoadError::Io(io) => {
                Notice::new(NoticeKind::Error, format!("Could not read the file: {io}"))
            }
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = match self.kind {
            NoticeKind::Info => format!("ℹ {}", self.text).cyan(),
            NoticeKind::Success => format!("✓ {}", self.text).green(),
            NoticeKind::Warning => format!("⚠ {}", self.text).yellow(),
            NoticeKind::Error => format!("✗ {}", self.text).red().bold(),
        };
        write!(f, "{line}")
    }
}
