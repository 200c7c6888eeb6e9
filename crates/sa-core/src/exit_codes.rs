//! Exit codes for the spot-analysis CLI.
//!
//! Exit code ranges:
//! - 0-1: Operational outcomes (the analysis ran)
//! - 10-19: User/input errors (fixable by correcting arguments or files)
//! - 20-29: Internal errors

use sa_common::{Error, ErrorCategory};

/// Exit codes for spot-analysis operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Analysis ran and correlated at least one instance.
    Clean = 0,

    /// Analysis ran but no instance id appears in both inputs.
    EmptyJoin = 1,

    /// Invalid arguments.
    ArgsError = 10,

    /// An input table is malformed (missing column, bad timestamp, ...).
    InputFormatError = 11,

    /// Configuration file missing, unparseable or invalid.
    ConfigError = 12,

    /// Internal error (bug - please report).
    InternalError = 20,

    /// I/O error.
    IoError = 21,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Codes 0-1: the analysis completed.
    pub fn is_success(self) -> bool {
        (self as i32) < 10
    }

    pub fn is_user_error(self) -> bool {
        (10..20).contains(&(self as i32))
    }

    pub fn is_internal_error(self) -> bool {
        (self as i32) >= 20
    }

    /// Stable code name for JSON output.
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::EmptyJoin => "OK_EMPTY_JOIN",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::InputFormatError => "ERR_INPUT_FORMAT",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<&Error> for ExitCode {
    fn from(err: &Error) -> Self {
        match err.category() {
            ErrorCategory::Input => ExitCode::InputFormatError,
            ErrorCategory::Config => ExitCode::ConfigError,
            ErrorCategory::Export => ExitCode::InternalError,
            ErrorCategory::Io => match err {
                Error::Json(_) => ExitCode::InternalError,
                _ => ExitCode::IoError,
            },
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code.as_i32()
    }
}
