//! Process-level error type.
//!
//! Every fallible path funnels into [`AppError`], which carries the exit code
//! the process should terminate with:
//!
//! - `2` — usage/input errors (bad flags, missing or unsupported files)
//! - `3` — dataset errors (file decoded but structurally unusable)
//! - `4` — internal/render errors (terminal setup, draw failures)
//!
//! Degenerate *data* is never an error: an empty dataset or a missing role
//! column flows through the pipeline as empty aggregates.

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    /// Bad invocation or unusable input path.
    pub fn usage(message: impl Into<String>) -> Self {
        Self::new(2, message)
    }

    /// File decoded but the table is unusable (no header, zero columns).
    pub fn data(message: impl Into<String>) -> Self {
        Self::new(3, message)
    }

    /// Terminal/render failures.
    pub fn render(message: impl Into<String>) -> Self {
        Self::new(4, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
