use std::fmt;

/// Failures surfaced by the board.
///
/// Unknown task ids have no variant: the store treats them as no-ops and
/// reports them through return values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Rejected gesture input: a blank title or description on the add and
    /// edit forms, an unknown column or priority name, a malformed
    /// `--config-override`.
    InvalidInput(String),
    /// A saved board or config file that does not parse, or carries an
    /// unsupported `schema_version`.
    InvalidData(String),
    /// The task file could not be read or written. The store keeps the board
    /// in memory and hands this back through `take_persist_error`.
    Io(String),
}

impl AppError {
    pub fn invalid_input<M: Into<String>>(message: M) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_data<M: Into<String>>(message: M) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn io<M: Into<String>>(message: M) -> Self {
        Self::Io(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidData(_) => "invalid_data",
            Self::Io(_) => "io_error",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput(message) | Self::InvalidData(message) | Self::Io(message) => message,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_data(err.to_string())
    }
}
