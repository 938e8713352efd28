use thiserror::Error;

/// Main error type for the report converter.
/// Aggregates errors from the standard library, dependencies and internal modules.
#[derive(Error, Debug)]
pub enum AwrSheetError {
    #[error("{0}")]
    WithContextError(String),

    #[error("{0}")]
    AnyhowError(#[from] anyhow::Error),

    // Standard library errors
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    // Third-party library errors
    #[error("{0}")]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),

    #[error("{0}")]
    PersistError(#[from] tempfile::PersistError),

    // Helper module errors
    #[error("{0}")]
    ReaderError(#[from] crate::helpers::reader::ReaderError),

    // Rule module errors
    #[error("{0}")]
    ConfigError(#[from] crate::rules::ConfigError),

    // Workbook module errors
    #[error("{0}")]
    BindError(#[from] crate::workbook::chart::BindError),
}

impl AwrSheetError {
    /// True for errors caused by the rule file rather than the environment.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            AwrSheetError::ConfigError(_) | AwrSheetError::BindError(_)
        )
    }
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, AwrSheetError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| AwrSheetError::WithContextError(format!("{}: {}", message, e)))
    }
}
