use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export format {found} is newer than this build supports ({supported})")]
    UnsupportedFormat { found: u32, supported: u32 },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
