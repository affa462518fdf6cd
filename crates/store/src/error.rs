use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed record set: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid record set: {0}")]
    Validation(String),
}
