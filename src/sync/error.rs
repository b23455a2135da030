use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// Network failure, non-2xx status or undecodable body.
    #[error("{0:#}")]
    Transport(#[from] anyhow::Error),

    /// A newer request for the same state was issued before this one
    /// settled, so its result was dropped.
    #[error("response superseded by a newer request")]
    Superseded,
}

impl SyncError {
    /// Human-readable diagnostic, the full error chain on one line.
    pub fn diagnostic(&self) -> String {
        self.to_string()
    }
}

pub type SyncResult<T> = Result<T, SyncError>;
