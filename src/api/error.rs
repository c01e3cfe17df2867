use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Failed to read {}: {source}", path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Non-2xx answer; `message` is the server's `error` text or the status reason.
    #[error("{message}")]
    Server { status: u16, message: String },
}

impl ApiError {
    pub fn is_server(&self) -> bool {
        matches!(self, ApiError::Server { .. })
    }

    /// `"<server_prefix><msg>"` for server errors, `"<network_prefix><msg>"` otherwise.
    pub fn describe(&self, server_prefix: &str, network_prefix: &str) -> String {
        if self.is_server() {
            format!("{}{}", server_prefix, self)
        } else {
            format!("{}{}", network_prefix, self)
        }
    }
}
