use thiserror::Error;

/// Failures raised by the provider client and the transformer.
///
/// Every variant carries owned text so the error can be cloned and handed
/// to every task waiting on a shared cache computation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MediaError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("upstream returned {status} for {url}: {body}")]
    Upstream { status: u16, url: String, body: String },

    #[error("unexpected payload shape: {0}")]
    Transform(String),

    #[error("unsupported kind '{0}'")]
    UnsupportedKind(String),

    #[error("shared computation for '{0}' ended without a result")]
    Interrupted(String),
}

impl MediaError {
    pub fn transform(msg: impl Into<String>) -> Self {
        MediaError::Transform(msg.into())
    }

    pub fn unsupported(kind: impl Into<String>) -> Self {
        MediaError::UnsupportedKind(kind.into())
    }
}

impl From<reqwest::Error> for MediaError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            MediaError::Transform(err.to_string())
        } else {
            MediaError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for MediaError {
    fn from(err: serde_json::Error) -> Self {
        MediaError::Transform(err.to_string())
    }
}

pub type Result<T, E = MediaError> = std::result::Result<T, E>;
