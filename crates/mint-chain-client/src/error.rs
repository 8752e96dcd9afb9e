use thiserror::Error;

/// EIP-1193 "User Rejected Request".
pub const USER_REJECTED_CODE: i64 = 4001;

/// Failures reported by the wallet provider or a contract client.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("no wallet provider is available")]
    ProviderMissing,
    #[error("request rejected by the user")]
    UserRejected,
    #[error("read-only client unavailable: {0}")]
    ReaderUnavailable(String),
    #[error("rpc error: {0}")]
    Rpc(String),
    #[error("transaction reverted: {0}")]
    Reverted(String),
    #[error("timed out waiting for {0}")]
    Timeout(String),
    #[error("malformed response: {0}")]
    Decode(String),
}

impl ChainError {
    pub fn from_provider_code(code: i64, message: &str) -> Self {
        if code == USER_REJECTED_CODE {
            Self::UserRejected
        } else {
            Self::Rpc(format!("{code}: {message}"))
        }
    }

    pub fn is_user_rejection(&self) -> bool {
        matches!(self, Self::UserRejected)
    }
}
