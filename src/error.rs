use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter both account number and password")]
    MissingFields,

    #[error("Please enter a valid 10-digit account number")]
    InvalidAccountNumber,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid account number or password")]
    InvalidCredentials,

    #[error("Network error. Please try again.")]
    Network,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Failed to load transactions")]
    Network,
}

/// Failures of the HTTP seam. Never shown to the user directly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("could not decode response: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("local storage is not available")]
    Unavailable,

    #[error("could not serialize value: {0}")]
    Serialize(String),

    #[error("could not write key {0}")]
    Write(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown backend '{0}', expected 'fixture' or 'remote'")]
    UnknownBackend(String),

    #[error("the remote backend needs an API endpoint")]
    MissingEndpoint,
}

impl From<TransportError> for AuthError {
    fn from(err: TransportError) -> Self {
        log::error!("Login error: {}", err);
        AuthError::Network
    }
}

impl From<TransportError> for FetchError {
    fn from(err: TransportError) -> Self {
        log::error!("Fetch transactions error: {}", err);
        FetchError::Network
    }
}
