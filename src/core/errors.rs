use thiserror::Error;

/// Custom error type for wallet operations.
#[derive(Debug, Error)]
pub enum WalletError {
    /// The OS random source could not be read. No wallet can be derived.
    #[error("Entropy source unavailable: {0}")]
    EntropySourceUnavailable(String),
    /// Mnemonic failed the wordlist/checksum contract.
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),
    /// Path walk failed.
    #[error("Key derivation error: {0}")]
    DerivationError(String),
    /// Derivation path string could not be parsed.
    #[error("Invalid derivation path: {0}")]
    InvalidPath(String),
    /// A wallet record (usually loaded from storage) is malformed.
    #[error("Invalid wallet record: {0}")]
    InvalidWalletRecord(String),
    /// Position or resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),
    /// Storage-related errors.
    #[error("Storage error: {0}")]
    StorageError(String),
    /// Serialization/deserialization errors.
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type WalletResult<T> = Result<T, WalletError>;

impl WalletError {
    /// Fatal errors cannot be recovered locally and must be surfaced.
    pub fn is_fatal(&self) -> bool {
        matches!(self, WalletError::EntropySourceUnavailable(_))
    }

    /// Errors the caller can recover from by supplying new input
    /// (a different mnemonic, or resetting stored state).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            WalletError::InvalidMnemonic(_)
                | WalletError::InvalidWalletRecord(_)
                | WalletError::NotFound(_)
        )
    }
}

impl From<std::io::Error> for WalletError {
    fn from(err: std::io::Error) -> Self {
        WalletError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for WalletError {
    fn from(err: serde_json::Error) -> Self {
        WalletError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_mnemonic() {
        let err = WalletError::InvalidMnemonic("bad checksum".to_string());
        assert_eq!(format!("{}", err), "Invalid mnemonic: bad checksum");
    }

    #[test]
    fn test_display_derivation_error() {
        let err = WalletError::DerivationError("seed too short".to_string());
        assert_eq!(format!("{}", err), "Key derivation error: seed too short");
    }

    #[test]
    fn test_classification() {
        assert!(WalletError::EntropySourceUnavailable("x".into()).is_fatal());
        assert!(!WalletError::EntropySourceUnavailable("x".into()).is_recoverable());
        assert!(WalletError::InvalidMnemonic("x".into()).is_recoverable());
        assert!(!WalletError::DerivationError("x".into()).is_recoverable());
        assert!(!WalletError::DerivationError("x".into()).is_fatal());
    }

    #[test]
    fn test_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let wallet_err: WalletError = io_err.into();
        match wallet_err {
            WalletError::StorageError(msg) => assert_eq!(msg, "missing"),
            _ => panic!("Expected StorageError variant"),
        }
    }

    #[test]
    fn test_from_serde_json() {
        let json_err = serde_json::from_str::<Vec<u8>>("not json").unwrap_err();
        let wallet_err: WalletError = json_err.into();
        assert!(matches!(wallet_err, WalletError::SerializationError(_)));
    }
}
