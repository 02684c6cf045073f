// src/security/mod.rs
//! Secret-handling helpers: zeroizing buffers and redaction for logs/output.

pub mod secret;

// Secret buffer alias re-export
pub use secret::{vec_to_secret, SecretString, SecretVec};

// Redaction helpers to avoid accidental secret prints
pub mod redaction;
pub use redaction::{mask_private_key, redact_hex_bytes, redact_mnemonic, PRIVATE_KEY_MASK};
