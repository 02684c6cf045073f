// Simple helpers to avoid accidental printing of secrets in logs/output.
use std::env;

/// Placeholder shown in place of a private key that has not been revealed.
pub const PRIVATE_KEY_MASK: &str = "••••••••••••••••";

fn dev_print_secrets() -> bool {
    env::var("DEV_PRINT_SECRETS").ok().as_deref() == Some("1")
}

/// Mask a private key unless DEV_PRINT_SECRETS=1 is set in the environment.
pub fn mask_private_key(private_key: &str) -> String {
    if dev_print_secrets() {
        return private_key.to_string();
    }
    PRIVATE_KEY_MASK.to_string()
}

/// Redact a mnemonic for logging. Only the word count survives.
pub fn redact_mnemonic(phrase: &str) -> String {
    if dev_print_secrets() {
        return phrase.to_string();
    }
    format!("<redacted mnemonic words={}>", phrase.split_whitespace().count())
}

/// Redact hex-serializable bytes unless DEV_PRINT_SECRETS=1 is set.
pub fn redact_hex_bytes(bytes: &[u8]) -> String {
    if dev_print_secrets() {
        return hex::encode(bytes);
    }
    format!("<redacted hex len={}>", bytes.len())
}
