//! BIP39 mnemonic and seed management
//!
//! Owns the single session mnemonic and turns it into the 64-byte seed that
//! feeds SLIP-10 derivation. The mnemonic is created lazily on first use and
//! lives until an explicit `clear()`; it is never regenerated while one exists.

use crate::core::errors::{WalletError, WalletResult};
use crate::security::redaction::redact_mnemonic;
use crate::security::SecretString;
use bip39::{Language, Mnemonic};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};
use zeroize::Zeroizing;

/// Supported mnemonic lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum MnemonicStrength {
    /// 12 words (128-bit entropy)
    #[default]
    Twelve,
    /// 15 words (160-bit entropy)
    Fifteen,
    /// 18 words (192-bit entropy)
    Eighteen,
    /// 21 words (224-bit entropy)
    TwentyOne,
    /// 24 words (256-bit entropy)
    TwentyFour,
}

impl MnemonicStrength {
    pub const fn word_count(self) -> usize {
        match self {
            MnemonicStrength::Twelve => 12,
            MnemonicStrength::Fifteen => 15,
            MnemonicStrength::Eighteen => 18,
            MnemonicStrength::TwentyOne => 21,
            MnemonicStrength::TwentyFour => 24,
        }
    }

    pub const fn entropy_bytes(self) -> usize {
        match self {
            MnemonicStrength::Twelve => 16,
            MnemonicStrength::Fifteen => 20,
            MnemonicStrength::Eighteen => 24,
            MnemonicStrength::TwentyOne => 28,
            MnemonicStrength::TwentyFour => 32,
        }
    }
}

impl TryFrom<usize> for MnemonicStrength {
    type Error = WalletError;

    fn try_from(words: usize) -> Result<Self, Self::Error> {
        match words {
            12 => Ok(MnemonicStrength::Twelve),
            15 => Ok(MnemonicStrength::Fifteen),
            18 => Ok(MnemonicStrength::Eighteen),
            21 => Ok(MnemonicStrength::TwentyOne),
            24 => Ok(MnemonicStrength::TwentyFour),
            other => Err(WalletError::ConfigError(format!(
                "Unsupported mnemonic length {} (expected 12, 15, 18, 21 or 24)",
                other
            ))),
        }
    }
}

impl From<MnemonicStrength> for usize {
    fn from(strength: MnemonicStrength) -> Self {
        strength.word_count()
    }
}

/// 512-bit BIP39 seed. Zeroized on drop, never printed.
#[derive(Clone)]
pub struct Seed(Zeroizing<[u8; 64]>);

impl Seed {
    pub const LEN: usize = 64;

    pub fn from_bytes(bytes: [u8; 64]) -> Self {
        Self(Zeroizing::new(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.0
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed([REDACTED])")
    }
}

impl PartialEq for Seed {
    fn eq(&self, other: &Self) -> bool {
        use subtle::ConstantTimeEq;
        self.0.as_slice().ct_eq(other.0.as_slice()).into()
    }
}

impl Eq for Seed {}

/// Collapse runs of whitespace so equal phrases compare and store equally.
fn normalize_phrase(phrase: &str) -> SecretString {
    Zeroizing::new(phrase.split_whitespace().collect::<Vec<_>>().join(" "))
}

fn parse_mnemonic(phrase: &str) -> WalletResult<Mnemonic> {
    let normalized = normalize_phrase(phrase);
    Mnemonic::parse_in_normalized(Language::English, &normalized)
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))
}

/// Generate a fresh English mnemonic from OS randomness.
pub fn generate_mnemonic(strength: MnemonicStrength) -> WalletResult<SecretString> {
    let len = strength.entropy_bytes();
    let mut entropy = Zeroizing::new([0u8; 32]);
    OsRng
        .try_fill_bytes(&mut entropy[..len])
        .map_err(|e| WalletError::EntropySourceUnavailable(e.to_string()))?;

    let mnemonic = Mnemonic::from_entropy_in(Language::English, &entropy[..len])
        .map_err(|e| WalletError::InvalidMnemonic(e.to_string()))?;
    Ok(Zeroizing::new(mnemonic.to_string()))
}

/// Check a phrase against the English wordlist and its checksum.
pub fn validate_mnemonic(phrase: &str) -> WalletResult<()> {
    parse_mnemonic(phrase).map(|_| ())
}

/// BIP39 seed with the empty passphrase.
pub fn seed_from_mnemonic(phrase: &str) -> WalletResult<Seed> {
    seed_from_mnemonic_with_passphrase(phrase, "")
}

pub fn seed_from_mnemonic_with_passphrase(phrase: &str, passphrase: &str) -> WalletResult<Seed> {
    let mnemonic = parse_mnemonic(phrase)?;
    debug!(words = mnemonic.word_count(), "Converting mnemonic to seed");
    Ok(Seed::from_bytes(mnemonic.to_seed(passphrase)))
}

/// Session holder for the mnemonic.
///
/// All reads and the check-and-set in [`SeedManager::ensure_mnemonic`] go
/// through one lock, so concurrent callers observe a single mnemonic.
#[derive(Default)]
pub struct SeedManager {
    mnemonic: Mutex<Option<SecretString>>,
    strength: MnemonicStrength,
}

static GLOBAL_SEED_MANAGER: Lazy<SeedManager> = Lazy::new(SeedManager::new);

impl SeedManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Manager that generates mnemonics of the given length.
    pub fn with_strength(strength: MnemonicStrength) -> Self {
        Self { mnemonic: Mutex::new(None), strength }
    }

    /// Manager preloaded with an existing (validated) mnemonic.
    pub fn with_mnemonic(phrase: &str) -> WalletResult<Self> {
        let manager = Self::new();
        manager.load(phrase)?;
        Ok(manager)
    }

    /// Process-wide instance.
    pub fn global() -> &'static SeedManager {
        &GLOBAL_SEED_MANAGER
    }

    pub fn strength(&self) -> MnemonicStrength {
        self.strength
    }

    /// Return the session mnemonic, generating and caching one if absent.
    pub fn ensure_mnemonic(&self) -> WalletResult<SecretString> {
        let mut guard = self.mnemonic.lock();
        if let Some(existing) = guard.as_ref() {
            return Ok(existing.clone());
        }

        let fresh = generate_mnemonic(self.strength)?;
        info!(mnemonic = %redact_mnemonic(&fresh), "Generated new session mnemonic");
        *guard = Some(fresh.clone());
        Ok(fresh)
    }

    /// Explicitly install a mnemonic from external input, replacing any
    /// current one. The existing mnemonic is kept if validation fails.
    pub fn load(&self, phrase: &str) -> WalletResult<()> {
        validate_mnemonic(phrase)?;
        let normalized = normalize_phrase(phrase);
        info!(mnemonic = %redact_mnemonic(&normalized), "Loaded session mnemonic");
        *self.mnemonic.lock() = Some(normalized);
        Ok(())
    }

    pub fn current(&self) -> Option<SecretString> {
        self.mnemonic.lock().clone()
    }

    pub fn has_mnemonic(&self) -> bool {
        self.mnemonic.lock().is_some()
    }

    /// Seed of the session mnemonic (creating the mnemonic if needed).
    pub fn seed(&self) -> WalletResult<Seed> {
        let mnemonic = self.ensure_mnemonic()?;
        seed_from_mnemonic(&mnemonic)
    }

    /// Drop the session mnemonic. The next `ensure_mnemonic` generates anew.
    pub fn clear(&self) {
        if self.mnemonic.lock().take().is_some() {
            info!("Session mnemonic cleared");
        }
    }
}

impl fmt::Debug for SeedManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedManager")
            .field("strength", &self.strength)
            .field("has_mnemonic", &self.has_mnemonic())
            .finish()
    }
}
