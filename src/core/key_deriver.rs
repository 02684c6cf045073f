//! Wallet key derivation
//!
//! (seed, index) -> m/44'/501'/index'/0' -> 32-byte ed25519 seed -> keypair.
//!
//! The returned [`Wallet`] carries the public key in Base58 and the 64-byte
//! keypair secret (ed25519 seed followed by public key) as lowercase hex.
//! Derivation is a pure function of its inputs; the caller chooses the index
//! and nothing here checks indices for reuse.

use crate::core::derivation::{DerivationPath, ExtendedKey};
use crate::core::errors::{WalletError, WalletResult};
use crate::core::mnemonic::{seed_from_mnemonic, Seed};
use crate::security::redaction::redact_hex_bytes;
use crate::security::{vec_to_secret, SecretVec};
use ed25519_dalek::SigningKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;
use tracing::debug;
use zeroize::Zeroizing;

/// Length of the hex-encoded keypair secret.
pub const PRIVATE_KEY_HEX_LEN: usize = 128;

/// One derived wallet.
///
/// `revealed` is display state owned by the caller's view; it has no effect on
/// key material and is the only field that changes after derivation.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Wallet {
    pub path: String,
    pub public_key: String,
    pub private_key: String,
    #[serde(default, alias = "showPrivate")]
    pub revealed: bool,
}

impl Wallet {
    /// Account index encoded in `path`.
    pub fn index(&self) -> WalletResult<u32> {
        let path: DerivationPath = self.path.parse()?;
        path.account_index().ok_or_else(|| {
            WalletError::InvalidWalletRecord(format!("Path {} is not a wallet path", self.path))
        })
    }

    /// Decoded 64-byte keypair secret (ed25519 seed || public key).
    pub fn keypair_bytes(&self) -> WalletResult<Zeroizing<[u8; 64]>> {
        if self.private_key.len() != PRIVATE_KEY_HEX_LEN
            || !self.private_key.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        {
            return Err(WalletError::InvalidWalletRecord(format!(
                "Private key must be {} lowercase hex characters",
                PRIVATE_KEY_HEX_LEN
            )));
        }
        let mut bytes = Zeroizing::new([0u8; 64]);
        hex::decode_to_slice(&self.private_key, bytes.as_mut_slice())
            .map_err(|e| WalletError::InvalidWalletRecord(format!("Private key hex: {}", e)))?;
        Ok(bytes)
    }

    /// Raw 32-byte public key decoded from Base58.
    pub fn public_key_bytes(&self) -> WalletResult<[u8; 32]> {
        let decoded = bs58::decode(&self.public_key)
            .into_vec()
            .map_err(|e| WalletError::InvalidWalletRecord(format!("Public key base58: {}", e)))?;
        <[u8; 32]>::try_from(decoded.as_slice()).map_err(|_| {
            WalletError::InvalidWalletRecord(format!(
                "Public key must decode to 32 bytes, got {}",
                decoded.len()
            ))
        })
    }

    /// Check every field of a record that did not come from [`derive`],
    /// typically one loaded from storage.
    pub fn validate(&self) -> WalletResult<()> {
        let index = self
            .index()
            .map_err(|e| WalletError::InvalidWalletRecord(format!("path: {}", e)))?;
        let canonical = DerivationPath::solana(index)?.to_string();
        if self.path != canonical {
            return Err(WalletError::InvalidWalletRecord(format!(
                "Path {:?} is not in canonical form {}",
                self.path, canonical
            )));
        }
        let public = self.public_key_bytes()?;
        let keypair = self.keypair_bytes()?;

        let signing = SigningKey::from_keypair_bytes(&keypair)
            .map_err(|_| WalletError::InvalidWalletRecord("Private key halves do not match".into()))?;
        let matches: bool = signing.verifying_key().as_bytes().as_slice().ct_eq(public.as_slice()).into();
        if !matches {
            return Err(WalletError::InvalidWalletRecord(
                "Public key does not belong to private key".into(),
            ));
        }
        Ok(())
    }
}

impl Wallet {
    /// Check that this record is exactly what `seed` derives at its path.
    /// `revealed` is display state and is not compared.
    pub fn verify_against_seed(&self, seed: &Seed) -> WalletResult<()> {
        self.validate()?;
        let expected = derive(seed, self.index()?)?;
        let same_public = self.public_key.as_bytes().ct_eq(expected.public_key.as_bytes());
        let same_private = self.private_key.as_bytes().ct_eq(expected.private_key.as_bytes());
        if !bool::from(same_public & same_private) {
            return Err(WalletError::InvalidWalletRecord(format!(
                "Keys at {} were not derived from the session mnemonic",
                self.path
            )));
        }
        Ok(())
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Wallet")
            .field("path", &self.path)
            .field("public_key", &self.public_key)
            .field("private_key", &"[REDACTED]")
            .field("revealed", &self.revealed)
            .finish()
    }
}

/// Derive the wallet at `index` from `seed`.
pub fn derive(seed: &Seed, index: u32) -> WalletResult<Wallet> {
    let path = DerivationPath::solana(index)
        .map_err(|e| WalletError::DerivationError(e.to_string()))?;
    let node = ExtendedKey::from_seed_and_path(seed.as_bytes(), &path)?;

    let signing_key = SigningKey::from_bytes(node.private_key());
    let keypair: SecretVec = vec_to_secret(signing_key.to_keypair_bytes().to_vec());
    let public_key = bs58::encode(signing_key.verifying_key().as_bytes()).into_string();

    debug!(path = %path, public_key = %public_key, secret = %redact_hex_bytes(&keypair), "Derived wallet");

    Ok(Wallet {
        path: path.to_string(),
        public_key,
        private_key: hex::encode(keypair.as_slice()),
        revealed: false,
    })
}

/// Parse `mnemonic`, then [`derive`].
pub fn derive_from_mnemonic(mnemonic: &str, index: u32) -> WalletResult<Wallet> {
    let seed = seed_from_mnemonic(mnemonic)?;
    derive(&seed, index)
}

/// Derive `count` consecutive wallets starting at `start`.
pub fn derive_range(seed: &Seed, start: u32, count: u32) -> WalletResult<Vec<Wallet>> {
    let end = start.checked_add(count).ok_or_else(|| {
        WalletError::DerivationError(format!("Index range {}+{} overflows", start, count))
    })?;
    (start..end).map(|index| derive(seed, index)).collect()
}
