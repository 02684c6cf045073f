//! SLIP-10 ed25519 hierarchical derivation
//!
//! Path format: m/44'/501'/account'/0'
//!
//! ed25519 under SLIP-10 only defines hardened children, so every segment of
//! every path handled here is hardened. A non-hardened segment is a parse
//! error, not a silently promoted index.

use crate::core::errors::{WalletError, WalletResult};
use hmac::{Hmac, Mac};
use sha2::Sha512;
use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop};

type HmacSha512 = Hmac<Sha512>;

/// Bit marking a child index as hardened.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;
/// BIP44 purpose level.
pub const PURPOSE: u32 = 44;
/// SLIP-44 coin type registered for Solana.
pub const SOLANA_COIN_TYPE: u32 = 501;

const MASTER_SECRET: &[u8] = b"ed25519 seed";

/// Hardened-only derivation path. Segments are stored without the hardened bit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DerivationPath {
    segments: Vec<u32>,
}

impl DerivationPath {
    /// Wallet path for the given account index: m/44'/501'/{index}'/0'
    ///
    /// Indices at or above 2^31 cannot be hardened and are rejected.
    pub fn solana(index: u32) -> WalletResult<Self> {
        Self::from_segments(vec![PURPOSE, SOLANA_COIN_TYPE, index, 0])
    }

    pub fn from_segments(segments: Vec<u32>) -> WalletResult<Self> {
        if let Some(bad) = segments.iter().find(|s| **s >= HARDENED_OFFSET) {
            return Err(WalletError::InvalidPath(format!(
                "Index {} is out of range for hardened derivation",
                bad
            )));
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[u32] {
        &self.segments
    }

    /// Child indices with the hardened bit applied, in walk order.
    pub fn hardened_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.segments.iter().map(|s| s | HARDENED_OFFSET)
    }

    /// The account index if this path follows the m/44'/501'/{index}'/0' scheme.
    pub fn account_index(&self) -> Option<u32> {
        match self.segments.as_slice() {
            [PURPOSE, SOLANA_COIN_TYPE, index, 0] => Some(*index),
            _ => None,
        }
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for segment in &self.segments {
            write!(f, "/{}'", segment)?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = WalletError;

    /// Accepts `'` or `h` as the hardened marker.
    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let rest = path
            .trim()
            .strip_prefix("m/")
            .ok_or_else(|| WalletError::InvalidPath(format!("Path must start with 'm/': {}", path)))?;
        if rest.is_empty() {
            return Err(WalletError::InvalidPath("Empty derivation path".to_string()));
        }

        let mut segments = Vec::new();
        for part in rest.split('/') {
            let digits = part
                .strip_suffix('\'')
                .or_else(|| part.strip_suffix('h'))
                .ok_or_else(|| {
                    WalletError::InvalidPath(format!(
                        "ed25519 requires hardened segments, got '{}'",
                        part
                    ))
                })?;
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(WalletError::InvalidPath(format!("Invalid path segment '{}'", part)));
            }
            let index: u32 = digits
                .parse()
                .map_err(|e| WalletError::InvalidPath(format!("Invalid index '{}': {}", digits, e)))?;
            segments.push(index);
        }

        Self::from_segments(segments)
    }
}

/// Private key and chain code at one node of the tree.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ExtendedKey {
    key: [u8; 32],
    chain_code: [u8; 32],
}

impl ExtendedKey {
    /// Master node: I = HMAC-SHA512(Key = "ed25519 seed", Data = seed)
    pub fn master(seed: &[u8]) -> WalletResult<Self> {
        if !(16..=64).contains(&seed.len()) {
            return Err(WalletError::DerivationError(format!(
                "Seed length must be 16..=64 bytes, got {}",
                seed.len()
            )));
        }
        Self::from_hmac(MASTER_SECRET, &[seed][..])
    }

    /// Hardened child: I = HMAC-SHA512(Key = chain_code, Data = 0x00 || key || ser32(index'))
    ///
    /// `index` is taken without the hardened bit.
    pub fn derive_hardened(&self, index: u32) -> WalletResult<Self> {
        if index >= HARDENED_OFFSET {
            return Err(WalletError::DerivationError(format!(
                "Child index {} already carries the hardened bit",
                index
            )));
        }
        let ser = (index | HARDENED_OFFSET).to_be_bytes();
        Self::from_hmac(&self.chain_code, &[&[0x00u8][..], &self.key[..], &ser[..]])
    }

    pub fn derive_path(&self, path: &DerivationPath) -> WalletResult<Self> {
        let mut current = self.clone();
        for segment in path.segments() {
            current = current.derive_hardened(*segment)?;
        }
        Ok(current)
    }

    /// Walk `path` from the master node of `seed`.
    pub fn from_seed_and_path(seed: &[u8], path: &DerivationPath) -> WalletResult<Self> {
        Self::master(seed)?.derive_path(path)
    }

    pub fn private_key(&self) -> &[u8; 32] {
        &self.key
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    fn from_hmac(key: &[u8], parts: &[&[u8]]) -> WalletResult<Self> {
        let mut mac = HmacSha512::new_from_slice(key)
            .map_err(|e| WalletError::DerivationError(format!("HMAC initialization failed: {}", e)))?;
        for part in parts {
            mac.update(part);
        }
        let mut output = mac.finalize().into_bytes();

        let mut node = Self { key: [0u8; 32], chain_code: [0u8; 32] };
        node.key.copy_from_slice(&output[..32]);
        node.chain_code.copy_from_slice(&output[32..]);
        output.as_mut_slice().zeroize();
        Ok(node)
    }
}

impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedKey")
            .field("key", &"[REDACTED]")
            .field("chain_code", &"[REDACTED]")
            .finish()
    }
}
