//! Wallet session: the mnemonic, the ordered wallet list and index assignment.
//!
//! Index policy: each new wallet gets the next index in a per-session counter
//! that only moves forward. Removing a wallet neither renumbers the others nor
//! frees its index. A restored session resumes at one past the highest stored
//! index.

use crate::core::errors::{WalletError, WalletResult};
use crate::core::key_deriver::{derive, Wallet};
use crate::core::mnemonic::{MnemonicStrength, SeedManager};
use crate::security::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info};

/// Insertion-ordered list of wallets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletList {
    wallets: Vec<Wallet>,
}

impl WalletList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, wallet: Wallet) {
        self.wallets.push(wallet);
    }

    /// Remove the entry at `position`; later entries shift down by one.
    pub fn remove(&mut self, position: usize) -> WalletResult<Wallet> {
        if position >= self.wallets.len() {
            return Err(WalletError::NotFound(format!(
                "No wallet at position {} (have {})",
                position,
                self.wallets.len()
            )));
        }
        Ok(self.wallets.remove(position))
    }

    pub fn get(&self, position: usize) -> Option<&Wallet> {
        self.wallets.get(position)
    }

    pub fn get_mut(&mut self, position: usize) -> Option<&mut Wallet> {
        self.wallets.get_mut(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Wallet> {
        self.wallets.iter()
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    pub fn as_slice(&self) -> &[Wallet] {
        &self.wallets
    }

    pub fn clear(&mut self) {
        self.wallets.clear();
    }
}

impl From<Vec<Wallet>> for WalletList {
    fn from(wallets: Vec<Wallet>) -> Self {
        Self { wallets }
    }
}

impl<'a> IntoIterator for &'a WalletList {
    type Item = &'a Wallet;
    type IntoIter = std::slice::Iter<'a, Wallet>;

    fn into_iter(self) -> Self::IntoIter {
        self.wallets.iter()
    }
}

/// What the persistence layer stores: the mnemonic as plain text and the
/// wallet list verbatim.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub mnemonic: Option<String>,
    pub wallets: Vec<Wallet>,
}

impl fmt::Debug for SessionSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSnapshot")
            .field("mnemonic", &self.mnemonic.as_ref().map(|_| "[REDACTED]"))
            .field("wallets", &self.wallets)
            .finish()
    }
}

pub struct WalletSession {
    seeds: SeedManager,
    wallets: WalletList,
    next_index: u32,
}

impl Default for WalletSession {
    fn default() -> Self {
        Self::new()
    }
}

impl WalletSession {
    pub fn new() -> Self {
        Self::with_strength(MnemonicStrength::default())
    }

    /// Empty session whose mnemonic (once generated) has `strength` words.
    pub fn with_strength(strength: MnemonicStrength) -> Self {
        Self { seeds: SeedManager::with_strength(strength), wallets: WalletList::new(), next_index: 0 }
    }

    /// Rebuild a session from persisted state.
    ///
    /// The mnemonic and every wallet record are validated. Each record must be
    /// exactly what the mnemonic derives at its path, and no index may appear
    /// twice. Any bad entry fails the whole restore. Wallets without a
    /// mnemonic are rejected too, since nothing could vouch for their keys.
    pub fn restore(snapshot: SessionSnapshot, strength: MnemonicStrength) -> WalletResult<Self> {
        let session = Self::with_strength(strength);
        let seed = match snapshot.mnemonic.as_deref() {
            Some(phrase) => {
                session.seeds.load(phrase)?;
                Some(session.seeds.seed()?)
            }
            None if snapshot.wallets.is_empty() => None,
            None => {
                return Err(WalletError::InvalidWalletRecord(format!(
                    "{} stored wallets but no mnemonic",
                    snapshot.wallets.len()
                )))
            }
        };

        let mut next_index = 0u32;
        let mut seen = HashSet::with_capacity(snapshot.wallets.len());
        if let Some(seed) = seed.as_ref() {
            for (position, wallet) in snapshot.wallets.iter().enumerate() {
                let invalid = |e: WalletError| {
                    WalletError::InvalidWalletRecord(format!("wallet at position {}: {}", position, e))
                };
                wallet.verify_against_seed(seed).map_err(invalid)?;
                let index = wallet.index().map_err(invalid)?;
                if !seen.insert(index) {
                    return Err(WalletError::InvalidWalletRecord(format!(
                        "wallet at position {}: index {} is already in use",
                        position, index
                    )));
                }
                next_index = next_index.max(index.saturating_add(1));
            }
        }

        info!(wallets = snapshot.wallets.len(), next_index, "Restored wallet session");
        Ok(Self { wallets: WalletList::from(snapshot.wallets), next_index, ..session })
    }

    /// Derive and append the next wallet, creating the mnemonic on first use.
    pub fn generate_wallet(&mut self) -> WalletResult<&Wallet> {
        let seed = self.seeds.seed()?;
        let index = self.next_index;
        let wallet = derive(&seed, index)?;
        self.next_index = index.checked_add(1).ok_or_else(|| {
            WalletError::DerivationError("Wallet index space exhausted".to_string())
        })?;

        info!(index, public_key = %wallet.public_key, "Generated wallet");
        self.wallets.push(wallet);
        self.wallets
            .as_slice()
            .last()
            .ok_or_else(|| WalletError::NotFound("Newly generated wallet".to_string()))
    }

    /// Flip the `revealed` flag; returns the new value.
    pub fn toggle_reveal(&mut self, position: usize) -> WalletResult<bool> {
        let wallet = self.wallet_mut(position)?;
        wallet.revealed = !wallet.revealed;
        debug!(position, revealed = wallet.revealed, "Toggled private key visibility");
        Ok(wallet.revealed)
    }

    pub fn set_revealed(&mut self, position: usize, revealed: bool) -> WalletResult<()> {
        self.wallet_mut(position)?.revealed = revealed;
        Ok(())
    }

    /// Remove one wallet. Remaining wallets keep their paths and keys.
    pub fn remove(&mut self, position: usize) -> WalletResult<Wallet> {
        let removed = self.wallets.remove(position)?;
        info!(position, path = %removed.path, "Removed wallet");
        Ok(removed)
    }

    pub fn wallets(&self) -> &WalletList {
        &self.wallets
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    pub fn next_index(&self) -> u32 {
        self.next_index
    }

    pub fn mnemonic(&self) -> Option<SecretString> {
        self.seeds.current()
    }

    pub fn seed_manager(&self) -> &SeedManager {
        &self.seeds
    }

    /// Install an externally supplied mnemonic. Only allowed while no wallets
    /// exist, since existing keys would no longer match the session seed.
    pub fn import_mnemonic(&mut self, phrase: &str) -> WalletResult<()> {
        if !self.wallets.is_empty() {
            return Err(WalletError::InvalidWalletRecord(format!(
                "Cannot replace the mnemonic while {} wallets exist",
                self.wallets.len()
            )));
        }
        self.seeds.load(phrase)?;
        self.next_index = 0;
        Ok(())
    }

    /// State to hand to the persistence layer after a mutation.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mnemonic: self.seeds.current().map(|m| m.to_string()),
            wallets: self.wallets.as_slice().to_vec(),
        }
    }

    /// Explicit reset: forget the mnemonic, all wallets and the index counter.
    pub fn clear(&mut self) {
        self.seeds.clear();
        self.wallets.clear();
        self.next_index = 0;
        info!("Wallet session cleared");
    }

    fn wallet_mut(&mut self, position: usize) -> WalletResult<&mut Wallet> {
        let len = self.wallets.len();
        self.wallets.get_mut(position).ok_or_else(|| {
            WalletError::NotFound(format!("No wallet at position {} (have {})", position, len))
        })
    }
}

impl fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletSession")
            .field("seeds", &self.seeds)
            .field("wallets", &self.wallets)
            .field("next_index", &self.next_index)
            .finish()
    }
}
