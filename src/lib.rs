// src/lib.rs
//! Deterministic Solana wallet generation.
//!
//! A BIP39 mnemonic is created once per session and converted to a seed;
//! wallets are derived from that seed with SLIP-10 ed25519 along
//! `m/44'/501'/<index>'/0'`.

pub mod cli;
pub mod core;
pub mod security;
pub mod storage;

pub use crate::core::config::AppConfig;
pub use crate::core::errors::{WalletError, WalletResult};
pub use crate::core::key_deriver::{derive, derive_from_mnemonic, Wallet};
pub use crate::core::mnemonic::{seed_from_mnemonic, SeedManager};
pub use crate::core::session::{SessionSnapshot, WalletSession};
