pub mod config;
pub mod derivation;
pub mod errors;
pub mod key_deriver;
pub mod mnemonic;
pub mod session;

pub use derivation::DerivationPath;
pub use errors::{WalletError, WalletResult};
pub use key_deriver::{derive, derive_from_mnemonic, derive_range, Wallet};
pub use mnemonic::{seed_from_mnemonic, MnemonicStrength, Seed, SeedManager};
pub use session::{SessionSnapshot, WalletList, WalletSession};
