//! Property tests for mnemonic generation and key derivation.

use proptest::prelude::*;
use sol_wallet_gen::core::key_deriver::PRIVATE_KEY_HEX_LEN;
use sol_wallet_gen::core::mnemonic::{generate_mnemonic, validate_mnemonic, MnemonicStrength, Seed};
use sol_wallet_gen::derive;

fn seed_strategy() -> impl Strategy<Value = Seed> {
    prop::array::uniform32(any::<u8>()).prop_flat_map(|head| {
        prop::array::uniform32(any::<u8>()).prop_map(move |tail| {
            let mut bytes = [0u8; 64];
            bytes[..32].copy_from_slice(&head);
            bytes[32..].copy_from_slice(&tail);
            Seed::from_bytes(bytes)
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn derivation_is_deterministic(seed in seed_strategy(), index in 0u32..0x8000_0000) {
        let a = derive(&seed, index).unwrap();
        let b = derive(&seed, index).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn distinct_indices_give_distinct_keys(seed in seed_strategy(), a in 0u32..10_000, b in 0u32..10_000) {
        prop_assume!(a != b);
        let wa = derive(&seed, a).unwrap();
        let wb = derive(&seed, b).unwrap();
        prop_assert_ne!(wa.public_key, wb.public_key);
        prop_assert_ne!(wa.private_key, wb.private_key);
    }

    #[test]
    fn derived_wallets_are_well_formed(seed in seed_strategy(), index in 0u32..0x8000_0000) {
        let wallet = derive(&seed, index).unwrap();
        prop_assert_eq!(wallet.private_key.len(), PRIVATE_KEY_HEX_LEN);
        prop_assert!(wallet.private_key.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
        let public = bs58::decode(&wallet.public_key).into_vec().unwrap();
        prop_assert_eq!(public.len(), 32);
        prop_assert_eq!(bs58::encode(&public).into_string(), wallet.public_key.clone());
        prop_assert!(wallet.validate().is_ok());
    }

    #[test]
    fn generated_mnemonics_validate(words in prop::sample::select(vec![12usize, 15, 18, 21, 24])) {
        let strength = MnemonicStrength::try_from(words).unwrap();
        let phrase = generate_mnemonic(strength).unwrap();
        prop_assert_eq!(phrase.split(' ').count(), words);
        prop_assert!(validate_mnemonic(&phrase).is_ok());
    }
}
