//! Known-answer vectors for the Solana derivation path.

use pretty_assertions::assert_eq;
use sol_wallet_gen::core::derivation::DerivationPath;
use sol_wallet_gen::core::mnemonic::seed_from_mnemonic;
use sol_wallet_gen::{derive, derive_from_mnemonic};
use test_case::test_case;

const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

#[test_case(0, "HAgk14JpMQLgt6rVgv7cBQFJWFto5Dqxi472uT3DKpqk",
    "37df573b3ac4ad5b522e064e25b63ea16bcbe79d449e81a0268d1047948bb445f036276246a75b9de3349ed42b15e232f6518fc20f5fcd4f1d64e81f9bd258f7" ; "index 0")]
#[test_case(1, "Hh8QwFUA6MtVu1qAoq12ucvFHNwCcVTV7hpWjeY1Hztb",
    "ba5e7b6e3680b4eb81db8e54c8e466b2e9a899355888403355d858ab985d2fc4f8029acf5cbcbdd5ac46ec147f3b78a3df6e5022ef0411db2bab650d329a4cd4" ; "index 1")]
#[test_case(2, "7WktogJEd2wQ9eH2oWusmcoFTgeYi6rS632UviTBJ2jm",
    "2f2d4843b13aec3867edc61fbeac4a1fa58797a8629aa35217bd183405bcc20260c5985f58a32ff8ab91e2fbd1d211b8de6b4acc4f6ce4458830efc0c801ca1c" ; "index 2")]
#[test_case(12, "3ih2doS8hZJsnMnZ4Xho4rckrZKq8Co5N5GdCEnD6Mx3",
    "f035bae8873ee8c92c943dc3af8662dba72e10fa438d9cb780f9ac7fc44f6f8928657270c4fb400254635f294c7c32cb28df65b3bc239edebd46103f5c4ba6b0" ; "index 12")]
fn abandon_mnemonic_vectors(index: u32, public_key: &str, private_key: &str) {
    let wallet = derive_from_mnemonic(ABANDON, index).unwrap();
    assert_eq!(wallet.path, format!("m/44'/501'/{}'/0'", index));
    assert_eq!(wallet.public_key, public_key);
    assert_eq!(wallet.private_key, private_key);
    assert!(!wallet.revealed);
}

#[test]
fn seed_matches_bip39_reference() {
    let seed = seed_from_mnemonic(ABANDON).unwrap();
    assert_eq!(
        hex::encode(seed.as_bytes()),
        "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc19a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
    );
}

#[test]
fn private_key_tail_is_public_key() {
    let seed = seed_from_mnemonic(ABANDON).unwrap();
    for index in [0u32, 5, 1000] {
        let wallet = derive(&seed, index).unwrap();
        let keypair = hex::decode(&wallet.private_key).unwrap();
        let public = bs58::decode(&wallet.public_key).into_vec().unwrap();
        assert_eq!(keypair.len(), 64);
        assert_eq!(&keypair[32..], public.as_slice());
        wallet.validate().unwrap();
    }
}

#[test]
fn largest_hardened_index_derives() {
    let wallet = derive_from_mnemonic(ABANDON, 0x7fff_ffff).unwrap();
    assert_eq!(wallet.path, "m/44'/501'/2147483647'/0'");
    assert_eq!(wallet.index().unwrap(), 0x7fff_ffff);
}

#[test]
fn index_past_hardened_range_rejected() {
    assert!(derive_from_mnemonic(ABANDON, 0x8000_0000).is_err());
    assert!(DerivationPath::solana(0x8000_0000).is_err());
}

#[test]
fn whitespace_does_not_change_keys() {
    let spaced = format!("  {}  ", ABANDON.replace(' ', "   "));
    assert_eq!(
        derive_from_mnemonic(&spaced, 3).unwrap(),
        derive_from_mnemonic(ABANDON, 3).unwrap()
    );
}

#[test]
fn distinct_mnemonics_give_distinct_seeds_and_wallets() {
    let legal = "legal winner thank year wave sausage worth useful legal winner thank yellow";
    let seed_a = seed_from_mnemonic(ABANDON).unwrap();
    let seed_b = seed_from_mnemonic(legal).unwrap();
    assert_ne!(seed_a, seed_b);

    for index in [0u32, 1, 12] {
        let a = derive(&seed_a, index).unwrap();
        let b = derive(&seed_b, index).unwrap();
        assert_eq!(a.path, b.path);
        assert_ne!(a.public_key, b.public_key);
        assert_ne!(a.private_key, b.private_key);
    }
}

#[test]
fn generated_mnemonics_give_distinct_wallets() {
    use sol_wallet_gen::core::mnemonic::{generate_mnemonic, MnemonicStrength};
    let first = generate_mnemonic(MnemonicStrength::Twelve).unwrap();
    let second = generate_mnemonic(MnemonicStrength::Twelve).unwrap();
    assert_ne!(first.as_str(), second.as_str());
    assert_ne!(
        derive_from_mnemonic(&first, 0).unwrap().public_key,
        derive_from_mnemonic(&second, 0).unwrap().public_key
    );
}
