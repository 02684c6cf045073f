//! End-to-end runs of the `sol-wallet` binary against a temp data dir.

use assert_cmd::Command;

const ABANDON: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn sol_wallet(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("sol-wallet").unwrap();
    cmd.arg("--data-dir")
        .arg(dir)
        .env_remove("SOL_WALLET_DATA_DIR")
        .env_remove("SOL_WALLET_WORDS")
        .env_remove("DEV_PRINT_SECRETS");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn import_generate_delete_list() {
    let dir = tempfile::tempdir().unwrap();

    sol_wallet(dir.path()).args(["import", "--phrase", ABANDON]).assert().success();
    let generated = stdout_of(sol_wallet(dir.path()).args(["generate", "--count", "3"]));
    assert!(generated.contains("HAgk14JpMQLgt6rVgv7cBQFJWFto5Dqxi472uT3DKpqk"));
    assert!(generated.contains("7WktogJEd2wQ9eH2oWusmcoFTgeYi6rS632UviTBJ2jm"));

    sol_wallet(dir.path()).args(["delete", "--position", "1"]).assert().success();
    let listed = stdout_of(sol_wallet(dir.path()).arg("list"));
    assert!(listed.contains("m/44'/501'/2'/0'"));
    assert!(!listed.contains("Hh8QwFUA6MtVu1qAoq12ucvFHNwCcVTV7hpWjeY1Hztb"));
    assert!(!listed.contains("37df573b3ac4ad5b"));
}

#[test]
fn mnemonic_persists_between_runs() {
    let dir = tempfile::tempdir().unwrap();
    sol_wallet(dir.path()).arg("generate").assert().success();
    let first = sol_wallet(dir.path()).arg("mnemonic").output().unwrap();
    let second = sol_wallet(dir.path()).arg("mnemonic").output().unwrap();
    assert!(String::from_utf8_lossy(&first.stdout).starts_with("Seed Phrase: "));
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn invalid_phrase_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    sol_wallet(dir.path())
        .args(["import", "--phrase", "definitely not a valid seed phrase"])
        .assert()
        .failure();
    assert!(!dir.path().join("mnemonic").exists());
}
