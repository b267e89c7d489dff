use assert_cmd::Command;

#[allow(deprecated)]
fn spendguard_cmd() -> Command {
    Command::cargo_bin("spendguard").unwrap()
}

#[test]
fn help_works() {
    spendguard_cmd().arg("--help").assert().success();
}

#[test]
fn subcommand_help_works() {
    for sub in [
        "run",
        "prove",
        "verify",
        "digest",
        "policy-from-text",
        "doctor",
        "explain",
    ] {
        spendguard_cmd().args([sub, "--help"]).assert().success();
    }
}

#[test]
fn version_works() {
    spendguard_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicates::str::contains(env!("CARGO_PKG_VERSION")));
}
