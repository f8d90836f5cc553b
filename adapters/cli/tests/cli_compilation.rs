use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "scarecrow-survivors"])
        .status()
        .expect("failed to invoke cargo check for scarecrow-survivors CLI binary");

    assert!(
        status.success(),
        "cargo check --bin scarecrow-survivors should succeed"
    );
}
