use std::fs;
use std::path::PathBuf;

// Exposes the workspace VERSION file as LABEL_CHECK_VERSION.
fn main() {
    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("manifest dir"));
    let version_path = manifest_dir
        .ancestors()
        .nth(2)
        .expect("workspace root above crates/label-check-app")
        .join("VERSION");

    println!("cargo:rerun-if-changed={}", version_path.display());

    let version = fs::read_to_string(&version_path)
        .map(|raw| raw.trim().to_string())
        .expect("read VERSION file");
    if version.is_empty() {
        panic!("{} is empty", version_path.display());
    }

    println!("cargo:rustc-env=LABEL_CHECK_VERSION={version}");
}
