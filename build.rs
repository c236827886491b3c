//! Embeds the git commit into the binary's `--version` output.
//!
//! Release builds from a tagged commit report the package version; anything
//! else reports `dev@<short hash>`.

fn git(args: &[&str]) -> Option<std::process::Output> {
    std::process::Command::new("git")
        .args(args)
        .output()
        .ok()
        .filter(|o| o.status.success())
}

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");

    let hash = git(&["rev-parse", "--short", "HEAD"])
        .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string())
        .unwrap_or_default();
    let on_tag = git(&["describe", "--exact-match", "--tags", "HEAD"]).is_some();

    println!("cargo:rustc-env=VIVERO_GIT_HASH={hash}");
    println!("cargo:rustc-env=VIVERO_RELEASE_TAG={on_tag}");
}
