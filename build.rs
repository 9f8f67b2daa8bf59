use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Expose the latest git tag so the About card can show a release label
    // instead of the bare crate version. Absent git or tags, stay silent.
    let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--abbrev=0"])
        .output()
    else {
        return;
    };
    if !output.status.success() {
        return;
    }
    let Ok(tag) = String::from_utf8(output.stdout) else {
        return;
    };
    let tag = tag.trim();
    if !tag.is_empty() {
        println!("cargo:rustc-env=GIT_TAG={tag}");
    }
}
