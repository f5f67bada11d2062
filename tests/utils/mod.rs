// Shared helpers for integration tests
//
// Synthetic kernel trees, stand-in tools and tool detection.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// True when `tool --version` runs successfully
pub fn have_tool(tool: &str) -> bool {
    Command::new(tool)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Write `contents` to `root/relative`, creating parent directories
pub fn write_file(root: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

/// Write an executable shell script
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = write_file(dir, name, &format!("#!/bin/sh\n{}", body));
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
    path
}

/// Stand-in for `cc -E` on probe files
///
/// Logs its argv (one per line) to `args.log` and copies the probe to
/// `probe.h` next to itself, checks that the first `-I` directory holds the
/// empty stand-in headers, then substitutes the given `macro value` pairs
/// into the probe's `gen_nr` lines. Unsubstituted macros pass through.
pub fn fake_preprocessor(dir: &Path, substitutions: &[(&str, &str)]) -> PathBuf {
    let seds: String = substitutions
        .iter()
        .map(|(from, to)| format!(" -e 's/ {}$/ {}/'", from, to))
        .collect();

    let body = format!(
        r#"here=$(dirname "$0")
: > "$here/args.log"
for arg; do printf '%s\n' "$arg" >> "$here/args.log"; probe="$arg"; done
stand_ins=""
prev=""
for arg; do
    if [ "$prev" = "-I" ] && [ -z "$stand_ins" ]; then stand_ins="$arg"; fi
    prev="$arg"
done
[ -f "$stand_ins/asm/unistd-eabi.h" ] || exit 2
[ -f "$stand_ins/asm/unistd-common.h" ] || exit 2
cp "$probe" "$here/probe.h"
echo "typedef unsigned int __u32;"
grep '^gen_nr ' "$probe" | sed -e 's/x/x/'{seds}
"#
    );
    write_script(dir, "fake-cc", &body)
}

/// Read back the argv logged by [`fake_preprocessor`]
pub fn logged_args(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("args.log"))
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Turn `root` into a git repository with every file staged
pub fn git_stage_all(root: &Path) {
    for args in [&["init", "-q"][..], &["add", "-A"][..]] {
        let status = Command::new("git")
            .args(args)
            .current_dir(root)
            .status()
            .unwrap();
        assert!(status.success(), "git {:?} failed", args);
    }
}
