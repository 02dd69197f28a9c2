//! Fake `nb` environment shared by the CLI tests.
#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::{TempDir, tempdir};

/// Temp dir with a fake `nb` that serves `templates/<id>` and writes
/// `notes/<filename with ':' and '/' replaced by '_'>`.
pub struct Env {
    tmp: TempDir,
}

impl Env {
    pub fn new() -> Self {
        let tmp = tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("templates")).unwrap();
        fs::create_dir_all(root.join("notes")).unwrap();

        let script = format!(
            r#"#!/bin/sh
echo "$1 $2" >> '{root}/calls.log'
case "$1" in
  show)
    if [ -f '{root}/templates/'"$2" ]; then cat '{root}/templates/'"$2"; else echo "Not found: $2" >&2; exit 1; fi ;;
  add)
    if [ -f '{root}/reject' ]; then cat '{root}/reject' >&2; exit 1; fi
    name=$(printf '%s' "$2" | tr ':/' '__')
    printf '%s' "$4" > '{root}/notes/'"$name"
    echo "Added: $2" ;;
esac
"#,
            root = root.display()
        );
        let nb = root.join("fake-nb");
        fs::write(&nb, script).unwrap();
        fs::set_permissions(&nb, fs::Permissions::from_mode(0o755)).unwrap();

        fs::write(
            root.join("config.toml"),
            format!("version = 1\n[store]\nprogram = \"{}\"\n", nb.display()),
        )
        .unwrap();

        Self { tmp }
    }

    pub fn root(&self) -> &Path {
        self.tmp.path()
    }

    pub fn template(&self, id: &str, content: &str) {
        fs::write(self.root().join("templates").join(id), content).unwrap();
    }

    pub fn note(&self, name: &str) -> PathBuf {
        self.root().join("notes").join(name)
    }

    pub fn calls(&self) -> String {
        fs::read_to_string(self.root().join("calls.log")).unwrap_or_default()
    }

    /// Make the next `add` fail with `message` on stderr.
    pub fn reject_writes(&self, message: &str) {
        fs::write(self.root().join("reject"), message).unwrap();
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("notegen"));
        cmd.env("XDG_CONFIG_HOME", self.root());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("RUST_LOG");
        cmd.arg("--config").arg(self.root().join("config.toml"));
        cmd
    }
}
