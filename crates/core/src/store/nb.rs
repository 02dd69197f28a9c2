use std::ffi::OsStr;
use std::process::{Command, Output};

use tracing::debug;

use super::{NoteStore, StoreError};

/// [`NoteStore`] backed by the `nb` command line program.
///
/// - read:  `nb show <identifier> --print --no-color`
/// - write: `nb add <filename> --content <content>`
#[derive(Debug, Clone)]
pub struct NbStore {
    program: String,
}

impl NbStore {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn run<I, S>(&self, args: I) -> Result<Output, StoreError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        Command::new(&self.program)
            .args(args)
            .output()
            .map_err(|source| StoreError::Spawn { program: self.program.clone(), source })
    }
}

impl NoteStore for NbStore {
    fn read_template(&self, identifier: &str) -> Result<String, StoreError> {
        debug!("{} show {identifier} --print", self.program);
        let output = self.run(["show", identifier, "--print", "--no-color"])?;

        if !output.status.success() {
            return Err(StoreError::Read {
                identifier: identifier.to_string(),
                diagnostic: diagnostic(&output),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn write_note(&self, filename: &str, content: &str) -> Result<(), StoreError> {
        debug!("{} add {filename} ({} bytes)", self.program, content.len());
        let output = self.run(["add", filename, "--content", content])?;

        if !output.status.success() {
            return Err(StoreError::Write {
                filename: filename.to_string(),
                diagnostic: diagnostic(&output),
            });
        }
        debug!("store: {}", String::from_utf8_lossy(&output.stdout).trim_end());
        Ok(())
    }
}

// stderr, or stdout when the program reported its error there.
fn diagnostic(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let text = if stderr.trim().is_empty() {
        String::from_utf8_lossy(&output.stdout)
    } else {
        stderr
    };
    let text = text.trim_end();
    if text.is_empty() {
        match output.status.code() {
            Some(code) => format!("exited with status {code}"),
            None => "terminated by signal".to_string(),
        }
    } else {
        text.to_string()
    }
}
