use anyhow::{bail, Context, Result};
use std::process::Command;

/// Reports the version of the JavaScript runtime the project runs on.
pub trait RuntimeProbe {
    fn version(&self) -> Result<String>;
}

/// Asks `<program> --version` and keeps the first non-empty line.
pub struct CommandProbe {
    program: String,
}

impl CommandProbe {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl RuntimeProbe for CommandProbe {
    fn version(&self) -> Result<String> {
        let output = Command::new(&self.program)
            .arg("--version")
            .output()
            .with_context(|| format!("running {} --version", self.program))?;

        if !output.status.success() {
            bail!("{} --version exited with {}", self.program, output.status);
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        match stdout.lines().map(str::trim).find(|l| !l.is_empty()) {
            Some(line) => Ok(line.to_string()),
            None => bail!("{} --version printed nothing", self.program),
        }
    }
}
