use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Process state the status line reads, captured once up front so every
/// fragment can be rendered from plain values.
#[derive(Debug, Clone)]
pub struct EnvironmentFacts {
    pub current_dir: PathBuf,
    pub home: Option<PathBuf>,
}

impl EnvironmentFacts {
    pub fn new(current_dir: impl Into<PathBuf>, home: Option<PathBuf>) -> Self {
        Self {
            current_dir: current_dir.into(),
            home,
        }
    }

    /// Read the cwd and `$HOME` (falling back to the platform home dir).
    pub fn from_process() -> Result<Self> {
        let current_dir = env::current_dir().context("reading current directory")?;
        let home = env::var_os("HOME")
            .filter(|h| !h.is_empty())
            .map(PathBuf::from)
            .or_else(dirs::home_dir);
        Ok(Self::new(current_dir, home))
    }

    /// The cwd with a leading home directory replaced by `~`.
    pub fn display_dir(&self) -> String {
        abbreviate_home(&self.current_dir, self.home.as_deref())
    }
}

/// Replace a leading `home` prefix of `path` with `~`. Matching is by path
/// component, so `/home/al` never abbreviates `/home/alice`.
pub fn abbreviate_home(path: &Path, home: Option<&Path>) -> String {
    let Some(home) = home else {
        return path.display().to_string();
    };
    match path.strip_prefix(home) {
        Ok(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Ok(rest) => format!("~/{}", rest.display()),
        Err(_) => path.display().to_string(),
    }
}
