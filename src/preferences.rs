use crate::vcs::VcsBackend;
use anyhow::{bail, Context, Result};
use chrono::NaiveTime;
use serde::Deserialize;
use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const FILENAME: &str = "statusliner.toml";

/// Session fragment template: either an inline Jinja2 string or a path to a
/// template file (relative to the preferences file).
///
/// In TOML this looks like one of:
///
/// ```toml
/// [session_template]
/// inline = "{{ model }} #{{ session }}"
///
/// # or
///
/// [session_template]
/// file = "session.tmpl"
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SessionTemplate {
    Inline(String),
    File(String),
}

impl Default for SessionTemplate {
    fn default() -> Self {
        SessionTemplate::Inline(
            "MODEL: {{ model }} [{{ style }}] v{{ version }} #{{ session }}".into(),
        )
    }
}

/// User preferences read from `statusliner.toml`. Every key is optional.
#[derive(Debug, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub session_template: SessionTemplate,

    /// How branch and status are queried: "cli" or "libgit2".
    #[serde(default)]
    pub vcs: VcsBackend,

    /// Executable asked for `--version` in the runtime fragment.
    #[serde(default = "default_runtime_command")]
    pub runtime_command: String,

    #[serde(default = "default_runtime_label")]
    pub runtime_label: String,

    /// Show the lockfile-derived package manager hint.
    #[serde(default = "default_true")]
    pub package_manager: bool,

    /// Show the local time of day.
    #[serde(default = "default_true")]
    pub time: bool,

    /// strftime pattern for the time fragment.
    #[serde(default = "default_time_format")]
    pub time_format: String,

    /// Directory of the file these were loaded from.
    #[serde(skip)]
    dir: Option<PathBuf>,
}

fn default_runtime_command() -> String {
    "node".into()
}

fn default_runtime_label() -> String {
    "NODE".into()
}

fn default_true() -> bool {
    true
}

fn default_time_format() -> String {
    "%H:%M:%S".into()
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            session_template: SessionTemplate::default(),
            vcs: VcsBackend::default(),
            runtime_command: default_runtime_command(),
            runtime_label: default_runtime_label(),
            package_manager: true,
            time: true,
            time_format: default_time_format(),
            dir: None,
        }
    }
}

/// `<config dir>/statusliner/statusliner.toml`, if the platform has one.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("statusliner").join(FILENAME))
}

impl Preferences {
    /// Load from `explicit`, else from [`default_path`]. A missing file
    /// yields defaults and is not created.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit.map(Path::to_path_buf).or_else(default_path) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let mut prefs = match fs::read_to_string(path) {
            Ok(contents) => toml::from_str::<Preferences>(&contents)
                .with_context(|| format!("parsing {}", path.display()))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no preferences file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
        };
        prefs.dir = path.parent().map(Path::to_path_buf);
        prefs.validate().with_context(|| format!("in {}", path.display()))?;
        Ok(prefs)
    }

    fn validate(&self) -> Result<()> {
        // Time-only patterns: date specifiers fail here too.
        let mut probe = String::new();
        if write!(probe, "{}", NaiveTime::default().format(&self.time_format)).is_err() {
            bail!("invalid time_format {:?}", self.time_format);
        }
        if self.runtime_command.trim().is_empty() {
            bail!("runtime_command must not be empty");
        }
        Ok(())
    }

    /// Resolve the session template to a string.
    pub fn session_template(&self) -> Result<String> {
        match &self.session_template {
            SessionTemplate::Inline(s) => Ok(s.clone()),
            SessionTemplate::File(filename) => {
                let path = match &self.dir {
                    Some(dir) => dir.join(filename),
                    None => PathBuf::from(filename),
                };
                fs::read_to_string(&path)
                    .with_context(|| format!("reading template {}", path.display()))
            }
        }
    }
}
