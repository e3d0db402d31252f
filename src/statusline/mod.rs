use crate::environment::EnvironmentFacts;
use crate::fragments::{self, PackageManager};
use crate::preferences::Preferences;
use crate::runtime::RuntimeProbe;
use crate::types::SessionContext;
use crate::vcs::{RepositoryStatus, Vcs};
use anyhow::Result;
use chrono::NaiveTime;

pub const SEPARATOR: &str = " │ ";

// ===================================================================
// Input: all I/O-derived state, gathered before calling render()
// ===================================================================

pub struct StatusInputs<'a> {
    pub session: &'a SessionContext,
    pub env: &'a EnvironmentFacts,
    /// `None` when either VCS query failed.
    pub repo: Option<RepositoryStatus>,
    pub runtime_label: &'a str,
    /// `None` when the runtime probe failed.
    pub runtime_version: Option<String>,
    pub package_manager: Option<PackageManager>,
    /// `None` when the time fragment is disabled.
    pub time: Option<(NaiveTime, &'a str)>,
}

impl<'a> StatusInputs<'a> {
    /// Run every lookup once. VCS and runtime failures are logged and
    /// recorded as absent, never propagated.
    pub fn gather(
        session: &'a SessionContext,
        env: &'a EnvironmentFacts,
        prefs: &'a Preferences,
        vcs: Result<Box<dyn Vcs>>,
        runtime: &dyn RuntimeProbe,
        now: NaiveTime,
    ) -> Self {
        let repo = match vcs.and_then(|vcs| RepositoryStatus::query(vcs.as_ref())) {
            Ok(status) => Some(status),
            Err(err) => {
                tracing::debug!("git status unavailable: {err:#}");
                None
            }
        };

        let runtime_version = match runtime.version() {
            Ok(version) => Some(version),
            Err(err) => {
                tracing::debug!("runtime version unavailable: {err:#}");
                None
            }
        };

        let package_manager = if prefs.package_manager {
            PackageManager::detect(&env.current_dir)
        } else {
            None
        };

        Self {
            session,
            env,
            repo,
            runtime_label: &prefs.runtime_label,
            runtime_version,
            package_manager,
            time: prefs.time.then_some((now, prefs.time_format.as_str())),
        }
    }
}

// ===================================================================
// Output
// ===================================================================

/// Build the status line in its fixed fragment order: session, directory,
/// git, runtime, package manager, time.
pub fn render(inputs: &StatusInputs<'_>, session_template: &str) -> Result<String> {
    let fragments = [
        Some(fragments::session(inputs.session, session_template)?),
        Some(fragments::directory(inputs.env)),
        Some(fragments::git(inputs.repo.as_ref())),
        Some(fragments::runtime(
            inputs.runtime_label,
            inputs.runtime_version.as_deref(),
        )),
        fragments::package_manager(inputs.package_manager),
        inputs.time.map(|(now, format)| fragments::time(now, format)),
    ];
    Ok(assemble(fragments))
}

/// Join the non-empty fragments with [`SEPARATOR`], preserving order.
pub fn assemble(fragments: impl IntoIterator<Item = Option<String>>) -> String {
    fragments
        .into_iter()
        .flatten()
        .filter(|f| !f.is_empty())
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}
