use crate::environment::EnvironmentFacts;
use crate::types::SessionContext;
use crate::vcs::RepositoryStatus;
use anyhow::{Context, Result};
use chrono::NaiveTime;
use minijinja::{context, Environment};
use std::path::Path;

pub const GIT_FALLBACK: &str = "GIT: N/A";
pub const RUNTIME_FALLBACK: &str = "unknown";
pub const DETACHED: &str = "(detached)";

// ===================================================================
// Session
// ===================================================================

/// Render the session summary through a minijinja template exposing
/// `model`, `version`, `style` and `session` (the 8-char id prefix).
pub fn session(ctx: &SessionContext, template: &str) -> Result<String> {
    let env = Environment::new();
    let tmpl = env
        .template_from_str(template)
        .context("parsing session template")?;
    tmpl.render(context! {
        model => &ctx.model.display_name,
        version => &ctx.version,
        style => &ctx.output_style.name,
        session => ctx.session_prefix(),
    })
    .context("rendering session template")
}

// ===================================================================
// Directory / VCS / runtime
// ===================================================================

pub fn directory(env: &EnvironmentFacts) -> String {
    format!("DIR: {}", env.display_dir())
}

/// `GIT: <branch> [<codes>]`, or the fixed fallback when the lookup failed.
pub fn git(status: Option<&RepositoryStatus>) -> String {
    let Some(status) = status else {
        return GIT_FALLBACK.to_string();
    };
    let branch = if status.branch.is_empty() {
        DETACHED
    } else {
        status.branch.as_str()
    };
    if status.flags.is_clean() {
        format!("GIT: {branch}")
    } else {
        format!("GIT: {branch} [{}]", status.flags)
    }
}

pub fn runtime(label: &str, version: Option<&str>) -> String {
    format!("{label}: {}", version.unwrap_or(RUNTIME_FALLBACK))
}

// ===================================================================
// Package manager
// ===================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Pnpm,
    Yarn,
    Npm,
    Bun,
}

impl PackageManager {
    /// Lockfiles in detection priority order.
    pub const LOCKFILES: [(&'static str, PackageManager); 4] = [
        ("pnpm-lock.yaml", PackageManager::Pnpm),
        ("yarn.lock", PackageManager::Yarn),
        ("package-lock.json", PackageManager::Npm),
        ("bun.lockb", PackageManager::Bun),
    ];

    /// The first manager whose lockfile exists directly in `dir`.
    pub fn detect(dir: &Path) -> Option<Self> {
        Self::LOCKFILES
            .iter()
            .find(|(lockfile, _)| dir.join(lockfile).exists())
            .map(|(_, pm)| *pm)
    }

    pub fn label(self) -> &'static str {
        match self {
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
            PackageManager::Npm => "npm",
            PackageManager::Bun => "bun",
        }
    }
}

pub fn package_manager(pm: Option<PackageManager>) -> Option<String> {
    pm.map(|pm| format!("PKG: {}", pm.label()))
}

// ===================================================================
// Time
// ===================================================================

/// `format` must already be a valid strftime pattern.
pub fn time(now: NaiveTime, format: &str) -> String {
    format!("TIME: {}", now.format(format))
}
