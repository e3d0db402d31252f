use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

// ===================================================================
// Backend seam
// ===================================================================

/// The two version-control queries the status line needs.
pub trait Vcs {
    /// Current branch name, empty when HEAD is detached.
    fn current_branch(&self) -> Result<String>;

    /// Working tree state in `git status --porcelain` (v1) format.
    fn porcelain_status(&self) -> Result<String>;
}

/// Which implementation of [`Vcs`] to use, chosen in preferences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VcsBackend {
    /// Shell out to the `git` executable.
    #[default]
    Cli,
    /// Read the repository in-process through libgit2.
    Libgit2,
}

/// Open the configured backend rooted at `dir`.
pub fn open(backend: VcsBackend, dir: &Path) -> Result<Box<dyn Vcs>> {
    match backend {
        VcsBackend::Cli => Ok(Box::new(GitCli::new(dir))),
        VcsBackend::Libgit2 => Ok(Box::new(LibGit::discover(dir)?)),
    }
}

// ===================================================================
// `git` executable
// ===================================================================

pub struct GitCli {
    dir: PathBuf,
}

impl GitCli {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.dir)
            .args(args)
            .output()
            .with_context(|| format!("running git {}", args.join(" ")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("git {} failed: {}", args.join(" "), stderr.trim());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Vcs for GitCli {
    fn current_branch(&self) -> Result<String> {
        Ok(self.run(&["branch", "--show-current"])?.trim().to_string())
    }

    fn porcelain_status(&self) -> Result<String> {
        self.run(&["status", "--porcelain"])
    }
}

// ===================================================================
// libgit2
// ===================================================================

pub struct LibGit {
    repo: git2::Repository,
}

impl LibGit {
    pub fn discover(dir: &Path) -> Result<Self> {
        let repo = git2::Repository::discover(dir)
            .with_context(|| format!("finding git repo from {}", dir.display()))?;
        if repo.is_bare() {
            bail!("git repo is bare, no working directory");
        }
        Ok(Self { repo })
    }

    /// Porcelain `XY` code per conflicted path, from which index stages exist.
    fn conflict_codes(&self) -> Result<HashMap<String, &'static str>> {
        let index = self.repo.index().context("opening index")?;
        let mut codes = HashMap::new();
        if !index.has_conflicts() {
            return Ok(codes);
        }
        for conflict in index.conflicts().context("reading index conflicts")? {
            let conflict = conflict.context("reading index conflict")?;
            let Some(entry) = conflict
                .our
                .as_ref()
                .or(conflict.their.as_ref())
                .or(conflict.ancestor.as_ref())
            else {
                continue;
            };
            let path = String::from_utf8_lossy(&entry.path).into_owned();
            let code = conflict_code(
                conflict.ancestor.is_some(),
                conflict.our.is_some(),
                conflict.their.is_some(),
            );
            codes.insert(path, code);
        }
        Ok(codes)
    }
}

impl Vcs for LibGit {
    fn current_branch(&self) -> Result<String> {
        match self.repo.head() {
            Ok(head) if head.is_branch() => Ok(head.shorthand().unwrap_or_default().to_string()),
            Ok(_) => Ok(String::new()),
            // A fresh repo has HEAD pointing at a branch with no commits yet.
            Err(e) if e.code() == git2::ErrorCode::UnbornBranch => {
                let head = self
                    .repo
                    .find_reference("HEAD")
                    .context("reading HEAD")?;
                Ok(head
                    .symbolic_target()
                    .and_then(|t| t.strip_prefix("refs/heads/"))
                    .unwrap_or_default()
                    .to_string())
            }
            Err(e) => Err(e).context("reading HEAD"),
        }
    }

    fn porcelain_status(&self) -> Result<String> {
        let mut opts = git2::StatusOptions::new();
        opts.include_untracked(true)
            .recurse_untracked_dirs(false)
            .include_ignored(false)
            .renames_head_to_index(true);
        let statuses = self
            .repo
            .statuses(Some(&mut opts))
            .context("checking git status")?;
        let conflicts = self.conflict_codes()?;

        let mut out = String::new();
        for entry in statuses.iter() {
            let status = entry.status();
            let path = entry.path().unwrap_or_default();

            if status.is_conflicted() {
                let code = conflicts.get(path).copied().unwrap_or("UU");
                out.push_str(&format!("{code} {path}\n"));
                continue;
            }

            let code = porcelain_code(status);
            if code == "  " {
                continue;
            }
            match entry.head_to_index().filter(|_| status.is_index_renamed()) {
                Some(delta) => {
                    let old = delta.old_file().path().unwrap_or(Path::new(path));
                    let new = delta.new_file().path().unwrap_or(Path::new(path));
                    out.push_str(&format!("{code} {} -> {}\n", old.display(), new.display()));
                }
                None => out.push_str(&format!("{code} {path}\n")),
            }
        }
        Ok(out)
    }
}

/// The unmerged-state code `git status --porcelain` prints for a path with
/// the given base/ours/theirs stages present.
fn conflict_code(ancestor: bool, ours: bool, theirs: bool) -> &'static str {
    match (ancestor, ours, theirs) {
        (true, false, false) => "DD",
        (false, true, false) => "AU",
        (true, true, false) => "UD",
        (false, false, true) => "UA",
        (true, false, true) => "DU",
        (false, true, true) => "AA",
        _ => "UU",
    }
}

/// Translate libgit2 status bits into the two-column `XY` porcelain code.
fn porcelain_code(status: git2::Status) -> String {
    if status.is_wt_new() {
        return "??".into();
    }

    let index = if status.is_index_new() {
        'A'
    } else if status.is_index_modified() {
        'M'
    } else if status.is_index_deleted() {
        'D'
    } else if status.is_index_renamed() {
        'R'
    } else if status.is_index_typechange() {
        'T'
    } else {
        ' '
    };

    let worktree = if status.is_wt_modified() {
        'M'
    } else if status.is_wt_deleted() {
        'D'
    } else if status.is_wt_renamed() {
        'R'
    } else if status.is_wt_typechange() {
        'T'
    } else {
        ' '
    };

    format!("{index}{worktree}")
}

// ===================================================================
// Derived status
// ===================================================================

/// Dirty-state markers, rendered in declaration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusFlags {
    pub untracked: bool,
    pub modified: bool,
    pub added: bool,
    pub deleted: bool,
    pub conflicted: bool,
}

impl StatusFlags {
    /// Classify a porcelain report by substring presence.
    pub fn from_porcelain(report: &str) -> Self {
        let either_side = |c: char| {
            report.contains(&format!(" {c}")) || report.contains(&format!("{c} "))
        };
        Self {
            untracked: report.contains("??"),
            modified: either_side('M'),
            added: either_side('A'),
            deleted: either_side('D'),
            conflicted: report.contains("UU"),
        }
    }

    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

impl fmt::Display for StatusFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (set, code) in [
            (self.untracked, "?"),
            (self.modified, "M"),
            (self.added, "A"),
            (self.deleted, "D"),
            (self.conflicted, "U"),
        ] {
            if set {
                f.write_str(code)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryStatus {
    pub branch: String,
    pub flags: StatusFlags,
}

impl RepositoryStatus {
    /// Run both queries once; either failing fails the whole lookup.
    pub fn query(vcs: &dyn Vcs) -> Result<Self> {
        let branch = vcs.current_branch()?;
        let report = vcs.porcelain_status()?;
        Ok(Self {
            branch,
            flags: StatusFlags::from_porcelain(&report),
        })
    }
}
