//! Pruned traversal of the project tree.
//!
//! Excluded directories are filtered during traversal, so no I/O happens
//! on their subtrees. Only files whose extension maps to a [`FileKind`]
//! are yielded.

use crate::types::FileKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directory names pruned by default: build output, dependency caches,
/// version-control metadata and migration backups.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    "vendor",
    "node_modules",
    ".git",
    "dist",
    "build",
    "migration_backups",
];

/// Error enumerating the tree. Fatal to the whole scan.
#[derive(Debug, thiserror::Error)]
#[error("failed to walk {root}: {source}")]
pub struct WalkError {
    /// Root of the walk.
    pub root: PathBuf,
    /// Underlying traversal error.
    #[source]
    pub source: ignore::Error,
}

/// A file selected for validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Path to the file.
    pub path: PathBuf,
    /// Kind derived from the extension.
    pub kind: FileKind,
}

#[derive(Debug, Clone, Default)]
struct Exclusions {
    dir_names: Vec<String>,
    globs: Vec<glob::Pattern>,
}

impl Exclusions {
    fn excludes(&self, root: &Path, path: &Path, is_dir: bool) -> bool {
        if is_dir {
            let name = path.file_name().map(|n| n.to_string_lossy());
            if name.is_some_and(|n| self.dir_names.iter().any(|d| *d == n)) {
                return true;
            }
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        self.globs.iter().any(|g| g.matches_path(relative))
    }
}

/// Walks a root directory and yields validation candidates.
#[derive(Debug, Clone)]
pub struct FileWalker {
    root: PathBuf,
    exclusions: Exclusions,
    git_ignore: bool,
}

impl FileWalker {
    /// Creates a walker with the default directory exclusions.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exclusions: Exclusions {
                dir_names: DEFAULT_EXCLUDED_DIRS.iter().map(|d| (*d).to_string()).collect(),
                globs: Vec::new(),
            },
            git_ignore: false,
        }
    }

    /// Replaces the pruned directory names.
    #[must_use]
    pub fn exclude_dirs<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusions.dir_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Adds glob patterns matched against root-relative paths.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is not a valid glob.
    pub fn exclude_globs<I, S>(mut self, patterns: I) -> Result<Self, glob::PatternError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            self.exclusions
                .globs
                .push(glob::Pattern::new(pattern.as_ref())?);
        }
        Ok(self)
    }

    /// Whether `.gitignore` files are honoured (default: false).
    #[must_use]
    pub fn git_ignore(mut self, yes: bool) -> Self {
        self.git_ignore = yes;
        self
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Starts a new traversal.
    ///
    /// The returned iterator is lazy and yields files in a stable
    /// (name-sorted) order.
    #[must_use]
    pub fn walk(&self) -> Walk {
        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .standard_filters(false)
            .git_ignore(self.git_ignore)
            .git_exclude(self.git_ignore)
            .sort_by_file_name(|a, b| a.cmp(b));

        let root = self.root.clone();
        let exclusions = self.exclusions.clone();
        builder.filter_entry(move |entry| {
            if entry.depth() == 0 {
                return true;
            }
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            let excluded = exclusions.excludes(&root, entry.path(), is_dir);
            if excluded {
                debug!("Excluding: {}", entry.path().display());
            }
            !excluded
        });

        Walk {
            root: self.root.clone(),
            inner: builder.build(),
        }
    }
}

/// Lazy sequence of candidates from one traversal.
pub struct Walk {
    root: PathBuf,
    inner: ignore::Walk,
}

impl Iterator for Walk {
    type Item = Result<Candidate, WalkError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(source) => {
                    return Some(Err(WalkError {
                        root: self.root.clone(),
                        source,
                    }))
                }
            };

            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            if let Some(kind) = FileKind::from_path(entry.path()) {
                return Some(Ok(Candidate {
                    path: entry.into_path(),
                    kind,
                }));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn relative(walker: &FileWalker) -> Vec<String> {
        walker
            .walk()
            .map(|c| {
                let c = c.unwrap();
                c.path
                    .strip_prefix(walker.root())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn yields_only_known_kinds() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "main.go");
        touch(tmp.path(), "views/page.templ");
        touch(tmp.path(), "README.md");
        touch(tmp.path(), "static/site.css");

        let walker = FileWalker::new(tmp.path());
        assert_eq!(relative(&walker), ["main.go", "views/page.templ"]);
    }

    #[test]
    fn prunes_default_excluded_dirs() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "app/handler.go");
        touch(tmp.path(), "vendor/lib/lib.go");
        touch(tmp.path(), "node_modules/pkg/x.templ");
        touch(tmp.path(), ".git/hooks/hook.go");
        touch(tmp.path(), "migration_backups/old/page.templ");
        touch(tmp.path(), "web/dist/bundle.go");

        let walker = FileWalker::new(tmp.path());
        assert_eq!(relative(&walker), ["app/handler.go"]);
    }

    #[test]
    fn excluded_name_on_a_file_is_not_pruned() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "tools/build.go");

        let walker = FileWalker::new(tmp.path());
        assert_eq!(relative(&walker), ["tools/build.go"]);
    }

    #[test]
    fn root_named_like_an_excluded_dir_is_walked() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "build/main.go");

        let walker = FileWalker::new(tmp.path().join("build"));
        assert_eq!(relative(&walker), ["main.go"]);
    }

    #[test]
    fn custom_dirs_and_globs() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "vendor/keep.go");
        touch(tmp.path(), "gen/skip.go");
        touch(tmp.path(), "views/page_templ.go");
        touch(tmp.path(), "views/page.templ");

        let walker = FileWalker::new(tmp.path())
            .exclude_dirs(["gen"])
            .exclude_globs(["**/*_templ.go"])
            .unwrap();
        assert_eq!(relative(&walker), ["vendor/keep.go", "views/page.templ"]);
    }

    #[test]
    fn invalid_glob_is_rejected() {
        assert!(FileWalker::new(".").exclude_globs(["[unclosed"]).is_err());
    }

    #[test]
    fn missing_root_is_a_walk_error() {
        let tmp = TempDir::new().unwrap();
        let walker = FileWalker::new(tmp.path().join("does-not-exist"));
        let results: Vec<_> = walker.walk().collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_subdirectory_is_a_walk_error() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a.go");
        touch(tmp.path(), "sealed/b.go");
        let sealed = tmp.path().join("sealed");
        fs::set_permissions(&sealed, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read_dir(&sealed).is_ok() {
            // Permissions are not enforced for this user (e.g. root).
            return;
        }

        let results: Vec<_> = FileWalker::new(tmp.path()).walk().collect();
        fs::set_permissions(&sealed, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(results[0].is_ok());
        assert!(results.iter().any(Result::is_err));
    }
}
