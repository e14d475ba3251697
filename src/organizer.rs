/// Directory organization: classify each top-level file and move it into its
/// category folder.
///
/// [`DirectoryOrganizer`] owns the target directory and the category map for one
/// run. It lists the directory once, skips directories and hidden entries,
/// creates category folders on demand, and moves files into them, reporting each
/// move to a [`Reporter`].
use crate::category_map::CategoryMap;
use crate::entry::{self, EntryIter, FileEntry, SkipReason};
use crate::error::{OrganizeError, OrganizeResult};
use crate::report::Reporter;
use log::warn;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// What to do when a single file cannot be moved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the run and return the error. Files already moved stay moved.
    #[default]
    Abort,
    /// Record the failure and carry on with the next entry.
    Continue,
}

/// Knobs for a single run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrganizeOptions {
    /// Classify and report, but create no folder and move nothing.
    pub dry_run: bool,
    /// Behavior on a failed move.
    pub on_error: FailurePolicy,
}

/// One file relocated (or, in a dry run, due to be relocated).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovedFile {
    /// The file name, unchanged by the move.
    pub name: String,
    /// The category folder the file went into.
    pub category: String,
    /// Where the file was.
    pub from: PathBuf,
    /// Where the file is now.
    pub to: PathBuf,
}

/// Classification of a directory without touching it.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    /// Files that would be moved.
    pub moves: Vec<MovedFile>,
    /// Entries that would be left alone.
    pub skipped: Vec<(String, SkipReason)>,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Default)]
pub struct OrganizeSummary {
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// Files moved, or planned moves in a dry run.
    pub moved: Vec<MovedFile>,
    /// Entries left in place and why.
    pub skipped: Vec<(String, SkipReason)>,
    /// Files that could not be moved under [`FailurePolicy::Continue`].
    pub failed: Vec<(PathBuf, String)>,
}

impl OrganizeSummary {
    /// Number of moved files per category, sorted by category name.
    pub fn category_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for moved in &self.moved {
            *counts.entry(moved.category.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Returns true if no file failed to move.
    pub fn is_complete_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Moves the top-level files of one directory into category subfolders.
#[derive(Debug, Clone)]
pub struct DirectoryOrganizer {
    directory: PathBuf,
    categories: CategoryMap,
    options: OrganizeOptions,
}

impl DirectoryOrganizer {
    /// Creates an organizer, loading the category map from `map_path` or the
    /// usual fallback locations (see [`CategoryMap::load`]).
    ///
    /// # Errors
    ///
    /// Returns `OrganizeError::Config` if the map is missing, unreadable or
    /// malformed. Nothing on disk is touched in that case.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use dirclean::organizer::DirectoryOrganizer;
    /// use dirclean::report::LogReporter;
    ///
    /// let organizer = DirectoryOrganizer::new("/home/user/Downloads", None)?;
    /// let summary = organizer.organize(&mut LogReporter)?;
    /// println!("Moved {} files", summary.moved.len());
    /// # Ok::<(), dirclean::OrganizeError>(())
    /// ```
    pub fn new(directory: impl Into<PathBuf>, map_path: Option<&Path>) -> OrganizeResult<Self> {
        let categories = CategoryMap::load(map_path)?;
        Ok(Self::with_categories(directory, categories))
    }

    /// Creates an organizer over an already-built category map.
    pub fn with_categories(directory: impl Into<PathBuf>, categories: CategoryMap) -> Self {
        Self {
            directory: directory.into(),
            categories,
            options: OrganizeOptions::default(),
        }
    }

    /// Replaces the run options.
    pub fn with_options(mut self, options: OrganizeOptions) -> Self {
        self.options = options;
        self
    }

    /// Lazily lists the immediate entries of the target directory.
    ///
    /// # Errors
    ///
    /// Returns `OrganizeError::InvalidDirectory` if the target is missing or not a
    /// directory, and `OrganizeError::ReadDir` if it cannot be listed.
    pub fn entries(&self) -> OrganizeResult<EntryIter> {
        let metadata =
            fs::metadata(&self.directory).map_err(|source| OrganizeError::InvalidDirectory {
                path: self.directory.clone(),
                source,
            })?;
        if !metadata.is_dir() {
            return Err(OrganizeError::InvalidDirectory {
                path: self.directory.clone(),
                source: io::Error::other("not a directory"),
            });
        }

        entry::scan_entries(&self.directory).map_err(|source| self.read_dir_error(source))
    }

    /// Classifies every entry without creating folders or moving files.
    pub fn plan(&self) -> OrganizeResult<Plan> {
        let mut plan = Plan::default();
        for entry in self.snapshot()? {
            match entry.skip_reason() {
                Some(reason) => plan.skipped.push((entry.name, reason)),
                None => plan.moves.push(self.planned_move(entry)),
            }
        }
        Ok(plan)
    }

    /// Organizes the directory.
    ///
    /// Each file that is neither a directory nor hidden is moved to
    /// `<directory>/<category>/<name>`. The category folder is created if
    /// missing. Every move and every processed entry is reported to `reporter`.
    ///
    /// # Errors
    ///
    /// Listing errors always abort. A failed folder creation or move aborts
    /// under [`FailurePolicy::Abort`] and is recorded in the summary under
    /// [`FailurePolicy::Continue`]. Aborting leaves already-moved files where
    /// they are.
    pub fn organize(&self, reporter: &mut dyn Reporter) -> OrganizeResult<OrganizeSummary> {
        let entries = self.snapshot()?;
        let mut summary = OrganizeSummary {
            dry_run: self.options.dry_run,
            ..OrganizeSummary::default()
        };

        let result = self.process(entries, reporter, &mut summary);
        reporter.finish();
        result.map(|()| summary)
    }

    fn process(
        &self,
        entries: Vec<FileEntry>,
        reporter: &mut dyn Reporter,
        summary: &mut OrganizeSummary,
    ) -> OrganizeResult<()> {
        let total = entries.len();

        for (index, entry) in entries.into_iter().enumerate() {
            if let Some(reason) = entry.skip_reason() {
                reporter.report_skipped(&entry.name, reason);
                summary.skipped.push((entry.name, reason));
            } else if self.options.dry_run {
                summary.moved.push(self.planned_move(entry));
            } else {
                let category = self.categories.lookup(entry.extension_key());
                match self.move_entry(&entry, category) {
                    Ok(moved) => {
                        reporter.report_moved(&moved.name, &moved.category);
                        summary.moved.push(moved);
                    }
                    Err(e) => match self.options.on_error {
                        FailurePolicy::Abort => return Err(e),
                        FailurePolicy::Continue => {
                            warn!("Could not organize {}: {}", entry.name, e);
                            summary.failed.push((entry.path, e.to_string()));
                        }
                    },
                }
            }

            reporter.report_progress(index + 1, total);
        }

        Ok(())
    }

    /// Reads the whole listing up front so the entry count is known.
    fn snapshot(&self) -> OrganizeResult<Vec<FileEntry>> {
        self.entries()?
            .collect::<io::Result<Vec<_>>>()
            .map_err(|source| self.read_dir_error(source))
    }

    fn planned_move(&self, entry: FileEntry) -> MovedFile {
        let category = self.categories.lookup(entry.extension_key()).to_string();
        let to = self.directory.join(&category).join(&entry.name);
        MovedFile {
            name: entry.name,
            category,
            from: entry.path,
            to,
        }
    }

    /// Creates the category folder if it is absent and returns its path.
    fn ensure_category_dir(&self, category: &str) -> OrganizeResult<PathBuf> {
        let category_path = self.directory.join(category);
        fs::create_dir_all(&category_path).map_err(|source| OrganizeError::CreateDir {
            path: category_path.clone(),
            source,
        })?;
        Ok(category_path)
    }

    /// Moves one file into its category folder, refusing to replace anything
    /// already at the destination.
    fn move_entry(&self, entry: &FileEntry, category: &str) -> OrganizeResult<MovedFile> {
        let category_path = self.ensure_category_dir(category)?;

        let file_name = entry
            .path
            .file_name()
            .ok_or_else(|| OrganizeError::Move {
                from: entry.path.clone(),
                to: category_path.clone(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "file has no name component"),
            })?;
        let destination = category_path.join(file_name);

        if fs::symlink_metadata(&destination).is_ok() {
            return Err(OrganizeError::DestinationExists(destination));
        }

        move_file(&entry.path, &destination).map_err(|source| OrganizeError::Move {
            from: entry.path.clone(),
            to: destination.clone(),
            source,
        })?;

        Ok(MovedFile {
            name: entry.name.clone(),
            category: category.to_string(),
            from: entry.path.clone(),
            to: destination,
        })
    }

    fn read_dir_error(&self, source: io::Error) -> OrganizeError {
        OrganizeError::ReadDir {
            path: self.directory.clone(),
            source,
        }
    }
}

/// Renames `from` to `to`, copying and deleting when they sit on different devices.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(from, to)?;
            fs::remove_file(from)
        }
        other => other,
    }
}
