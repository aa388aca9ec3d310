use crate::error::{FlatCatError, Result};
use crate::scanner::file_filter::FileFilter;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// A file selected for concatenation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    /// Path relative to the traversal root, rendered as a string. Output order is defined on this.
    pub relative_path: String,
    pub source_path: PathBuf,
}

impl MatchRecord {
    pub fn new(relative_path: String, source_path: PathBuf) -> Self {
        Self {
            relative_path,
            source_path,
        }
    }

    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.relative_path)
            .extension()
            .and_then(|ext| ext.to_str())
    }
}

pub struct TreeScanner {
    filter: FileFilter,
}

impl TreeScanner {
    pub fn new(filter: FileFilter) -> Self {
        Self { filter }
    }

    /// Walks `root`, pruning excluded directories before descent, and returns
    /// the selected files sorted by their relative-path string.
    pub fn scan_directory<P: AsRef<Path>>(&self, root: P) -> Result<Vec<MatchRecord>> {
        let root_path = root.as_ref();

        if !root_path.is_dir() {
            return Err(FlatCatError::InvalidRoot {
                path: root_path.display().to_string(),
            });
        }

        let mut matches = Vec::new();

        let walker = WalkDir::new(root_path)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| self.should_traverse(e));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Skipping unreadable entry: {}", err);
                    continue;
                }
            };

            if !is_regular_file(&entry) {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy();
            if !self.filter.is_selected_file(&file_name) {
                continue;
            }

            let relative_path = relative_path_string(entry.path(), root_path)?;
            debug!("Matched {}", relative_path);
            matches.push(MatchRecord::new(relative_path, entry.path().to_path_buf()));
        }

        // String order, not component order: "a.txt" < "a/file.txt" < "b.txt".
        matches.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        Ok(matches)
    }

    fn should_traverse(&self, entry: &DirEntry) -> bool {
        // The root itself is never pruned.
        if entry.depth() == 0 || !entry.file_type().is_dir() {
            return true;
        }

        let dir_name = entry.file_name().to_string_lossy();
        let keep = self.filter.should_traverse_directory(&dir_name);
        if !keep {
            debug!("Pruned directory {}", entry.path().display());
        }
        keep
    }

    pub fn get_statistics(&self, matches: &[MatchRecord]) -> ScanStatistics {
        let mut files_by_extension = BTreeMap::new();
        for record in matches {
            let ext = record.extension().unwrap_or("no_extension").to_string();
            *files_by_extension.entry(ext).or_insert(0) += 1;
        }

        ScanStatistics {
            total_files: matches.len(),
            files_by_extension,
        }
    }
}

/// Symlinks are never descended into. Any symlink not pointing at a directory
/// counts as a file, dangling ones included; reading them fails later, inline.
fn is_regular_file(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && !entry.path().is_dir())
}

fn relative_path_string(file_path: &Path, root_path: &Path) -> Result<String> {
    let relative = file_path
        .strip_prefix(root_path)
        .map_err(|_| {
            FlatCatError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                format!(
                    "{} is not under {}",
                    file_path.display(),
                    root_path.display()
                ),
            ))
        })?;

    Ok(relative.to_string_lossy().into_owned())
}

#[derive(Debug, Default)]
pub struct ScanStatistics {
    pub total_files: usize,
    pub files_by_extension: BTreeMap<String, usize>,
}

impl ScanStatistics {
    pub fn display_summary(&self) -> String {
        let mut summary = format!("Scan Results:\n  Matched files: {}\n", self.total_files);

        if !self.files_by_extension.is_empty() {
            summary.push_str("  Files by type:\n");
            let mut extensions: Vec<_> = self.files_by_extension.iter().collect();
            extensions.sort_by(|a, b| b.1.cmp(a.1));

            for (ext, count) in extensions {
                summary.push_str(&format!("    {}: {} files\n", ext, count));
            }
        }

        summary
    }
}
