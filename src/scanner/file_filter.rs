use crate::config::{normalize_extensions, ConcatOptions, Exclusions};

/// Name-based selection rules. All tests are literal substring or suffix
/// checks against a single path component, and are case-sensitive.
#[derive(Debug, Clone)]
pub struct FileFilter {
    extensions: Vec<String>,
    exclude_dirs: Vec<String>,
    exclude_files: Vec<String>,
    exclude_extensions: Vec<String>,
}

impl FileFilter {
    pub fn new<S: AsRef<str>>(extensions: &[S], exclusions: &Exclusions) -> Self {
        Self {
            extensions: normalize_extensions(extensions),
            exclude_dirs: exclusions.dirs.clone(),
            exclude_files: exclusions.files.clone(),
            exclude_extensions: normalize_extensions(&exclusions.extensions),
        }
    }

    pub fn from_options(options: &ConcatOptions) -> Self {
        Self::new(&options.extensions, &options.exclusions)
    }

    /// A directory is pruned when its name contains any excluded substring.
    pub fn should_traverse_directory(&self, dir_name: &str) -> bool {
        !self
            .exclude_dirs
            .iter()
            .any(|pattern| dir_name.contains(pattern.as_str()))
    }

    pub fn is_selected_file(&self, file_name: &str) -> bool {
        self.has_included_extension(file_name)
            && !self.is_excluded_name(file_name)
            && !self.has_excluded_extension(file_name)
    }

    pub fn has_included_extension(&self, file_name: &str) -> bool {
        self.extensions
            .iter()
            .any(|ext| file_name.ends_with(ext.as_str()))
    }

    pub fn is_excluded_name(&self, file_name: &str) -> bool {
        self.exclude_files
            .iter()
            .any(|pattern| file_name.contains(pattern.as_str()))
    }

    pub fn has_excluded_extension(&self, file_name: &str) -> bool {
        self.exclude_extensions
            .iter()
            .any(|ext| file_name.ends_with(ext.as_str()))
    }

    pub fn get_extensions(&self) -> &[String] {
        &self.extensions
    }
}
