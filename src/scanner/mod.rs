pub mod file_filter;
pub mod tree_scanner;

pub use file_filter::FileFilter;
pub use tree_scanner::{MatchRecord, ScanStatistics, TreeScanner};
