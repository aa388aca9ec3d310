pub mod report;
pub mod writer;

pub use report::{ConcatReport, ReadErrorInfo};
pub use writer::{Concatenator, ConcatProgress, ReadFailure, SEPARATOR};
