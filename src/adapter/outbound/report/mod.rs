//! Report persistence adapters.

pub mod composite;
pub mod file;

pub use composite::CompositeReportStore;
pub use file::FileReportStore;
