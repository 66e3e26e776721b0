//! Report structures and rendering

pub mod formatter;
pub mod report;

pub use formatter::{save_report_to_file, OutputFormatter, ReportGenerator};
pub use report::ScreeningReport;
