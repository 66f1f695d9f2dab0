//! Services built on top of the parser

pub mod export;

pub use export::{export_report, ExportFormat};
