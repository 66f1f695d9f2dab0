//! Data models

mod report;

pub use report::*;
