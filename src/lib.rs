//! Puppet Summary Library
//!
//! Turns the YAML report a Puppet/OpenVox agent submits after each run into a
//! validated, strongly-typed [`Report`]. Storage, serving and rendering of
//! reports are left to the caller; this crate only answers "is this a
//! trustworthy report, and what does it say?".
//!
//! ```no_run
//! let bytes = std::fs::read("last_run_report.yaml").unwrap();
//! match puppet_summary::parse_report(&bytes) {
//!     Ok(report) => println!("{} {} {}", report.host, report.state, report.content_hash),
//!     Err(e) => eprintln!("rejected: {}", e),
//! }
//! ```

pub mod config;
pub mod models;
pub mod parser;
pub mod services;
pub mod utils;

pub use config::AppConfig;
pub use models::{Report, ReportStatus, Resource};
pub use parser::{content_hash, parse_report, ReportParser};
pub use utils::error::{ErrorResponse, ReportError, ReportResult};
