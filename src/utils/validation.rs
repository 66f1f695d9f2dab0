//! Input validation utilities
//!
//! Hostnames and environments end up in storage paths and lookups, so they
//! are checked against a whitelist rather than sanitized.

use once_cell::sync::Lazy;
use regex::Regex;

/// Regex for validating node hostnames
static HOST_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9._-]+$").unwrap());

/// Regex for validating environment names
static ENVIRONMENT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").unwrap());

/// Validate a node hostname
pub fn validate_host(host: &str) -> bool {
    HOST_REGEX.is_match(host)
}

/// Validate an environment name
pub fn validate_environment(environment: &str) -> bool {
    ENVIRONMENT_REGEX.is_match(environment)
}
