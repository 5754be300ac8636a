//! # Error Handling
//!
//! This module defines the centralized error type for `projen-common`. It
//! uses the `thiserror` library to build a single `Error` enum covering every
//! way a configuration build can fail.
//!
//! ## Key Components
//!
//! - **`Error`**: The enum of all failure modes. Each variant carries the
//!   offending package, option key or project name so the operator can fix
//!   the calling configuration.
//!
//! - **`NameRule`**: Which naming rule a rejected project name violated.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! None of these errors is recoverable automatically. They surface
//! synchronously to the invoking build, which is expected to stop rather
//! than emit partial scaffolding.

use std::fmt;

use thiserror::Error;

use crate::naming::{NAME_PREFIX, SCOPE};

/// The naming rule a project name failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRule {
    /// Scoped names (`@...`) must use the family scope.
    Scope,
    /// Unscoped names must start with the family prefix.
    Prefix,
}

impl NameRule {
    /// The part of the name the rule constrains.
    fn subject(&self) -> &'static str {
        match self {
            NameRule::Scope => "scope",
            NameRule::Prefix => "name",
        }
    }
}

impl fmt::Display for NameRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameRule::Scope => write!(f, "Scope must be '{}'", SCOPE),
            NameRule::Prefix => write!(f, "Name must start with '{}'", NAME_PREFIX),
        }
    }
}

/// Main error type for projen-common operations
#[derive(Error, Debug)]
pub enum Error {
    /// Rank computation could not make progress because the dependency graph
    /// contains a cycle.
    ///
    /// `packages` lists every package left unranked when progress stalled.
    #[error("Cycle detected in package dependencies, unable to rank: {packages}")]
    CycleDetected { packages: String },

    /// A caller supplied an option that belongs to the fixed tier.
    #[error("Invalid option: {key}")]
    InvalidOption { key: String },

    /// A project name violated the family naming convention.
    #[error("Illegal project {}: {name}. {rule}", rule.subject())]
    InvalidProjectName { name: String, rule: NameRule },

    /// An error occurred while parsing a workspace configuration document.
    #[error("Configuration parsing error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON conversion error, wrapped from `serde_json::Error`.
    #[error("JSON conversion error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
