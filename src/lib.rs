//! # Shared Project Configuration
//!
//! This library centralizes the defaults, naming conventions and automation
//! policy shared by a family of sibling packages. A scaffolding framework
//! consumes the option objects it produces to generate each repository's
//! workflows and policy files; generating those files is the framework's
//! job, not this crate's.
//!
//! ## Quick Example
//!
//! ```
//! use projen_common::dependencies::builtin_graph;
//! use projen_common::project::{Preset, ProjectKind, ProjectOptions};
//! use projen_common::scheduler::{compute_ranks, schedule_for};
//!
//! // Stagger upgrade schedules along the dependency graph
//! let ranks = compute_ranks(&builtin_graph()).unwrap();
//! assert_eq!(schedule_for(&ranks, "cdk8s-plus-22").to_string(), "0 2 * * *");
//! assert_eq!(schedule_for(&ranks, "unknown").to_string(), "0 0 * * *");
//!
//! // Resolve a project's options through the preset tiers
//! let resolved = Preset::new(ProjectKind::TypeScript)
//!     .resolve(&ProjectOptions::named("cdk8s-sample"))
//!     .unwrap();
//! assert_eq!(resolved.options["authorName"], "Amazon Web Services");
//! ```
//!
//! ## Core Concepts
//!
//! - **Scheduling (`scheduler`, `dependencies`)**: Ranks packages by
//!   dependency depth and turns ranks into daily cron schedules, so a
//!   package's upgrade automation never runs before that of its
//!   dependencies.
//! - **Option Layering (`options`)**: Merges fixed, default and supplied
//!   option tiers with explicit precedence, rejecting overrides of fixed
//!   options.
//! - **Naming (`naming`)**: Validates project names and derives repository
//!   names.
//! - **Presets (`project`, `upgrades`)**: Node, TypeScript and jsii project
//!   types built from the pieces above.
//! - **Configuration (`config`)**: Loads a whole package family from a YAML
//!   workspace document.

pub mod config;
pub mod dependencies;
pub mod error;
pub mod naming;
pub mod options;
pub mod project;
pub mod scheduler;
pub mod upgrades;

#[cfg(test)]
mod scheduler_proptest;
