//! # Workspace Configuration
//!
//! A workspace document describes the package family in one YAML file: an
//! optional dependency table used to stagger upgrade schedules, and the
//! projects to resolve.
//!
//! ```yaml
//! dependencies:
//!   cdk8s: []
//!   cdk8s-cli: [cdk8s]
//! projects:
//!   - kind: jsii
//!     name: cdk8s-cli
//!     release: true
//!     defaultReleaseBranch: main
//! ```
//!
//! Every project entry carries its kind plus the same keys as
//! [`ProjectOptions`]; unknown keys are passed through to the scaffolding
//! framework. When `dependencies` is absent the built-in family table is
//! used.
//!
//! Resolution is all-or-nothing: a dependency cycle or a single invalid
//! project aborts the whole workspace.

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::dependencies::builtin_graph;
use crate::error::{Error, Result};
use crate::project::{Preset, ProjectKind, ProjectOptions, ResolvedProject};
use crate::scheduler::{CronSchedule, DependencyGraph, UpgradeScheduler};

/// One project of a workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectEntry {
    pub kind: ProjectKind,
    pub options: ProjectOptions,
}

#[derive(Debug, Deserialize)]
struct RawProjectEntry {
    kind: String,
    #[serde(flatten)]
    options: ProjectOptions,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawWorkspace {
    #[serde(default)]
    dependencies: Option<DependencyGraph>,
    #[serde(default)]
    projects: Vec<RawProjectEntry>,
}

/// A parsed workspace document.
#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    pub dependencies: Option<DependencyGraph>,
    pub projects: Vec<ProjectEntry>,
}

/// A resolved project together with its staggered upgrade schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledProject {
    #[serde(flatten)]
    pub project: ResolvedProject,
    pub upgrade_schedule: CronSchedule,
}

/// Parse a workspace document from a YAML string.
pub fn parse(yaml: &str) -> Result<Workspace> {
    if yaml.trim().is_empty() {
        return Err(Error::ConfigParse {
            message: "Workspace document is empty".to_string(),
            hint: Some("Add a 'projects:' list describing at least one project".to_string()),
        });
    }

    let raw: RawWorkspace = serde_yaml::from_str(yaml)?;
    let projects = raw
        .projects
        .into_iter()
        .map(|entry| -> Result<ProjectEntry> {
            Ok(ProjectEntry {
                kind: entry.kind.parse()?,
                options: entry.options,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Workspace {
        dependencies: raw.dependencies,
        projects,
    })
}

/// Read and parse a workspace document from disk.
pub fn load(path: &Path) -> Result<Workspace> {
    debug!("Loading workspace from {}", path.display());
    let contents = std::fs::read_to_string(path)?;
    parse(&contents)
}

impl Workspace {
    /// The dependency graph for scheduling: the document's own table, or
    /// the built-in one.
    pub fn graph(&self) -> DependencyGraph {
        self.dependencies.clone().unwrap_or_else(builtin_graph)
    }

    /// Resolve every project and assign its upgrade schedule.
    pub fn resolve_all(&self) -> Result<Vec<ScheduledProject>> {
        let scheduler = UpgradeScheduler::new(&self.graph())?;

        self.projects
            .iter()
            .map(|entry| -> Result<ScheduledProject> {
                let project = Preset::new(entry.kind).resolve(&entry.options)?;
                let upgrade_schedule = scheduler.schedule_for(&project.name);
                debug!("{} upgrades at '{}'", project.name, upgrade_schedule);
                Ok(ScheduledProject {
                    project,
                    upgrade_schedule,
                })
            })
            .collect()
    }
}
