//! Dependency upgrade automation shared by every project.
//!
//! Each project gets separate upgrade tasks for its runtime, dev, compiler
//! and configuration dependencies. The tasks run at fixed hours far enough
//! apart that their pull requests don't conflict with one another.

use serde::{Deserialize, Serialize};

use crate::dependencies::SHARED_CONFIG_PACKAGE;
use crate::scheduler::CronSchedule;

pub const UPGRADE_RUNTIME_DEPENDENCIES_HOUR: usize = 6;
pub const UPGRADE_DEV_DEPENDENCIES_HOUR: usize = 9;
pub const UPGRADE_COMPILER_DEPENDENCIES_HOUR: usize = 12;
pub const UPGRADE_CONFIGURATION_HOUR: usize = 15;

/// Label that lets the automation account approve a pull request.
pub const AUTO_APPROVE_LABEL: &str = "auto-approve";

/// Dependency categories an upgrade task can cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    Runtime,
    Optional,
    Bundled,
    Build,
    Devenv,
    Test,
    Peer,
}

/// One scheduled dependency upgrade task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeTask {
    pub task_name: String,
    pub pull_request_title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
    pub types: Vec<DependencyType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branches: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
    pub schedule: CronSchedule,
}

/// Packages that only configure the project itself.
pub fn configuration_dependencies(project_name: &str) -> Vec<String> {
    let mut deps = vec!["projen".to_string()];
    if project_name != SHARED_CONFIG_PACKAGE {
        deps.push(SHARED_CONFIG_PACKAGE.to_string());
    }
    deps
}

/// The upgrade task for runtime dependencies.
///
/// Peer dependencies are deliberately not upgraded: bumping them would force
/// consumers to upgrade as well.
pub fn runtime_upgrade_task() -> UpgradeTask {
    UpgradeTask {
        task_name: "upgrade-runtime-dependencies".to_string(),
        pull_request_title: "upgrade runtime dependencies".to_string(),
        include: Vec::new(),
        exclude: Vec::new(),
        types: vec![
            DependencyType::Runtime,
            DependencyType::Optional,
            DependencyType::Bundled,
        ],
        branches: None,
        labels: Vec::new(),
        schedule: CronSchedule::daily_at(UPGRADE_RUNTIME_DEPENDENCIES_HOUR),
    }
}

/// Upgrade tasks added to every project next to the runtime upgrade.
///
/// The compiler task only exists when there are compiler dependencies.
pub fn upgrade_tasks(
    project_name: &str,
    compiler_deps: &[String],
    branches: Option<&[String]>,
) -> Vec<UpgradeTask> {
    let config_deps = configuration_dependencies(project_name);
    let branches = branches.map(|b| b.to_vec());
    let labels = vec![AUTO_APPROVE_LABEL.to_string()];

    let mut tasks = vec![
        UpgradeTask {
            task_name: "upgrade-configuration".to_string(),
            pull_request_title: "upgrade configuration".to_string(),
            include: config_deps.clone(),
            exclude: Vec::new(),
            types: vec![DependencyType::Build],
            branches: branches.clone(),
            labels: labels.clone(),
            schedule: CronSchedule::daily_at(UPGRADE_CONFIGURATION_HOUR),
        },
        UpgradeTask {
            task_name: "upgrade-dev-dependencies".to_string(),
            pull_request_title: "upgrade dev dependencies".to_string(),
            include: Vec::new(),
            exclude: config_deps
                .iter()
                .chain(compiler_deps.iter())
                .cloned()
                .collect(),
            types: vec![
                DependencyType::Build,
                DependencyType::Bundled,
                DependencyType::Devenv,
                DependencyType::Test,
            ],
            branches: branches.clone(),
            labels: labels.clone(),
            schedule: CronSchedule::daily_at(UPGRADE_DEV_DEPENDENCIES_HOUR),
        },
    ];

    if !compiler_deps.is_empty() {
        tasks.push(UpgradeTask {
            task_name: "upgrade-compiler-dependencies".to_string(),
            pull_request_title: "upgrade compiler dependencies".to_string(),
            include: compiler_deps.to_vec(),
            exclude: Vec::new(),
            types: vec![DependencyType::Build],
            branches,
            labels,
            schedule: CronSchedule::daily_at(UPGRADE_COMPILER_DEPENDENCIES_HOUR),
        });
    }

    tasks
}
