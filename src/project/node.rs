//! Option tiers shared by every node-based project type.

use serde_json::{json, Value as JsonValue};

use super::ProjectOptions;
use crate::options::OptionMap;
use crate::project::targets::{AUTOMATION_USER, GITHUB_ORG};
use crate::upgrades::runtime_upgrade_task;

/// Options no project may set itself.
pub const FIXED_OPTION_KEYS: &[&str] = &[
    "authorName",
    "authorEmail",
    "repository",
    "autoApproveOptions",
    "autoApproveUpgrades",
    "releasableCommits",
    "workflowNodeVersion",
    // deprecated in favor of 'release'
    "releaseWorkflow",
    "npmTrustedPublishing",
];

/// Options with platform defaults that a project may override.
pub const DEFAULT_OPTION_KEYS: &[&str] = &[
    "releaseToNpm",
    "release",
    "minNodeVersion",
    "depsUpgradeOptions",
    "workflowNodeVersion",
];

pub const AUTHOR_NAME: &str = "Amazon Web Services";

/// Node version the GitHub workflows run on.
pub const WORKFLOW_NODE_VERSION: &str = "18.12.0";

/// Minimum node version consumers must have.
pub const MIN_NODE_VERSION: &str = "16.20.0";

/// Git log command selecting the commits that warrant a release: features,
/// fixes, and runtime or compiler upgrades, which may change the published
/// artifact.
pub fn releasable_commits_command() -> String {
    let patterns = [
        "'^(feat|fix){1}(\\([^()[:space:]]+\\))?(!)?:[[:blank:]]+.+'",
        "'chore\\(deps\\): upgrade runtime dependencies'",
        "'chore\\(deps\\): upgrade compiler dependencies'",
    ];
    format!(
        "git log --no-merges --oneline $LATEST_TAG..HEAD -E --grep {}",
        patterns.join(" --grep ")
    )
}

pub fn repository_url(options: &ProjectOptions) -> String {
    format!("https://github.com/{}/{}.git", GITHUB_ORG, options.repo_name())
}

/// The fixed tier: identical for every node-based project.
pub fn fixed_options(options: &ProjectOptions) -> OptionMap {
    let mut fixed = OptionMap::new();
    fixed.insert("authorName".into(), json!(AUTHOR_NAME));
    fixed.insert("repository".into(), json!(repository_url(options)));
    fixed.insert(
        "autoApproveOptions".into(),
        json!({
            "allowedUsernames": [AUTOMATION_USER],
            "secret": "GITHUB_TOKEN",
        }),
    );
    fixed.insert("autoApproveUpgrades".into(), JsonValue::Bool(true));
    if let Some(release) = options.release {
        fixed.insert("releaseWorkflow".into(), JsonValue::Bool(release));
    }
    fixed.insert(
        "releasableCommits".into(),
        json!({ "cmd": releasable_commits_command() }),
    );
    fixed.insert("workflowNodeVersion".into(), json!(WORKFLOW_NODE_VERSION));
    fixed.insert("npmTrustedPublishing".into(), JsonValue::Bool(true));
    fixed
}

/// The default tier. Note `workflowNodeVersion` is also fixed: this tier's
/// value wins over the fixed one, while projects still cannot supply it.
pub fn default_options(options: &ProjectOptions) -> OptionMap {
    let runtime = runtime_upgrade_task();

    let mut defaults = OptionMap::new();
    // releasing implies releasing to npm
    if let Some(release) = options.release {
        defaults.insert("releaseToNpm".into(), JsonValue::Bool(release));
    }
    defaults.insert("minNodeVersion".into(), json!(MIN_NODE_VERSION));
    defaults.insert("workflowNodeVersion".into(), json!("lts/*"));
    defaults.insert(
        "depsUpgradeOptions".into(),
        json!({
            "taskName": runtime.task_name,
            "pullRequestTitle": runtime.pull_request_title,
            "types": runtime.types,
            "workflowOptions": {
                "schedule": runtime.schedule,
            },
        }),
    );
    defaults
}

/// GitHub defaults, honouring whatever the project already set.
pub fn github_default_options(options: &ProjectOptions) -> OptionMap {
    let supplied = options.github_options.as_ref();
    let flag = |key: &str, default: bool| {
        supplied
            .and_then(|github| github.get(key))
            .and_then(JsonValue::as_bool)
            .unwrap_or(default)
    };

    let mut github = OptionMap::new();
    github.insert("mergify".into(), JsonValue::Bool(flag("mergify", false)));
    github.insert("mergeQueue".into(), JsonValue::Bool(flag("mergeQueue", true)));
    github
}
