//! # Project-Type Presets
//!
//! A preset turns the handful of options a family project supplies into the
//! complete option object handed to the scaffolding framework, together with
//! the automation that every project shares.
//!
//! ## Resolution Steps
//!
//! 1.  **Validation**: supplied options must not name a fixed key, and the
//!     project name must follow the family naming rules.
//! 2.  **Layering**: the fixed and default tiers are built for the project
//!     and deep-merged with the supplied tier.
//! 3.  **Automation**: compiler dependencies, upgrade tasks and the optional
//!     backport configuration are derived from the merged options.
//!
//! Three project types exist: plain node packages, TypeScript packages and
//! multi-language (jsii) packages, each building on the previous one.

pub mod node;
pub mod targets;

use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use crate::error::{Error, Result};
use crate::naming::{repository_name, validate_project_name};
use crate::options::{Layers, OptionMap};
use crate::upgrades::{upgrade_tasks, UpgradeTask};

/// Pinned because newer releases broke the crypto and events type definitions.
pub const TYPES_NODE_PIN: &str = "@types/node@16.18.78";

/// Keeps downlevel-dts off `typescript@next`, which causes daily identical
/// releases.
pub const DOWNLEVEL_DTS_RESOLUTION: &str = "**/downlevel-dts/**/typescript@~5.2.2";

pub const JSII_COMPILER_DEPENDENCIES: &[&str] =
    &["jsii", "jsii-docgen", "jsii-pacmak", "jsii-rosetta", "typescript"];

/// The kind of project a preset produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKind {
    Node,
    TypeScript,
    Jsii,
}

impl ProjectKind {
    pub const ALL: [ProjectKind; 3] = [
        ProjectKind::Node,
        ProjectKind::TypeScript,
        ProjectKind::Jsii,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectKind::Node => "node",
            ProjectKind::TypeScript => "typescript",
            ProjectKind::Jsii => "jsii",
        }
    }
}

impl fmt::Display for ProjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        ProjectKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| Error::ConfigParse {
                message: format!("Unknown project kind '{}'", s),
                hint: Some("Use one of: node, typescript, jsii".to_string()),
            })
    }
}

/// Options a family project supplies.
///
/// The typed fields are understood by the presets themselves; everything
/// else lands in `extra` and is passed to the framework as the supplied tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectOptions {
    pub name: String,

    /// Repository inside the organization. Defaults to the package name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release: Option<bool>,

    #[serde(default)]
    pub backport: bool,

    /// Branches to backport to. Derived from PR labels when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backport_branches: Option<Vec<String>>,

    /// Packages that compile the project apart from the TypeScript or jsii
    /// compiler.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_compiler_dependencies: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_options: Option<OptionMap>,

    // jsii publishing, all enabled by default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub golang: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub golang_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pypi: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maven: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nuget: Option<bool>,

    #[serde(flatten)]
    pub extra: OptionMap,
}

impl ProjectOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_release(mut self, release: bool) -> Self {
        self.release = Some(release);
        self
    }

    /// Add an arbitrary framework option to the supplied tier.
    pub fn with_option(mut self, key: impl Into<String>, value: JsonValue) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn repo_name(&self) -> String {
        self.repo_name
            .clone()
            .unwrap_or_else(|| repository_name(&self.name))
    }

    /// The options this project passes through to the framework.
    pub fn supplied_tier(&self) -> OptionMap {
        let mut supplied = self.extra.clone();
        supplied.insert("name".into(), json!(self.name));
        if let Some(release) = self.release {
            supplied.insert("release".into(), JsonValue::Bool(release));
        }
        if let Some(github) = &self.github_options {
            supplied.insert("githubOptions".into(), JsonValue::Object(github.clone()));
        }
        supplied
    }
}

/// Backport workflow settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backport {
    /// Empty means branches are taken from PR labels.
    pub branches: Vec<String>,
}

/// Everything a preset decided for one project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedProject {
    pub kind: ProjectKind,
    pub name: String,
    pub repo_name: String,
    pub options: OptionMap,
    pub compiler_dependencies: Vec<String>,
    pub upgrade_tasks: Vec<UpgradeTask>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backport: Option<Backport>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pinned_build_dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub package_resolutions: Vec<String>,
}

impl ResolvedProject {
    /// Branches the upgrade workflows run against, if the project set any.
    pub fn upgrade_branches(&self) -> Result<Option<Vec<String>>> {
        upgrade_branches(&self.options)
    }
}

fn upgrade_branches(options: &OptionMap) -> Result<Option<Vec<String>>> {
    match options
        .get("depsUpgradeOptions")
        .and_then(|deps| deps.pointer("/workflowOptions/branches"))
    {
        Some(branches) => Ok(Some(serde_json::from_value(branches.clone())?)),
        None => Ok(None),
    }
}

/// A project-type preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    kind: ProjectKind,
}

impl Preset {
    pub fn new(kind: ProjectKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> ProjectKind {
        self.kind
    }

    /// The platform tiers for `options`.
    pub fn layers(&self, options: &ProjectOptions) -> Layers {
        let mut fixed = OptionMap::new();
        if self.kind == ProjectKind::Jsii {
            fixed.extend(jsii_options(options));
        }
        fixed.extend(node::fixed_options(options));

        let mut defaults = node::default_options(options);
        defaults.insert(
            "githubOptions".into(),
            JsonValue::Object(node::github_default_options(options)),
        );

        Layers::new(node::FIXED_OPTION_KEYS, fixed, defaults)
    }

    /// Resolve `options` into the full project configuration.
    pub fn resolve(&self, options: &ProjectOptions) -> Result<ResolvedProject> {
        debug!("Resolving {} project '{}'", self.kind, options.name);

        let supplied = options.supplied_tier();
        let merged = self.layers(options).resolve(&supplied)?;
        validate_project_name(&options.name)?;
        for key in overridden_defaults(&supplied) {
            debug!("{} overrides default option '{}'", options.name, key);
        }
        let repo_name = options.repo_name();

        let compiler_dependencies = self.compiler_dependencies(options);
        let branches = upgrade_branches(&merged)?;
        let upgrade_tasks = upgrade_tasks(
            &options.name,
            &compiler_dependencies,
            branches.as_deref(),
        );

        let backport = options.backport.then(|| Backport {
            branches: options.backport_branches.clone().unwrap_or_default(),
        });

        let (pinned_build_dependencies, package_resolutions) = match self.kind {
            ProjectKind::Node => (Vec::new(), Vec::new()),
            ProjectKind::TypeScript => (vec![TYPES_NODE_PIN.to_string()], Vec::new()),
            ProjectKind::Jsii => (
                vec![TYPES_NODE_PIN.to_string()],
                vec![DOWNLEVEL_DTS_RESOLUTION.to_string()],
            ),
        };

        Ok(ResolvedProject {
            kind: self.kind,
            name: options.name.clone(),
            repo_name,
            options: merged,
            compiler_dependencies,
            upgrade_tasks,
            backport,
            pinned_build_dependencies,
            package_resolutions,
        })
    }

    fn compiler_dependencies(&self, options: &ProjectOptions) -> Vec<String> {
        let builtin: &[&str] = match self.kind {
            ProjectKind::Node => return Vec::new(),
            ProjectKind::TypeScript => &["typescript"],
            ProjectKind::Jsii => JSII_COMPILER_DEPENDENCIES,
        };
        options
            .additional_compiler_dependencies
            .iter()
            .cloned()
            .chain(builtin.iter().map(|dep| dep.to_string()))
            .collect()
    }
}

/// Supplied keys that replace or extend a platform default.
fn overridden_defaults(supplied: &OptionMap) -> Vec<&str> {
    node::DEFAULT_OPTION_KEYS
        .iter()
        .copied()
        .filter(|key| supplied.contains_key(*key))
        .collect()
}

/// Author and publishing options of multi-language projects.
///
/// These are platform-chosen but not validated as fixed, so a project may
/// still override them explicitly.
fn jsii_options(options: &ProjectOptions) -> OptionMap {
    let repo_name = options.repo_name();
    let branch = options.golang_branch.as_deref().unwrap_or("main");

    let mut jsii = OptionMap::new();
    jsii.insert("author".into(), json!(node::AUTHOR_NAME));
    jsii.insert("repositoryUrl".into(), json!(node::repository_url(options)));
    jsii.insert("authorAddress".into(), json!("https://aws.amazon.com"));
    if options.pypi.unwrap_or(true) {
        jsii.insert("publishToPypi".into(), json!(targets::python_target(&options.name)));
    }
    if options.maven.unwrap_or(true) {
        jsii.insert("publishToMaven".into(), json!(targets::java_target(&options.name)));
    }
    if options.nuget.unwrap_or(true) {
        jsii.insert("publishToNuget".into(), json!(targets::dotnet_target(&options.name)));
    }
    if options.golang.unwrap_or(true) {
        jsii.insert(
            "publishToGo".into(),
            json!(targets::golang_target(&repo_name, branch)),
        );
    }
    jsii
}
