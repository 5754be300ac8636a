//! Publishing targets for multi-language (jsii) projects.
//!
//! All targets are derived from the repository name, so every language
//! binding of a package follows the same naming scheme.

use serde::{Deserialize, Serialize};

use crate::naming::{repository_name, NAME_PREFIX};

/// GitHub account that pushes Go modules.
pub const AUTOMATION_USER: &str = "cdk8s-automation";
pub const AUTOMATION_EMAIL: &str = "cdk8s-team@amazon.com";
pub const GITHUB_ORG: &str = "cdk8s-team";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PythonTarget {
    pub dist_name: String,
    pub module: String,
    pub trusted_publishing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JavaTarget {
    pub maven_artifact_id: String,
    pub maven_group_id: String,
    pub java_package: String,
    pub maven_server_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DotNetTarget {
    pub dot_net_namespace: String,
    pub package_id: String,
    pub trusted_publishing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoTarget {
    pub git_user_name: String,
    pub git_user_email: String,
    pub git_branch: String,
    pub module_name: String,
}

/// The part of a repository name after the family prefix, if any.
fn artifact_suffix(repo_name: &str) -> &str {
    repo_name.get(NAME_PREFIX.len()..).unwrap_or("")
}

/// `kube-prometheus` -> `KubePrometheus`
fn to_pascal_case(s: &str) -> String {
    s.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

fn qualified(base: &str, suffix: &str) -> String {
    if suffix.is_empty() {
        base.to_string()
    } else {
        format!("{}.{}", base, suffix)
    }
}

pub fn python_target(project_name: &str) -> PythonTarget {
    let repo = repository_name(project_name);
    PythonTarget {
        module: repo.replace('-', "_"),
        dist_name: repo,
        trusted_publishing: true,
    }
}

pub fn java_target(project_name: &str) -> JavaTarget {
    let repo = repository_name(project_name);
    let package = artifact_suffix(&repo).replace('-', "");
    JavaTarget {
        java_package: qualified("org.cdk8s", &package),
        maven_artifact_id: repo,
        maven_group_id: "org.cdk8s".to_string(),
        // the Maven compatibility endpoint
        maven_server_id: "central-ossrh".to_string(),
    }
}

pub fn dotnet_target(project_name: &str) -> DotNetTarget {
    let repo = repository_name(project_name);
    let namespace = qualified("Org.Cdk8s", &to_pascal_case(artifact_suffix(&repo)));
    DotNetTarget {
        dot_net_namespace: namespace.clone(),
        package_id: namespace,
        trusted_publishing: true,
    }
}

pub fn golang_target(repo_name: &str, branch: &str) -> GoTarget {
    GoTarget {
        git_user_name: AUTOMATION_USER.to_string(),
        git_user_email: AUTOMATION_EMAIL.to_string(),
        git_branch: branch.to_string(),
        module_name: format!("github.com/{}/{}-go", GITHUB_ORG, repo_name),
    }
}
