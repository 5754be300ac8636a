//! The built-in package dependency table.
//!
//! This is hand-maintained configuration data: every package of the family
//! mapped to the family packages it depends on. It is a `const` and is only
//! materialized into a [`DependencyGraph`] on demand.

use crate::scheduler::DependencyGraph;

/// Name of the package that hosts this shared configuration.
pub const SHARED_CONFIG_PACKAGE: &str = "@cdk8s/projen-common";

/// Known family packages and their in-family dependencies.
///
/// TODO: derive this from the published package manifests instead of keeping
/// it by hand.
pub const PACKAGE_DEPENDENCIES: &[(&str, &[&str])] = &[
    ("cdk8s", &[]),
    // cdk8s-plus-22 is left out to prevent a cycle
    ("cdk8s-cli", &["cdk8s"]),
    ("cdk8s-plus-17", &["cdk8s", "cdk8s-cli"]),
    ("cdk8s-plus-20", &["cdk8s", "cdk8s-cli"]),
    ("cdk8s-plus-21", &["cdk8s", "cdk8s-cli"]),
    ("cdk8s-plus-22", &["cdk8s", "cdk8s-cli"]),
    ("cdk8s-grafana", &["cdk8s"]),
    ("cdk8s-image", &["cdk8s"]),
    ("cdk8s-kube-prometheus", &["cdk8s", "cdk8s-cli", "cdk8s-plus-22"]),
    ("cdk8s-operator", &["cdk8s"]),
    ("cdk8s-redis", &["cdk8s"]),
];

/// Build a [`DependencyGraph`] from a static table.
pub fn graph_from_table(table: &[(&str, &[&str])]) -> DependencyGraph {
    table
        .iter()
        .map(|(name, deps)| {
            (
                name.to_string(),
                deps.iter().map(|dep| dep.to_string()).collect(),
            )
        })
        .collect()
}

/// The built-in family table as a [`DependencyGraph`].
pub fn builtin_graph() -> DependencyGraph {
    graph_from_table(PACKAGE_DEPENDENCIES)
}
