//! Project naming conventions.
//!
//! Every family project is either named with the unscoped [`NAME_PREFIX`] or
//! published under the [`SCOPE`]. Repository names are derived from project
//! names by replacing the scope with the prefix.

use crate::error::{Error, NameRule, Result};

/// Prefix required for unscoped project names.
pub const NAME_PREFIX: &str = "cdk8s-";

/// Scope required for scoped project names.
pub const SCOPE: &str = "@cdk8s/";

/// Names exempt from validation: monorepo roots and the core package.
pub const EXEMPT_NAMES: &[&str] = &["root", "cdk8s"];

/// Validate a project name against the family naming rules.
pub fn validate_project_name(name: &str) -> Result<()> {
    if EXEMPT_NAMES.contains(&name) {
        return Ok(());
    }

    let rule = if name.starts_with('@') {
        NameRule::Scope
    } else {
        NameRule::Prefix
    };
    let required = match rule {
        NameRule::Scope => SCOPE,
        NameRule::Prefix => NAME_PREFIX,
    };

    if name.starts_with(required) {
        Ok(())
    } else {
        Err(Error::InvalidProjectName {
            name: name.to_string(),
            rule,
        })
    }
}

/// Repository name for a project: `@cdk8s/foo` lives in `cdk8s-foo`.
pub fn repository_name(project_name: &str) -> String {
    match project_name.strip_prefix(SCOPE) {
        Some(rest) => format!("{}{}", NAME_PREFIX, rest),
        None => project_name.to_string(),
    }
}
