//! Layered option composition
//!
//! A project's final options are assembled from three tiers:
//!
//! - **fixed**: owned by the platform, a project may never override them.
//! - **default**: owned by the platform, a project may override them.
//! - **supplied**: the options a project passes in.
//!
//! Precedence is `supplied > default > fixed`. Supplying a fixed key is a hard
//! error, checked by [`validate`] before any merging so an override cannot
//! slip through precedence.
//!
//! Option values are arbitrary JSON so any framework option can be carried
//! through untouched. The tier maps are only ever borrowed; the same fixed and
//! default tiers are reused across many project instantiations.

use std::collections::HashSet;

use serde_json::Value as JsonValue;

use crate::error::{Error, Result};

/// One tier of options: option name to JSON value.
pub type OptionMap = serde_json::Map<String, JsonValue>;

/// Fail with [`Error::InvalidOption`] for the first fixed key, in declaration
/// order, that also appears among the supplied keys.
pub fn validate<I, K>(supplied_keys: I, fixed_keys: &[&str]) -> Result<()>
where
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
{
    let supplied: HashSet<String> = supplied_keys
        .into_iter()
        .map(|key| key.as_ref().to_string())
        .collect();

    for key in fixed_keys {
        if supplied.contains(*key) {
            return Err(Error::InvalidOption {
                key: key.to_string(),
            });
        }
    }

    Ok(())
}

/// Shallow merge: each key takes the value of the highest tier defining it.
pub fn compose(fixed: &OptionMap, default: &OptionMap, supplied: &OptionMap) -> OptionMap {
    let mut merged = fixed.clone();
    for tier in [default, supplied] {
        for (key, value) in tier {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// Deep merge with the same precedence as [`compose`].
///
/// Nested objects are merged key by key and arrays are concatenated, lower
/// tier first. Scalars, and values whose types differ, are replaced by the
/// higher tier.
pub fn compose_deep(fixed: &OptionMap, default: &OptionMap, supplied: &OptionMap) -> OptionMap {
    let mut merged = fixed.clone();
    merge_into(&mut merged, default);
    merge_into(&mut merged, supplied);
    merged
}

fn merge_into(target: &mut OptionMap, source: &OptionMap) {
    for (key, value) in source {
        if let (Some(JsonValue::Object(existing)), JsonValue::Object(incoming)) =
            (target.get_mut(key), value)
        {
            merge_into(existing, incoming);
            continue;
        }
        if let (Some(JsonValue::Array(existing)), JsonValue::Array(incoming)) =
            (target.get_mut(key), value)
        {
            existing.extend(incoming.iter().cloned());
            continue;
        }
        target.insert(key.clone(), value.clone());
    }
}

/// The platform-owned tiers of one project type.
#[derive(Debug, Clone)]
pub struct Layers {
    fixed_keys: &'static [&'static str],
    fixed: OptionMap,
    default: OptionMap,
}

impl Layers {
    pub fn new(fixed_keys: &'static [&'static str], fixed: OptionMap, default: OptionMap) -> Self {
        Self {
            fixed_keys,
            fixed,
            default,
        }
    }

    pub fn fixed(&self) -> &OptionMap {
        &self.fixed
    }

    pub fn default_tier(&self) -> &OptionMap {
        &self.default
    }

    /// Validate `supplied` against the fixed keys, then deep-merge all tiers.
    pub fn resolve(&self, supplied: &OptionMap) -> Result<OptionMap> {
        validate(supplied.keys(), self.fixed_keys)?;
        Ok(compose_deep(&self.fixed, &self.default, supplied))
    }
}
