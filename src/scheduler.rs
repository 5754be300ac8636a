//! # Dependency-Ordered Upgrade Scheduling
//!
//! Many packages in the family depend on each other, and scheduled dependency
//! upgrade workflows often fail when a new upstream version appears in the
//! middle of a downstream upgrade run, or when a package reaches one registry
//! before another. To mitigate this, every package is assigned an upgrade
//! hour that comes after the hours of everything it depends on.
//!
//! ## Process
//!
//! 1.  **Leveling**: `compute_ranks` repeatedly collects the *frontier*, the
//!     set of unranked packages whose dependencies are all ranked, and gives
//!     the whole frontier the current rank. Rank 0 packages have no
//!     dependencies; rank N packages end a dependency chain of N edges.
//!
//! 2.  **Cycle Detection**: If a pass finds an empty frontier while packages
//!     remain, the graph has a cycle and ranking fails with
//!     `Error::CycleDetected`. No partial ranking is ever returned.
//!
//! 3.  **Scheduling**: `schedule_for` turns a rank into a daily cron
//!     expression running at `hour = rank`. Unknown packages run at hour 0.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::dependencies;
use crate::error::{Error, Result};

/// Number of distinct hour slots in a daily cron expression.
pub const HOURS_PER_DAY: usize = 24;

/// A static dependency graph: package name to the packages it depends on.
///
/// Dependencies that are not themselves keys of the graph are treated as
/// already satisfied.
pub type DependencyGraph = BTreeMap<String, Vec<String>>;

/// The rank assigned to every package of a [`DependencyGraph`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankAssignment {
    ranks: BTreeMap<String, usize>,
}

impl RankAssignment {
    /// Rank of `package`, if it was part of the ranked graph.
    pub fn get(&self, package: &str) -> Option<usize> {
        self.ranks.get(package).copied()
    }

    /// Iterate over `(package, rank)` pairs in package-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.ranks.iter().map(|(name, rank)| (name.as_str(), *rank))
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Highest rank in the assignment, `None` when empty.
    pub fn max_rank(&self) -> Option<usize> {
        self.ranks.values().copied().max()
    }

    /// Packages sharing `rank`, in name order.
    pub fn tier(&self, rank: usize) -> Vec<&str> {
        self.iter()
            .filter(|(_, r)| *r == rank)
            .map(|(name, _)| name)
            .collect()
    }
}

/// Assign a minimal rank to every package so that if package A depends on
/// package B, then `rank(B) < rank(A)`.
///
/// The input graph is not modified; leveling runs over a disposable copy.
pub fn compute_ranks(graph: &DependencyGraph) -> Result<RankAssignment> {
    let mut remaining: BTreeMap<&str, &[String]> = graph
        .iter()
        .map(|(name, deps)| (name.as_str(), deps.as_slice()))
        .collect();
    let mut ranks: BTreeMap<String, usize> = BTreeMap::new();
    let mut next_rank = 0;

    while !remaining.is_empty() {
        // A dependency blocks only while it is still waiting for a rank.
        let frontier: BTreeSet<&str> = remaining
            .iter()
            .filter(|(_, deps)| {
                deps.iter()
                    .all(|dep| !remaining.contains_key(dep.as_str()))
            })
            .map(|(name, _)| *name)
            .collect();

        if frontier.is_empty() {
            let stalled: Vec<&str> = remaining.keys().copied().collect();
            return Err(Error::CycleDetected {
                packages: stalled.join(", "),
            });
        }

        debug!("rank {}: {:?}", next_rank, frontier);
        for name in frontier {
            remaining.remove(name);
            ranks.insert(name.to_string(), next_rank);
        }
        next_rank += 1;
    }

    Ok(RankAssignment { ranks })
}

/// A daily cron expression (`minute hour * * *`).
///
/// Serializes as the expression string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct CronSchedule {
    minute: u8,
    hour: u8,
}

impl CronSchedule {
    /// Schedule used for packages that have no rank.
    pub const FALLBACK: CronSchedule = CronSchedule { minute: 0, hour: 0 };

    /// Run once per day at `hour:00`. Hours outside `0..24` wrap.
    pub fn daily_at(hour: usize) -> Self {
        CronSchedule {
            minute: 0,
            hour: (hour % HOURS_PER_DAY) as u8,
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// The 5-field cron expression.
    pub fn expression(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CronSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} * * *", self.minute, self.hour)
    }
}

impl From<CronSchedule> for String {
    fn from(schedule: CronSchedule) -> Self {
        schedule.to_string()
    }
}

impl FromStr for CronSchedule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::ConfigParse {
            message: format!("Invalid daily cron expression '{}'", s),
            hint: Some("Use the form '<minute> <hour> * * *'".to_string()),
        };

        let fields: Vec<&str> = s.split_whitespace().collect();
        let [minute, hour, "*", "*", "*"] = fields.as_slice() else {
            return Err(invalid());
        };
        let minute: u8 = minute.parse().map_err(|_| invalid())?;
        let hour: u8 = hour.parse().map_err(|_| invalid())?;
        if minute > 59 || usize::from(hour) >= HOURS_PER_DAY {
            return Err(invalid());
        }

        Ok(CronSchedule { minute, hour })
    }
}

impl TryFrom<String> for CronSchedule {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

/// Upgrade schedule for `package` given a precomputed ranking.
///
/// Total over all inputs: unranked packages get [`CronSchedule::FALLBACK`].
/// Ranks past the last hour of the day wrap around and are reported with a
/// warning, since the tier then shares its hour with an earlier one.
pub fn schedule_for(ranks: &RankAssignment, package: &str) -> CronSchedule {
    match ranks.get(package) {
        Some(rank) => {
            if rank >= HOURS_PER_DAY {
                warn!(
                    "Rank {} of package '{}' exceeds the daily hour range, wrapping to hour {}",
                    rank,
                    package,
                    rank % HOURS_PER_DAY
                );
            }
            CronSchedule::daily_at(rank)
        }
        None => CronSchedule::FALLBACK,
    }
}

/// Owns the ranking of one dependency graph and answers schedule lookups.
#[derive(Debug, Clone)]
pub struct UpgradeScheduler {
    ranks: RankAssignment,
}

impl UpgradeScheduler {
    /// Rank `graph` once. Fails if the graph has a cycle.
    pub fn new(graph: &DependencyGraph) -> Result<Self> {
        Ok(Self {
            ranks: compute_ranks(graph)?,
        })
    }

    /// Scheduler over the built-in package table.
    pub fn builtin() -> Result<Self> {
        Self::new(&dependencies::builtin_graph())
    }

    pub fn ranks(&self) -> &RankAssignment {
        &self.ranks
    }

    pub fn schedule_for(&self, package: &str) -> CronSchedule {
        schedule_for(&self.ranks, package)
    }
}

/// Upgrade schedule for `package` over the built-in package table.
pub fn upgrade_schedule_for(package: &str) -> Result<CronSchedule> {
    Ok(UpgradeScheduler::builtin()?.schedule_for(package))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(entries: &[(&str, &[&str])]) -> DependencyGraph {
        entries
            .iter()
            .map(|(name, deps)| {
                (
                    name.to_string(),
                    deps.iter().map(|d| d.to_string()).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_compute_ranks_chain() {
        let g = graph(&[("A", &[]), ("B", &["A"]), ("C", &["A", "B"]), ("D", &["C"])]);
        let ranks = compute_ranks(&g).unwrap();

        assert_eq!(ranks.get("A"), Some(0));
        assert_eq!(ranks.get("B"), Some(1));
        assert_eq!(ranks.get("C"), Some(2));
        assert_eq!(ranks.get("D"), Some(3));
        assert_eq!(ranks.len(), 4);
    }

    #[test]
    fn test_compute_ranks_independent_packages_share_rank() {
        let g = graph(&[("base", &[]), ("left", &["base"]), ("right", &["base"])]);
        let ranks = compute_ranks(&g).unwrap();

        assert_eq!(ranks.get("left"), Some(1));
        assert_eq!(ranks.get("right"), Some(1));
        assert_eq!(ranks.tier(1), vec!["left", "right"]);
    }

    #[test]
    fn test_compute_ranks_two_node_cycle() {
        let g = graph(&[("A", &["B"]), ("B", &["A"])]);
        let error = compute_ranks(&g).unwrap_err();

        match error {
            Error::CycleDetected { packages } => assert_eq!(packages, "A, B"),
            other => panic!("expected CycleDetected, got {:?}", other),
        }
    }

    #[test]
    fn test_compute_ranks_cycle_after_progress() {
        // "root" can be ranked, the rest cannot; no partial mapping may leak.
        let g = graph(&[
            ("root", &[]),
            ("x", &["root", "z"]),
            ("y", &["x"]),
            ("z", &["y"]),
        ]);
        let error = compute_ranks(&g).unwrap_err();

        match error {
            Error::CycleDetected { packages } => assert_eq!(packages, "x, y, z"),
            other => panic!("expected CycleDetected, got {:?}", other),
        }
    }

    #[test]
    fn test_compute_ranks_self_dependency_is_cycle() {
        let g = graph(&[("A", &["A"])]);
        assert!(matches!(
            compute_ranks(&g),
            Err(Error::CycleDetected { .. })
        ));
    }

    #[test]
    fn test_compute_ranks_unknown_dependency_is_satisfied() {
        let g = graph(&[("A", &["external"]), ("B", &["A", "other-external"])]);
        let ranks = compute_ranks(&g).unwrap();

        assert_eq!(ranks.get("A"), Some(0));
        assert_eq!(ranks.get("B"), Some(1));
        assert_eq!(ranks.get("external"), None);
    }

    #[test]
    fn test_compute_ranks_empty_graph() {
        let ranks = compute_ranks(&DependencyGraph::new()).unwrap();
        assert!(ranks.is_empty());
        assert_eq!(ranks.max_rank(), None);
    }

    #[test]
    fn test_compute_ranks_does_not_mutate_input() {
        let g = graph(&[("A", &[]), ("B", &["A"])]);
        let before = g.clone();
        compute_ranks(&g).unwrap();
        assert_eq!(g, before);
    }

    #[test]
    fn test_schedule_for_ranked_and_unknown() {
        let g = graph(&[("A", &[]), ("B", &["A"]), ("C", &["A", "B"]), ("D", &["C"])]);
        let ranks = compute_ranks(&g).unwrap();

        assert_eq!(schedule_for(&ranks, "C").to_string(), "0 2 * * *");
        assert_eq!(schedule_for(&ranks, "A").to_string(), "0 0 * * *");
        assert_eq!(schedule_for(&ranks, "unknown").to_string(), "0 0 * * *");
        assert_eq!(schedule_for(&ranks, ""), CronSchedule::FALLBACK);
    }

    #[test]
    fn test_schedule_for_wraps_deep_ranks_with_warning() {
        testing_logger::setup();

        let mut entries: Vec<(String, Vec<String>)> = vec![("p0".to_string(), vec![])];
        for i in 1..=25 {
            entries.push((format!("p{}", i), vec![format!("p{}", i - 1)]));
        }
        let g: DependencyGraph = entries.into_iter().collect();
        let ranks = compute_ranks(&g).unwrap();
        assert_eq!(ranks.get("p25"), Some(25));

        let schedule = schedule_for(&ranks, "p25");
        assert_eq!(schedule.expression(), "0 1 * * *");

        testing_logger::validate(|captured_logs| {
            let warnings: Vec<_> = captured_logs
                .iter()
                .filter(|log| log.level == log::Level::Warn)
                .collect();
            assert_eq!(warnings.len(), 1);
            assert!(warnings[0].body.contains("p25"));
            assert!(warnings[0].body.contains("wrapping to hour 1"));
        });
    }

    #[test]
    fn test_cron_schedule_accessors() {
        let schedule = CronSchedule::daily_at(7);
        assert_eq!(schedule.hour(), 7);
        assert_eq!(schedule.minute(), 0);
        assert_eq!(schedule.expression(), "0 7 * * *");
    }

    #[test]
    fn test_cron_schedule_parse() {
        let schedule: CronSchedule = "30 4 * * *".parse().unwrap();
        assert_eq!(schedule.minute(), 30);
        assert_eq!(schedule.hour(), 4);

        assert!("0 24 * * *".parse::<CronSchedule>().is_err());
        assert!("0 4 * * 1".parse::<CronSchedule>().is_err());
        assert!("daily".parse::<CronSchedule>().is_err());
    }

    #[test]
    fn test_cron_schedule_serializes_as_expression() {
        let value = serde_json::to_value(CronSchedule::daily_at(6)).unwrap();
        assert_eq!(value, serde_json::json!("0 6 * * *"));

        let back: CronSchedule = serde_json::from_value(value).unwrap();
        assert_eq!(back, CronSchedule::daily_at(6));
    }

    #[test]
    fn test_upgrade_scheduler_builtin() {
        let scheduler = UpgradeScheduler::builtin().unwrap();
        assert_eq!(scheduler.schedule_for("cdk8s").to_string(), "0 0 * * *");
        assert_eq!(
            scheduler.schedule_for("cdk8s-kube-prometheus").to_string(),
            "0 3 * * *"
        );
        assert_eq!(
            upgrade_schedule_for("cdk8s-plus-22").unwrap().to_string(),
            "0 2 * * *"
        );
    }
}
