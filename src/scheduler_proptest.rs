//! Property-based tests for rank computation and option layering.
//!
//! These tests use proptest to generate random dependency graphs and option
//! tiers and verify that invariants hold for all of them.

#[cfg(test)]
mod proptest_tests {
    use std::collections::BTreeMap;

    use proptest::prelude::*;
    use serde_json::json;

    use crate::error::Error;
    use crate::options::{compose, compose_deep, validate, OptionMap};
    use crate::scheduler::{compute_ranks, schedule_for, DependencyGraph};

    /// Acyclic graphs: package `pN` may only depend on packages with a
    /// smaller index, plus the occasional package outside the graph.
    fn acyclic_graph() -> impl Strategy<Value = DependencyGraph> {
        (1usize..20)
            .prop_flat_map(|size| {
                prop::collection::vec(
                    prop::collection::vec(any::<prop::sample::Index>(), 0..4),
                    size,
                )
            })
            .prop_map(|picks| {
                picks
                    .iter()
                    .enumerate()
                    .map(|(i, deps)| {
                        let deps = deps
                            .iter()
                            .map(|pick| {
                                if i == 0 {
                                    "external".to_string()
                                } else {
                                    format!("p{}", pick.index(i))
                                }
                            })
                            .collect();
                        (format!("p{}", i), deps)
                    })
                    .collect()
            })
    }

    /// A ring: each package depends on the previous one, the first on the last.
    fn cyclic_graph() -> impl Strategy<Value = DependencyGraph> {
        (2usize..12).prop_map(|size| {
            (0..size)
                .map(|i| {
                    let dep = if i == 0 {
                        format!("p{}", size - 1)
                    } else {
                        format!("p{}", i - 1)
                    };
                    (format!("p{}", i), vec![dep])
                })
                .collect()
        })
    }

    fn option_tier() -> impl Strategy<Value = OptionMap> {
        prop::collection::btree_map("[a-e]", 0i64..100, 0..5).prop_map(|entries| {
            entries
                .into_iter()
                .map(|(key, value)| (key, json!(value)))
                .collect()
        })
    }

    proptest! {
        /// Property: every dependency is ranked strictly below its dependent
        #[test]
        fn ranks_respect_every_edge(graph in acyclic_graph()) {
            let ranks = compute_ranks(&graph).unwrap();
            for (package, deps) in &graph {
                for dep in deps {
                    if let Some(dep_rank) = ranks.get(dep) {
                        prop_assert!(dep_rank < ranks.get(package).unwrap());
                    }
                }
            }
        }

        /// Property: every package of the graph receives a rank
        #[test]
        fn ranks_cover_every_package(graph in acyclic_graph()) {
            let ranks = compute_ranks(&graph).unwrap();
            prop_assert_eq!(ranks.len(), graph.len());
            for package in graph.keys() {
                prop_assert!(ranks.get(package).is_some());
            }
        }

        /// Property: ranks are minimal, one more than the deepest dependency
        #[test]
        fn ranks_are_longest_path_levels(graph in acyclic_graph()) {
            let ranks = compute_ranks(&graph).unwrap();
            for (package, deps) in &graph {
                let expected = deps
                    .iter()
                    .filter_map(|dep| ranks.get(dep))
                    .max()
                    .map_or(0, |deepest| deepest + 1);
                prop_assert_eq!(ranks.get(package), Some(expected));
            }
        }

        /// Property: ranking is deterministic
        #[test]
        fn ranks_are_idempotent(graph in acyclic_graph()) {
            prop_assert_eq!(compute_ranks(&graph).unwrap(), compute_ranks(&graph).unwrap());
        }

        /// Property: cycles are always reported, never partially ranked
        #[test]
        fn cycles_are_detected(graph in cyclic_graph()) {
            let is_cycle = matches!(compute_ranks(&graph), Err(Error::CycleDetected { .. }));
            prop_assert!(is_cycle);
        }

        /// Property: schedule_for is total and falls back for unknown names
        #[test]
        fn schedule_for_is_total(graph in acyclic_graph(), name in ".*") {
            let ranks = compute_ranks(&graph).unwrap();
            let schedule = schedule_for(&ranks, &name);
            match ranks.get(&name) {
                Some(rank) => prop_assert_eq!(schedule.to_string(), format!("0 {} * * *", rank)),
                None => prop_assert_eq!(schedule.to_string(), "0 0 * * *"),
            }
        }

        /// Property: after validation, fixed keys keep their fixed or default value
        #[test]
        fn compose_keeps_fixed_keys(
            fixed in option_tier(),
            default in option_tier(),
            supplied in option_tier(),
        ) {
            let fixed_keys: Vec<&str> = fixed.keys().map(String::as_str).collect();
            let merged = compose(&fixed, &default, &supplied);

            if validate(supplied.keys(), &fixed_keys).is_ok() {
                for key in &fixed_keys {
                    let expected = default.get(*key).unwrap_or(&fixed[*key]);
                    prop_assert_eq!(&merged[*key], expected);
                }
            }
        }

        /// Property: for flat tiers the deep and shallow merges agree
        #[test]
        fn compose_deep_matches_compose_on_flat_tiers(
            fixed in option_tier(),
            default in option_tier(),
            supplied in option_tier(),
        ) {
            prop_assert_eq!(
                compose(&fixed, &default, &supplied),
                compose_deep(&fixed, &default, &supplied)
            );
        }
    }

    #[test]
    fn ranks_of_unreachable_dependencies_are_not_invented() {
        let graph: DependencyGraph =
            BTreeMap::from([("p0".to_string(), vec!["external".to_string()])]);
        let ranks = compute_ranks(&graph).unwrap();
        assert_eq!(ranks.len(), 1);
        assert_eq!(ranks.get("external"), None);
    }
}
