use declass_core::DeclassAtom;
use fxhash::FxHashSet;

use crate::TransformResult;

/// Orders results so that every binding is declared before it is referenced.
///
/// Two separate stages:
/// 1. a stable topological placement of regular results over their output variables;
/// 2. results tagged `SortLast:<priority>:<label>` appended by descending priority.
pub fn sort_results(results: Vec<TransformResult>) -> Vec<TransformResult> {
    let (last, regular): (Vec<_>, Vec<_>) = results
        .into_iter()
        .partition(|result| result.sort_last_priority().is_some());

    let mut sorted = topological_placement(regular);
    sorted.extend(sort_last(last));
    sorted
}

fn topological_placement(results: Vec<TransformResult>) -> Vec<TransformResult> {
    // Only names which some result declares can gate placement
    let known: FxHashSet<DeclassAtom> = results
        .iter()
        .flat_map(|result| result.output_variables.iter().cloned())
        .collect();

    let mut pending: Vec<(Vec<DeclassAtom>, TransformResult)> = results
        .into_iter()
        .map(|result| {
            let gating = result
                .dependencies
                .iter()
                .filter(|dependency| known.contains(*dependency))
                .cloned()
                .collect();
            (gating, result)
        })
        .collect();

    let mut placed: FxHashSet<DeclassAtom> = FxHashSet::default();
    let mut sorted = Vec::with_capacity(pending.len());

    // Results which depend on nothing keep their relative order and come first,
    // then repeatedly every result whose dependencies are all placed
    let mut first_round = true;
    loop {
        let before = pending.len();
        let mut rest = Vec::with_capacity(before);

        for (gating, result) in pending.drain(..) {
            let ready = if first_round {
                gating.is_empty()
            } else {
                gating.iter().all(|dependency| placed.contains(dependency))
            };

            if ready {
                placed.extend(result.output_variables.iter().cloned());
                sorted.push(result);
            } else {
                rest.push((gating, result));
            }
        }

        pending = rest;
        if pending.is_empty() || (!first_round && pending.len() == before) {
            break;
        }
        first_round = false;
    }

    if !pending.is_empty() {
        tracing::debug!(count = pending.len(), "circular dependencies between results");
    }
    sorted.extend(pending.into_iter().map(|(_, result)| result));
    sorted
}

/// Stable, the highest priority first
fn sort_last(mut results: Vec<TransformResult>) -> Vec<TransformResult> {
    results.sort_by_key(|result| std::cmp::Reverse(result.sort_last_priority().unwrap_or(0)));
    results
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{sort_last_tag, ReferenceKind, ResultKind};

    fn result(tag: &str, output: Option<&str>, dependencies: &[&str]) -> TransformResult {
        let mut result =
            TransformResult::new(ResultKind::Composition, tag, ReferenceKind::Variable);
        if let Some(output) = output {
            result = result.with_output(output.into());
        }
        for dependency in dependencies {
            result.add_dependency((*dependency).into());
        }
        result
    }

    fn tags(results: &[TransformResult]) -> Vec<&str> {
        results.iter().map(|r| r.tag.as_str()).collect()
    }

    #[test]
    fn it_places_dependencies_first() {
        let sorted = sort_results(vec![
            result("b", Some("b"), &["a"]),
            result("c", Some("c"), &["b"]),
            result("a", Some("a"), &[]),
        ]);
        assert_eq!(tags(&sorted), vec!["a", "b", "c"]);
    }

    #[test]
    fn it_keeps_independent_results_in_order() {
        let sorted = sort_results(vec![
            result("x", Some("x"), &["console"]),
            result("y", Some("y"), &[]),
            result("z", None, &[]),
        ]);
        assert_eq!(tags(&sorted), vec!["x", "y", "z"]);
    }

    #[test]
    fn it_appends_cycles_unordered() {
        let sorted = sort_results(vec![
            result("a", Some("a"), &["b"]),
            result("b", Some("b"), &["a"]),
            result("c", Some("c"), &[]),
        ]);
        assert_eq!(tags(&sorted), vec!["c", "a", "b"]);
    }

    #[test]
    fn it_sorts_last_by_descending_priority() {
        let sorted = sort_results(vec![
            result(&sort_last_tag(1, "expose"), None, &[]),
            result(&sort_last_tag(5, "first"), None, &[]),
            result("a", Some("a"), &[]),
            result(&sort_last_tag(1, "other"), None, &[]),
        ]);
        assert_eq!(
            tags(&sorted),
            vec!["a", "SortLast:5:first", "SortLast:1:expose", "SortLast:1:other"]
        );
    }
}
