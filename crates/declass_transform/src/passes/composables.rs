use fxhash::FxHashSet;

use crate::{ResultKind, TransformResult};

/// Keeps the first acquisition of every composable, e.g. one `const store = useStore()`
/// no matter how many members access `this.$store`
pub fn dedupe_composables(results: Vec<TransformResult>) -> Vec<TransformResult> {
    let mut seen: FxHashSet<String> = FxHashSet::default();

    results
        .into_iter()
        .filter(|result| {
            !matches!(result.kind, ResultKind::Composable) || seen.insert(result.tag.to_owned())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReferenceKind;

    #[test]
    fn it_keeps_first_composable_per_tag() {
        let composable = |tag: &str, output: &str| {
            TransformResult::new(ResultKind::Composable, tag, ReferenceKind::Variable)
                .with_output(output.into())
        };

        let results = dedupe_composables(vec![
            composable("Composable-store", "store"),
            TransformResult::new(ResultKind::Composition, "Method", ReferenceKind::Variable),
            composable("Composable-store", "store"),
            composable("Composable-router", "router"),
            TransformResult::new(ResultKind::Composition, "Method", ReferenceKind::Variable),
        ]);

        let tags: Vec<&str> = results.iter().map(|r| r.tag.as_str()).collect();
        assert_eq!(
            tags,
            vec!["Composable-store", "Method", "Composable-router", "Method"]
        );
    }
}
