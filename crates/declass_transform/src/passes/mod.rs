//! Post-processors which refine the results of every rule.
//!
//! Each pass takes the full result list and returns the new one.
//! The order is fixed: a pass may rely on the output shape of the previous ones.

use crate::{context::TransformContext, TransformResult};

pub mod composables;
pub mod computed;
pub mod macros;
pub mod mixin;
pub mod rewrite;
pub mod sort;

/// Runs every post-processor in order
pub fn run_passes(
    results: Vec<TransformResult>,
    ctx: &mut TransformContext,
) -> Vec<TransformResult> {
    let results = trace_pass("macros", macros::merge_macros(results));
    let results = trace_pass("composables", composables::dedupe_composables(results));
    let results = trace_pass("computed", computed::merge_computed(results, ctx));
    let results = trace_pass("rewrite", rewrite::rewrite_this_access(results, ctx));
    let results = trace_pass("sort", sort::sort_results(results));

    if ctx.is_mixin {
        trace_pass("mixin", mixin::wrap_into_composable(results, ctx))
    } else {
        results
    }
}

#[inline]
fn trace_pass(name: &'static str, results: Vec<TransformResult>) -> Vec<TransformResult> {
    tracing::trace!(pass = name, results = results.len(), "post-processor done");
    results
}
