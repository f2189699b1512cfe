use declass_core::{function_to_arrow, prop_name_atom, VueImports};
use swc_core::ecma::ast::{ClassMethod, Expr, MethodKind};

use super::{mark_unsupported_decorators, RuleOutcome};
use crate::{
    context::TransformContext,
    error::TransformError,
    passes::computed::{COMPUTED_GETTER, COMPUTED_SETTER},
    ReferenceKind, ResultKind, ResultNode, TransformResult,
};

/// `get foo() {}` and `set foo(v) {}` become halves of a `computed`,
/// which are paired by the computed merge pass
pub fn transform_accessor(
    method: &ClassMethod,
    ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    let tag = match method.kind {
        MethodKind::Getter => COMPUTED_GETTER,
        MethodKind::Setter => COMPUTED_SETTER,
        MethodKind::Method => return Ok(RuleOutcome::NotApplicable),
    };

    let Some(name) = prop_name_atom(&method.key) else {
        return Ok(RuleOutcome::NotApplicable);
    };

    let span = mark_unsupported_decorators(&method.function.decorators, method.span, ctx);

    let mut arrow = function_to_arrow((*method.function).to_owned());
    arrow.span = span;

    let mut result =
        TransformResult::new(ResultKind::Composition, tag, ReferenceKind::VariableValue)
            .with_output(name)
            .with_vue_import(VueImports::Computed);
    result.nodes.push(ResultNode::Expr(Box::new(Expr::Arrow(arrow))));

    Ok(RuleOutcome::done(vec![result]))
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{component, convert_ok};

    #[test]
    fn it_pairs_getters_and_setters() {
        let output = convert_ok(&component(
            "get fullName(): string { return this.first; }\n\
             set fullName(value: string) { this.first = value; }\n\
             first = 'a';",
        ));

        assert_eq!(output.matches("computed(").count(), 1);
        assert!(output.contains("const fullName = computed({"));
        assert!(output.contains("get: "));
        assert!(output.contains("set: "));
        assert!(output.contains("first.value = value;"));
    }

    #[test]
    fn it_converts_lone_getters_to_readonly_computed() {
        let output = convert_ok(&component("get double() { return 2; }"));
        assert!(output.contains("import { computed } from \"vue\";"));
        assert!(output.contains("const double = computed("));
        assert!(!output.contains("set:"));
    }

    #[test]
    fn it_annotates_lone_setters() {
        let output = convert_ok(&component("set value(v: number) { console.log(v); }"));
        assert!(output.contains("// TODO: computed `value` has a setter but no getter"));
        assert!(output.contains("const value = computed({"));
        assert!(output.contains("set: "));
        assert!(!output.contains("get: "));
    }
}
