use declass_core::{
    call, expr_stmt, function_to_arrow, prop_name_atom, unwrap_ts_node_expr, LifecycleHook,
    LIFECYCLE_HOOKS,
};
use swc_core::{
    common::{Span, Spanned},
    ecma::ast::{ArrowExpr, BlockStmtOrExpr, ClassMethod, Decorator, Expr, MethodKind},
};

use super::{mark_unsupported_decorators, ComponentOption, RuleOutcome};
use crate::{
    context::TransformContext, error::TransformError, ReferenceKind, ResultKind, ResultNode,
    TransformResult,
};

/// `mounted() {}` becomes `onMounted(() => {})`, the body of `created() {}` is inlined
pub fn transform_lifecycle_method(
    method: &ClassMethod,
    ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    if method.kind != MethodKind::Method || method.is_static {
        return Ok(RuleOutcome::NotApplicable);
    }

    let Some(name) = prop_name_atom(&method.key) else {
        return Ok(RuleOutcome::NotApplicable);
    };
    let Some(hook) = LIFECYCLE_HOOKS.get(&*name) else {
        return Ok(RuleOutcome::NotApplicable);
    };

    let arrow = function_to_arrow((*method.function).to_owned());
    let result = lifecycle_result(
        &name,
        *hook,
        arrow,
        method.span,
        &method.function.decorators,
        ctx,
    );

    Ok(RuleOutcome::done(result.into_iter().collect()))
}

/// Lifecycle hooks declared in the component options, e.g. `@Component({ mounted() {} })`
pub fn transform_lifecycle_option(
    option: &ComponentOption,
    ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    let Some(hook) = LIFECYCLE_HOOKS.get(&*option.key) else {
        return Ok(RuleOutcome::NotApplicable);
    };

    let arrow = match unwrap_ts_node_expr(&option.value) {
        Expr::Fn(fn_expr) => function_to_arrow((*fn_expr.function).to_owned()),
        Expr::Arrow(arrow) => arrow.to_owned(),
        _ => return Ok(RuleOutcome::NotApplicable),
    };

    let result = lifecycle_result(&option.key, *hook, arrow, option.span, &[], ctx);
    Ok(RuleOutcome::done(result.into_iter().collect()))
}

fn lifecycle_result(
    name: &str,
    hook: LifecycleHook,
    arrow: ArrowExpr,
    span: Span,
    decorators: &[Decorator],
    ctx: &mut TransformContext,
) -> Option<TransformResult> {
    match hook {
        LifecycleHook::Register(import) => {
            let span = mark_unsupported_decorators(decorators, span, ctx);
            let stmt = expr_stmt(span, call(import.as_atom(), vec![Box::new(Expr::Arrow(arrow))]));

            Some(
                TransformResult::composition(
                    format!("Lifecycle-{}", import.as_str()),
                    ReferenceKind::None,
                    stmt,
                )
                .with_vue_import(import),
            )
        }

        LifecycleHook::Inline => {
            let is_async = arrow.is_async;
            let stmts = match *arrow.body {
                BlockStmtOrExpr::BlockStmt(block) => block.stmts,
                BlockStmtOrExpr::Expr(expr) => vec![expr_stmt(expr.span(), expr)],
            };

            // Comments need a statement which carries them
            let first_span = stmts.first()?.span();
            let first_span = mark_unsupported_decorators(decorators, first_span, ctx);
            if is_async {
                ctx.todo(
                    first_span,
                    format!("`{name}` was async, top-level `await` makes the component async"),
                );
            }

            let mut result = TransformResult::new(
                ResultKind::Composition,
                format!("Lifecycle-{name}"),
                ReferenceKind::None,
            );
            result.nodes = stmts.into_iter().map(ResultNode::Stmt).collect();
            Some(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{component, component_with_options, convert_ok, convert_with_warnings};

    #[test]
    fn it_registers_hooks() {
        let output = convert_ok(&component("mounted() { console.log(1); }"));
        assert!(output.contains("import { onMounted } from \"vue\";"));
        assert!(output.contains("onMounted("));
        assert!(output.contains("console.log(1);"));
    }

    #[test]
    fn it_keeps_decorators_of_empty_setup_hooks() {
        let (output, warnings) = convert_with_warnings(&component("@Debounce(300) created() {}"));
        assert!(!output.contains("created()"));
        assert!(output.contains("// TODO: could not convert decorator `@Debounce` of `created`\n"));
        assert!(output.contains("@Debounce(300);"));
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn it_maps_vue2_hook_names() {
        let output = convert_ok(&component("beforeDestroy() { console.log(1); }"));
        assert!(output.contains("onBeforeUnmount("));
    }

    #[test]
    fn it_inlines_setup_time_hooks() {
        let output = convert_ok(&component(
            "created() { console.log(this.a); }\na = 1;",
        ));
        assert!(output.contains("console.log(a.value);"));
        assert!(!output.contains("created"));
        assert!(!output.contains("onCreated"));
    }

    #[test]
    fn it_converts_option_hooks() {
        let output = convert_ok(&component_with_options(
            "{ mounted() { console.log(2); } }",
            "",
        ));
        assert!(output.contains("onMounted("));
        assert!(!output.contains("defineOptions"));
    }
}
