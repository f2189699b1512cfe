use declass_core::{
    binding_pat, call_with_type_arg, classify_expr, const_decl, function_to_arrow, prop_name_atom,
    ts_type_ann, unwrap_ts_node_expr, var_decl_stmt, DeclassAtom, Primitiveness, VueImports,
};
use swc_core::{
    common::Span,
    ecma::ast::{ClassProp, Expr, TsType, VarDeclKind},
};

use super::{declared_type, mark_unsupported_decorators, RuleOutcome};
use crate::{
    context::TransformContext, error::TransformError, ReferenceKind, TransformResult,
};

/// Fallback for class properties: reactive state.
///
/// - `foo = "bar"` becomes `const foo = ref("bar")`;
/// - `foo = { a: 1 }` becomes `const foo = reactive({ a: 1 })`;
/// - `foo = () => {}` becomes `const foo = () => {}`;
/// - `foo!: string` becomes `let foo: string`.
pub fn transform_data(
    prop: &ClassProp,
    ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    let Some(name) = prop_name_atom(&prop.key) else {
        return Ok(RuleOutcome::NotApplicable);
    };

    let mut span = mark_unsupported_decorators(&prop.decorators, prop.span, ctx);
    if prop.is_static {
        span = ctx.todo(
            span,
            format!("static property `{name}` is now a constant shared by every instance"),
        );
    }

    let declared = declared_type(prop);

    let Some(ref value) = prop.value else {
        let stmt = var_decl_stmt(
            span,
            VarDeclKind::Let,
            binding_pat(name.to_owned(), declared.map(ts_type_ann)),
            None,
        );
        let result =
            TransformResult::composition("Data-uninitialized", ReferenceKind::Variable, stmt)
                .with_output(name);
        return Ok(RuleOutcome::done(vec![result]));
    };

    let result = match unwrap_ts_node_expr(value) {
        Expr::Arrow(_) => {
            TransformResult::composition(
                "Data-function",
                ReferenceKind::Variable,
                const_decl(span, name.to_owned(), value.to_owned()),
            )
        }

        Expr::Fn(fn_expr) => {
            let arrow = function_to_arrow((*fn_expr.function).to_owned());
            TransformResult::composition(
                "Data-function",
                ReferenceKind::Variable,
                const_decl(span, name.to_owned(), Box::new(Expr::Arrow(arrow))),
            )
        }

        _ if prop.is_static => TransformResult::composition(
            "Data-static",
            ReferenceKind::Variable,
            const_decl(span, name.to_owned(), value.to_owned()),
        ),

        // Anything which is not known to be an object is safer in a `ref`
        _ => match classify_expr(value, declared.as_deref()) {
            Primitiveness::Unknown => {
                span = ctx.todo(
                    span,
                    format!("`{name}` may hold an object, use `reactive` if it does"),
                );
                data_ref(span, &name, declared, value)
            }

            Primitiveness::NonPrimitive => TransformResult::composition(
                "Data-reactive",
                ReferenceKind::Variable,
                const_decl(
                    span,
                    name.to_owned(),
                    call_with_type_arg(
                        VueImports::Reactive.as_atom(),
                        declared,
                        vec![value.to_owned()],
                    ),
                ),
            )
            .with_vue_import(VueImports::Reactive),

            Primitiveness::Primitive => data_ref(span, &name, declared, value),
        },
    };

    Ok(RuleOutcome::done(vec![result.with_output(name)]))
}

fn data_ref(
    span: Span,
    name: &DeclassAtom,
    declared: Option<Box<TsType>>,
    value: &Expr,
) -> TransformResult {
    TransformResult::composition(
        "Data-ref",
        ReferenceKind::VariableValue,
        const_decl(
            span,
            name.to_owned(),
            call_with_type_arg(
                VueImports::Ref.as_atom(),
                declared,
                vec![Box::new(value.to_owned())],
            ),
        ),
    )
    .with_vue_import(VueImports::Ref)
}
