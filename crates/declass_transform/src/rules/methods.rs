use declass_core::{const_decl, function_to_arrow, prop_name_atom, DeclassAtom, IntoIdent};
use swc_core::{
    common::{Span, Spanned},
    ecma::ast::{
        Callee, ClassMethod, Constructor, Decl, Expr, FnDecl, Function, MethodKind, Stmt,
    },
};

use super::{mark_unsupported_decorators, RuleOutcome};
use crate::{
    context::TransformContext, error::TransformError, ReferenceKind, ResultKind, ResultNode,
    TransformResult,
};

/// Fallback for methods: `foo(a) {}` becomes `const foo = (a) => {}`
pub fn transform_method(
    method: &ClassMethod,
    ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    if method.kind != MethodKind::Method {
        return Ok(RuleOutcome::NotApplicable);
    }

    let Some(name) = prop_name_atom(&method.key) else {
        return Ok(RuleOutcome::NotApplicable);
    };

    let result = method_result(
        name,
        (*method.function).to_owned(),
        method.span,
        method.is_static,
        ctx,
    );

    Ok(RuleOutcome::done(vec![result]))
}

/// Converts a method to a function constant.
/// The decorators of `function` are checked for ones no rule has claimed.
pub(crate) fn method_result(
    name: DeclassAtom,
    function: Function,
    span: Span,
    is_static: bool,
    ctx: &mut TransformContext,
) -> TransformResult {
    let mut span = mark_unsupported_decorators(&function.decorators, span, ctx);
    if is_static {
        span = ctx.todo(
            span,
            format!("static method `{name}` is now a function shared by every instance"),
        );
    }

    // Arrow functions cannot be generators
    if function.is_generator {
        span = ctx.todo(
            span,
            format!("generator `{name}` is kept as a function, `this` inside was not rewritten"),
        );

        let fn_decl = Stmt::Decl(Decl::Fn(FnDecl {
            ident: name.to_owned().into_ident(),
            declare: false,
            function: Box::new(Function {
                span,
                decorators: vec![],
                ..function
            }),
        }));

        return TransformResult::composition("Method", ReferenceKind::Variable, fn_decl)
            .with_output(name);
    }

    let arrow = function_to_arrow(Function {
        decorators: vec![],
        ..function
    });

    TransformResult::composition(
        "Method",
        ReferenceKind::Variable,
        const_decl(span, name.to_owned(), Box::new(Expr::Arrow(arrow))),
    )
    .with_output(name)
}

/// The constructor body runs once per instance, as does the setup scope
pub fn transform_constructor(
    constructor: &Constructor,
    ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    let Some(ref body) = constructor.body else {
        return Ok(RuleOutcome::done(vec![]));
    };

    let stmts: Vec<Stmt> = body
        .stmts
        .iter()
        .filter(|stmt| !is_super_call(stmt))
        .cloned()
        .collect();

    let Some(first) = stmts.first() else {
        return Ok(RuleOutcome::done(vec![]));
    };

    ctx.todo(
        first.span(),
        "constructor body was moved to the setup scope".to_owned(),
    );

    let mut result =
        TransformResult::new(ResultKind::Composition, "Constructor", ReferenceKind::None);
    result.nodes = stmts.into_iter().map(ResultNode::Stmt).collect();

    Ok(RuleOutcome::done(vec![result]))
}

fn is_super_call(stmt: &Stmt) -> bool {
    let Stmt::Expr(expr_stmt) = stmt else {
        return false;
    };
    let Expr::Call(ref call) = *expr_stmt.expr else {
        return false;
    };
    matches!(call.callee, Callee::Super(_))
}
