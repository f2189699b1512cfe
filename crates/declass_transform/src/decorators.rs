use declass_core::{unwrap_ts_node_expr, DeclassAtom};
use swc_core::{
    common::Span,
    ecma::ast::{CallExpr, Callee, Decorator, Expr, ExprOrSpread, Lit, MemberProp},
};

use crate::{
    atoms::{NAMESPACE, WATCH_DECORATOR},
    context::{NamespaceKey, TransformContext},
    error::TransformError,
};

/// A decorator, with its name resolved through import aliases
#[derive(Debug)]
pub struct DecoratorInfo<'d> {
    pub name: DeclassAtom,
    /// Store namespace for `@ns.Getter(...)` style decorators
    pub namespace: Option<NamespaceKey>,
    pub args: &'d [ExprOrSpread],
    pub span: Span,
}

impl DecoratorInfo<'_> {
    pub fn arg(&self, idx: usize) -> Option<&Expr> {
        self.args
            .get(idx)
            .filter(|arg| arg.spread.is_none())
            .map(|arg| &*arg.expr)
    }

    /// First argument when it is a string literal
    pub fn str_arg(&self, idx: usize) -> Option<DeclassAtom> {
        match self.arg(idx).map(unwrap_ts_node_expr) {
            Some(Expr::Lit(Lit::Str(s))) => Some(s.value.to_owned()),
            _ => None,
        }
    }
}

/// Reads a decorator expression, e.g. `@Prop`, `@Prop()`, `@user.Getter("name")`
pub fn parse_decorator<'d>(
    decorator: &'d Decorator,
    ctx: &TransformContext,
) -> Option<DecoratorInfo<'d>> {
    let (target, args): (&Expr, &[ExprOrSpread]) = match &*decorator.expr {
        Expr::Call(call) => {
            let Callee::Expr(ref callee) = call.callee else {
                return None;
            };
            (&**callee, call.args.as_slice())
        }
        other => (other, &[][..]),
    };

    match target {
        Expr::Ident(ident) => Some(DecoratorInfo {
            name: ctx.canonical_name(&ident.sym),
            namespace: None,
            args,
            span: decorator.span,
        }),

        // `@ns.Getter` or `@namespace("ns").Getter`
        Expr::Member(member) => {
            let MemberProp::Ident(ref prop) = member.prop else {
                return None;
            };

            let namespace = match &*member.obj {
                Expr::Ident(ns_ident) => ctx.namespace(&ns_ident.sym).cloned(),
                Expr::Call(call) => namespace_call_key(call, ctx),
                _ => None,
            }?;

            Some(DecoratorInfo {
                name: prop.sym.to_owned(),
                namespace: Some(namespace),
                args,
                span: decorator.span,
            })
        }

        _ => None,
    }
}

/// Reads the key of a `namespace("key")` call
pub fn namespace_call_key(
    call: &CallExpr,
    ctx: &TransformContext,
) -> Option<NamespaceKey> {
    let Callee::Expr(ref callee) = call.callee else {
        return None;
    };
    let Expr::Ident(ref callee_ident) = **callee else {
        return None;
    };
    if ctx.canonical_name(&callee_ident.sym) != *NAMESPACE {
        return None;
    }

    let arg = call.args.first()?;
    match unwrap_ts_node_expr(&arg.expr) {
        Expr::Lit(Lit::Str(s)) => Some(NamespaceKey::Literal(s.value.to_owned())),
        other => Some(NamespaceKey::Variable(Box::new(other.to_owned()))),
    }
}

/// Finds the single occurrence of a decorator on a member.
///
/// Most decorators are only meaningful once per member, a second occurrence is an error.
pub fn find_decorator<'d>(
    decorators: &'d [Decorator],
    name: &DeclassAtom,
    member: &DeclassAtom,
    ctx: &TransformContext,
) -> Result<Option<DecoratorInfo<'d>>, TransformError> {
    let mut found = decorators
        .iter()
        .filter_map(|decorator| parse_decorator(decorator, ctx))
        .filter(|info| info.name == *name);

    let first = found.next();
    if first.is_some() && found.next().is_some() && *name != *WATCH_DECORATOR {
        return Err(TransformError::DuplicateDecorator {
            decorator: name.to_owned(),
            member: member.to_owned(),
        });
    }

    Ok(first)
}

/// Finds every occurrence of a decorator which may be repeated, e.g. `@Watch`
pub fn find_all_decorators<'d>(
    decorators: &'d [Decorator],
    name: &DeclassAtom,
    ctx: &TransformContext,
) -> Vec<DecoratorInfo<'d>> {
    decorators
        .iter()
        .filter_map(|decorator| parse_decorator(decorator, ctx))
        .filter(|info| info.name == *name)
        .collect()
}

/// Names of the decorators on a member which no rule handled
pub fn unclaimed_decorators(decorators: &[Decorator], ctx: &TransformContext) -> Vec<DeclassAtom> {
    unclaimed_decorator_nodes(decorators, ctx)
        .into_iter()
        .map(|(name, _)| name)
        .collect()
}

pub fn unclaimed_decorator_nodes<'d>(
    decorators: &'d [Decorator],
    ctx: &TransformContext,
) -> Vec<(DeclassAtom, &'d Decorator)> {
    decorators
        .iter()
        .map(|decorator| match parse_decorator(decorator, ctx) {
            Some(info) => (info.name, decorator),
            None => ("<expression>".into(), decorator),
        })
        .filter(|(name, _)| !ctx.is_claimed(name))
        .collect()
}
