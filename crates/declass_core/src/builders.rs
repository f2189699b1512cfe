//! Small helpers to construct swc nodes without repeating every field

use swc_core::{
    common::{Span, DUMMY_SP},
    ecma::ast::{
        ArrowExpr, BindingIdent, BlockStmt, BlockStmtOrExpr, CallExpr, Callee, ComputedPropName,
        Decl, Expr, ExprOrSpread, ExprStmt, Function, Ident, IdentName, KeyValueProp, Lit,
        MemberExpr, MemberProp, ObjectLit, Pat, Prop, PropName, PropOrSpread, Stmt, Str, Tpl,
        TplElement, TsKeywordType, TsKeywordTypeKind, TsPropertySignature, TsType, TsTypeAnn,
        TsTypeElement, TsTypeLit, TsTypeParamInstantiation, VarDecl, VarDeclKind, VarDeclarator,
    },
};

use crate::DeclassAtom;

pub trait IntoIdent {
    fn into_ident(self) -> Ident;
    fn into_ident_spanned(self, span: Span) -> Ident;
}

impl IntoIdent for DeclassAtom {
    #[inline]
    fn into_ident(self) -> Ident {
        self.into_ident_spanned(DUMMY_SP)
    }

    fn into_ident_spanned(self, span: Span) -> Ident {
        Ident {
            span,
            ctxt: Default::default(),
            sym: self,
            optional: false,
        }
    }
}

impl IntoIdent for &str {
    #[inline]
    fn into_ident(self) -> Ident {
        DeclassAtom::from(self).into_ident()
    }

    #[inline]
    fn into_ident_spanned(self, span: Span) -> Ident {
        DeclassAtom::from(self).into_ident_spanned(span)
    }
}

#[inline]
pub fn ident_expr(sym: impl IntoIdent) -> Box<Expr> {
    Box::new(Expr::Ident(sym.into_ident()))
}

#[inline]
pub fn ident_name(sym: DeclassAtom) -> IdentName {
    IdentName {
        span: DUMMY_SP,
        sym,
    }
}

pub fn str_lit(value: impl Into<DeclassAtom>) -> Box<Expr> {
    Box::new(Expr::Lit(Lit::Str(Str {
        span: DUMMY_SP,
        value: value.into(),
        raw: None,
    })))
}

/// Checks that `name` can be written as a plain JS identifier
pub fn is_valid_ident(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    (first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// `obj.prop`
pub fn member_expr(obj: Box<Expr>, prop: DeclassAtom) -> Box<Expr> {
    Box::new(Expr::Member(MemberExpr {
        span: DUMMY_SP,
        obj,
        prop: MemberProp::Ident(ident_name(prop)),
    }))
}

/// `obj[prop]`
pub fn computed_member_expr(obj: Box<Expr>, prop: Box<Expr>) -> Box<Expr> {
    Box::new(Expr::Member(MemberExpr {
        span: DUMMY_SP,
        obj,
        prop: MemberProp::Computed(ComputedPropName {
            span: DUMMY_SP,
            expr: prop,
        }),
    }))
}

/// `obj.prop` when `prop` is a valid identifier, `obj["prop"]` otherwise
pub fn property_access(obj: Box<Expr>, prop: &str) -> Box<Expr> {
    if is_valid_ident(prop) {
        member_expr(obj, prop.into())
    } else {
        computed_member_expr(obj, str_lit(prop))
    }
}

/// `` `${expr}suffix` ``
pub fn template_with_suffix(expr: Box<Expr>, suffix: &str) -> Box<Expr> {
    let quasi = |raw: &str, tail: bool| TplElement {
        span: DUMMY_SP,
        tail,
        cooked: Some(raw.into()),
        raw: raw.into(),
    };

    Box::new(Expr::Tpl(Tpl {
        span: DUMMY_SP,
        exprs: vec![expr],
        quasis: vec![quasi("", false), quasi(suffix, true)],
    }))
}

pub fn call_expr(callee: Box<Expr>, args: Vec<Box<Expr>>) -> CallExpr {
    CallExpr {
        span: DUMMY_SP,
        ctxt: Default::default(),
        callee: Callee::Expr(callee),
        args: args
            .into_iter()
            .map(|expr| ExprOrSpread { spread: None, expr })
            .collect(),
        type_args: None,
    }
}

/// `name(args)`
#[inline]
pub fn call(name: DeclassAtom, args: Vec<Box<Expr>>) -> Box<Expr> {
    Box::new(Expr::Call(call_expr(ident_expr(name), args)))
}

/// `name<T>(args)`, type arguments are omitted when `type_arg` is `None`
pub fn call_with_type_arg(
    name: DeclassAtom,
    type_arg: Option<Box<TsType>>,
    args: Vec<Box<Expr>>,
) -> Box<Expr> {
    let mut call_expr = call_expr(ident_expr(name), args);
    call_expr.type_args = type_arg.map(|ty| {
        Box::new(TsTypeParamInstantiation {
            span: DUMMY_SP,
            params: vec![ty],
        })
    });
    Box::new(Expr::Call(call_expr))
}

pub fn block_stmt(stmts: Vec<Stmt>) -> BlockStmt {
    BlockStmt {
        span: DUMMY_SP,
        ctxt: Default::default(),
        stmts,
    }
}

/// `() => expr`
pub fn arrow_returning(expr: Box<Expr>) -> Box<Expr> {
    Box::new(Expr::Arrow(ArrowExpr {
        span: DUMMY_SP,
        ctxt: Default::default(),
        params: vec![],
        body: Box::new(BlockStmtOrExpr::Expr(expr)),
        is_async: false,
        is_generator: false,
        type_params: None,
        return_type: None,
    }))
}

/// `(params) => { stmts }`
pub fn arrow_with_block(params: Vec<Pat>, stmts: Vec<Stmt>, is_async: bool) -> Box<Expr> {
    Box::new(Expr::Arrow(ArrowExpr {
        span: DUMMY_SP,
        ctxt: Default::default(),
        params,
        body: Box::new(BlockStmtOrExpr::BlockStmt(block_stmt(stmts))),
        is_async,
        is_generator: false,
        type_params: None,
        return_type: None,
    }))
}

/// Converts a method-like function into an arrow function.
/// Parameters, return type, type parameters and `async` are preserved.
pub fn function_to_arrow(function: Function) -> ArrowExpr {
    ArrowExpr {
        span: function.span,
        ctxt: Default::default(),
        params: function.params.into_iter().map(|param| param.pat).collect(),
        body: Box::new(BlockStmtOrExpr::BlockStmt(
            function.body.unwrap_or_else(|| block_stmt(vec![])),
        )),
        is_async: function.is_async,
        is_generator: false,
        type_params: function.type_params,
        return_type: function.return_type,
    }
}

/// A plain identifier pattern, optionally typed: `name: T`
pub fn binding_pat(sym: DeclassAtom, type_ann: Option<Box<TsTypeAnn>>) -> Pat {
    Pat::Ident(BindingIdent {
        id: sym.into_ident(),
        type_ann,
    })
}

/// `kind name = init;` where the span is used to attach comments
pub fn var_decl_stmt(span: Span, kind: VarDeclKind, name: Pat, init: Option<Box<Expr>>) -> Stmt {
    Stmt::Decl(Decl::Var(Box::new(VarDecl {
        span,
        ctxt: Default::default(),
        kind,
        declare: false,
        decls: vec![VarDeclarator {
            span: DUMMY_SP,
            name,
            init,
            definite: false,
        }],
    })))
}

/// `const name = init;`
#[inline]
pub fn const_decl(span: Span, name: DeclassAtom, init: Box<Expr>) -> Stmt {
    var_decl_stmt(span, VarDeclKind::Const, binding_pat(name, None), Some(init))
}

pub fn expr_stmt(span: Span, expr: Box<Expr>) -> Stmt {
    Stmt::Expr(ExprStmt { span, expr })
}

/// A statement printing `text` as it is.
///
/// Lines after the first lose their common indentation, a trailing `;` is not repeated.
pub fn verbatim_stmt(span: Span, text: &str) -> Stmt {
    let text = text.trim().trim_end_matches(';');
    let mut lines = text.lines();
    let first = lines.next().unwrap_or_default();
    let rest: Vec<&str> = lines.collect();

    let indent = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    let mut dedented = String::with_capacity(text.len());
    dedented.push_str(first);
    for line in rest {
        dedented.push('\n');
        dedented.push_str(line.get(indent..).unwrap_or_else(|| line.trim_start()));
    }

    expr_stmt(span, Box::new(Expr::Ident(DeclassAtom::from(dedented).into_ident())))
}

pub fn prop_name(key: DeclassAtom) -> PropName {
    if is_valid_ident(&key) {
        PropName::Ident(ident_name(key))
    } else {
        PropName::Str(Str {
            span: DUMMY_SP,
            value: key,
            raw: None,
        })
    }
}

/// `key: value`
pub fn key_value_prop(key: DeclassAtom, value: Box<Expr>) -> PropOrSpread {
    PropOrSpread::Prop(Box::new(Prop::KeyValue(KeyValueProp {
        key: prop_name(key),
        value,
    })))
}

/// `{ key }`-style shorthand property
pub fn shorthand_prop(sym: DeclassAtom) -> PropOrSpread {
    PropOrSpread::Prop(Box::new(Prop::Shorthand(sym.into_ident())))
}

pub fn object_lit(props: Vec<PropOrSpread>) -> Box<Expr> {
    Box::new(Expr::Object(ObjectLit {
        span: DUMMY_SP,
        props,
    }))
}

/// Static name of a class member or object property key
pub fn prop_name_atom(prop_name: &PropName) -> Option<DeclassAtom> {
    match prop_name {
        PropName::Ident(ident) => Some(ident.sym.to_owned()),
        PropName::Str(s) => Some(s.value.to_owned()),
        PropName::Num(n) => Some(n.value.to_string().into()),
        PropName::Computed(_) | PropName::BigInt(_) => None,
    }
}

pub fn ts_keyword(kind: TsKeywordTypeKind) -> Box<TsType> {
    Box::new(TsType::TsKeywordType(TsKeywordType {
        span: DUMMY_SP,
        kind,
    }))
}

#[inline]
pub fn ts_any() -> Box<TsType> {
    ts_keyword(TsKeywordTypeKind::TsAnyKeyword)
}

pub fn ts_type_ann(type_ann: Box<TsType>) -> Box<TsTypeAnn> {
    Box::new(TsTypeAnn {
        span: DUMMY_SP,
        type_ann,
    })
}

/// `key?: type` inside a type literal
pub fn ts_property_signature(key: DeclassAtom, ty: Box<TsType>, optional: bool) -> TsTypeElement {
    let key = if is_valid_ident(&key) {
        ident_expr(key)
    } else {
        str_lit(key)
    };

    TsTypeElement::TsPropertySignature(TsPropertySignature {
        span: DUMMY_SP,
        readonly: false,
        key,
        computed: false,
        optional,
        type_ann: Some(ts_type_ann(ty)),
    })
}

pub fn ts_type_lit(members: Vec<TsTypeElement>) -> Box<TsType> {
    Box::new(TsType::TsTypeLit(TsTypeLit {
        span: DUMMY_SP,
        members,
    }))
}

/// Unwraps expressions which only matter for the type checker, e.g. `x as T` or `x!`
pub fn unwrap_ts_node_expr(expr: &Expr) -> &Expr {
    match expr {
        Expr::TsConstAssertion(e) => unwrap_ts_node_expr(&e.expr),
        Expr::TsNonNull(e) => unwrap_ts_node_expr(&e.expr),
        Expr::TsAs(e) => unwrap_ts_node_expr(&e.expr),
        Expr::TsInstantiation(e) => unwrap_ts_node_expr(&e.expr),
        Expr::TsSatisfies(e) => unwrap_ts_node_expr(&e.expr),
        Expr::TsTypeAssertion(e) => unwrap_ts_node_expr(&e.expr),
        Expr::Paren(e) => unwrap_ts_node_expr(&e.expr),
        _ => expr,
    }
}

/// Converts `fooBar` to `foo-bar`, the legacy naming of `@Emit` events
pub fn hyphenate(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    for (idx, c) in name.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if idx != 0 {
                result.push('-');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_hyphenates() {
        assert_eq!(hyphenate("resetCount"), "reset-count");
        assert_eq!(hyphenate("onHTTPError"), "on-h-t-t-p-error");
        assert_eq!(hyphenate("Change"), "change");
        assert_eq!(hyphenate("already-kebab"), "already-kebab");
    }

    #[test]
    fn it_validates_identifiers() {
        assert!(is_valid_ident("foo"));
        assert!(is_valid_ident("$store"));
        assert!(is_valid_ident("_a1"));
        assert!(!is_valid_ident("1a"));
        assert!(!is_valid_ident("user/name"));
        assert!(!is_valid_ident(""));
    }

    #[test]
    fn it_dedents_verbatim_code() {
        let stmt = verbatim_stmt(DUMMY_SP, "static {\n        boot();\n    };\n");
        let Stmt::Expr(ExprStmt { expr, .. }) = stmt else {
            panic!("expected an expression statement");
        };
        let Expr::Ident(ident) = *expr else {
            panic!("expected the text as an identifier");
        };
        assert_eq!(&*ident.sym, "static {\n    boot();\n}");
    }
}
