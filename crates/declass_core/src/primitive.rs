//! Best-effort detection of primitive values.
//!
//! There is no type checker available, so the classification only relies on syntax:
//! the initializer expression and the declared type annotation, if any.

use swc_core::ecma::ast::{
    BinaryOp, Expr, Lit, TsEntityName, TsKeywordTypeKind, TsType, TsUnionOrIntersectionType,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitiveness {
    /// `string`, `number`, `boolean`, `bigint`, `symbol`, `null` or `undefined`
    Primitive,
    /// Objects, arrays, class instances, functions
    NonPrimitive,
    /// The syntax does not say enough
    Unknown,
}

/// Classifies an initializer, using the declared type when the expression is inconclusive
pub fn classify_expr(expr: &Expr, declared_type: Option<&TsType>) -> Primitiveness {
    match classify_expr_syntax(expr) {
        Primitiveness::Unknown => declared_type.map_or(Primitiveness::Unknown, classify_type),
        known => known,
    }
}

fn classify_expr_syntax(expr: &Expr) -> Primitiveness {
    match expr {
        Expr::Lit(Lit::Regex(_) | Lit::JSXText(_)) => Primitiveness::NonPrimitive,
        Expr::Lit(_) | Expr::Tpl(_) => Primitiveness::Primitive,

        Expr::Ident(ident) if matches!(&*ident.sym, "undefined" | "NaN" | "Infinity") => {
            Primitiveness::Primitive
        }

        Expr::Unary(_) | Expr::Update(_) => Primitiveness::Primitive,

        Expr::Bin(bin) => match bin.op {
            // `+` is numeric or string concatenation only when both sides are primitive
            // `||`, `&&` and `??` evaluate to one of the operands
            BinaryOp::Add
            | BinaryOp::LogicalOr
            | BinaryOp::LogicalAnd
            | BinaryOp::NullishCoalescing => {
                match (classify_expr_syntax(&bin.left), classify_expr_syntax(&bin.right)) {
                    (Primitiveness::Primitive, Primitiveness::Primitive) => {
                        Primitiveness::Primitive
                    }
                    (Primitiveness::NonPrimitive, _) | (_, Primitiveness::NonPrimitive) => {
                        Primitiveness::NonPrimitive
                    }
                    _ => Primitiveness::Unknown,
                }
            }
            // Comparisons, arithmetic and bitwise operators
            _ => Primitiveness::Primitive,
        },

        Expr::Cond(cond) => {
            match (classify_expr_syntax(&cond.cons), classify_expr_syntax(&cond.alt)) {
                (Primitiveness::Primitive, Primitiveness::Primitive) => Primitiveness::Primitive,
                (Primitiveness::NonPrimitive, Primitiveness::NonPrimitive) => {
                    Primitiveness::NonPrimitive
                }
                _ => Primitiveness::Unknown,
            }
        }

        Expr::Paren(paren) => classify_expr_syntax(&paren.expr),
        Expr::TsAs(ts_as) => match classify_type(&ts_as.type_ann) {
            Primitiveness::Unknown => classify_expr_syntax(&ts_as.expr),
            known => known,
        },
        Expr::TsSatisfies(e) => classify_expr_syntax(&e.expr),
        Expr::TsNonNull(e) => classify_expr_syntax(&e.expr),
        Expr::TsConstAssertion(e) => classify_expr_syntax(&e.expr),
        Expr::TsTypeAssertion(e) => match classify_type(&e.type_ann) {
            Primitiveness::Unknown => classify_expr_syntax(&e.expr),
            known => known,
        },

        Expr::Object(_)
        | Expr::Array(_)
        | Expr::Fn(_)
        | Expr::Arrow(_)
        | Expr::Class(_)
        | Expr::New(_) => Primitiveness::NonPrimitive,

        // Well-known conversion calls
        Expr::Call(call) => {
            let Some(callee) = call.callee.as_expr() else {
                return Primitiveness::Unknown;
            };
            match callee.as_ident().map(|ident| ident.sym.as_ref()) {
                Some(
                    "String" | "Number" | "Boolean" | "BigInt" | "Symbol" | "parseInt"
                    | "parseFloat",
                ) => Primitiveness::Primitive,
                _ => Primitiveness::Unknown,
            }
        }

        _ => Primitiveness::Unknown,
    }
}

/// Classifies a declared type annotation
pub fn classify_type(ts_type: &TsType) -> Primitiveness {
    match ts_type {
        TsType::TsKeywordType(keyword) => match keyword.kind {
            TsKeywordTypeKind::TsStringKeyword
            | TsKeywordTypeKind::TsNumberKeyword
            | TsKeywordTypeKind::TsBooleanKeyword
            | TsKeywordTypeKind::TsBigIntKeyword
            | TsKeywordTypeKind::TsSymbolKeyword
            | TsKeywordTypeKind::TsNullKeyword
            | TsKeywordTypeKind::TsUndefinedKeyword
            | TsKeywordTypeKind::TsVoidKeyword
            | TsKeywordTypeKind::TsNeverKeyword => Primitiveness::Primitive,
            TsKeywordTypeKind::TsObjectKeyword => Primitiveness::NonPrimitive,
            _ => Primitiveness::Unknown,
        },

        TsType::TsLitType(_) => Primitiveness::Primitive,

        TsType::TsUnionOrIntersectionType(TsUnionOrIntersectionType::TsUnionType(union)) => {
            let mut result = Primitiveness::Primitive;
            for ty in union.types.iter() {
                match classify_type(ty) {
                    Primitiveness::Primitive => {}
                    Primitiveness::NonPrimitive => return Primitiveness::NonPrimitive,
                    Primitiveness::Unknown => result = Primitiveness::Unknown,
                }
            }
            result
        }

        TsType::TsParenthesizedType(paren) => classify_type(&paren.type_ann),

        TsType::TsArrayType(_)
        | TsType::TsTupleType(_)
        | TsType::TsTypeLit(_)
        | TsType::TsFnOrConstructorType(_)
        | TsType::TsMappedType(_) => Primitiveness::NonPrimitive,

        TsType::TsTypeRef(type_ref) => match &type_ref.type_name {
            TsEntityName::Ident(ident)
                if matches!(
                    ident.sym.as_ref(),
                    "Array" | "Record" | "Map" | "Set" | "WeakMap" | "WeakSet" | "Date" | "Promise"
                ) =>
            {
                Primitiveness::NonPrimitive
            }
            _ => Primitiveness::Unknown,
        },

        _ => Primitiveness::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use swc_core::{
        common::DUMMY_SP,
        ecma::ast::{ArrayLit, BinExpr, Bool, Null, Number, ObjectLit, TsKeywordType},
    };

    use super::*;
    use crate::{ident_expr, str_lit};

    fn num(value: f64) -> Box<Expr> {
        Box::new(Expr::Lit(Lit::Num(Number {
            span: DUMMY_SP,
            value,
            raw: None,
        })))
    }

    #[test]
    fn it_detects_literals() {
        assert_eq!(classify_expr(&str_lit("a"), None), Primitiveness::Primitive);
        assert_eq!(classify_expr(&num(1.0), None), Primitiveness::Primitive);
        let null = Expr::Lit(Lit::Null(Null { span: DUMMY_SP }));
        assert_eq!(classify_expr(&null, None), Primitiveness::Primitive);
        let bool = Expr::Lit(Lit::Bool(Bool { span: DUMMY_SP, value: true }));
        assert_eq!(classify_expr(&bool, None), Primitiveness::Primitive);
        assert_eq!(classify_expr(&ident_expr("undefined"), None), Primitiveness::Primitive);
    }

    #[test]
    fn it_detects_objects() {
        let obj = Expr::Object(ObjectLit { span: DUMMY_SP, props: vec![] });
        assert_eq!(classify_expr(&obj, None), Primitiveness::NonPrimitive);
        let arr = Expr::Array(ArrayLit { span: DUMMY_SP, elems: vec![] });
        assert_eq!(classify_expr(&arr, None), Primitiveness::NonPrimitive);
    }

    #[test]
    fn it_follows_binary_operands() {
        let concat = Expr::Bin(BinExpr {
            span: DUMMY_SP,
            op: BinaryOp::Add,
            left: str_lit("a"),
            right: num(1.0),
        });
        assert_eq!(classify_expr(&concat, None), Primitiveness::Primitive);

        let unknown = Expr::Bin(BinExpr {
            span: DUMMY_SP,
            op: BinaryOp::Add,
            left: ident_expr("foo"),
            right: num(1.0),
        });
        assert_eq!(classify_expr(&unknown, None), Primitiveness::Unknown);
    }

    #[test]
    fn it_falls_back_to_declared_type() {
        let number = TsType::TsKeywordType(TsKeywordType {
            span: DUMMY_SP,
            kind: TsKeywordTypeKind::TsNumberKeyword,
        });
        assert_eq!(
            classify_expr(&ident_expr("SOME_CONST"), Some(&number)),
            Primitiveness::Primitive
        );
        assert_eq!(classify_expr(&ident_expr("SOME_CONST"), None), Primitiveness::Unknown);
    }
}
