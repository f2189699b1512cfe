use declass_core::{call, const_decl, key_value_prop, object_lit, DeclassAtom, VueImports};
use indexmap::IndexMap;
use swc_core::{
    common::{Span, DUMMY_SP},
    ecma::ast::{ArrowExpr, BlockStmtOrExpr, Expr, ParenExpr, Stmt},
};

use crate::{
    atoms::{GET, SET},
    context::TransformContext,
    ReferenceKind, ResultNode, TransformResult,
};

/// Tag of a getter waiting for its setter
pub const COMPUTED_GETTER: &str = "Computed-getter";
/// Tag of a setter waiting for its getter
pub const COMPUTED_SETTER: &str = "Computed-setter";

/// Pairs getters and setters of the same name into one `computed`.
///
/// The merged result takes the position of the half which came first.
pub fn merge_computed(
    results: Vec<TransformResult>,
    ctx: &mut TransformContext,
) -> Vec<TransformResult> {
    enum Slot {
        Ready(TransformResult),
        Computed(DeclassAtom),
    }

    let mut slots: Vec<Slot> = Vec::with_capacity(results.len());
    let mut halves: IndexMap<DeclassAtom, Halves> = IndexMap::new();

    for result in results {
        let is_getter = result.tag == COMPUTED_GETTER;
        if !is_getter && result.tag != COMPUTED_SETTER {
            slots.push(Slot::Ready(result));
            continue;
        }

        let Some((name, arrow)) = split_half(&result) else {
            slots.push(Slot::Ready(result));
            continue;
        };

        let entry = halves.entry(name.to_owned()).or_insert_with(|| {
            slots.push(Slot::Computed(name.to_owned()));
            Halves::default()
        });

        let half = if is_getter {
            &mut entry.getter
        } else {
            &mut entry.setter
        };
        if half.is_some() {
            ctx.warn(format!("computed `{name}` is declared twice, the first one is kept"));
        } else {
            *half = Some(arrow);
        }
        entry.dependencies.extend(result.dependencies);
    }

    slots
        .into_iter()
        .filter_map(|slot| match slot {
            Slot::Ready(result) => Some(result),
            Slot::Computed(name) => {
                let halves = halves.swap_remove(&name)?;
                Some(computed_result(name, halves, ctx))
            }
        })
        .collect()
}

#[derive(Default)]
struct Halves {
    getter: Option<ArrowExpr>,
    setter: Option<ArrowExpr>,
    dependencies: Vec<DeclassAtom>,
}

fn split_half(result: &TransformResult) -> Option<(DeclassAtom, ArrowExpr)> {
    let name = result.output_variables.first()?;
    let Some(ResultNode::Expr(expr)) = result.nodes.first() else {
        return None;
    };
    let Expr::Arrow(ref arrow) = **expr else {
        return None;
    };

    Some((name.to_owned(), arrow.to_owned()))
}

fn computed_result(
    name: DeclassAtom,
    halves: Halves,
    ctx: &mut TransformContext,
) -> TransformResult {
    let Halves {
        getter,
        setter,
        dependencies,
    } = halves;

    let mut span: Span = getter
        .as_ref()
        .or(setter.as_ref())
        .map(|arrow| arrow.span)
        .unwrap_or(DUMMY_SP);

    let init = match (getter, setter) {
        (Some(getter), None) => call(
            VueImports::Computed.as_atom(),
            vec![Box::new(Expr::Arrow(simplify_getter(getter)))],
        ),

        (getter, setter) => {
            if getter.is_none() {
                span = ctx.todo(span, format!("computed `{name}` has a setter but no getter"));
            }

            let mut accessors = Vec::with_capacity(2);
            if let Some(getter) = getter {
                accessors.push(key_value_prop(
                    GET.to_owned(),
                    Box::new(Expr::Arrow(simplify_getter(getter))),
                ));
            }
            if let Some(setter) = setter {
                accessors.push(key_value_prop(SET.to_owned(), Box::new(Expr::Arrow(setter))));
            }
            call(VueImports::Computed.as_atom(), vec![object_lit(accessors)])
        }
    };

    let mut result = TransformResult::composition(
        "Computed",
        ReferenceKind::VariableValue,
        const_decl(span, name.to_owned(), init),
    )
    .with_output(name.to_owned())
    .with_vue_import(VueImports::Computed);

    for dependency in dependencies {
        if dependency != name {
            result.add_dependency(dependency);
        }
    }

    result
}

/// `() => { return x; }` is `() => x`.
/// The span of the getter moves to the declaration, so it is cleared here.
fn simplify_getter(mut getter: ArrowExpr) -> ArrowExpr {
    getter.span = DUMMY_SP;

    let BlockStmtOrExpr::BlockStmt(ref mut block) = *getter.body else {
        return getter;
    };
    if block.stmts.len() != 1 {
        return getter;
    }
    let Some(Stmt::Return(return_stmt)) = block.stmts.first_mut() else {
        return getter;
    };
    let Some(arg) = return_stmt.arg.take() else {
        return getter;
    };

    // An object literal body would read as a block
    let arg = match *arg {
        Expr::Object(_) | Expr::Seq(_) => Box::new(Expr::Paren(ParenExpr {
            span: DUMMY_SP,
            expr: arg,
        })),
        _ => arg,
    };

    getter.body = Box::new(BlockStmtOrExpr::Expr(arg));
    getter
}

#[cfg(test)]
mod tests {
    use declass_core::{arrow_with_block, ident_expr};
    use swc_core::ecma::ast::ReturnStmt;

    use super::*;
    use crate::test_utils::{component, convert_ok, to_str};

    #[test]
    fn it_simplifies_single_return_getters() {
        let Expr::Arrow(arrow) = *arrow_with_block(
            vec![],
            vec![Stmt::Return(ReturnStmt {
                span: DUMMY_SP,
                arg: Some(ident_expr("a")),
            })],
            false,
        ) else {
            unreachable!()
        };

        let simplified = simplify_getter(arrow);
        assert!(matches!(*simplified.body, BlockStmtOrExpr::Expr(_)));
        assert_eq!(to_str(&Expr::Arrow(simplified)), "()=>a");
    }

    #[test]
    fn it_keeps_getters_with_several_statements() {
        let output = convert_ok(&component(
            "get total() { const a = 1; return a + 1; }",
        ));
        assert!(output.contains("const a = 1;"));
        assert!(output.contains("return a + 1;"));
    }

    #[test]
    fn it_places_pairs_at_the_first_half() {
        let output = convert_ok(&component(
            "set b(v: number) { console.log(v); }\n\
             get a() { return 1; }\n\
             get b() { return 2; }",
        ));
        let b = output.find("const b").expect("b");
        let a = output.find("const a").expect("a");
        assert!(b < a);
        assert_eq!(output.matches("computed(").count(), 2);
    }
}
