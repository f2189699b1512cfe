use declass_core::{
    arrow_with_block, block_stmt, call_expr, const_decl, expr_stmt, hyphenate, prop_name_atom,
    str_lit, ts_any, DeclassAtom, IntoIdent,
};
use swc_core::{
    common::DUMMY_SP,
    ecma::{
        ast::{
            ArrowExpr, AwaitExpr, BindingIdent, Class, ClassMethod, Expr, ExprOrSpread, Function,
            MethodKind, ParenExpr, Pat, RestPat, ReturnStmt, Stmt, TsArrayType, TsEntityName,
            TsKeywordTypeKind, TsTupleElement, TsTupleType, TsType, TsTypeRef,
        },
        visit::{Visit, VisitWith},
    },
};

use super::{methods::method_result, this_member, RuleOutcome};
use crate::{
    atoms::{DOLLAR_EMIT, EMIT_DECORATOR, EMIT_VALUE},
    context::TransformContext,
    decorators::find_decorator,
    error::TransformError,
    MacroContribution, MacroKind, TransformResult, TypeProperty,
};

/// `@Emit("reset") resetCount(n: number) { return 0 }` emits after the method body ran.
///
/// Produces a contribution `reset: [n: number, returnValue: any]` to `defineEmits`
/// and a method which computes the return value, emits it after the arguments and returns it.
pub fn transform_emit(
    method: &ClassMethod,
    ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    if method.kind != MethodKind::Method {
        return Ok(RuleOutcome::NotApplicable);
    }

    let Some(name) = prop_name_atom(&method.key) else {
        return Ok(RuleOutcome::NotApplicable);
    };

    let Some(emit) = find_decorator(&method.function.decorators, &EMIT_DECORATOR, &name, ctx)?
    else {
        return Ok(RuleOutcome::NotApplicable);
    };

    let event: DeclassAtom = match emit.arg(0) {
        None => hyphenate(&name).into(),
        Some(_) => emit
            .str_arg(0)
            .ok_or_else(|| TransformError::InvalidDecoratorArgument {
                decorator: EMIT_DECORATOR.to_owned(),
                expected: "an event name string",
            })?,
    };
    ctx.claim_decorator(&EMIT_DECORATOR);

    let function = (*method.function).to_owned();

    // Payload of the event: the arguments, then the return value
    let mut tuple: Vec<TsTupleElement> = Vec::with_capacity(function.params.len() + 1);
    let mut emit_args: Vec<ExprOrSpread> = vec![ExprOrSpread {
        spread: None,
        expr: str_lit(event.to_owned()),
    }];

    for param in function.params.iter() {
        match param_payload(&param.pat) {
            Some((element, arg)) => {
                tuple.push(element);
                emit_args.push(arg);
            }
            None => {
                ctx.warn(format!(
                    "a destructured parameter of `{name}` is not emitted by `{event}`"
                ));
            }
        }
    }

    let body_stmts = function
        .body
        .as_ref()
        .map(|body| body.stmts.to_owned())
        .unwrap_or_default();

    let mut returns = ReturnFinder::default();
    body_stmts.visit_with(&mut returns);

    let returns_value = match function.return_type {
        Some(ref ann) => !is_void(&ann.type_ann),
        None => returns.with_value,
    };

    let mut new_body = Vec::with_capacity(body_stmts.len() + 2);
    if returns_value {
        tuple.push(TsTupleElement {
            span: DUMMY_SP,
            label: Some(Pat::Ident(BindingIdent {
                id: "returnValue".into_ident(),
                type_ann: None,
            })),
            ty: function
                .return_type
                .as_ref()
                .map(|ann| resolved_type(&ann.type_ann, function.is_async))
                .unwrap_or_else(ts_any),
        });
    }

    if returns_value || returns.found {
        // The original body runs in its own function, so that `return` keeps working
        let body_fn = arrow_with_block(vec![], body_stmts, function.is_async);
        let mut value = Box::new(Expr::Call(call_expr(
            Box::new(Expr::Paren(ParenExpr {
                span: DUMMY_SP,
                expr: body_fn,
            })),
            vec![],
        )));
        if function.is_async {
            value = Box::new(Expr::Await(AwaitExpr {
                span: DUMMY_SP,
                arg: value,
            }));
        }

        if returns_value {
            new_body.push(const_decl(DUMMY_SP, EMIT_VALUE.to_owned(), value));
            emit_args.push(ExprOrSpread {
                spread: None,
                expr: Box::new(Expr::Ident(EMIT_VALUE.to_owned().into_ident())),
            });
        } else {
            new_body.push(expr_stmt(DUMMY_SP, value));
        }
    } else {
        new_body.extend(body_stmts);
    }

    let mut emit_call = call_expr(this_member(&DOLLAR_EMIT), vec![]);
    emit_call.args = emit_args;
    new_body.push(expr_stmt(DUMMY_SP, Box::new(Expr::Call(emit_call))));

    if returns_value {
        new_body.push(Stmt::Return(ReturnStmt {
            span: DUMMY_SP,
            arg: Some(Box::new(Expr::Ident(EMIT_VALUE.to_owned().into_ident()))),
        }));
    }

    let converted = Function {
        body: Some(block_stmt(new_body)),
        ..function
    };

    let contribution = TransformResult::macro_contribution(MacroContribution {
        macro_kind: MacroKind::Emits,
        type_properties: vec![TypeProperty {
            key: event,
            ty: Some(Box::new(TsType::TsTupleType(TsTupleType {
                span: DUMMY_SP,
                elem_types: tuple,
            }))),
            optional: false,
        }],
        defaults: vec![],
    });

    let method = method_result(name, converted, method.span, method.is_static, ctx);
    Ok(RuleOutcome::done(vec![contribution, method]))
}

/// Tuple element and call argument for a parameter
fn param_payload(pat: &Pat) -> Option<(TsTupleElement, ExprOrSpread)> {
    match pat {
        Pat::Ident(binding) => Some((
            TsTupleElement {
                span: DUMMY_SP,
                label: Some(Pat::Ident(BindingIdent {
                    id: binding.id.to_owned(),
                    type_ann: None,
                })),
                ty: binding
                    .type_ann
                    .as_ref()
                    .map(|ann| ann.type_ann.to_owned())
                    .unwrap_or_else(ts_any),
            },
            ExprOrSpread {
                spread: None,
                expr: Box::new(Expr::Ident(binding.id.to_owned())),
            },
        )),

        // `a = 1`
        Pat::Assign(assign) => param_payload(&assign.left),

        // `...rest: T[]`
        Pat::Rest(rest) => {
            let Pat::Ident(ref binding) = *rest.arg else {
                return None;
            };

            let rest_type = rest
                .type_ann
                .as_ref()
                .or(binding.type_ann.as_ref())
                .map(|ann| ann.type_ann.to_owned())
                .unwrap_or_else(|| {
                    Box::new(TsType::TsArrayType(TsArrayType {
                        span: DUMMY_SP,
                        elem_type: ts_any(),
                    }))
                });

            // Tuple members are either all labeled or none, so `...rest: T[]` keeps its label
            Some((
                TsTupleElement {
                    span: DUMMY_SP,
                    label: Some(Pat::Rest(RestPat {
                        span: DUMMY_SP,
                        dot3_token: DUMMY_SP,
                        arg: Box::new(Pat::Ident(BindingIdent {
                            id: binding.id.to_owned(),
                            type_ann: None,
                        })),
                        type_ann: None,
                    })),
                    ty: rest_type,
                },
                ExprOrSpread {
                    spread: Some(DUMMY_SP),
                    expr: Box::new(Expr::Ident(binding.id.to_owned())),
                },
            ))
        }

        // Destructuring patterns have no single value to emit
        _ => None,
    }
}

fn is_void(ty: &TsType) -> bool {
    matches!(
        ty,
        TsType::TsKeywordType(keyword) if keyword.kind == TsKeywordTypeKind::TsVoidKeyword
    ) || promise_inner(ty).is_some_and(is_void)
}

/// `Promise<T>` of an async method emits `T`
fn resolved_type(ty: &TsType, is_async: bool) -> Box<TsType> {
    match promise_inner(ty) {
        Some(inner) if is_async => Box::new(inner.to_owned()),
        _ => Box::new(ty.to_owned()),
    }
}

fn promise_inner(ty: &TsType) -> Option<&TsType> {
    let TsType::TsTypeRef(TsTypeRef {
        type_name,
        type_params: Some(params),
        ..
    }) = ty
    else {
        return None;
    };

    let TsEntityName::Ident(ident) = type_name else {
        return None;
    };
    if &*ident.sym != "Promise" {
        return None;
    }

    params.params.first().map(|param| &**param)
}

/// Looks for `return` statements of a function body, nested functions excluded
#[derive(Default)]
struct ReturnFinder {
    found: bool,
    with_value: bool,
}

impl Visit for ReturnFinder {
    fn visit_return_stmt(&mut self, n: &ReturnStmt) {
        self.found = true;
        self.with_value |= n.arg.is_some();
    }

    fn visit_function(&mut self, _n: &Function) {}

    fn visit_arrow_expr(&mut self, _n: &ArrowExpr) {}

    fn visit_class(&mut self, _n: &Class) {}
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{component, convert_ok};

    #[test]
    fn it_emits_arguments_and_return_value() {
        let output = convert_ok(&component(
            "count = 0;\n\
             @Emit()\n\
             resetCount(n: number): number { this.count = 0; return n; }",
        ));

        assert!(output.contains("const emit = defineEmits<{"));
        assert!(output.contains("\"reset-count\": [n: number, returnValue: number]"));
        assert!(output.contains("const emitValue = ("));
        assert!(output.contains("emit(\"reset-count\", n, emitValue);"));
        assert!(output.contains("return emitValue;"));
        assert!(output.contains("count.value = 0;"));
    }

    #[test]
    fn it_uses_the_given_event_name() {
        let output = convert_ok(&component("@Emit('change')\nnotify(value: string) {}"));
        assert!(output.contains("change: [value: string]"));
        assert!(output.contains("emit(\"change\", value);"));
        assert!(!output.contains("emitValue"));
    }
}
