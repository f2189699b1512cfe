//! `vuex-class` bindings: `@State`, `@Getter`, `@Action`, `@Mutation`.
//!
//! Generated code accesses the store through `this.$store`,
//! the property access pass then acquires it with `useStore()`.

use declass_core::{
    arrow_returning, arrow_with_block, call_expr, call_with_type_arg, computed_member_expr,
    const_decl, member_expr, prop_name_atom, property_access, str_lit, template_with_suffix,
    ts_any, ts_type_ann, unwrap_ts_node_expr, DeclassAtom, IntoIdent, VueImports,
};
use swc_core::{
    common::DUMMY_SP,
    ecma::ast::{
        BindingIdent, ClassProp, Expr, Ident, Lit, ParenExpr, Pat, Prop, PropOrSpread, ReturnStmt,
        Stmt,
    },
};

use super::{declared_type, this_member, RuleOutcome};
use crate::{
    atoms::{ACTION, DOLLAR_STORE, GETTER, MUTATION, NAMESPACE, PAYLOAD, STATE},
    context::{NamespaceKey, TransformContext},
    decorators::{find_decorator, DecoratorInfo},
    error::TransformError,
    ReferenceKind, TransformResult,
};

/// `@State("count") count!: number` becomes `const count = computed(() => this.$store.state.count)`
pub fn transform_state(
    prop: &ClassProp,
    ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    let Some((name, info)) = find_store_decorator(prop, &STATE, ctx)? else {
        return Ok(RuleOutcome::NotApplicable);
    };

    let mut state = member_expr(this_member(&DOLLAR_STORE), "state".into());
    state = match namespace_of(&info) {
        None => state,
        Some(NamespaceKey::Literal(ns)) => ns
            .split('/')
            .filter(|segment| !segment.is_empty())
            .fold(state, |object, segment| property_access(object, segment)),
        Some(NamespaceKey::Variable(ns)) => computed_member_expr(state, ns),
    };

    let value = match info.arg(0).map(unwrap_ts_node_expr) {
        None => property_access(state, &name),
        Some(Expr::Lit(Lit::Str(key))) => property_access(state, &key.value),
        // `@State(state => state.user.name)`
        Some(mapper @ (Expr::Arrow(_) | Expr::Fn(_))) => Box::new(Expr::Call(call_expr(
            Box::new(Expr::Paren(ParenExpr {
                span: DUMMY_SP,
                expr: Box::new(mapper.to_owned()),
            })),
            vec![state],
        ))),
        Some(_) => {
            return Err(TransformError::InvalidDecoratorArgument {
                decorator: STATE.to_owned(),
                expected: "a state key or a mapping function",
            })
        }
    };

    ctx.claim_decorator(&STATE);
    Ok(RuleOutcome::done(vec![computed_result(prop, name, value)]))
}

/// `@user.Getter("fullName") fullName!: string` becomes
/// `const fullName = computed(() => this.$store.getters["user/fullName"])`
pub fn transform_getter(
    prop: &ClassProp,
    ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    let Some((name, info)) = find_store_decorator(prop, &GETTER, ctx)? else {
        return Ok(RuleOutcome::NotApplicable);
    };

    let key = store_key(&info, &name, &GETTER)?;
    let getters = member_expr(this_member(&DOLLAR_STORE), "getters".into());
    let value = match namespaced_key(&info, &key) {
        None => property_access(getters, &key),
        Some(path) => computed_member_expr(getters, path),
    };

    ctx.claim_decorator(&GETTER);
    Ok(RuleOutcome::done(vec![computed_result(prop, name, value)]))
}

/// `@Action("fetch") fetch!: (id: number) => Promise<void>` becomes
/// `const fetch = (payload?: any) => this.$store.dispatch("fetch", payload)`
pub fn transform_action(
    prop: &ClassProp,
    ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    store_method(prop, &ACTION, "dispatch", ctx)
}

/// Same as `@Action`, but commits a mutation
pub fn transform_mutation(
    prop: &ClassProp,
    ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    store_method(prop, &MUTATION, "commit", ctx)
}

fn store_method(
    prop: &ClassProp,
    decorator: &DeclassAtom,
    store_fn: &str,
    ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    let Some((name, info)) = find_store_decorator(prop, decorator, ctx)? else {
        return Ok(RuleOutcome::NotApplicable);
    };

    let key = store_key(&info, &name, decorator)?;
    let type_key = namespaced_key(&info, &key).unwrap_or_else(|| str_lit(key));

    let payload = PAYLOAD.to_owned();
    let call = call_expr(
        member_expr(this_member(&DOLLAR_STORE), store_fn.into()),
        vec![type_key, Box::new(Expr::Ident(payload.to_owned().into_ident()))],
    );

    let param = Pat::Ident(BindingIdent {
        id: Ident {
            optional: true,
            ..payload.into_ident()
        },
        type_ann: Some(ts_type_ann(ts_any())),
    });
    let arrow = arrow_with_block(
        vec![param],
        vec![Stmt::Return(ReturnStmt {
            span: DUMMY_SP,
            arg: Some(Box::new(Expr::Call(call))),
        })],
        false,
    );

    ctx.claim_decorator(decorator);

    let result = TransformResult::composition(
        "Vuex-method",
        ReferenceKind::Variable,
        const_decl(prop.span, name.to_owned(), arrow),
    )
    .with_output(name);

    Ok(RuleOutcome::done(vec![result]))
}

fn find_store_decorator<'p>(
    prop: &'p ClassProp,
    decorator: &DeclassAtom,
    ctx: &TransformContext,
) -> Result<Option<(DeclassAtom, DecoratorInfo<'p>)>, TransformError> {
    let Some(name) = prop_name_atom(&prop.key) else {
        return Ok(None);
    };

    Ok(find_decorator(&prop.decorators, decorator, &name, ctx)?.map(|info| (name, info)))
}

/// The key is the first argument, or the member name
fn store_key(
    info: &DecoratorInfo,
    name: &DeclassAtom,
    decorator: &DeclassAtom,
) -> Result<DeclassAtom, TransformError> {
    match info.arg(0) {
        None => Ok(name.to_owned()),
        Some(_) => info
            .str_arg(0)
            .ok_or_else(|| TransformError::InvalidDecoratorArgument {
                decorator: decorator.to_owned(),
                expected: "a store key string",
            }),
    }
}

/// Namespace of `@ns.Getter("key")` or `@Getter("key", { namespace: "ns" })`
fn namespace_of(info: &DecoratorInfo) -> Option<NamespaceKey> {
    if let Some(ref namespace) = info.namespace {
        return Some(namespace.to_owned());
    }

    let Some(Expr::Object(options)) = info.arg(1).map(unwrap_ts_node_expr) else {
        return None;
    };

    options.props.iter().find_map(|prop| {
        let PropOrSpread::Prop(prop) = prop else {
            return None;
        };
        let Prop::KeyValue(ref kv) = **prop else {
            return None;
        };
        if prop_name_atom(&kv.key).as_ref() != Some(&*NAMESPACE) {
            return None;
        }

        Some(match unwrap_ts_node_expr(&kv.value) {
            Expr::Lit(Lit::Str(s)) => NamespaceKey::Literal(s.value.to_owned()),
            other => NamespaceKey::Variable(Box::new(other.to_owned())),
        })
    })
}

/// `"ns/key"` for literal namespaces, `` `${ns}/key` `` for variables
fn namespaced_key(info: &DecoratorInfo, key: &str) -> Option<Box<Expr>> {
    match namespace_of(info)? {
        NamespaceKey::Literal(ns) => Some(str_lit(format!("{}/{key}", ns.trim_end_matches('/')))),
        NamespaceKey::Variable(ns) => Some(template_with_suffix(ns, &format!("/{key}"))),
    }
}

fn computed_result(prop: &ClassProp, name: DeclassAtom, value: Box<Expr>) -> TransformResult {
    TransformResult::composition(
        "Vuex-computed",
        ReferenceKind::VariableValue,
        const_decl(
            prop.span,
            name.to_owned(),
            call_with_type_arg(
                VueImports::Computed.as_atom(),
                declared_type(prop),
                vec![arrow_returning(value)],
            ),
        ),
    )
    .with_output(name)
    .with_vue_import(VueImports::Computed)
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{convert_ok, VUEX_COMPONENT};

    #[test]
    fn it_converts_store_bindings() {
        let output = convert_ok(&VUEX_COMPONENT.replace(
            "/*body*/",
            "@State('count') count!: number;\n\
             @Getter isReady!: boolean;\n\
             @Action('load') load!: () => Promise<void>;\n\
             @Mutation increment!: () => void;",
        ));

        assert!(output.contains("import { useStore } from \"vuex\";"));
        assert_eq!(output.matches("useStore()").count(), 1);
        assert!(output.contains("const store = useStore();"));
        assert!(output.contains("store.state.count"));
        assert!(output.contains("store.getters.isReady"));
        assert!(output.contains("store.dispatch(\"load\", payload)"));
        assert!(output.contains("store.commit(\"increment\", payload)"));
        assert!(output.contains("payload?: any"));
    }

    #[test]
    fn it_resolves_namespaces() {
        let output = convert_ok(&VUEX_COMPONENT.replace(
            "/*body*/",
            "@user.Getter('fullName') fullName!: string;\n\
             @user.State('id') id!: number;\n\
             @namespace(MODULE).Action('save') save!: () => void;\n\
             @Mutation('reset', { namespace: 'user' }) reset!: () => void;",
        ));

        assert!(output.contains("store.getters[\"user/fullName\"]"));
        assert!(output.contains("store.state.user.id"));
        assert!(output.contains("store.dispatch(`${MODULE}/save`, payload)"));
        assert!(output.contains("store.commit(\"user/reset\", payload)"));
        assert!(!output.contains("namespace("));
    }
}
