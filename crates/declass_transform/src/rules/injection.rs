use declass_core::{
    call, call_with_type_arg, const_decl, expr_stmt, ident_expr, prop_name_atom, str_lit,
    unwrap_ts_node_expr, DeclassAtom, VueImports,
};
use swc_core::{
    common::DUMMY_SP,
    ecma::ast::{ClassProp, Expr, Prop, PropOrSpread},
};

use super::{declared_type, this_member, RuleOutcome};
use crate::{
    atoms::{DEFAULT, FROM, INJECT_DECORATOR, INJECT_REACTIVE, PROVIDE_DECORATOR, PROVIDE_REACTIVE},
    context::TransformContext,
    decorators::{find_decorator, DecoratorInfo},
    error::TransformError,
    ReferenceKind, TransformResult,
};

/// `@Inject("theme") readonly theme!: Theme` becomes `const theme = inject<Theme>("theme")`
pub fn transform_inject(
    prop: &ClassProp,
    ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    let Some(name) = prop_name_atom(&prop.key) else {
        return Ok(RuleOutcome::NotApplicable);
    };

    let (decorator, info) = match find_decorator(&prop.decorators, &INJECT_DECORATOR, &name, ctx)? {
        Some(info) => (INJECT_DECORATOR.to_owned(), info),
        None => match find_decorator(&prop.decorators, &INJECT_REACTIVE, &name, ctx)? {
            Some(info) => (INJECT_REACTIVE.to_owned(), info),
            None => return Ok(RuleOutcome::NotApplicable),
        },
    };

    let mut key = str_lit(name.to_owned());
    let mut default = None;

    match info.arg(0).map(unwrap_ts_node_expr) {
        None => {}
        Some(Expr::Lit(_)) | Some(Expr::Ident(_)) | Some(Expr::Member(_)) => {
            key = info.args[0].expr.to_owned();
        }
        // `{ from: "key", default: value }`
        Some(Expr::Object(options)) => {
            for option in options.props.iter() {
                let PropOrSpread::Prop(option) = option else {
                    continue;
                };
                let Prop::KeyValue(ref kv) = **option else {
                    continue;
                };
                match prop_name_atom(&kv.key) {
                    Some(ref k) if *k == *FROM => key = kv.value.to_owned(),
                    Some(ref k) if *k == *DEFAULT => default = Some(kv.value.to_owned()),
                    _ => {}
                }
            }
        }
        Some(_) => {
            return Err(TransformError::InvalidDecoratorArgument {
                decorator,
                expected: "an injection key or an options object",
            })
        }
    }
    ctx.claim_decorator(&decorator);

    let mut args = vec![key];
    args.extend(default);

    let result = TransformResult::composition(
        "Inject",
        ReferenceKind::Variable,
        const_decl(
            prop.span,
            name.to_owned(),
            call_with_type_arg(VueImports::Inject.as_atom(), declared_type(prop), args),
        ),
    )
    .with_output(name)
    .with_vue_import(VueImports::Inject);

    Ok(RuleOutcome::done(vec![result]))
}

/// `@Provide("key") foo = 1` emits `provide("key", this.foo)` and lets the data rule
/// declare `foo`. `@ProvideReactive` provides the binding itself instead of its value.
pub fn transform_provide(
    prop: &ClassProp,
    ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    let Some(name) = prop_name_atom(&prop.key) else {
        return Ok(RuleOutcome::NotApplicable);
    };

    let (decorator, info, reactive) =
        match find_decorator(&prop.decorators, &PROVIDE_DECORATOR, &name, ctx)? {
            Some(info) => (PROVIDE_DECORATOR.to_owned(), info, false),
            None => match find_decorator(&prop.decorators, &PROVIDE_REACTIVE, &name, ctx)? {
                Some(info) => (PROVIDE_REACTIVE.to_owned(), info, true),
                None => return Ok(RuleOutcome::NotApplicable),
            },
        };

    let key = provide_key(&info, &name, &decorator)?;
    ctx.claim_decorator(&decorator);

    let value = if reactive {
        ident_expr(name.to_owned())
    } else {
        this_member(&name)
    };

    let mut result = TransformResult::composition(
        "Provide",
        ReferenceKind::None,
        expr_stmt(
            DUMMY_SP,
            call(VueImports::Provide.as_atom(), vec![key, value]),
        ),
    )
    .with_vue_import(VueImports::Provide);

    if reactive {
        result.add_dependency(name);
    }

    Ok(RuleOutcome::proceed(vec![result]))
}

fn provide_key(
    info: &DecoratorInfo,
    name: &DeclassAtom,
    decorator: &DeclassAtom,
) -> Result<Box<Expr>, TransformError> {
    match info.arg(0).map(unwrap_ts_node_expr) {
        None => Ok(str_lit(name.to_owned())),
        Some(Expr::Lit(_) | Expr::Ident(_) | Expr::Member(_)) => Ok(info.args[0].expr.to_owned()),
        Some(_) => Err(TransformError::InvalidDecoratorArgument {
            decorator: decorator.to_owned(),
            expected: "an injection key",
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{component, convert_ok};

    #[test]
    fn it_converts_injections() {
        let output = convert_ok(&component(
            "@Inject('theme') readonly theme!: string;\n\
             @Inject({ from: 'locale', default: 'en' }) readonly lang!: string;\n\
             @Inject() readonly api!: Api;",
        ));
        assert!(output.contains("import { inject } from \"vue\";"));
        assert!(output.contains("const theme = inject<string>(\"theme\");"));
        assert!(output.contains("const lang = inject<string>(\"locale\", \"en\");"));
        assert!(output.contains("const api = inject<Api>(\"api\");"));
    }

    #[test]
    fn it_provides_after_declaring() {
        let output = convert_ok(&component("@Provide('color') color = 'red';"));
        assert!(output.contains("import { provide, ref } from \"vue\";"));

        let declaration = output.find("const color = ref(\"red\");").expect("data");
        let provide = output.find("provide(\"color\", color.value);").expect("provide");
        assert!(declaration < provide);
    }

    #[test]
    fn it_provides_reactive_bindings() {
        let output = convert_ok(&component("@ProvideReactive() state = { a: 1 };"));
        assert!(output.contains("provide(\"state\", state);"));
    }
}
