use declass_core::{
    call, const_decl, expr_stmt, key_value_prop, object_lit, prop_name_atom, shorthand_prop,
    unwrap_ts_node_expr, DeclassAtom,
};
use swc_core::{
    common::DUMMY_SP,
    ecma::ast::{Expr, FnExpr, Lit, Prop, PropOrSpread},
};

use super::{
    props::{
        constructor_type, emits_contribution, props_contribution, read_prop_options_object,
        PropOptions,
    },
    unconverted_expr,
    watch::{normalize_watch, watch_result},
    ComponentOption, RuleOutcome,
};
use crate::{
    atoms::{COMPONENTS, DEFINE_EXPOSE, EMITS, EXPOSE, INHERIT_ATTRS, NAME, WATCH_OPTION},
    context::TransformContext,
    error::TransformError,
    sort_last_tag, OptionsEcho, ReferenceKind, ResultKind, TransformResult,
};

/// `props: ["a", "b"]` or `props: { a: String, b: { type: Number, default: 1 } }`
pub fn transform_props_option(
    option: &ComponentOption,
    _ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    if option.key != *crate::atoms::PROPS {
        return Ok(RuleOutcome::NotApplicable);
    }

    let invalid = || TransformError::InvalidOptionShape {
        option: option.key.to_owned(),
        expected: "a string array or an object literal",
    };

    let props: Vec<(DeclassAtom, PropOptions)> = match unwrap_ts_node_expr(&option.value) {
        Expr::Array(_) => string_array(&option.value)
            .ok_or_else(invalid)?
            .into_iter()
            .map(|name| (name, PropOptions::default()))
            .collect(),

        Expr::Object(object) => {
            let mut props = Vec::with_capacity(object.props.len());
            for prop in object.props.iter() {
                let PropOrSpread::Prop(prop) = prop else {
                    return Err(invalid());
                };
                let Prop::KeyValue(ref kv) = **prop else {
                    return Err(invalid());
                };
                let Some(name) = prop_name_atom(&kv.key) else {
                    return Err(invalid());
                };

                let options = match unwrap_ts_node_expr(&kv.value) {
                    Expr::Object(prop_options) => read_prop_options_object(prop_options),
                    other => PropOptions {
                        ty: constructor_type(other),
                        ..Default::default()
                    },
                };
                props.push((name, options));
            }
            props
        }

        _ => return Err(invalid()),
    };

    Ok(RuleOutcome::done(vec![props_contribution(props, None)]))
}

/// `emits: ["change"]`
pub fn transform_emits_option(
    option: &ComponentOption,
    _ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    if option.key != *EMITS {
        return Ok(RuleOutcome::NotApplicable);
    }

    let Some(events) = string_array(&option.value) else {
        return Err(TransformError::InvalidOptionShape {
            option: option.key.to_owned(),
            expected: "a string array",
        });
    };

    let events = events.into_iter().map(|event| (event, None)).collect();
    Ok(RuleOutcome::done(vec![emits_contribution(events)]))
}

/// `watch: { a: "onA", "b.c": [{ handler: "onB", deep: true }] }`,
/// every handler becomes a separate `watch` call
pub fn transform_watch_option(
    option: &ComponentOption,
    _ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    if option.key != *WATCH_OPTION {
        return Ok(RuleOutcome::NotApplicable);
    }

    let Expr::Object(watchers) = unwrap_ts_node_expr(&option.value) else {
        return Err(TransformError::InvalidOptionShape {
            option: option.key.to_owned(),
            expected: "an object literal",
        });
    };

    let mut results = Vec::new();
    for watcher in watchers.props.iter() {
        let PropOrSpread::Prop(watcher) = watcher else {
            continue;
        };

        let (path, handlers) = match **watcher {
            Prop::KeyValue(ref kv) => (prop_name_atom(&kv.key), normalize_watch(&kv.value)),
            // `a(value) {}`
            Prop::Method(ref method) => (
                prop_name_atom(&method.key),
                normalize_watch(&Expr::Fn(FnExpr {
                    ident: None,
                    function: method.function.to_owned(),
                })),
            ),
            _ => continue,
        };

        let Some(path) = path else {
            continue;
        };

        results.extend(handlers.iter().map(|handler| watch_result(&path, handler)));
    }

    Ok(RuleOutcome::done(results))
}

/// `expose: ["a", "b"]` becomes `defineExpose({ a, b })`, always at the end
pub fn transform_expose_option(
    option: &ComponentOption,
    _ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    if option.key != *EXPOSE {
        return Ok(RuleOutcome::NotApplicable);
    }

    let Some(names) = string_array(&option.value) else {
        return Err(TransformError::InvalidOptionShape {
            option: option.key.to_owned(),
            expected: "a string array",
        });
    };

    let exposed = names.into_iter().map(shorthand_prop).collect();
    let result = TransformResult::composition(
        sort_last_tag(1, "expose"),
        ReferenceKind::None,
        expr_stmt(
            DUMMY_SP,
            call(DEFINE_EXPOSE.to_owned(), vec![object_lit(exposed)]),
        ),
    );

    Ok(RuleOutcome::done(vec![result]))
}

/// `components: { Foo, Bar: Baz }`: components used in the template are resolved from
/// the setup scope, so only registrations under another name need a binding
pub fn transform_components_option(
    option: &ComponentOption,
    ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    if option.key != *COMPONENTS {
        return Ok(RuleOutcome::NotApplicable);
    }

    let Expr::Object(components) = unwrap_ts_node_expr(&option.value) else {
        return Err(TransformError::InvalidOptionShape {
            option: option.key.to_owned(),
            expected: "an object literal",
        });
    };

    let mut results = Vec::new();
    for component in components.props.iter() {
        let component = match component {
            PropOrSpread::Prop(component) => component,
            PropOrSpread::Spread(spread) => {
                results.push(unconverted_expr(
                    spread.expr.to_owned(),
                    "could not convert a spread in `components`, import these components in setup"
                        .to_owned(),
                    ctx,
                ));
                continue;
            }
        };
        let Prop::KeyValue(ref kv) = **component else {
            continue;
        };
        let Some(registered_name) = prop_name_atom(&kv.key) else {
            continue;
        };

        let value = unwrap_ts_node_expr(&kv.value);
        if matches!(value, Expr::Ident(ident) if ident.sym == registered_name) {
            continue;
        }

        let binding = pascal_case(&registered_name);
        results.push(
            TransformResult::composition(
                "Components",
                ReferenceKind::Variable,
                const_decl(DUMMY_SP, binding.to_owned(), kv.value.to_owned()),
            )
            .with_output(binding),
        );
    }

    Ok(RuleOutcome::done(results))
}

/// `name` and `inheritAttrs` end up in `defineOptions`
pub fn transform_define_options(
    option: &ComponentOption,
    _ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    if option.key != *NAME && option.key != *INHERIT_ATTRS {
        return Ok(RuleOutcome::NotApplicable);
    }

    Ok(RuleOutcome::done(vec![options_echo(option, true)]))
}

/// Options without a Composition API counterpart are kept as they are in `defineOptions`
pub fn transform_unknown_option(
    option: &ComponentOption,
    ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    ctx.warn(format!("could not convert component option `{}`", option.key));
    Ok(RuleOutcome::done(vec![options_echo(option, false)]))
}

/// Entries of the options object which no rule can read, e.g. `...base` or `get foo() {}`,
/// are kept in `defineOptions` as they are
pub fn unconverted_option(prop: &PropOrSpread, ctx: &mut TransformContext) -> TransformResult {
    let label: DeclassAtom = match prop {
        PropOrSpread::Spread(spread) => match unwrap_ts_node_expr(&spread.expr) {
            Expr::Ident(ident) => format!("...{}", ident.sym).into(),
            _ => "...".into(),
        },
        PropOrSpread::Prop(prop) => {
            let (prefix, key) = match **prop {
                Prop::Getter(ref getter) => ("get ", Some(&getter.key)),
                Prop::Setter(ref setter) => ("set ", Some(&setter.key)),
                Prop::KeyValue(ref kv) => ("", Some(&kv.key)),
                Prop::Method(ref method) => ("", Some(&method.key)),
                Prop::Shorthand(_) | Prop::Assign(_) => ("", None),
            };
            let key = key
                .and_then(prop_name_atom)
                .unwrap_or_else(|| "[computed]".into());
            format!("{prefix}{key}").into()
        }
    };

    ctx.warn(format!("could not convert component option `{label}`"));

    TransformResult::new(
        ResultKind::Options(Box::new(OptionsEcho {
            key: label.to_owned(),
            props: vec![prop.to_owned()],
            converted: false,
        })),
        format!("Options-{label}"),
        ReferenceKind::None,
    )
}

fn options_echo(option: &ComponentOption, converted: bool) -> TransformResult {
    TransformResult::new(
        ResultKind::Options(Box::new(OptionsEcho {
            key: option.key.to_owned(),
            props: vec![key_value_prop(option.key.to_owned(), option.value.to_owned())],
            converted,
        })),
        format!("Options-{}", option.key),
        ReferenceKind::None,
    )
}

/// Elements of an array of string literals
fn string_array(expr: &Expr) -> Option<Vec<DeclassAtom>> {
    let Expr::Array(array) = unwrap_ts_node_expr(expr) else {
        return None;
    };

    array
        .elems
        .iter()
        .map(|elem| match elem {
            Some(elem) if elem.spread.is_none() => match unwrap_ts_node_expr(&elem.expr) {
                Expr::Lit(Lit::Str(s)) => Some(s.value.to_owned()),
                _ => None,
            },
            _ => None,
        })
        .collect()
}

/// `my-button` is `MyButton`
fn pascal_case(name: &str) -> DeclassAtom {
    name.split(['-', '_'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<String>()
        .into()
}
