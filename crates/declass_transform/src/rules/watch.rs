use declass_core::{
    arrow_returning, call, expr_stmt, key_value_prop, object_lit, prop_name_atom, property_access,
    unwrap_ts_node_expr, DeclassAtom, VueImports,
};
use swc_core::{
    common::DUMMY_SP,
    ecma::ast::{Bool, ClassMethod, Expr, FnExpr, Lit, ObjectLit, Prop, PropOrSpread},
};

use super::{callable_expr, this_expr, this_member, RuleOutcome};
use crate::{
    atoms::{DEEP, HANDLER, IMMEDIATE, WATCH_DECORATOR},
    context::TransformContext,
    decorators::find_all_decorators,
    error::TransformError,
    ReferenceKind, TransformResult, WatchCallback, WatchHandler,
};

/// `@Watch("a.b", { deep: true }) onChange() {}` becomes
/// `watch(() => this.a.b, this.onChange, { deep: true })`.
///
/// The method itself is converted by the following rules.
pub fn transform_watch_decorator(
    method: &ClassMethod,
    ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    let watchers = find_all_decorators(&method.function.decorators, &WATCH_DECORATOR, ctx);
    if watchers.is_empty() {
        return Ok(RuleOutcome::NotApplicable);
    }

    let Some(name) = prop_name_atom(&method.key) else {
        return Ok(RuleOutcome::NotApplicable);
    };

    let mut results = Vec::with_capacity(watchers.len());
    for watcher in watchers.iter() {
        let Some(path) = watcher.str_arg(0) else {
            return Err(TransformError::InvalidDecoratorArgument {
                decorator: WATCH_DECORATOR.to_owned(),
                expected: "a watched path string",
            });
        };

        let (immediate, deep) = match watcher.arg(1).map(unwrap_ts_node_expr) {
            None => (None, None),
            Some(Expr::Object(options)) => read_watch_flags(options),
            Some(_) => {
                return Err(TransformError::InvalidDecoratorArgument {
                    decorator: WATCH_DECORATOR.to_owned(),
                    expected: "an options object",
                })
            }
        };

        let handler = WatchHandler {
            callback: WatchCallback::Method(name.to_owned()),
            immediate,
            deep,
        };
        results.push(watch_result(&path, &handler));
    }

    ctx.claim_decorator(&WATCH_DECORATOR);
    Ok(RuleOutcome::proceed(results))
}

/// Normalizes every legacy watcher syntax to a list of handlers:
/// a method name, a function, an options object with `handler`, or an array of those.
pub fn normalize_watch(value: &Expr) -> Vec<WatchHandler> {
    match unwrap_ts_node_expr(value) {
        Expr::Lit(Lit::Str(method_name)) => vec![WatchHandler {
            callback: WatchCallback::Method(method_name.value.to_owned()),
            immediate: None,
            deep: None,
        }],

        Expr::Array(array) => array
            .elems
            .iter()
            .flatten()
            .filter(|elem| elem.spread.is_none())
            .flat_map(|elem| normalize_watch(&elem.expr))
            .collect(),

        Expr::Object(options) => {
            let (immediate, deep) = read_watch_flags(options);
            let callback = options.props.iter().find_map(|prop| {
                let PropOrSpread::Prop(prop) = prop else {
                    return None;
                };

                match **prop {
                    Prop::KeyValue(ref kv)
                        if prop_name_atom(&kv.key).as_ref() == Some(&*HANDLER) =>
                    {
                        match unwrap_ts_node_expr(&kv.value) {
                            Expr::Lit(Lit::Str(s)) => {
                                Some(WatchCallback::Method(s.value.to_owned()))
                            }
                            other => Some(WatchCallback::Callable(Box::new(other.to_owned()))),
                        }
                    }
                    Prop::Method(ref method)
                        if prop_name_atom(&method.key).as_ref() == Some(&*HANDLER) =>
                    {
                        Some(WatchCallback::Callable(Box::new(Expr::Fn(FnExpr {
                            ident: None,
                            function: method.function.to_owned(),
                        }))))
                    }
                    _ => None,
                }
            });

            callback
                .map(|callback| WatchHandler {
                    callback,
                    immediate,
                    deep,
                })
                .into_iter()
                .collect()
        }

        other => vec![WatchHandler {
            callback: WatchCallback::Callable(Box::new(other.to_owned())),
            immediate: None,
            deep: None,
        }],
    }
}

/// `watch(() => this.<path>, <callback>, { immediate, deep })`
pub fn watch_result(path: &str, handler: &WatchHandler) -> TransformResult {
    let source = path
        .split('.')
        .fold(this_expr(), |object, segment| property_access(object, segment));

    let callback = match handler.callback {
        WatchCallback::Method(ref method_name) => this_member(method_name),
        WatchCallback::Callable(ref expr) => callable_expr(expr),
    };

    let mut args = vec![arrow_returning(source), callback];

    let mut flags = Vec::new();
    if let Some(immediate) = handler.immediate {
        flags.push(key_value_prop(IMMEDIATE.to_owned(), bool_lit(immediate)));
    }
    if let Some(deep) = handler.deep {
        flags.push(key_value_prop(DEEP.to_owned(), bool_lit(deep)));
    }
    if !flags.is_empty() {
        args.push(object_lit(flags));
    }

    TransformResult::composition(
        "Watch",
        ReferenceKind::None,
        expr_stmt(DUMMY_SP, call(VueImports::Watch.as_atom(), args)),
    )
    .with_vue_import(VueImports::Watch)
}

/// Reads literal `immediate` and `deep` flags
fn read_watch_flags(options: &ObjectLit) -> (Option<bool>, Option<bool>) {
    let mut immediate = None;
    let mut deep = None;

    for prop in options.props.iter() {
        let PropOrSpread::Prop(prop) = prop else {
            continue;
        };
        let Prop::KeyValue(ref kv) = **prop else {
            continue;
        };
        let Expr::Lit(Lit::Bool(value)) = unwrap_ts_node_expr(&kv.value) else {
            continue;
        };

        let key: Option<DeclassAtom> = prop_name_atom(&kv.key);
        match key {
            Some(ref key) if *key == *IMMEDIATE => immediate = Some(value.value),
            Some(ref key) if *key == *DEEP => deep = Some(value.value),
            _ => {}
        }
    }

    (immediate, deep)
}

fn bool_lit(value: bool) -> Box<Expr> {
    Box::new(Expr::Lit(Lit::Bool(Bool {
        span: DUMMY_SP,
        value,
    })))
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{component, component_with_options, convert_err, convert_ok, ts};

    use super::*;

    #[test]
    fn it_normalizes_every_legacy_syntax() {
        let handlers = normalize_watch(&ts("'onChange'"));
        assert!(matches!(handlers[0].callback, WatchCallback::Method(ref m) if &**m == "onChange"));

        let handlers =
            normalize_watch(&ts("{ handler: 'onChange', immediate: true, deep: false }"));
        assert_eq!(handlers.len(), 1);
        assert_eq!(handlers[0].immediate, Some(true));
        assert_eq!(handlers[0].deep, Some(false));

        let handlers = normalize_watch(&ts("{ handler(v) { console.log(v) } }"));
        assert!(matches!(handlers[0].callback, WatchCallback::Callable(_)));

        let handlers = normalize_watch(&ts("['a', function () {}, { handler: 'b', deep: true }]"));
        assert_eq!(handlers.len(), 3);
        assert_eq!(handlers[2].deep, Some(true));
    }

    #[test]
    fn it_converts_watch_decorators() {
        let output = convert_ok(&component(
            "user = { name: '' };\n\
             @Watch('user.name', { immediate: true, deep: true })\n\
             onName(value: string) { console.log(value); }",
        ));
        assert!(output.contains("import { reactive, watch } from \"vue\";"));
        assert!(output.contains("user.name, onName, {"));
        assert!(output.contains("immediate: true"));
        assert!(output.contains("deep: true"));

        let declaration = output.find("const onName").expect("method");
        let watch = output.find("watch(").expect("watch");
        assert!(declaration < watch);
    }

    #[test]
    fn it_expands_watch_arrays() {
        let output = convert_ok(&component_with_options(
            "{ watch: { count: ['first', 'second', { handler: 'third', deep: true }] } }",
            "count = 0;\nfirst() {}\nsecond() {}\nthird() {}",
        ));
        assert_eq!(output.matches("watch(").count(), 3);
        assert_eq!(output.matches("count.value").count(), 3);
    }

    #[test]
    fn it_rejects_non_object_watch_options() {
        let error = convert_err(&component_with_options("{ watch: ['a'] }", ""));
        assert_eq!(
            error.to_string(),
            "invalid `watch` option: expected an object literal"
        );
    }
}
