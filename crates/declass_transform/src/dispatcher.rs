//! Routes every part of the component class to the rules of its syntax kind

use declass_core::{prop_name_atom, DeclassAtom};
use swc_core::{
    common::Spanned,
    ecma::ast::{ClassMember, Decorator, Expr, FnExpr, MethodKind, Prop, PropOrSpread},
};

use crate::{
    component::ComponentModule,
    context::TransformContext,
    decorators::unclaimed_decorator_nodes,
    error::TransformError,
    rules::{
        instance::instance_dependencies, options::unconverted_option, unconverted_expr,
        unconverted_source, ComponentOption, RuleList, RuleOutcome, RuleTable,
    },
    TransformResult,
};

/// Dispatches the heritage clause, the component options and the class members,
/// in this order, and linearizes what the rules produced.
///
/// Instance properties accessed by the produced code are acquired by extra results at the end.
pub fn dispatch_component(
    component: &ComponentModule,
    rules: &RuleTable,
    ctx: &mut TransformContext,
) -> Result<Vec<TransformResult>, TransformError> {
    let mut results = Vec::new();

    if let Some(ref super_class) = component.class.super_class {
        if !run_rules(&rules.heritage, super_class, "extends", ctx, &mut results)? {
            results.push(unconverted_base_class(super_class, ctx));
        }
    }

    if let Some(ref options) = component.options {
        dispatch_options(&options.props, rules, ctx, &mut results)?;
    }

    for member in component.class.body.iter() {
        dispatch_member(member, rules, ctx, &mut results)?;
    }

    let dependencies = instance_dependencies(&results);
    results.extend(dependencies);

    Ok(results)
}

/// `key: value` entries run before `key() {}` entries, each group in source order
fn dispatch_options(
    props: &[PropOrSpread],
    rules: &RuleTable,
    ctx: &mut TransformContext,
    results: &mut Vec<TransformResult>,
) -> Result<(), TransformError> {
    let mut methods = Vec::new();

    for prop in props.iter() {
        let PropOrSpread::Prop(prop_value) = prop else {
            results.push(unconverted_option(prop, ctx));
            continue;
        };

        let option = match **prop_value {
            Prop::KeyValue(ref kv) => prop_name_atom(&kv.key).map(|key| ComponentOption {
                key,
                value: kv.value.to_owned(),
                span: kv.key.span(),
            }),

            Prop::Shorthand(ref ident) => Some(ComponentOption {
                key: ident.sym.to_owned(),
                value: Box::new(Expr::Ident(ident.to_owned())),
                span: ident.span,
            }),

            Prop::Method(ref method) => {
                match prop_name_atom(&method.key) {
                    Some(key) => methods.push(ComponentOption {
                        key,
                        value: Box::new(Expr::Fn(FnExpr {
                            ident: None,
                            function: method.function.to_owned(),
                        })),
                        span: method.key.span(),
                    }),
                    None => results.push(unconverted_option(prop, ctx)),
                }
                continue;
            }

            Prop::Getter(_) | Prop::Setter(_) => {
                results.push(unconverted_option(prop, ctx));
                continue;
            }

            Prop::Assign(_) => continue,
        };

        let Some(option) = option else {
            results.push(unconverted_option(prop, ctx));
            continue;
        };

        run_option(&rules.option_properties, &option, ctx, results)?;
    }

    for option in methods.iter() {
        run_option(&rules.option_methods, option, ctx, results)?;
    }

    Ok(())
}

fn run_option(
    rules: &RuleList<ComponentOption>,
    option: &ComponentOption,
    ctx: &mut TransformContext,
    results: &mut Vec<TransformResult>,
) -> Result<(), TransformError> {
    if !run_rules(rules, option, &option.key, ctx, results)? {
        ctx.warn(format!("component option `{}` was not converted", option.key));
    }
    Ok(())
}

fn dispatch_member(
    member: &ClassMember,
    rules: &RuleTable,
    ctx: &mut TransformContext,
    results: &mut Vec<TransformResult>,
) -> Result<(), TransformError> {
    let (name, handled) = match member {
        ClassMember::ClassProp(prop) => {
            let name = member_name(prop_name_atom(&prop.key));
            let handled = run_rules(&rules.properties, prop, &name, ctx, results)?;
            if handled {
                keep_unclaimed_decorators(&prop.decorators, &name, ctx, results);
            }
            (name, handled)
        }

        ClassMember::Method(method) => {
            let name = member_name(prop_name_atom(&method.key));
            let rule_list = match method.kind {
                MethodKind::Getter | MethodKind::Setter => &rules.accessors,
                MethodKind::Method => &rules.methods,
            };
            let handled = run_rules(rule_list, method, &name, ctx, results)?;
            if handled {
                keep_unclaimed_decorators(&method.function.decorators, &name, ctx, results);
            }
            (name, handled)
        }

        ClassMember::Constructor(constructor) => {
            let handled = run_rules(&rules.constructors, constructor, "constructor", ctx, results)?;
            ("constructor".into(), handled)
        }

        ClassMember::PrivateProp(prop) => {
            let what = format!("private property `#{}`", prop.key.name);
            results.push(unconverted_source(prop.span, &what, ctx));
            return Ok(());
        }

        ClassMember::PrivateMethod(method) => {
            let what = format!("private method `#{}`", method.key.name);
            results.push(unconverted_source(method.span, &what, ctx));
            return Ok(());
        }

        ClassMember::StaticBlock(block) => {
            results.push(unconverted_source(block.span, "a static block", ctx));
            return Ok(());
        }

        ClassMember::AutoAccessor(accessor) => {
            results.push(unconverted_source(accessor.span, "an `accessor` field", ctx));
            return Ok(());
        }

        ClassMember::TsIndexSignature(_) | ClassMember::Empty(_) => return Ok(()),
    };

    if !handled {
        results.push(unconverted_source(member.span(), &format!("member `{name}`"), ctx));
    }

    Ok(())
}

/// Decorators which the rule converting the member neither handled nor reported
fn keep_unclaimed_decorators(
    decorators: &[Decorator],
    member: &str,
    ctx: &mut TransformContext,
    results: &mut Vec<TransformResult>,
) {
    for (name, decorator) in unclaimed_decorator_nodes(decorators, ctx) {
        let what = format!("decorator `@{name}` of `{member}`");
        results.push(unconverted_source(decorator.span, &what, ctx));
    }
}

/// Tries the rules in order until one of them stops the dispatch.
/// Returns whether any rule handled the node.
fn run_rules<N: ?Sized>(
    rules: &RuleList<N>,
    node: &N,
    member: &str,
    ctx: &mut TransformContext,
    results: &mut Vec<TransformResult>,
) -> Result<bool, TransformError> {
    ctx.begin_member();
    let mut handled = false;

    for rule in rules.iter() {
        let RuleOutcome::Handled {
            should_continue,
            results: produced,
        } = rule.apply(node, ctx)?
        else {
            continue;
        };

        tracing::debug!(rule = rule.name(), member, results = produced.len(), "rule applied");
        handled = true;
        results.extend(produced);

        if !should_continue {
            break;
        }
    }

    Ok(handled)
}

/// The class is removed, so whatever it inherits is lost.
/// The base class is kept as a statement for the reader.
fn unconverted_base_class(super_class: &Expr, ctx: &mut TransformContext) -> TransformResult {
    unconverted_expr(
        Box::new(super_class.to_owned()),
        "could not convert the base class, its members are not available in setup".to_owned(),
        ctx,
    )
}

#[inline]
fn member_name(name: Option<DeclassAtom>) -> DeclassAtom {
    name.unwrap_or_else(|| "<computed>".into())
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{component, component_with_options, convert_ok, convert_with_warnings};

    #[test]
    fn it_runs_options_before_members() {
        let output = convert_ok(&component_with_options(
            "{ mounted() { console.log('options'); } }",
            "created() { console.log('class'); }",
        ));
        let options = output.find("console.log(\"options\")").expect("options hook");
        let class = output.find("console.log(\"class\")").expect("class hook");
        assert!(options < class);
    }

    #[test]
    fn it_continues_after_proceeding_rules() {
        let output = convert_ok(&component(
            "@Watch('a') onA() {}\n@Watch('b') @Watch('c') onBc() {}\na = 1;\nb = 2;\nc = 3;",
        ));
        assert_eq!(output.matches("watch(").count(), 3);
        assert!(output.contains("const onA = "));
        assert!(output.contains("const onBc = "));
    }

    #[test]
    fn it_keeps_private_members() {
        let (output, warnings) = convert_with_warnings(&component(
            "#secret = 42;\n#hash() { return 1; }\nvisible = 2;",
        ));
        assert!(output
            .contains("// TODO: could not convert private property `#secret`\n#secret = 42;"));
        assert!(output
            .contains("// TODO: could not convert private method `#hash`\n#hash() { return 1; }"));
        assert!(output.contains("const visible = ref(2);"));
        assert_eq!(
            warnings,
            vec![
                "could not convert private property `#secret`",
                "could not convert private method `#hash`",
            ]
        );
    }

    #[test]
    fn it_keeps_members_without_a_rule() {
        let (output, warnings) = convert_with_warnings(&component(
            "static {\n    console.log('boot');\n}\n['dyn' + 1]() { return 1; }\nkeep = 1;",
        ));
        assert!(output.contains(
            "// TODO: could not convert a static block\nstatic {\n    console.log('boot');\n}"
        ));
        assert!(output.contains("['dyn' + 1]() { return 1; }"));
        assert!(output.contains("const keep = ref(1);"));
        assert!(warnings.iter().any(|w| w == "could not convert member `<computed>`"));
    }

    #[test]
    fn it_keeps_decorators_no_rule_claimed() {
        let (output, warnings) = convert_with_warnings(&component(
            "@Prop({ default: 1 }) @Debounce(300) readonly size!: number;",
        ));
        assert!(output.contains("size?: number"));
        assert!(output.contains("// TODO: could not convert decorator `@Debounce` of `size`\n"));
        assert!(output.contains("@Debounce(300);"));
        assert_eq!(warnings, vec!["could not convert decorator `@Debounce` of `size`"]);
    }
}
