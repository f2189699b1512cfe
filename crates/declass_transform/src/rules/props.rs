use declass_core::{
    arrow_returning, arrow_with_block, binding_pat, call_expr, expr_stmt, function_to_arrow,
    prop_name_atom, str_lit, ts_any, ts_keyword, ts_type_ann, unwrap_ts_node_expr, DeclassAtom,
    IntoIdent, VueImports,
};
use swc_core::{
    common::DUMMY_SP,
    ecma::ast::{
        ClassProp, Expr, FnExpr, Lit, ObjectLit, ParenExpr, Prop, PropOrSpread, TsArrayType,
        TsEntityName, TsKeywordTypeKind, TsTupleElement, TsTupleType, TsType,
        TsTypeParamInstantiation, TsTypeRef, TsUnionOrIntersectionType, TsUnionType,
    },
};

use super::{declared_type, this_member, unconverted_expr, RuleOutcome};
use crate::{
    atoms::{DEFAULT, DOLLAR_EMIT, MODEL, PROPS, PROP, PROP_SYNC, REQUIRED, TYPE},
    context::TransformContext,
    decorators::find_decorator,
    error::TransformError,
    passes::computed::{COMPUTED_GETTER, COMPUTED_SETTER},
    Access, MacroContribution, MacroKind, ReferenceKind, ResultKind, ResultNode, TransformResult,
    TypeProperty,
};

/// What a prop declaration says about the prop
#[derive(Debug, Default)]
pub struct PropOptions {
    pub ty: Option<Box<TsType>>,
    pub default: Option<Box<Expr>>,
    pub required: bool,
}

/// `@Prop({ type: String, default: "a" }) readonly foo!: string` contributes `foo?: string`
/// to `defineProps` and `foo: "a"` to `withDefaults`
pub fn transform_prop(
    prop: &ClassProp,
    ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    let Some(name) = prop_name_atom(&prop.key) else {
        return Ok(RuleOutcome::NotApplicable);
    };
    let Some(info) = find_decorator(&prop.decorators, &PROP, &name, ctx)? else {
        return Ok(RuleOutcome::NotApplicable);
    };

    let mut options = read_prop_options(info.arg(0), &PROP)?;
    ctx.claim_decorator(&PROP);

    // `@Prop() readonly size: number = 1` means a default of 1
    let mut results = Vec::with_capacity(2);
    if let Some(ref value) = prop.value {
        if options.default.is_none() {
            options.default = Some(initializer_default(value));
        } else {
            results.push(unconverted_expr(
                value.to_owned(),
                format!(
                    "could not convert the initializer of prop `{name}`, it has a default value"
                ),
                ctx,
            ));
        }
    }

    results.insert(0, props_contribution(vec![(name, options)], declared_type(prop)));
    Ok(RuleOutcome::done(results))
}

/// `@PropSync("name") syncedName!: string` declares the `name` prop and a writable
/// `syncedName` computed which emits `update:name`
pub fn transform_prop_sync(
    prop: &ClassProp,
    ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    let Some(name) = prop_name_atom(&prop.key) else {
        return Ok(RuleOutcome::NotApplicable);
    };
    let Some(info) = find_decorator(&prop.decorators, &PROP_SYNC, &name, ctx)? else {
        return Ok(RuleOutcome::NotApplicable);
    };

    let Some(prop_name) = info.str_arg(0) else {
        return Err(TransformError::InvalidDecoratorArgument {
            decorator: PROP_SYNC.to_owned(),
            expected: "a prop name string",
        });
    };
    let options = read_prop_options(info.arg(1), &PROP_SYNC)?;
    ctx.claim_decorator(&PROP_SYNC);

    let declared = declared_type(prop);
    let value_type = declared.to_owned().or_else(|| options.ty.to_owned());
    let event: DeclassAtom = format!("update:{prop_name}").into();

    let props = props_contribution(vec![(prop_name.to_owned(), options)], declared);
    let emits = emits_contribution(vec![(event.to_owned(), value_type.to_owned())]);

    // get: () => this.name
    let mut getter = TransformResult::new(
        ResultKind::Composition,
        COMPUTED_GETTER,
        ReferenceKind::VariableValue,
    )
    .with_output(name.to_owned())
    .with_vue_import(VueImports::Computed);
    let mut getter_arrow = arrow_returning(this_member(&prop_name));
    if let Expr::Arrow(ref mut arrow) = *getter_arrow {
        arrow.span = prop.span;
    }
    getter.nodes.push(ResultNode::Expr(getter_arrow));

    // set: (value) => { this.$emit("update:name", value) }
    let value_param = binding_pat(
        "value".into(),
        value_type.map(ts_type_ann),
    );
    let emit_call = call_expr(
        this_member(&DOLLAR_EMIT),
        vec![
            str_lit(event),
            Box::new(Expr::Ident("value".into_ident())),
        ],
    );
    let setter_arrow = arrow_with_block(
        vec![value_param],
        vec![expr_stmt(DUMMY_SP, Box::new(Expr::Call(emit_call)))],
        false,
    );
    let mut setter = TransformResult::new(
        ResultKind::Composition,
        COMPUTED_SETTER,
        ReferenceKind::VariableValue,
    )
    .with_output(name)
    .with_vue_import(VueImports::Computed);
    setter.nodes.push(ResultNode::Expr(setter_arrow));

    Ok(RuleOutcome::done(vec![props, emits, getter, setter]))
}

/// `@Model("change", { type: Boolean }) readonly checked!: boolean` declares
/// the `checked` prop and the `change` event
pub fn transform_model(
    prop: &ClassProp,
    ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    let Some(name) = prop_name_atom(&prop.key) else {
        return Ok(RuleOutcome::NotApplicable);
    };
    let Some(info) = find_decorator(&prop.decorators, &MODEL, &name, ctx)? else {
        return Ok(RuleOutcome::NotApplicable);
    };

    let Some(event) = info.str_arg(0) else {
        return Err(TransformError::InvalidDecoratorArgument {
            decorator: MODEL.to_owned(),
            expected: "an event name string",
        });
    };
    let options = read_prop_options(info.arg(1), &MODEL)?;
    ctx.claim_decorator(&MODEL);

    ctx.warn(format!(
        "`v-model` on `{name}` binds `modelValue` and `update:modelValue` in Vue 3, \
         the parent must use `v-model:{name}`"
    ));

    let declared = declared_type(prop);
    let value_type = declared.to_owned().or_else(|| options.ty.to_owned());

    Ok(RuleOutcome::done(vec![
        props_contribution(vec![(name, options)], declared),
        emits_contribution(vec![(event, value_type)]),
    ]))
}

/// Reads the argument of `@Prop`: nothing, a constructor, an array of constructors or options
pub fn read_prop_options(
    arg: Option<&Expr>,
    decorator: &DeclassAtom,
) -> Result<PropOptions, TransformError> {
    let Some(arg) = arg else {
        return Ok(PropOptions::default());
    };

    match unwrap_ts_node_expr(arg) {
        Expr::Object(object) => Ok(read_prop_options_object(object)),
        Expr::Ident(_) | Expr::Array(_) => Ok(PropOptions {
            ty: constructor_type(arg),
            ..Default::default()
        }),
        _ => Err(TransformError::InvalidDecoratorArgument {
            decorator: decorator.to_owned(),
            expected: "a prop type or an options object",
        }),
    }
}

/// Objects and arrays need a factory to not be shared between instances
fn initializer_default(value: &Expr) -> Box<Expr> {
    let value = Box::new(value.to_owned());
    match unwrap_ts_node_expr(&value) {
        // An object literal body would read as a block
        Expr::Object(_) => arrow_returning(Box::new(Expr::Paren(ParenExpr {
            span: DUMMY_SP,
            expr: value,
        }))),
        Expr::Array(_) => arrow_returning(value),
        _ => value,
    }
}

/// `{ type: String, default: "a", required: true }`
pub fn read_prop_options_object(object: &ObjectLit) -> PropOptions {
    let mut options = PropOptions::default();

    for prop in object.props.iter() {
        let PropOrSpread::Prop(prop) = prop else {
            continue;
        };

        match **prop {
            Prop::KeyValue(ref kv) => {
                let Some(key) = prop_name_atom(&kv.key) else {
                    continue;
                };

                if key == *TYPE {
                    options.ty = constructor_type(&kv.value);
                } else if key == *DEFAULT {
                    options.default = Some(kv.value.to_owned());
                } else if key == *REQUIRED {
                    options.required = matches!(
                        unwrap_ts_node_expr(&kv.value),
                        Expr::Lit(Lit::Bool(b)) if b.value
                    );
                }
            }

            // `default() { return [] }`
            Prop::Method(ref method) if prop_name_atom(&method.key).as_ref() == Some(&*DEFAULT) => {
                let arrow = function_to_arrow((*method.function).to_owned());
                options.default = Some(Box::new(Expr::Arrow(arrow)));
            }

            _ => {}
        }
    }

    // Defaults written as `function () {}` are factories, as arrows they keep working
    if let Some(Expr::Fn(FnExpr { ref function, .. })) = options.default.as_deref() {
        let arrow = function_to_arrow((**function).to_owned());
        options.default = Some(Box::new(Expr::Arrow(arrow)));
    }

    options
}

/// TypeScript type of a runtime prop type, e.g. `String` is `string`
pub fn constructor_type(expr: &Expr) -> Option<Box<TsType>> {
    match expr {
        Expr::Ident(ident) => Some(match &*ident.sym {
            "String" => ts_keyword(TsKeywordTypeKind::TsStringKeyword),
            "Number" => ts_keyword(TsKeywordTypeKind::TsNumberKeyword),
            "Boolean" => ts_keyword(TsKeywordTypeKind::TsBooleanKeyword),
            "Symbol" => ts_keyword(TsKeywordTypeKind::TsSymbolKeyword),
            "BigInt" => ts_keyword(TsKeywordTypeKind::TsBigIntKeyword),
            "Array" => Box::new(TsType::TsArrayType(TsArrayType {
                span: DUMMY_SP,
                elem_type: ts_any(),
            })),
            "Object" => type_ref(
                "Record",
                vec![
                    ts_keyword(TsKeywordTypeKind::TsStringKeyword),
                    ts_any(),
                ],
            ),
            // `Date`, `Function`, user classes
            _ => type_ref(&ident.sym, vec![]),
        }),

        Expr::Array(array) => {
            let types = array
                .elems
                .iter()
                .map(|elem| elem.as_ref().and_then(|elem| constructor_type(&elem.expr)))
                .collect::<Option<Vec<_>>>()?;

            match types.len() {
                0 => None,
                1 => types.into_iter().next(),
                _ => Some(Box::new(TsType::TsUnionOrIntersectionType(
                    TsUnionOrIntersectionType::TsUnionType(TsUnionType {
                        span: DUMMY_SP,
                        types,
                    }),
                ))),
            }
        }

        // `Object as PropType<User>`
        Expr::TsAs(ts_as) => match *ts_as.type_ann {
            TsType::TsTypeRef(TsTypeRef {
                type_name: TsEntityName::Ident(ref name),
                type_params: Some(ref params),
                ..
            }) if &*name.sym == "PropType" => params.params.first().cloned(),
            _ => constructor_type(&ts_as.expr),
        },

        Expr::Paren(paren) => constructor_type(&paren.expr),

        _ => None,
    }
}

fn type_ref(name: &str, params: Vec<Box<TsType>>) -> Box<TsType> {
    Box::new(TsType::TsTypeRef(TsTypeRef {
        span: DUMMY_SP,
        type_name: TsEntityName::Ident(name.into_ident()),
        type_params: if params.is_empty() {
            None
        } else {
            Some(Box::new(TsTypeParamInstantiation {
                span: DUMMY_SP,
                params,
            }))
        },
    }))
}

/// Contribution to `defineProps`.
/// `declared` is the type annotation of the class member and wins over runtime types.
pub fn props_contribution(
    props: Vec<(DeclassAtom, PropOptions)>,
    declared: Option<Box<TsType>>,
) -> TransformResult {
    let mut contribution = MacroContribution {
        macro_kind: MacroKind::Props,
        type_properties: Vec::with_capacity(props.len()),
        defaults: Vec::new(),
    };
    let mut bindings = Vec::with_capacity(props.len());

    for (name, options) in props {
        contribution.type_properties.push(TypeProperty {
            key: name.to_owned(),
            ty: declared.to_owned().or(options.ty),
            optional: !options.required,
        });
        if let Some(default) = options.default {
            contribution.defaults.push((name.to_owned(), default));
        }
        bindings.push(name);
    }

    bindings
        .into_iter()
        .fold(TransformResult::macro_contribution(contribution), |result, name| {
            result.with_binding(
                name.to_owned(),
                Access::Member {
                    object: PROPS.to_owned(),
                    property: name,
                },
            )
        })
}

/// Contribution to `defineEmits`, each event carries a single value
pub fn emits_contribution(events: Vec<(DeclassAtom, Option<Box<TsType>>)>) -> TransformResult {
    let type_properties = events
        .into_iter()
        .map(|(event, value_type)| TypeProperty {
            key: event,
            ty: value_type.map(|ty| {
                Box::new(TsType::TsTupleType(TsTupleType {
                    span: DUMMY_SP,
                    elem_types: vec![TsTupleElement {
                        span: DUMMY_SP,
                        label: Some(binding_pat("value".into(), None)),
                        ty,
                    }],
                }))
            }),
            optional: false,
        })
        .collect();

    TransformResult::macro_contribution(MacroContribution {
        macro_kind: MacroKind::Emits,
        type_properties,
        defaults: vec![],
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_utils::{component, convert_err, convert_ok, convert_with_warnings, to_str, ts};

    #[test]
    fn it_maps_runtime_types() {
        let ty = constructor_type(&ts("String")).expect("string");
        assert_eq!(to_str(&*ty), "string");

        let ty = constructor_type(&ts("[String, Number]")).expect("union");
        assert_eq!(to_str(&*ty), "string|number");

        let ty = constructor_type(&ts("Object as PropType<User>")).expect("prop type");
        assert_eq!(to_str(&*ty), "User");
    }

    #[test]
    fn it_merges_props_with_defaults() {
        let output = convert_ok(&component(
            "@Prop({ type: String, default: 'a' }) readonly title!: string;\n\
             @Prop({ required: true }) readonly id!: number;\n\
             @Prop(Boolean) readonly active?: boolean;\n\
             get label() { return this.title + this.id; }",
        ));

        assert!(output.contains("const props = withDefaults(defineProps<{"));
        assert!(output.contains("title?: string"));
        assert!(output.contains("id: number"));
        assert!(output.contains("active?: boolean"));
        assert!(output.contains("title: \"a\""));
        assert!(output.contains("props.title + props.id"));
        assert_eq!(output.matches("defineProps").count(), 1);
    }

    #[test]
    fn it_reads_defaults_from_initializers() {
        let output = convert_ok(&component(
            "@Prop() readonly size: number = 5;\n\
             @Prop() readonly tags: string[] = ['a'];\n\
             @Prop() readonly config: Config = { dense: true };",
        ));
        assert!(output.contains("size?: number"));
        assert!(output.contains("size: 5"));
        assert!(output.contains("tags: () => ["));
        assert!(output.contains("config: () => ({"));
        assert!(!output.contains("const size"));
    }

    #[test]
    fn it_keeps_initializers_next_to_defaults() {
        let (output, warnings) = convert_with_warnings(&component(
            "@Prop({ default: 1 }) readonly p: number = 5;\nkeep = 1;",
        ));
        assert!(output.contains("p: 1"));
        assert!(output.contains(
            "// TODO: could not convert the initializer of prop `p`, it has a default value\n5;"
        ));
        assert!(output.contains("const keep = ref(1);"));
        assert_eq!(
            warnings,
            vec!["could not convert the initializer of prop `p`, it has a default value"]
        );
    }

    #[test]
    fn it_syncs_props() {
        let output = convert_ok(&component(
            "@PropSync('name', { type: String }) syncedName!: string;",
        ));
        assert!(output.contains("name?: string"));
        assert!(output.contains("\"update:name\": [value: string]"));
        assert!(output.contains("const syncedName = computed({"));
        assert!(output.contains("props.name"));
        assert!(output.contains("emit(\"update:name\", value);"));
    }

    #[test]
    fn it_rejects_duplicate_props() {
        let error = convert_err(&component("@Prop() @Prop() readonly a!: string;"));
        assert_eq!(error.to_string(), "duplicate @Prop decorator on `a`");
    }

    #[test]
    fn it_rejects_invalid_prop_arguments() {
        let error = convert_err(&component("@Prop('a') readonly a!: string;"));
        assert!(error.to_string().starts_with("invalid argument of @Prop"));
    }
}
