use declass_core::{
    call_with_type_arg, const_decl, prop_name_atom, unwrap_ts_node_expr, DeclassAtom, VueImports,
};
use swc_core::{
    common::{Span, DUMMY_SP},
    ecma::ast::{ClassProp, Expr, Lit, TsType, TsTypeElement},
};

use super::{declared_type, unconverted_source, RuleOutcome};
use crate::{
    atoms::{DOLLAR_REFS, REF_DECORATOR},
    context::TransformContext,
    decorators::find_decorator,
    error::TransformError,
    Access, ReferenceKind, TransformResult,
};

/// `$refs!: { input: HTMLInputElement }` declares one template ref per entry
pub fn transform_refs_declaration(
    prop: &ClassProp,
    ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    if prop_name_atom(&prop.key).as_ref() != Some(&*DOLLAR_REFS) {
        return Ok(RuleOutcome::NotApplicable);
    }

    let Some(TsType::TsTypeLit(type_lit)) = declared_type(prop).as_deref().cloned() else {
        let kept = unconverted_source(prop.span, "`$refs` without a type literal", ctx);
        return Ok(RuleOutcome::done(vec![kept]));
    };

    let mut results = Vec::with_capacity(type_lit.members.len());
    for member in type_lit.members.iter() {
        let TsTypeElement::TsPropertySignature(signature) = member else {
            continue;
        };

        let name: DeclassAtom = match unwrap_ts_node_expr(&signature.key) {
            Expr::Ident(ident) => ident.sym.to_owned(),
            Expr::Lit(Lit::Str(s)) => s.value.to_owned(),
            _ => continue,
        };

        let span = ctx.todo(
            DUMMY_SP,
            format!(
                "template ref `{name}` is matched by name, \
                 check it does not collide with other bindings"
            ),
        );
        let ty = signature.type_ann.as_ref().map(|ann| ann.type_ann.to_owned());

        results.push(template_ref_result(name.to_owned(), name, ty, span));
    }

    Ok(RuleOutcome::done(results))
}

/// `@Ref("input") readonly inputEl!: HTMLInputElement` becomes
/// `const inputEl = ref<HTMLInputElement>()`
pub fn transform_ref_decorator(
    prop: &ClassProp,
    ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    let Some(name) = prop_name_atom(&prop.key) else {
        return Ok(RuleOutcome::NotApplicable);
    };
    let Some(info) = find_decorator(&prop.decorators, &REF_DECORATOR, &name, ctx)? else {
        return Ok(RuleOutcome::NotApplicable);
    };

    let ref_key = match info.arg(0) {
        None => name.to_owned(),
        Some(_) => info.str_arg(0).ok_or_else(|| TransformError::InvalidDecoratorArgument {
            decorator: REF_DECORATOR.to_owned(),
            expected: "a ref name string",
        })?,
    };
    ctx.claim_decorator(&REF_DECORATOR);

    let mut span = prop.span;
    if ref_key != name {
        span = ctx.todo(
            span,
            format!("rename the template attribute `ref=\"{ref_key}\"` to `ref=\"{name}\"`"),
        );
    }

    let result = template_ref_result(ref_key, name, declared_type(prop), span);
    Ok(RuleOutcome::done(vec![result]))
}

fn template_ref_result(
    ref_key: DeclassAtom,
    name: DeclassAtom,
    ty: Option<Box<TsType>>,
    span: Span,
) -> TransformResult {
    let init = call_with_type_arg(VueImports::Ref.as_atom(), ty, vec![]);

    TransformResult::composition(
        "Data-templateRef",
        ReferenceKind::VariableValue,
        const_decl(span, name.to_owned(), init),
    )
    .with_output(name.to_owned())
    .with_vue_import(VueImports::Ref)
    .with_binding(name.to_owned(), Access::Value(name.to_owned()))
    .with_binding(
        format!("{}.{ref_key}", &*DOLLAR_REFS).into(),
        Access::Value(name),
    )
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{component, convert_ok, convert_with_warnings};

    #[test]
    fn it_splits_refs_declarations() {
        let output = convert_ok(&component(
            "$refs!: { input: HTMLInputElement; list: HTMLUListElement };\n\
             focus() { this.$refs.input.focus(); }",
        ));
        assert!(output.contains("const input = ref<HTMLInputElement>();"));
        assert!(output.contains("const list = ref<HTMLUListElement>();"));
        assert!(output.contains("// TODO: template ref `input` is matched by name"));
        assert!(output.contains("input.value.focus();"));
    }

    #[test]
    fn it_converts_ref_decorators() {
        let output = convert_ok(&component(
            "@Ref('field') readonly input!: HTMLInputElement;\n\
             focus() { this.input.focus(); this.$refs.field.blur(); }",
        ));
        assert!(output.contains("const input = ref<HTMLInputElement>();"));
        assert!(output.contains("rename the template attribute `ref=\"field\"` to `ref=\"input\"`"));
        assert!(output.contains("input.value.focus();"));
        assert!(output.contains("input.value.blur();"));
    }

    #[test]
    fn it_keeps_untyped_refs_declarations() {
        let (output, warnings) =
            convert_with_warnings(&component("$refs!: Record<string, Element>;"));
        assert!(output.contains("// TODO: could not convert `$refs` without a type literal\n"));
        assert!(output.contains("$refs!: Record<string, Element>;"));
        assert_eq!(warnings, vec!["could not convert `$refs` without a type literal"]);
    }
}
