use declass_core::{
    binding_pat, block_stmt, expr_stmt, object_lit, shorthand_prop, ts_any, ts_type_ann,
    DeclassAtom, IntoIdent,
};
use swc_core::{
    common::DUMMY_SP,
    ecma::ast::{Decl, FnDecl, Function, Param, ReturnStmt, Stmt},
};

use super::macros::macro_type;
use crate::{
    atoms::{EMIT, PROPS},
    context::TransformContext,
    MacroKind, ReferenceKind, ResultKind, ResultNode, TransformResult,
};

/// `CounterMixin` is converted to `useCounter`
pub fn composable_name(class_name: &str) -> DeclassAtom {
    let base = match class_name.strip_suffix("Mixin") {
        Some(base) if !base.is_empty() => base,
        _ => class_name,
    };

    let mut name = String::with_capacity(base.len() + 3);
    name.push_str("use");
    let mut chars = base.chars();
    if let Some(first) = chars.next() {
        name.push(first.to_ascii_uppercase());
        name.push_str(chars.as_str());
    }
    name.into()
}

/// Wraps the converted class into `export function useX(props, emit) { ...; return { ... } }`.
///
/// Macros cannot be called from a composable, their bindings become parameters.
/// Options stay outside of the function, the assembler reports them.
pub fn wrap_into_composable(
    results: Vec<TransformResult>,
    ctx: &mut TransformContext,
) -> Vec<TransformResult> {
    let name = composable_name(ctx.class_name.as_deref().unwrap_or("Mixin"));

    let mut params: Vec<Param> = Vec::new();
    let mut stmts: Vec<Stmt> = Vec::with_capacity(results.len());
    let mut returned: Vec<DeclassAtom> = Vec::new();
    let mut outside: Vec<TransformResult> = Vec::new();
    let mut composable =
        TransformResult::new(ResultKind::Composition, "Composable-export", ReferenceKind::None)
            .with_output(name.to_owned());

    for result in results {
        for import in result.imports.iter() {
            composable = composable.with_import(import.to_owned());
        }

        match result.kind {
            ResultKind::Macro(ref contribution) => {
                let param_name = match contribution.macro_kind {
                    MacroKind::Props => PROPS.to_owned(),
                    MacroKind::Emits => EMIT.to_owned(),
                };
                let ty = match contribution.macro_kind {
                    MacroKind::Props => macro_type(contribution),
                    MacroKind::Emits => ts_any(),
                };
                if !contribution.defaults.is_empty() {
                    ctx.warn(format!(
                        "default values of the props of `{name}` were dropped, \
                         pass them from the component"
                    ));
                }

                params.push(Param {
                    span: DUMMY_SP,
                    decorators: vec![],
                    pat: binding_pat(param_name, Some(ts_type_ann(ty))),
                });
                continue;
            }

            ResultKind::Options(_) => {
                outside.push(result);
                continue;
            }

            _ => {}
        }

        if result.sort_last_priority().is_some() {
            ctx.warn(format!(
                "`{}` has no counterpart in a composable and was dropped",
                result.tag
            ));
            continue;
        }

        if matches!(result.kind, ResultKind::Composition)
            && result.reference != ReferenceKind::None
        {
            returned.extend(result.output_variables.iter().cloned());
        }

        stmts.extend(result.nodes.into_iter().map(|node| match node {
            ResultNode::Stmt(stmt) => stmt,
            ResultNode::Expr(expr) => expr_stmt(DUMMY_SP, expr),
            ResultNode::ExportDecl(decl) => Stmt::Decl(decl),
        }));
    }

    // Props come before emit, as in `setup(props, { emit })`
    params.sort_by_key(|param| {
        !matches!(param.pat.as_ident(), Some(binding) if binding.id.sym == *PROPS)
    });

    stmts.push(Stmt::Return(ReturnStmt {
        span: DUMMY_SP,
        arg: Some(object_lit(
            returned.into_iter().map(shorthand_prop).collect(),
        )),
    }));

    let function = Function {
        params,
        decorators: vec![],
        span: DUMMY_SP,
        ctxt: Default::default(),
        body: Some(block_stmt(stmts)),
        is_generator: false,
        is_async: false,
        type_params: None,
        return_type: None,
    };

    composable.nodes.push(ResultNode::ExportDecl(Decl::Fn(FnDecl {
        ident: name.into_ident(),
        declare: false,
        function: Box::new(function),
    })));

    outside.push(composable);
    outside
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{convert_ok, convert_with_warnings};

    #[test]
    fn it_names_composables() {
        assert_eq!(&*composable_name("CounterMixin"), "useCounter");
        assert_eq!(&*composable_name("Validation"), "useValidation");
        assert_eq!(&*composable_name("Mixin"), "useMixin");
        assert_eq!(&*composable_name("formMixin"), "useForm");
    }

    #[test]
    fn it_wraps_named_exports_into_composables() {
        let output = convert_ok(
            r#"import { Component, Prop, Vue } from "vue-property-decorator";

@Component
export class CounterMixin extends Vue {
    @Prop() readonly step!: number;
    count = 0;
    increment() { this.count += this.step; }
    mounted() { this.increment(); }
}
"#,
        );

        assert!(output.contains("import { onMounted, ref } from \"vue\";"));
        assert!(output.contains("export function useCounter(props: {"));
        assert!(output.contains("step?: number"));
        assert!(output.contains("const count = ref(0);"));
        assert!(output.contains("count.value += props.step;"));
        assert!(output.contains("increment()"));
        assert!(output.contains("return {"));
        assert!(!output.contains("defineProps"));
        assert!(!output.contains("class CounterMixin"));
    }

    #[test]
    fn it_drops_what_composables_cannot_express() {
        let (output, warnings) = convert_with_warnings(
            r#"import { Component, Vue } from "vue-property-decorator";

@Component({ expose: ["reset"] })
export default class ResetMixin extends Vue {
    reset() {}
}
"#,
        );

        assert!(output.contains("export function useReset()"));
        assert!(!output.contains("defineExpose"));
        assert!(warnings.iter().any(|w| w.contains("no counterpart in a composable")));
    }
}
