use declass_core::{unwrap_ts_node_expr, DeclassAtom};
use swc_core::ecma::ast::{Callee, Expr};

use super::{unconverted_expr, RuleOutcome};
use crate::{
    atoms::{MIXINS, VUE, VUE_CLASS},
    context::{MixinUse, TransformContext},
    error::TransformError,
    passes::mixin::composable_name,
    ImportRequirement, ReferenceKind, ResultKind, TransformResult,
};

/// `extends Vue` needs nothing
pub fn transform_vue_base(
    heritage: &Expr,
    ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    let Expr::Ident(ident) = unwrap_ts_node_expr(heritage) else {
        return Ok(RuleOutcome::NotApplicable);
    };

    let is_vue = ctx.canonical_name(&ident.sym) == *VUE_CLASS
        || ctx.import_source(&ident.sym) == Some(&*VUE);

    if is_vue {
        Ok(RuleOutcome::done(vec![]))
    } else {
        Ok(RuleOutcome::NotApplicable)
    }
}

/// `extends Mixins(A, B)` composes the composables the mixins were converted to
pub fn transform_mixins(
    heritage: &Expr,
    ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    let Expr::Call(call) = unwrap_ts_node_expr(heritage) else {
        return Ok(RuleOutcome::NotApplicable);
    };
    let Callee::Expr(ref callee) = call.callee else {
        return Ok(RuleOutcome::NotApplicable);
    };
    let Expr::Ident(ref callee_ident) = **callee else {
        return Ok(RuleOutcome::NotApplicable);
    };
    if ctx.canonical_name(&callee_ident.sym) != *MIXINS {
        return Ok(RuleOutcome::NotApplicable);
    }

    let mut results = Vec::with_capacity(call.args.len());
    for arg in call.args.iter() {
        let used = match unwrap_ts_node_expr(&arg.expr) {
            Expr::Ident(mixin) => use_mixin(mixin.sym.to_owned(), ctx),
            _ => None,
        };
        results.push(used.unwrap_or_else(|| {
            unconverted_expr(
                arg.expr.to_owned(),
                "could not convert a mixin which is not imported, \
                 its members are not available in setup"
                    .to_owned(),
                ctx,
            )
        }));
    }

    Ok(RuleOutcome::done(results))
}

/// `extends BaseComponent` is treated as a single mixin when it is imported
pub fn transform_base_class(
    heritage: &Expr,
    ctx: &mut TransformContext,
) -> Result<RuleOutcome, TransformError> {
    let Expr::Ident(base) = unwrap_ts_node_expr(heritage) else {
        return Ok(RuleOutcome::NotApplicable);
    };

    match use_mixin(base.sym.to_owned(), ctx) {
        Some(result) => Ok(RuleOutcome::done(vec![result])),
        None => Ok(RuleOutcome::NotApplicable),
    }
}

/// Registers a mixin and imports its composable from the module the mixin class came from.
/// The destructuring of the composable is produced once every `this` access is known.
///
/// Only imported classes have a composable, `None` is returned for the rest.
fn use_mixin(class: DeclassAtom, ctx: &mut TransformContext) -> Option<TransformResult> {
    let source = ctx.import_source(&class).cloned()?;
    let composable = composable_name(&class);

    ctx.mixins.push(MixinUse {
        class: class.to_owned(),
        composable: composable.to_owned(),
        source: source.to_owned(),
    });
    ctx.dropped_imports.insert(class);

    Some(
        TransformResult::new(ResultKind::Import, "Mixin-import", ReferenceKind::None).with_import(
            ImportRequirement::Named {
                source,
                name: composable,
            },
        ),
    )
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{convert_ok, convert_with_warnings};

    #[test]
    fn it_composes_mixins() {
        let output = convert_ok(
            r#"import { Component, Mixins } from "vue-property-decorator";
import CounterMixin from "./CounterMixin";

@Component
export default class Foo extends Mixins(CounterMixin) {
    double() { return this.count * 2; }
}
"#,
        );

        assert!(output.contains("import { useCounter } from \"./CounterMixin\";"));
        assert!(!output.contains("import CounterMixin"));
        assert!(output.contains("const { count } = useCounter();"));
        assert!(output.contains("return count * 2;"));
    }

    #[test]
    fn it_attributes_names_to_the_last_mixin() {
        let output = convert_ok(
            r#"import { Component, Mixins } from "vue-property-decorator";
import A from "./A";
import B from "./B";

@Component
export default class Foo extends Mixins(A, B) {
    sum() { return this.a + this.b; }
}
"#,
        );

        assert!(output.contains("import { useA } from \"./A\";"));
        assert!(output.contains("import { useB } from \"./B\";"));
        assert!(output.contains("useA();"));
        assert!(output.contains("const { a, b } = useB();"));
        assert!(output.contains("// TODO:"));
    }

    #[test]
    fn it_keeps_local_base_classes() {
        let (output, warnings) = convert_with_warnings(
            r#"import { Component, Vue } from "vue-property-decorator";

class Base {}

@Component
export default class Foo extends Base {
    a() { return this.x; }
}
"#,
        );

        assert!(!output.contains("useBase"));
        assert!(output.contains(
            "// TODO: could not convert the base class, its members are not available in setup\n\
             Base;"
        ));
        assert!(output.contains("this.x;"));
        assert!(warnings
            .iter()
            .any(|warning| warning.contains("could not convert the base class")));
        assert!(warnings.iter().any(|warning| warning == "unresolved `this.x`"));
    }

    #[test]
    fn it_keeps_mixins_which_are_not_imported() {
        let (output, warnings) = convert_with_warnings(
            r#"import { Component, Mixins } from "vue-property-decorator";
import A from "./A";

const Local = {};

@Component
export default class Foo extends Mixins(A, Local) {}
"#,
        );

        assert!(output.contains("import { useA } from \"./A\";"));
        assert!(!output.contains("useLocal"));
        assert!(output.contains("// TODO: could not convert a mixin which is not imported"));
        assert!(output.contains("\nLocal;"));
        assert_eq!(warnings.len(), 1);
    }
}
