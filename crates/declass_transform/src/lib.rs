use declass_core::CommentSink;
use error::TransformError;
use rules::RuleTable;
use swc_core::ecma::ast::Module;

#[macro_use]
extern crate lazy_static;

pub mod assembler;
pub mod atoms;
pub mod collisions;
pub mod component;
pub mod context;
pub mod decorators;
pub mod dispatcher;
pub mod error;
pub mod passes;
pub mod rules;
pub mod structs;

#[cfg(test)]
mod test_utils;

pub use structs::*;

use context::TransformContext;

/// Converts a module containing a class component.
///
/// Fails when the module has no class component, when a decorator or an option has a shape
/// which cannot be converted, or on naming collisions when `stop_on_collisions` is set.
/// Everything else which cannot be converted is reported in [`TransformOutput::warnings`]
/// and marked with a `// TODO:` comment registered in `comments`.
pub fn transform_script(
    module: Module,
    comments: &CommentSink,
    options: &TransformOptions,
) -> Result<TransformOutput, TransformError> {
    let mut ctx = TransformContext::new(options, comments);

    let component = component::analyze(module, &mut ctx)?;

    let rules = RuleTable::default();
    let results = dispatcher::dispatch_component(&component, &rules, &mut ctx)?;
    let results = passes::run_passes(results, &mut ctx);

    // Strict mode fails before anything is assembled
    let collision_report = collisions::detect_collisions(&results, &mut ctx)?;

    let module = assembler::assemble(component, results, &mut ctx);

    Ok(TransformOutput {
        module,
        collision_report,
        warnings: ctx.warnings,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{
        error::TransformError,
        test_utils::{component, convert_err, convert_ok, convert_with_warnings},
    };

    #[test]
    fn it_checks_preconditions() {
        let error = convert_err("import Vue from 'vue';\nexport default Vue.extend({});");
        assert!(matches!(error, TransformError::NoClassComponentImport));

        let error = convert_err(
            "import { Component, Vue } from 'vue-property-decorator';\nexport const a = 1;",
        );
        assert!(matches!(error, TransformError::NoDefaultExport));

        let error = convert_err(
            "import { Component, Vue } from 'vue-property-decorator';\n\
             @Component class Foo extends Vue { a = 1; }",
        );
        assert!(matches!(error, TransformError::NoDefaultExport));
    }

    #[test]
    fn it_converts_a_complete_component() {
        let output = convert_ok(&component(
            r#"@Prop({ default: 1 }) readonly step!: number;
@Emit('changed') update() { return this.count; }
count = 0;
items: string[] = [];
get double() { return this.count * 2; }
@Watch('count') onCount(value: number) { console.log(value, this.double); }
increment() { this.count += this.step; this.update(); }
mounted() { this.increment(); }"#,
        ));

        assert_eq!(
            output.lines().next(),
            Some("import { computed, onMounted, reactive, ref, watch } from \"vue\";")
        );

        let position = |needle: &str| {
            output
                .find(needle)
                .unwrap_or_else(|| panic!("`{needle}` not found in:\n{output}"))
        };
        assert!(position("const props = withDefaults(") < position("const emit = defineEmits<"));
        assert!(position("const count = ref(0);") < position("const double = computed("));
        assert!(position("const double = computed(") < position("const onCount = "));
        assert!(position("const update = ") < position("const increment = "));
        assert!(position("const increment = ") < position("onMounted("));
        assert!(output.contains("const items = reactive<string[]>([]);"));
        assert!(output.contains("count.value += props.step;"));
        assert!(output.contains("emit(\"changed\", emitValue);"));
        assert!(!output.contains("this."));
    }

    #[test]
    fn it_converts_despite_unsupported_constructs() {
        let (output, warnings) = convert_with_warnings(&component(
            "static #cache = new Map();\n\
             @Debounce(300) search() { return this.query; }\n\
             query = '';",
        ));

        assert!(output.contains("static #cache = new Map();"));
        assert!(output.contains("const query = ref(\"\");"));
        assert!(output.contains("// TODO: unsupported decorator @Debounce"));
        assert!(output.contains("return query.value;"));
        assert_eq!(warnings.len(), 2);
    }
}
