//! Builds the output module from the sorted results and the passthrough items

use declass_core::{
    call, expr_stmt, object_lit, prop_name_atom, DeclassAtom, IntoIdent, VueImportsSet,
};
use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;
use swc_core::{
    common::DUMMY_SP,
    ecma::{
        ast::{
            ExportDecl, Ident, ImportDecl, ImportDefaultSpecifier, ImportNamedSpecifier,
            ImportSpecifier, Module, ModuleDecl, ModuleItem, PropOrSpread, Stmt, Str,
        },
        visit::{VisitMut, VisitMutWith},
    },
};

use crate::{
    atoms::{DEFINE_OPTIONS, VUE},
    component::ComponentModule,
    context::TransformContext,
    ImportRequirement, ResultKind, ResultNode, TransformResult,
};

/// Imports the generated code needs, grouped by source
#[derive(Default)]
struct ImportRequirements {
    vue: VueImportsSet,
    named: IndexMap<DeclassAtom, IndexSet<DeclassAtom>>,
    defaults: IndexMap<DeclassAtom, DeclassAtom>,
}

impl ImportRequirements {
    fn add(&mut self, requirement: &ImportRequirement) {
        match requirement {
            ImportRequirement::Vue(vue_import) => self.vue |= *vue_import,
            ImportRequirement::Named { source, name } => {
                self.named
                    .entry(source.to_owned())
                    .or_default()
                    .insert(name.to_owned());
            }
            ImportRequirement::Default { source, local } => {
                self.defaults
                    .entry(source.to_owned())
                    .or_insert_with(|| local.to_owned());
            }
        }
    }
}

/// Assembles the imports, the items before the class, `defineOptions`,
/// the converted code and the items after the class, in this order
pub fn assemble(
    component: ComponentModule,
    results: Vec<TransformResult>,
    ctx: &mut TransformContext,
) -> Module {
    let ComponentModule {
        imports,
        before,
        after,
        shebang,
        ..
    } = component;

    let mut requirements = ImportRequirements::default();
    for import in results.iter().flat_map(|result| result.imports.iter()) {
        requirements.add(import);
    }

    let (passthrough, user_vue_specifiers) = merge_passthrough(imports, &mut requirements, ctx);

    let mut body: Vec<ModuleItem> = Vec::with_capacity(results.len() + passthrough.len() + 4);
    body.extend(vue_import(requirements.vue, user_vue_specifiers));
    body.extend(generated_imports(requirements));
    body.extend(passthrough);
    body.extend(before);

    let mut options: Vec<PropOrSpread> = Vec::new();
    let mut unconverted: Vec<DeclassAtom> = Vec::new();
    let mut generated: Vec<ModuleItem> = Vec::with_capacity(results.len());

    for result in results {
        if let ResultKind::Options(echo) = result.kind {
            if !echo.converted {
                unconverted.push(echo.key.to_owned());
            }
            options.extend(echo.props);
            continue;
        }

        generated.extend(result.nodes.into_iter().map(|node| match node {
            ResultNode::Stmt(stmt) => ModuleItem::Stmt(stmt),
            ResultNode::Expr(expr) => ModuleItem::Stmt(expr_stmt(DUMMY_SP, expr)),
            ResultNode::ExportDecl(decl) => {
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(ExportDecl {
                    span: DUMMY_SP,
                    decl,
                }))
            }
        }));
    }

    if let Some(define_options) = define_options(options, &unconverted, ctx) {
        generated.insert(0, ModuleItem::Stmt(define_options));
    }

    generated.visit_mut_with(&mut GeneratedLiterals);
    body.extend(generated);
    body.extend(after);

    Module {
        span: DUMMY_SP,
        body,
        shebang,
    }
}

/// Filters the passthrough imports and merges generated requirements into them.
///
/// Returns the kept imports and the specifiers of named `vue` imports,
/// which join the generated `vue` import.
fn merge_passthrough(
    imports: Vec<ImportDecl>,
    requirements: &mut ImportRequirements,
    ctx: &TransformContext,
) -> (Vec<ModuleItem>, Vec<ImportSpecifier>) {
    let mut kept = Vec::with_capacity(imports.len());
    let mut user_vue_specifiers = Vec::new();

    for mut import in imports {
        let had_specifiers = !import.specifiers.is_empty();
        import
            .specifiers
            .retain(|specifier| !ctx.dropped_imports.contains(&specifier_local(specifier).sym));
        if had_specifiers && import.specifiers.is_empty() {
            continue;
        }

        let source = import.src.value.to_owned();

        if source == *VUE && !import.type_only {
            let (named, rest): (Vec<_>, Vec<_>) = import
                .specifiers
                .into_iter()
                .partition(|specifier| matches!(specifier, ImportSpecifier::Named(_)));

            for specifier in named {
                let local = &specifier_local(&specifier).sym;
                let generated = requirements.vue.into_iter().any(|v| v.as_str() == &**local);
                if !generated {
                    user_vue_specifiers.push(specifier);
                }
            }

            if rest.is_empty() {
                continue;
            }
            import.specifiers = rest;
        }

        let can_merge = !import.type_only
            && !import
                .specifiers
                .iter()
                .any(|specifier| matches!(specifier, ImportSpecifier::Namespace(_)));

        if can_merge && source != *VUE {
            if let Some(names) = requirements.named.shift_remove(&source) {
                for name in names {
                    let already_imported = import
                        .specifiers
                        .iter()
                        .any(|specifier| specifier_local(specifier).sym == name);
                    if !already_imported {
                        import.specifiers.push(named_specifier(name));
                    }
                }
            }

            if let Some(local) = requirements.defaults.shift_remove(&source) {
                let has_default = import
                    .specifiers
                    .iter()
                    .any(|specifier| matches!(specifier, ImportSpecifier::Default(_)));
                if !has_default {
                    import.specifiers.insert(0, default_specifier(local));
                }
            }
        }

        kept.push(ModuleItem::ModuleDecl(ModuleDecl::Import(import)));
    }

    (kept, user_vue_specifiers)
}

/// `import { computed, ref, ... } from "vue"`, user specifiers last
fn vue_import(vue: VueImportsSet, user_specifiers: Vec<ImportSpecifier>) -> Option<ModuleItem> {
    let mut specifiers: Vec<ImportSpecifier> = vue
        .into_iter()
        .map(|vue_import| named_specifier(vue_import.as_atom()))
        .collect();
    specifiers.extend(user_specifiers);

    if specifiers.is_empty() {
        return None;
    }

    Some(import_item(VUE.to_owned(), specifiers))
}

/// Imports of every other source, in the order they were first required
fn generated_imports(requirements: ImportRequirements) -> Vec<ModuleItem> {
    let ImportRequirements {
        named,
        mut defaults,
        ..
    } = requirements;

    let mut items = Vec::with_capacity(named.len() + defaults.len());

    for (source, names) in named {
        let mut specifiers: Vec<ImportSpecifier> = Vec::with_capacity(names.len() + 1);
        if let Some(local) = defaults.shift_remove(&source) {
            specifiers.push(default_specifier(local));
        }
        specifiers.extend(names.into_iter().sorted_by(|a, b| str::cmp(a, b)).map(named_specifier));
        items.push(import_item(source, specifiers));
    }

    for (source, local) in defaults {
        items.push(import_item(source, vec![default_specifier(local)]));
    }

    items
}

/// One `defineOptions({ ... })` for every option without a Composition API counterpart
fn define_options(
    props: Vec<PropOrSpread>,
    unconverted: &[DeclassAtom],
    ctx: &mut TransformContext,
) -> Option<Stmt> {
    if props.is_empty() {
        return None;
    }

    if ctx.is_mixin {
        let keys = props
            .iter()
            .filter_map(|prop| prop.as_prop()?.as_key_value())
            .filter_map(|kv| prop_name_atom(&kv.key))
            .join(", ");
        ctx.warn(format!("options {keys} cannot be set from a composable and were dropped"));
        return None;
    }

    // The fallback rule already reported every unconverted option
    let span = if unconverted.is_empty() {
        DUMMY_SP
    } else {
        ctx.comments.line_comment(
            DUMMY_SP,
            &format!("TODO: could not convert option {}", unconverted.iter().join(", ")),
        )
    };

    Some(expr_stmt(span, call(DEFINE_OPTIONS.to_owned(), vec![object_lit(props)])))
}

#[inline]
fn specifier_local(specifier: &ImportSpecifier) -> &Ident {
    match specifier {
        ImportSpecifier::Named(named) => &named.local,
        ImportSpecifier::Default(default) => &default.local,
        ImportSpecifier::Namespace(namespace) => &namespace.local,
    }
}

#[inline]
fn named_specifier(name: DeclassAtom) -> ImportSpecifier {
    ImportSpecifier::Named(ImportNamedSpecifier {
        span: DUMMY_SP,
        local: name.into_ident(),
        imported: None,
        is_type_only: false,
    })
}

#[inline]
fn default_specifier(local: DeclassAtom) -> ImportSpecifier {
    ImportSpecifier::Default(ImportDefaultSpecifier {
        span: DUMMY_SP,
        local: local.into_ident(),
    })
}

fn import_item(source: DeclassAtom, specifiers: Vec<ImportSpecifier>) -> ModuleItem {
    ModuleItem::ModuleDecl(ModuleDecl::Import(ImportDecl {
        span: DUMMY_SP,
        specifiers,
        src: Box::new(Str {
            span: DUMMY_SP,
            value: source,
            raw: None,
        }),
        type_only: false,
        with: None,
        phase: Default::default(),
    }))
}

/// Generated code prints string literals with the default quotes
struct GeneratedLiterals;

impl VisitMut for GeneratedLiterals {
    fn visit_mut_str(&mut self, n: &mut Str) {
        n.raw = None;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::test_utils::{component, component_with_options, convert_ok, convert_with_warnings};

    #[test]
    fn it_assembles_a_simple_component() {
        assert_eq!(
            convert_ok(&component("foo = 'hello world';")),
            "import { ref } from \"vue\";\nconst foo = ref(\"hello world\");\n"
        );
    }

    #[test]
    fn it_keeps_passthrough_items_in_place() {
        let source = component("a = LIMIT;")
            .replace(
                "\n@Component",
                "\nimport { api } from './api';\nimport './styles.css';\nconst LIMIT = 10;\n\n@Component",
            )
            + "\nexport const helper = 1;\n";
        let output = convert_ok(&source);

        assert_eq!(
            output,
            "import { ref } from \"vue\";\n\
             import { api } from './api';\n\
             import './styles.css';\n\
             const LIMIT = 10;\n\
             const a = ref(LIMIT);\n\
             export const helper = 1;\n"
        );
    }

    #[test]
    fn it_merges_vue_imports() {
        let source = component("@Prop() readonly item!: Item;\ncount = 0;").replace(
            "\n@Component",
            "\nimport { PropType, ref } from 'vue';\n\n@Component",
        );
        let output = convert_ok(&source);
        assert!(output.starts_with("import { ref, PropType } from \"vue\";\n"));
    }

    #[test]
    fn it_merges_requirements_into_existing_imports() {
        let source = component("go() { this.$router.push('/'); }").replace(
            "\n@Component",
            "\nimport { RouteLocation } from 'vue-router';\n\n@Component",
        );
        let output = convert_ok(&source);
        assert!(output.contains("import { RouteLocation, useRouter } from 'vue-router';"));
        assert_eq!(output.matches("vue-router").count(), 1);
    }

    #[test]
    fn it_comments_unconverted_options() {
        let (output, warnings) = convert_with_warnings(&component_with_options(
            "{ name: 'Foo', filters: {} }",
            "",
        ));
        assert!(output.contains("// TODO: could not convert option filters\ndefineOptions({"));
        assert_eq!(warnings, vec!["could not convert component option `filters`".to_owned()]);
    }
}
