//! Finds the component class of a module and splits everything around it

use declass_core::{unwrap_ts_node_expr, DeclassAtom};
use swc_core::ecma::{
    ast::{
        Class, Decl, DefaultDecl, ExportDecl, ExportDefaultDecl, Expr, Ident, ImportDecl,
        ImportSpecifier, Module, ModuleDecl, ModuleExportName, ModuleItem, ObjectLit, ObjectPatProp,
        Pat, Stmt, VarDecl,
    },
    atoms::Atom,
};

use crate::{
    atoms::{
        COMPONENT, VUE, VUEX_CLASS, VUE_CLASS, VUE_CLASS_COMPONENT, VUE_FACING_DECORATOR,
        VUE_PROPERTY_DECORATOR,
    },
    context::TransformContext,
    decorators::{namespace_call_key, parse_decorator},
    error::TransformError,
    MixinMode,
};

/// The module split around the component class
#[derive(Debug)]
pub struct ComponentModule {
    pub class: Box<Class>,
    pub class_name: Option<DeclassAtom>,
    /// The object passed to `@Component({ ... })`
    pub options: Option<Box<ObjectLit>>,
    /// Imports which are kept, in source order
    pub imports: Vec<ImportDecl>,
    /// Non-import items before the class
    pub before: Vec<ModuleItem>,
    /// Non-import items after the class
    pub after: Vec<ModuleItem>,
    pub shebang: Option<Atom>,
}

/// Registers imports and top-level names, then extracts the decorated class.
pub fn analyze(
    module: Module,
    ctx: &mut TransformContext,
) -> Result<ComponentModule, TransformError> {
    let has_class_component_import = module.body.iter().any(|item| {
        matches!(
            item,
            ModuleItem::ModuleDecl(ModuleDecl::Import(import))
                if is_class_component_package(&import.src.value)
        )
    });
    if !has_class_component_import {
        return Err(TransformError::NoClassComponentImport);
    }

    let Module { body, shebang, .. } = module;

    // Imports first, the class decorator is resolved through their aliases
    let mut imports = Vec::new();
    let mut rest = Vec::with_capacity(body.len());
    for item in body {
        match item {
            ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => {
                imports.extend(register_import(import, ctx));
            }
            item => rest.push(item),
        }
    }

    let mut before = Vec::new();
    let mut after = Vec::new();
    let mut found: Option<FoundClass> = None;

    for item in rest {
        if is_namespace_binding(&item, ctx) {
            continue;
        }

        if found.is_none() {
            match take_component_class(item, ctx) {
                Ok(class) => {
                    found = Some(class);
                    continue;
                }
                Err(item) => {
                    collect_top_level_names(&item, ctx);
                    before.push(item);
                }
            }
        } else {
            collect_top_level_names(&item, ctx);
            after.push(item);
        }
    }

    let Some((class, class_name, export)) = found else {
        return Err(TransformError::NoDefaultExport);
    };

    // `@Component class Foo {}` declared first and exported with `export default Foo`
    if let (ClassExport::Declared, Some(ref name)) = (export, &class_name) {
        let is_export_of_class = |item: &ModuleItem| {
            matches!(
                item,
                ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(export))
                    if matches!(*export.expr, Expr::Ident(ref ident) if ident.sym == *name)
            )
        };
        let exports_before = before.len();
        let exports_after = after.len();
        before.retain(|item| !is_export_of_class(item));
        after.retain(|item| !is_export_of_class(item));
        if before.len() == exports_before && after.len() == exports_after {
            return Err(TransformError::NoDefaultExport);
        }
    }
    let is_named_export = matches!(export, ClassExport::Named);

    let options = component_options(&class, ctx)?;

    ctx.class_name.clone_from(&class_name);
    ctx.is_mixin = match ctx.options.mixin_mode {
        MixinMode::Component => false,
        MixinMode::Composable => true,
        MixinMode::Auto => {
            is_named_export
                || class_name
                    .as_ref()
                    .is_some_and(|name| name.ends_with("Mixin"))
        }
    };

    tracing::debug!(
        class = class_name.as_deref().unwrap_or("<anonymous>"),
        is_mixin = ctx.is_mixin,
        members = class.body.len(),
        "found component class"
    );

    Ok(ComponentModule {
        class,
        class_name,
        options,
        imports,
        before,
        after,
        shebang,
    })
}

#[inline]
fn is_class_component_package(source: &str) -> bool {
    source == &**VUE_CLASS_COMPONENT
        || source == &**VUE_PROPERTY_DECORATOR
        || source == &**VUE_FACING_DECORATOR
}

/// Returns the import when it is passed through
fn register_import(mut import: ImportDecl, ctx: &mut TransformContext) -> Option<ImportDecl> {
    let source = import.src.value.to_owned();

    if is_class_component_package(&source) || source == *VUEX_CLASS {
        for specifier in import.specifiers.iter() {
            match specifier {
                ImportSpecifier::Named(named) => {
                    let imported = match named.imported {
                        Some(ModuleExportName::Ident(ref ident)) => ident.sym.to_owned(),
                        Some(ModuleExportName::Str(ref s)) => s.value.to_owned(),
                        None => named.local.sym.to_owned(),
                    };
                    ctx.register_decorator_import(named.local.sym.to_owned(), imported);
                }
                ImportSpecifier::Default(default) if source != *VUEX_CLASS => {
                    ctx.register_decorator_import(
                        default.local.sym.to_owned(),
                        COMPONENT.to_owned(),
                    );
                }
                ImportSpecifier::Default(_) => {}
                ImportSpecifier::Namespace(namespace) => {
                    ctx.warn(format!(
                        "namespace import `{}` of \"{source}\" is not supported",
                        namespace.local.sym
                    ));
                }
            }
        }
        return None;
    }

    if source == *VUE && !import.type_only {
        // `import Vue from "vue"` is only used as the base class
        import.specifiers.retain(|specifier| match specifier {
            ImportSpecifier::Default(default) => {
                ctx.register_decorator_import(default.local.sym.to_owned(), VUE_CLASS.to_owned());
                false
            }
            _ => true,
        });
    }

    for specifier in import.specifiers.iter() {
        let local = match specifier {
            ImportSpecifier::Named(named) => &named.local,
            ImportSpecifier::Default(default) => &default.local,
            ImportSpecifier::Namespace(namespace) => &namespace.local,
        };
        ctx.register_import(local.sym.to_owned(), source.to_owned());
    }

    // Nothing is left of `import Vue from "vue"`
    if import.specifiers.is_empty() && source == *VUE {
        return None;
    }

    Some(import)
}

/// `const user = namespace("user")` is consumed by the store decorators
fn is_namespace_binding(item: &ModuleItem, ctx: &mut TransformContext) -> bool {
    let ModuleItem::Stmt(Stmt::Decl(Decl::Var(var_decl))) = item else {
        return false;
    };
    let [ref declarator] = var_decl.decls[..] else {
        return false;
    };
    let (Pat::Ident(binding), Some(init)) = (&declarator.name, &declarator.init) else {
        return false;
    };
    let Expr::Call(ref call) = **init else {
        return false;
    };
    let Some(key) = namespace_call_key(call, ctx) else {
        return false;
    };

    ctx.register_namespace(binding.id.sym.to_owned(), key);
    true
}

/// How the component class leaves the module
#[derive(Clone, Copy)]
enum ClassExport {
    /// `export default class Foo`
    Default,
    /// `export class Foo`
    Named,
    /// `class Foo`, needs a separate `export default Foo`
    Declared,
}

type FoundClass = (Box<Class>, Option<DeclassAtom>, ClassExport);

/// Takes the class out of the item when it is a `@Component` class
fn take_component_class(
    item: ModuleItem,
    ctx: &TransformContext,
) -> Result<FoundClass, ModuleItem> {
    match item {
        ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export)) => match export.decl {
            DefaultDecl::Class(class_expr) if is_component_class(&class_expr.class, ctx) => Ok((
                class_expr.class,
                class_expr.ident.map(|ident| ident.sym),
                ClassExport::Default,
            )),
            decl => Err(ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(
                ExportDefaultDecl { decl, ..export },
            ))),
        },

        ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => match export.decl {
            Decl::Class(class_decl) if is_component_class(&class_decl.class, ctx) => {
                Ok((class_decl.class, Some(class_decl.ident.sym), ClassExport::Named))
            }
            decl => Err(ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(
                ExportDecl { decl, ..export },
            ))),
        },

        ModuleItem::Stmt(Stmt::Decl(Decl::Class(class_decl)))
            if is_component_class(&class_decl.class, ctx) =>
        {
            Ok((class_decl.class, Some(class_decl.ident.sym), ClassExport::Declared))
        }

        item => Err(item),
    }
}

fn is_component_class(class: &Class, ctx: &TransformContext) -> bool {
    class
        .decorators
        .iter()
        .filter_map(|decorator| parse_decorator(decorator, ctx))
        .any(|info| info.name == *COMPONENT)
}

/// The options object of `@Component({ ... })`, `None` for a bare `@Component`
fn component_options(
    class: &Class,
    ctx: &TransformContext,
) -> Result<Option<Box<ObjectLit>>, TransformError> {
    let Some(info) = class
        .decorators
        .iter()
        .filter_map(|decorator| parse_decorator(decorator, ctx))
        .find(|info| info.name == *COMPONENT)
    else {
        return Ok(None);
    };

    match info.arg(0).map(unwrap_ts_node_expr) {
        None => Ok(None),
        Some(Expr::Object(object)) => Ok(Some(Box::new(object.to_owned()))),
        Some(_) => Err(TransformError::InvalidDecoratorArgument {
            decorator: COMPONENT.to_owned(),
            expected: "an options object",
        }),
    }
}

fn collect_top_level_names(item: &ModuleItem, ctx: &mut TransformContext) {
    let decl = match item {
        ModuleItem::Stmt(Stmt::Decl(decl)) => decl,
        ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => &export.decl,
        _ => return,
    };

    match decl {
        Decl::Var(var_decl) => collect_var_names(var_decl, ctx),
        Decl::Fn(fn_decl) => {
            ctx.top_level_scope.insert(fn_decl.ident.sym.to_owned());
        }
        Decl::Class(class_decl) => {
            ctx.top_level_scope.insert(class_decl.ident.sym.to_owned());
        }
        Decl::TsEnum(ts_enum) => {
            ctx.top_level_scope.insert(ts_enum.id.sym.to_owned());
        }
        _ => {}
    }
}

fn collect_var_names(var_decl: &VarDecl, ctx: &mut TransformContext) {
    let mut names: Vec<&Ident> = Vec::new();
    for declarator in var_decl.decls.iter() {
        collect_pat_names(&declarator.name, &mut names);
    }
    for ident in names {
        ctx.top_level_scope.insert(ident.sym.to_owned());
    }
}

fn collect_pat_names<'p>(pat: &'p Pat, out: &mut Vec<&'p Ident>) {
    match pat {
        Pat::Ident(binding) => out.push(&binding.id),
        Pat::Array(array) => {
            for elem in array.elems.iter().flatten() {
                collect_pat_names(elem, out);
            }
        }
        Pat::Object(object) => {
            for prop in object.props.iter() {
                match prop {
                    ObjectPatProp::KeyValue(kv) => collect_pat_names(&kv.value, out),
                    ObjectPatProp::Assign(assign) => out.push(&assign.key.id),
                    ObjectPatProp::Rest(rest) => collect_pat_names(&rest.arg, out),
                }
            }
        }
        Pat::Rest(rest) => collect_pat_names(&rest.arg, out),
        Pat::Assign(assign) => collect_pat_names(&assign.left, out),
        Pat::Invalid(_) | Pat::Expr(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use declass_core::{CommentSink, SfcScriptLang};
    use declass_parser::parse_script;

    use super::*;
    use crate::{error::TransformError, TransformOptions};

    fn analyze_source(
        source: &str,
    ) -> Result<(ComponentModule, Vec<DeclassAtom>, bool), TransformError> {
        let parsed = parse_script(source, SfcScriptLang::Typescript).expect("should parse");
        let options = TransformOptions::default();
        let comments = CommentSink::detached(Default::default());
        let mut ctx = TransformContext::new(&options, &comments);
        let component = analyze(parsed.module, &mut ctx)?;

        let mut top_level: Vec<DeclassAtom> = ctx.top_level_scope.iter().cloned().collect();
        top_level.sort_by(|a, b| str::cmp(a, b));
        Ok((component, top_level, ctx.is_mixin))
    }

    #[test]
    fn it_requires_a_class_component_import() {
        let error =
            analyze_source("import Vue from 'vue';\nexport default class Foo extends Vue {}")
                .expect_err("should fail");
        assert!(matches!(error, TransformError::NoClassComponentImport));
        assert_eq!(error.to_string(), "no vue class component import");
    }

    #[test]
    fn it_requires_a_decorated_class() {
        let error = analyze_source(
            "import { Vue } from 'vue-property-decorator';\nexport default class Foo extends Vue {}",
        )
        .expect_err("should fail");
        assert_eq!(error.to_string(), "no default export found");
    }

    #[test]
    fn it_requires_the_declared_class_to_be_exported() {
        let error = analyze_source(
            "import { Component, Vue } from 'vue-property-decorator';\n\
             @Component\nclass Foo extends Vue { a = 1; }",
        )
        .expect_err("should fail");
        assert!(matches!(error, TransformError::NoDefaultExport));

        let error = analyze_source(
            "import { Component, Vue } from 'vue-property-decorator';\n\
             @Component\nclass Foo extends Vue { a = 1; }\nexport default Bar;",
        )
        .expect_err("should fail");
        assert!(matches!(error, TransformError::NoDefaultExport));
    }

    #[test]
    fn it_splits_the_module_around_the_class() {
        let (component, top_level, is_mixin) = analyze_source(
            r#"#!/usr/bin/env node
import { Component as C, Vue } from "vue-property-decorator";
import { namespace } from "vuex-class";
import Vue2 from "vue";
import { api } from "./api";

const user = namespace("user");
const LIMIT = 10;

@C({ name: "Foo" })
class Foo extends Vue {
    a = 1;
}

function helper() {}
export default Foo;
"#,
        )
        .expect("should analyze");

        assert_eq!(component.class_name.as_deref(), Some("Foo"));
        assert!(component.options.is_some());
        assert_eq!(component.imports.len(), 1);
        assert_eq!(&*component.imports[0].src.value, "./api");
        assert_eq!(component.before.len(), 1);
        assert_eq!(component.after.len(), 1);
        assert!(component.shebang.is_some());
        assert_eq!(top_level, vec![DeclassAtom::from("LIMIT"), DeclassAtom::from("helper")]);
        assert!(!is_mixin);
    }

    #[test]
    fn it_detects_mixins() {
        let (_, _, is_mixin) = analyze_source(
            "import { Component, Vue } from 'vue-property-decorator';\n\
             @Component\nexport class Counter extends Vue {}",
        )
        .expect("should analyze");
        assert!(is_mixin);

        let (_, _, is_mixin) = analyze_source(
            "import { Component, Vue } from 'vue-property-decorator';\n\
             @Component\nexport default class FormMixin extends Vue {}",
        )
        .expect("should analyze");
        assert!(is_mixin);
    }

    #[test]
    fn it_rejects_non_object_component_options() {
        let error = analyze_source(
            "import { Component, Vue } from 'vue-property-decorator';\n\
             @Component('foo')\nexport default class Foo extends Vue {}",
        )
        .expect_err("should fail");
        assert_eq!(
            error.to_string(),
            "invalid argument of @Component: expected an options object"
        );
    }
}
