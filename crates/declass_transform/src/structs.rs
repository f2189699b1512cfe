use declass_core::{DeclassAtom, VueImports};
use smallvec::SmallVec;
use swc_core::ecma::ast::{Decl, Expr, Module, PropOrSpread, Stmt, TsType};

/// Tag prefix of results which are always placed at the end of the output
pub const SORT_LAST_PREFIX: &str = "SortLast:";

/// One unit of converted code, produced by a rule and refined by post-processors
#[derive(Clone, Debug)]
pub struct TransformResult {
    pub kind: ResultKind,
    /// Used by post-processors for grouping, e.g. `Data-ref` or `Macro-defineProps`
    pub tag: String,
    pub reference: ReferenceKind,
    /// Identifiers bound by `nodes`
    pub output_variables: SmallVec<[DeclassAtom; 1]>,
    /// Explicit `this.<name>` resolutions, derived from `reference` when empty
    pub bindings: Vec<ThisBinding>,
    pub nodes: Vec<ResultNode>,
    pub imports: Vec<ImportRequirement>,
    /// Output variables of other results which `nodes` reference
    pub dependencies: Vec<DeclassAtom>,
}

#[derive(Clone, Debug)]
pub enum ResultKind {
    /// Regular Composition API code
    Composition,
    /// Acquisition of a composable, e.g. `const store = useStore()`.
    /// Results of this kind are de-duplicated by tag.
    Composable,
    /// Contribution to a compiler macro, all contributions are merged into one declaration
    Macro(Box<MacroContribution>),
    /// Component option without a Composition API counterpart, kept in `defineOptions`
    Options(Box<OptionsEcho>),
    /// Only carries imports
    Import,
}

/// What the produced identifiers represent when accessed through `this`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReferenceKind {
    /// Not accessible through `this`
    #[default]
    None,
    /// Plain binding, `this.foo` becomes `foo`
    Variable,
    /// Reactive container, `this.foo` becomes `foo.value`
    VariableValue,
    /// Member of a macro binding, e.g. `this.foo` becomes `props.foo`
    DefinableVariable,
    /// Function provided by a macro, e.g. `this.$emit` becomes `emit`
    DefinableMethod,
}

/// How `this.<name>` is rewritten
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThisBinding {
    pub name: DeclassAtom,
    pub access: Access,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Access {
    /// `ident`
    Direct(DeclassAtom),
    /// `ident.value`
    Value(DeclassAtom),
    /// `object.property`
    Member {
        object: DeclassAtom,
        property: DeclassAtom,
    },
}

impl Access {
    /// The identifier which must be declared for this access to work
    pub fn root(&self) -> &DeclassAtom {
        match self {
            Access::Direct(ident) | Access::Value(ident) => ident,
            Access::Member { object, .. } => object,
        }
    }
}

#[derive(Clone, Debug)]
pub enum ResultNode {
    Stmt(Stmt),
    /// Intermediate expression, e.g. a computed getter waiting to be paired with its setter
    Expr(Box<Expr>),
    /// `export <decl>`, used for composables converted from mixins
    ExportDecl(Decl),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportRequirement {
    /// `import { name } from "vue"`
    Vue(VueImports),
    /// `import { name } from "source"`, source is either a package or a relative path
    Named {
        source: DeclassAtom,
        name: DeclassAtom,
    },
    /// `import local from "source"`
    Default {
        source: DeclassAtom,
        local: DeclassAtom,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MacroKind {
    Props,
    Emits,
}

#[derive(Clone, Debug)]
pub struct MacroContribution {
    pub macro_kind: MacroKind,
    pub type_properties: Vec<TypeProperty>,
    /// Default values of props, these end up in `withDefaults`
    pub defaults: Vec<(DeclassAtom, Box<Expr>)>,
}

/// A `key?: type` entry of an aggregated macro type
#[derive(Clone, Debug)]
pub struct TypeProperty {
    pub key: DeclassAtom,
    /// `None` when the type is unknown
    pub ty: Option<Box<TsType>>,
    pub optional: bool,
}

#[derive(Clone, Debug)]
pub struct OptionsEcho {
    pub key: DeclassAtom,
    pub props: Vec<PropOrSpread>,
    /// `false` when the option could not be converted and is only preserved
    pub converted: bool,
}

/// A normalized watcher
#[derive(Clone, Debug)]
pub struct WatchHandler {
    pub callback: WatchCallback,
    pub immediate: Option<bool>,
    pub deep: Option<bool>,
}

#[derive(Clone, Debug)]
pub enum WatchCallback {
    /// An inline function or any other callable expression
    Callable(Box<Expr>),
    /// A name of a component method
    Method(DeclassAtom),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MixinMode {
    /// A class exported by name or named `*Mixin` is converted to a composable
    #[default]
    Auto,
    /// Always produce `<script setup>` code
    Component,
    /// Always produce an exported `use*` function
    Composable,
}

#[derive(Clone, Debug, Default)]
pub struct TransformOptions {
    /// Turns naming collision warnings into an error
    pub stop_on_collisions: bool,
    pub mixin_mode: MixinMode,
}

#[derive(Debug)]
pub struct TransformOutput {
    pub module: Module,
    /// Warning about naming collisions, meant to be prepended to the output as a comment
    pub collision_report: Option<String>,
    pub warnings: Vec<String>,
}

impl TransformResult {
    pub fn new(kind: ResultKind, tag: impl Into<String>, reference: ReferenceKind) -> Self {
        TransformResult {
            kind,
            tag: tag.into(),
            reference,
            output_variables: SmallVec::new(),
            bindings: Vec::new(),
            nodes: Vec::new(),
            imports: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// A regular statement result
    pub fn composition(tag: impl Into<String>, reference: ReferenceKind, stmt: Stmt) -> Self {
        TransformResult::new(ResultKind::Composition, tag, reference).with_stmt(stmt)
    }

    pub fn macro_contribution(contribution: MacroContribution) -> Self {
        let tag = match contribution.macro_kind {
            MacroKind::Props => "Macro-defineProps",
            MacroKind::Emits => "Macro-defineEmits",
        };
        TransformResult::new(
            ResultKind::Macro(Box::new(contribution)),
            tag,
            ReferenceKind::None,
        )
    }

    pub fn with_output(mut self, name: DeclassAtom) -> Self {
        self.output_variables.push(name);
        self
    }

    pub fn with_stmt(mut self, stmt: Stmt) -> Self {
        self.nodes.push(ResultNode::Stmt(stmt));
        self
    }

    pub fn with_import(mut self, import: ImportRequirement) -> Self {
        if !self.imports.contains(&import) {
            self.imports.push(import);
        }
        self
    }

    pub fn with_vue_import(self, import: VueImports) -> Self {
        self.with_import(ImportRequirement::Vue(import))
    }

    pub fn with_binding(mut self, name: DeclassAtom, access: Access) -> Self {
        self.bindings.push(ThisBinding { name, access });
        self
    }

    pub fn with_dependency(mut self, name: DeclassAtom) -> Self {
        self.add_dependency(name);
        self
    }

    pub fn add_dependency(&mut self, name: DeclassAtom) {
        if !self.dependencies.contains(&name) {
            self.dependencies.push(name);
        }
    }

    pub fn is_macro(&self) -> bool {
        matches!(self.kind, ResultKind::Macro(_))
    }

    /// Priority of a `SortLast:<priority>:<label>` result
    pub fn sort_last_priority(&self) -> Option<i64> {
        let rest = self.tag.strip_prefix(SORT_LAST_PREFIX)?;
        let (priority, _label) = rest.split_once(':').unwrap_or((rest, ""));
        Some(priority.parse().unwrap_or(0))
    }

    /// How `this.<name>` resolves to the identifiers of this result
    pub fn this_bindings(&self) -> Vec<ThisBinding> {
        if !self.bindings.is_empty() {
            return self.bindings.clone();
        }

        let access: fn(DeclassAtom) -> Access = match self.reference {
            ReferenceKind::Variable | ReferenceKind::DefinableMethod => Access::Direct,
            ReferenceKind::VariableValue => Access::Value,
            ReferenceKind::None | ReferenceKind::DefinableVariable => return Vec::new(),
        };

        self.output_variables
            .iter()
            .map(|name| ThisBinding {
                name: name.to_owned(),
                access: access(name.to_owned()),
            })
            .collect()
    }
}

/// Builds a `SortLast:<priority>:<label>` tag
pub fn sort_last_tag(priority: i64, label: &str) -> String {
    format!("{SORT_LAST_PREFIX}{priority}:{label}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_parses_sort_last_tags() {
        let result = TransformResult::new(
            ResultKind::Composition,
            sort_last_tag(10, "expose"),
            ReferenceKind::None,
        );
        assert_eq!(result.sort_last_priority(), Some(10));

        let regular =
            TransformResult::new(ResultKind::Composition, "Data-ref", ReferenceKind::None);
        assert_eq!(regular.sort_last_priority(), None);
    }

    #[test]
    fn it_derives_bindings_from_reference() {
        let result = TransformResult::new(
            ResultKind::Composition,
            "Data-ref",
            ReferenceKind::VariableValue,
        )
        .with_output("foo".into());
        assert_eq!(
            result.this_bindings(),
            vec![ThisBinding {
                name: "foo".into(),
                access: Access::Value("foo".into())
            }]
        );

        let hook = TransformResult::new(ResultKind::Composition, "Lifecycle", ReferenceKind::None)
            .with_output("foo".into());
        assert!(hook.this_bindings().is_empty());
    }
}
