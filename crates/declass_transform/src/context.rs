use declass_core::{CommentSink, DeclassAtom};
use fxhash::{FxHashMap, FxHashSet};
use indexmap::IndexMap;
use swc_core::{common::Span, ecma::ast::Expr};

use crate::{
    atoms::{COMPONENT, MIXINS, OPTIONS},
    collisions::Collision,
    TransformOptions,
};

/// State of a single file conversion.
///
/// Created fresh for every file and threaded through every rule and post-processor.
pub struct TransformContext<'a> {
    pub options: &'a TransformOptions,
    pub comments: &'a CommentSink,

    /// Names bound by passthrough imports
    pub import_scope: FxHashSet<DeclassAtom>,
    /// Names declared at the top level of the file, outside of the component class
    pub top_level_scope: FxHashSet<DeclassAtom>,
    /// Names of the component class members
    pub class_body_scope: FxHashSet<DeclassAtom>,
    /// Filled by the collision detector, in order of discovery
    pub collisions: IndexMap<DeclassAtom, Collision>,

    /// Decorators handled by a rule for the member being dispatched
    claimed_decorators: FxHashSet<DeclassAtom>,

    /// Local alias to canonical name, for renamed decorator imports
    import_aliases: FxHashMap<DeclassAtom, DeclassAtom>,
    /// Local name to the module it was imported from
    import_sources: FxHashMap<DeclassAtom, DeclassAtom>,
    /// Passthrough import specifiers which must be removed, e.g. converted mixins
    pub dropped_imports: FxHashSet<DeclassAtom>,

    /// `const ns = namespace("key")` bindings of `vuex-class`
    namespaces: FxHashMap<DeclassAtom, NamespaceKey>,

    pub mixins: Vec<MixinUse>,
    /// The class is converted to a composable function instead of `<script setup>`
    pub is_mixin: bool,
    pub class_name: Option<DeclassAtom>,

    pub warnings: Vec<String>,
}

/// The key a store namespace was bound to
#[derive(Clone, Debug)]
pub enum NamespaceKey {
    /// `namespace("user")`
    Literal(DeclassAtom),
    /// `namespace(USER_MODULE)`
    Variable(Box<Expr>),
}

/// A mixin which the component class extends
#[derive(Clone, Debug)]
pub struct MixinUse {
    pub class: DeclassAtom,
    /// Name of the composable the mixin was converted to, e.g. `useCounter`
    pub composable: DeclassAtom,
    pub source: DeclassAtom,
}

impl<'a> TransformContext<'a> {
    pub fn new(options: &'a TransformOptions, comments: &'a CommentSink) -> Self {
        TransformContext {
            options,
            comments,
            import_scope: Default::default(),
            top_level_scope: Default::default(),
            class_body_scope: Default::default(),
            collisions: Default::default(),
            claimed_decorators: Default::default(),
            import_aliases: Default::default(),
            import_sources: Default::default(),
            dropped_imports: Default::default(),
            namespaces: Default::default(),
            mixins: Vec::new(),
            is_mixin: false,
            class_name: None,
            warnings: Vec::new(),
        }
    }

    /// Registers an import of a class component helper, e.g. `import { Prop as P }`
    pub fn register_decorator_import(&mut self, local: DeclassAtom, imported: DeclassAtom) {
        // `Options` is the v8 name of `Component`, `mixins` is the function form of `Mixins`
        let canonical = if imported == *OPTIONS {
            COMPONENT.to_owned()
        } else if &*imported == "mixins" {
            MIXINS.to_owned()
        } else {
            imported
        };

        if local != canonical {
            self.import_aliases.insert(local, canonical);
        }
    }

    /// Registers a passthrough import binding
    pub fn register_import(&mut self, local: DeclassAtom, source: DeclassAtom) {
        self.import_scope.insert(local.to_owned());
        self.import_sources.insert(local, source);
    }

    /// Canonical name of a possibly renamed decorator
    pub fn canonical_name(&self, local: &DeclassAtom) -> DeclassAtom {
        self.import_aliases
            .get(local)
            .unwrap_or(local)
            .to_owned()
    }

    pub fn import_source(&self, local: &DeclassAtom) -> Option<&DeclassAtom> {
        self.import_sources.get(local)
    }

    pub fn register_namespace(&mut self, local: DeclassAtom, key: NamespaceKey) {
        self.namespaces.insert(local, key);
    }

    pub fn namespace(&self, local: &DeclassAtom) -> Option<&NamespaceKey> {
        self.namespaces.get(local)
    }

    /// Starts dispatching a new member
    pub fn begin_member(&mut self) {
        self.claimed_decorators.clear();
    }

    /// Marks a decorator as handled for the current member
    pub fn claim_decorator(&mut self, name: &DeclassAtom) {
        self.claimed_decorators.insert(name.to_owned());
    }

    pub fn is_claimed(&self, name: &DeclassAtom) -> bool {
        self.claimed_decorators.contains(name)
    }

    pub fn warn(&mut self, message: String) {
        tracing::debug!(%message, "conversion warning");
        self.warnings.push(message);
    }

    /// Records a warning and attaches it as a `// TODO:` comment
    /// to the node which will use the returned span
    pub fn todo(&mut self, span: Span, message: String) -> Span {
        let span = self.comments.line_comment(span, &format!("TODO: {message}"));
        self.warn(message);
        span
    }
}
