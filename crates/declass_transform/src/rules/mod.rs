//! Per-node transformation rules.
//!
//! Every syntax kind relevant to a class component has an ordered list of rules.
//! The dispatcher tries the rules in order until one of them handles the node
//! without asking to continue.

use declass_core::{
    expr_stmt, function_to_arrow, property_access, unwrap_ts_node_expr, verbatim_stmt, DeclassAtom,
};
use itertools::Itertools;
use swc_core::{
    common::{Span, DUMMY_SP},
    ecma::ast::{ClassMethod, ClassProp, Constructor, Decorator, Expr, ThisExpr, TsType},
};

use crate::{
    context::TransformContext, decorators::unclaimed_decorators, error::TransformError,
    ReferenceKind, ResultKind, ResultNode, TransformResult,
};

pub mod computed;
pub mod data;
pub mod emit;
pub mod heritage;
pub mod injection;
pub mod instance;
pub mod lifecycle;
pub mod methods;
pub mod options;
pub mod props;
pub mod refs;
pub mod vuex;
pub mod watch;

/// What a rule did with a node
#[derive(Debug)]
pub enum RuleOutcome {
    /// The rule does not apply, the next rule is tried
    NotApplicable,
    /// The rule produced results.
    /// When `should_continue` is set, the next rules still run for the same node.
    Handled {
        should_continue: bool,
        results: Vec<TransformResult>,
    },
}

impl RuleOutcome {
    /// Stop the dispatch for this node
    pub fn done(results: Vec<TransformResult>) -> Self {
        RuleOutcome::Handled {
            should_continue: false,
            results,
        }
    }

    /// Keep the results and let the following rules handle the node too
    pub fn proceed(results: Vec<TransformResult>) -> Self {
        RuleOutcome::Handled {
            should_continue: true,
            results,
        }
    }
}

pub trait TransformRule<N: ?Sized> {
    fn name(&self) -> &'static str;
    fn apply(&self, node: &N, ctx: &mut TransformContext) -> Result<RuleOutcome, TransformError>;
}

/// A rule backed by a plain function
pub struct FnRule<N: ?Sized> {
    pub name: &'static str,
    pub apply: fn(&N, &mut TransformContext) -> Result<RuleOutcome, TransformError>,
}

impl<N: ?Sized> TransformRule<N> for FnRule<N> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn apply(&self, node: &N, ctx: &mut TransformContext) -> Result<RuleOutcome, TransformError> {
        (self.apply)(node, ctx)
    }
}

pub type RuleList<N> = Vec<Box<dyn TransformRule<N>>>;

/// An entry of the options object of `@Component({ ... })`.
///
/// Method entries (`mounted() {}`) are represented as function expressions.
#[derive(Clone, Debug)]
pub struct ComponentOption {
    pub key: DeclassAtom,
    pub value: Box<Expr>,
    pub span: Span,
}

/// Rules for every syntax kind, in the order they are tried
pub struct RuleTable {
    /// `extends Vue`, `extends Mixins(A, B)`
    pub heritage: RuleList<Expr>,
    pub properties: RuleList<ClassProp>,
    /// `get` and `set` accessors
    pub accessors: RuleList<ClassMethod>,
    pub methods: RuleList<ClassMethod>,
    pub constructors: RuleList<Constructor>,
    /// `key: value` entries of the component options
    pub option_properties: RuleList<ComponentOption>,
    /// `key() {}` entries of the component options
    pub option_methods: RuleList<ComponentOption>,
}

fn rule<N: ?Sized + 'static>(
    name: &'static str,
    apply: fn(&N, &mut TransformContext) -> Result<RuleOutcome, TransformError>,
) -> Box<dyn TransformRule<N>> {
    Box::new(FnRule { name, apply })
}

impl Default for RuleTable {
    fn default() -> Self {
        RuleTable {
            heritage: vec![
                rule("heritage-vue", heritage::transform_vue_base),
                rule("heritage-mixins", heritage::transform_mixins),
                rule("heritage-base-class", heritage::transform_base_class),
            ],
            properties: vec![
                rule("refs-type", refs::transform_refs_declaration),
                rule("prop", props::transform_prop),
                rule("prop-sync", props::transform_prop_sync),
                rule("model", props::transform_model),
                rule("template-ref", refs::transform_ref_decorator),
                rule("inject", injection::transform_inject),
                rule("provide", injection::transform_provide),
                rule("vuex-state", vuex::transform_state),
                rule("vuex-getter", vuex::transform_getter),
                rule("vuex-action", vuex::transform_action),
                rule("vuex-mutation", vuex::transform_mutation),
                rule("data", data::transform_data),
            ],
            accessors: vec![rule("computed", computed::transform_accessor)],
            methods: vec![
                rule("watch", watch::transform_watch_decorator),
                rule("emit", emit::transform_emit),
                rule("lifecycle", lifecycle::transform_lifecycle_method),
                rule("method", methods::transform_method),
            ],
            constructors: vec![rule("constructor", methods::transform_constructor)],
            option_properties: vec![
                rule("option-props", options::transform_props_option),
                rule("option-emits", options::transform_emits_option),
                rule("option-watch", options::transform_watch_option),
                rule("option-expose", options::transform_expose_option),
                rule("option-components", options::transform_components_option),
                rule("option-lifecycle", lifecycle::transform_lifecycle_option),
                rule("option-define-options", options::transform_define_options),
                rule("option-fallback", options::transform_unknown_option),
            ],
            option_methods: vec![
                rule("option-lifecycle", lifecycle::transform_lifecycle_option),
                rule("option-fallback", options::transform_unknown_option),
            ],
        }
    }
}

#[inline]
pub(crate) fn this_expr() -> Box<Expr> {
    Box::new(Expr::This(ThisExpr { span: DUMMY_SP }))
}

/// `this.name`, rewritten later by the property access pass
#[inline]
pub(crate) fn this_member(name: &str) -> Box<Expr> {
    property_access(this_expr(), name)
}

pub(crate) fn declared_type(prop: &ClassProp) -> Option<Box<TsType>> {
    prop.type_ann.as_ref().map(|ann| ann.type_ann.to_owned())
}

/// Function expressions become arrows, so that `this` inside can be rewritten
pub(crate) fn callable_expr(expr: &Expr) -> Box<Expr> {
    match unwrap_ts_node_expr(expr) {
        Expr::Fn(fn_expr) => Box::new(Expr::Arrow(function_to_arrow(
            (*fn_expr.function).to_owned(),
        ))),
        _ => Box::new(expr.to_owned()),
    }
}

/// Adds a TODO listing the decorators of a member which no rule handled.
/// The listed decorators count as handled afterwards.
pub(crate) fn mark_unsupported_decorators(
    decorators: &[Decorator],
    span: Span,
    ctx: &mut TransformContext,
) -> Span {
    let unsupported = unclaimed_decorators(decorators, ctx);
    if unsupported.is_empty() {
        return span;
    }

    let list = unsupported.iter().map(|name| format!("@{name}")).join(", ");
    for name in unsupported.iter() {
        ctx.claim_decorator(name);
    }
    ctx.todo(span, format!("unsupported decorator {list}"))
}

/// Tag of code kept as it was
pub const UNCONVERTED: &str = "Unconverted";

/// Keeps the source text at `span` as a statement under a `// TODO: could not convert ...`.
/// Only the warning is left when the text is not available.
pub(crate) fn unconverted_source(
    span: Span,
    what: &str,
    ctx: &mut TransformContext,
) -> TransformResult {
    let mut result =
        TransformResult::new(ResultKind::Composition, UNCONVERTED, ReferenceKind::None);
    let message = format!("could not convert {what}");

    match ctx.comments.source_text(span) {
        Some(text) => {
            let span = ctx.todo(span, message);
            result.nodes.push(ResultNode::Stmt(verbatim_stmt(span, &text)));
        }
        None => ctx.warn(message),
    }

    result
}

/// Keeps an expression as a statement under a `// TODO: ...`
pub(crate) fn unconverted_expr(
    expr: Box<Expr>,
    message: String,
    ctx: &mut TransformContext,
) -> TransformResult {
    let span = ctx.todo(DUMMY_SP, message);
    TransformResult::composition(UNCONVERTED, ReferenceKind::None, expr_stmt(span, expr))
}
