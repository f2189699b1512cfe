use declass_core::{
    call, expr_stmt, ident_expr, member_expr, property_access, var_decl_stmt, CommentSink,
    DeclassAtom, IntoIdent,
};
use fxhash::FxHashMap;
use indexmap::IndexSet;
use swc_core::{
    common::{Span, DUMMY_SP},
    ecma::{
        ast::{
            AssignPatProp, BindingIdent, Class, Expr, Function, GetterProp, Lit, MemberExpr,
            MemberProp, ObjectPat, ObjectPatProp, ParenExpr, Pat, SetterProp, SimpleAssignTarget,
            VarDeclKind,
        },
        visit::{VisitMut, VisitMutWith},
    },
};

use crate::{
    atoms::DOLLAR_REFS, context::TransformContext, Access, ReferenceKind, ResultKind, ResultNode,
    TransformResult,
};

/// What `this.<name>` resolves to, built from the bindings of every result
#[derive(Debug, Default)]
pub struct AccessScope {
    bindings: FxHashMap<DeclassAtom, Access>,
}

impl AccessScope {
    /// The first result binding a name wins
    pub fn from_results(results: &[TransformResult]) -> Self {
        let mut scope = AccessScope::default();
        for result in results {
            for binding in result.this_bindings() {
                scope.bindings.entry(binding.name).or_insert(binding.access);
            }
        }
        scope
    }

    pub fn get(&self, name: &DeclassAtom) -> Option<&Access> {
        self.bindings.get(name)
    }
}

/// A rewritten `this` access
#[derive(Debug)]
pub struct Resolved {
    pub expr: Box<Expr>,
    /// The identifier the new expression reads
    pub dependency: DeclassAtom,
}

/// Resolves `this.name`, `this["name"]` and `this.$refs.name` against the scope.
/// Returns `None` when the member is not a `this` access or nothing binds the name.
pub fn resolve_this_member(member: &MemberExpr, scope: &AccessScope) -> Option<Resolved> {
    let key = match this_member_name(member) {
        Some(name) => name,
        None => refs_key(member)?,
    };

    let access = scope.get(&key)?;
    Some(Resolved {
        expr: access_expr(access, member.span),
        dependency: access.root().to_owned(),
    })
}

/// Rewrites every `this` access in the nodes of every result and records dependencies.
///
/// When the component uses mixins, names nothing else binds are attributed to the last mixin
/// and destructured from its composable.
pub fn rewrite_this_access(
    mut results: Vec<TransformResult>,
    ctx: &mut TransformContext,
) -> Vec<TransformResult> {
    let scope = AccessScope::from_results(&results);
    let comments = ctx.comments;
    let mut mixin_names: IndexSet<DeclassAtom> = IndexSet::new();
    let mut unresolved: IndexSet<DeclassAtom> = IndexSet::new();

    for result in results.iter_mut() {
        if matches!(result.kind, ResultKind::Options(_)) {
            continue;
        }

        let mut rewriter = ThisRewriter {
            scope: &scope,
            comments,
            attribute_to_mixin: !ctx.mixins.is_empty(),
            dependencies: Vec::new(),
            mixin_names: &mut mixin_names,
            unresolved: &mut unresolved,
        };

        for node in result.nodes.iter_mut() {
            match node {
                ResultNode::Stmt(stmt) => stmt.visit_mut_with(&mut rewriter),
                ResultNode::Expr(expr) => expr.visit_mut_with(&mut rewriter),
                ResultNode::ExportDecl(decl) => decl.visit_mut_with(&mut rewriter),
            }
        }

        for dependency in rewriter.dependencies {
            if !result.output_variables.contains(&dependency) {
                result.add_dependency(dependency);
            }
        }
    }

    for name in unresolved {
        ctx.warn(format!("unresolved `this.{name}`"));
    }

    if ctx.mixins.is_empty() {
        return results;
    }

    let insert_at = results.iter().take_while(|result| result.is_macro()).count();
    let mixin_results = mixin_results(mixin_names, ctx);
    results.splice(insert_at..insert_at, mixin_results);
    results
}

/// One call per mixin composable, the last one destructures the attributed names
fn mixin_results(names: IndexSet<DeclassAtom>, ctx: &mut TransformContext) -> Vec<TransformResult> {
    let mixins = ctx.mixins.to_owned();
    let Some((last, rest)) = mixins.split_last() else {
        return Vec::new();
    };

    let mut results = Vec::with_capacity(mixins.len());
    for (idx, mixin) in rest.iter().enumerate() {
        let span = if idx == 0 {
            ctx.todo(
                DUMMY_SP,
                format!(
                    "members of every mixin are destructured from `{}`, \
                     move them to the composable they come from",
                    last.composable
                ),
            )
        } else {
            DUMMY_SP
        };

        results.push(TransformResult::composition(
            "Mixin",
            ReferenceKind::None,
            expr_stmt(span, call(mixin.composable.to_owned(), vec![])),
        ));
    }

    let init = call(last.composable.to_owned(), vec![]);
    if names.is_empty() {
        results.push(TransformResult::composition(
            "Mixin",
            ReferenceKind::None,
            expr_stmt(DUMMY_SP, init),
        ));
        return results;
    }

    let pattern = Pat::Object(ObjectPat {
        span: DUMMY_SP,
        props: names
            .iter()
            .map(|name| {
                ObjectPatProp::Assign(AssignPatProp {
                    span: DUMMY_SP,
                    key: BindingIdent {
                        id: name.to_owned().into_ident(),
                        type_ann: None,
                    },
                    value: None,
                })
            })
            .collect(),
        optional: false,
        type_ann: None,
    });

    let mut destructure = TransformResult::composition(
        "Mixin",
        ReferenceKind::Variable,
        var_decl_stmt(DUMMY_SP, VarDeclKind::Const, pattern, Some(init)),
    );
    destructure.output_variables.extend(names);
    results.push(destructure);

    results
}

struct ThisRewriter<'s> {
    scope: &'s AccessScope,
    comments: &'s CommentSink,
    attribute_to_mixin: bool,
    dependencies: Vec<DeclassAtom>,
    mixin_names: &'s mut IndexSet<DeclassAtom>,
    unresolved: &'s mut IndexSet<DeclassAtom>,
}

impl ThisRewriter<'_> {
    /// The replacement of a `this` member, `None` when it stays as it is
    fn rewrite_member(&mut self, member: &mut MemberExpr) -> Option<Box<Expr>> {
        if let Some(resolved) = resolve_this_member(member, self.scope) {
            self.add_dependency(resolved.dependency);
            return Some(resolved.expr);
        }

        // `this.$refs.unknown` is reported as `this.$refs`
        let Some(name) = this_member_name(member) else {
            member.visit_mut_children_with(self);
            return None;
        };

        if self.attribute_to_mixin && !name.starts_with('$') {
            self.mixin_names.insert(name.to_owned());
            self.add_dependency(name.to_owned());
            return Some(Box::new(Expr::Ident(name.into_ident_spanned(member.span))));
        }

        member.span = self
            .comments
            .block_comment(member.span, &format!("TODO: unresolved this.{name}"));
        self.unresolved.insert(name);
        None
    }

    fn add_dependency(&mut self, name: DeclassAtom) {
        if !self.dependencies.contains(&name) {
            self.dependencies.push(name);
        }
    }
}

impl VisitMut for ThisRewriter<'_> {
    fn visit_mut_expr(&mut self, n: &mut Expr) {
        let replacement = match n {
            Expr::Member(member) if is_this_access(member) => self.rewrite_member(member),
            _ => {
                n.visit_mut_children_with(self);
                return;
            }
        };

        if let Some(replacement) = replacement {
            *n = *replacement;
        }
    }

    fn visit_mut_simple_assign_target(&mut self, n: &mut SimpleAssignTarget) {
        let replacement = match n {
            SimpleAssignTarget::Member(member) if is_this_access(member) => {
                self.rewrite_member(member)
            }
            _ => {
                n.visit_mut_children_with(self);
                return;
            }
        };

        let Some(replacement) = replacement else {
            return;
        };

        *n = match *replacement {
            Expr::Ident(id) => SimpleAssignTarget::Ident(BindingIdent { id, type_ann: None }),
            Expr::Member(member) => SimpleAssignTarget::Member(member),
            other => SimpleAssignTarget::Paren(ParenExpr {
                span: DUMMY_SP,
                expr: Box::new(other),
            }),
        };
    }

    // These have their own `this`
    fn visit_mut_function(&mut self, _n: &mut Function) {}

    fn visit_mut_class(&mut self, _n: &mut Class) {}

    fn visit_mut_getter_prop(&mut self, _n: &mut GetterProp) {}

    fn visit_mut_setter_prop(&mut self, _n: &mut SetterProp) {}
}

fn is_this_access(member: &MemberExpr) -> bool {
    this_member_name(member).is_some() || refs_key(member).is_some()
}

/// `name` of `this.name` or `this["name"]`
fn this_member_name(member: &MemberExpr) -> Option<DeclassAtom> {
    if !matches!(*member.obj, Expr::This(_)) {
        return None;
    }
    static_prop_name(&member.prop)
}

/// `$refs.name` of `this.$refs.name`, the key template refs are bound under
fn refs_key(member: &MemberExpr) -> Option<DeclassAtom> {
    let Expr::Member(ref inner) = *member.obj else {
        return None;
    };
    if this_member_name(inner).as_ref() != Some(&*DOLLAR_REFS) {
        return None;
    }

    let key = static_prop_name(&member.prop)?;
    Some(format!("{}.{key}", &*DOLLAR_REFS).into())
}

fn static_prop_name(prop: &MemberProp) -> Option<DeclassAtom> {
    match prop {
        MemberProp::Ident(ident) => Some(ident.sym.to_owned()),
        MemberProp::Computed(computed) => match *computed.expr {
            Expr::Lit(Lit::Str(ref s)) => Some(s.value.to_owned()),
            _ => None,
        },
        MemberProp::PrivateName(_) => None,
    }
}

fn access_expr(access: &Access, span: Span) -> Box<Expr> {
    match access {
        Access::Direct(ident) => Box::new(Expr::Ident(ident.to_owned().into_ident_spanned(span))),
        Access::Value(ident) => member_expr(ident_expr(ident.to_owned()), "value".into()),
        Access::Member { object, property } => {
            property_access(ident_expr(object.to_owned()), property)
        }
    }
}
