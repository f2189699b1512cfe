//! Instance properties (`this.$store`, `this.$route`, `this.$emit`, ...) which setup code
//! acquires through composables, macros or imports

use declass_core::{call, const_decl, DeclassAtom, VueImports};
use indexmap::IndexSet;
use swc_core::{
    common::DUMMY_SP,
    ecma::{
        ast::{
            CallExpr, Callee, Class, Expr, Function, GetterProp, Lit, MemberExpr, MemberProp,
            SetterProp,
        },
        visit::{Visit, VisitWith},
    },
};

use super::props::{emits_contribution, props_contribution};
use crate::{
    atoms::{
        ATTRS, DOLLAR_EMIT, ROUTE, ROUTER, SLOTS, STORE, USE_ROUTE, USE_ROUTER, USE_STORE,
        VUEX, VUE_ROUTER,
    },
    Access, ImportRequirement, ReferenceKind, ResultKind, ResultNode, TransformResult,
};

/// Results providing every instance property the nodes of `results` access
pub fn instance_dependencies(results: &[TransformResult]) -> Vec<TransformResult> {
    let mut scan = InstanceScan::default();
    for result in results {
        if matches!(result.kind, ResultKind::Options(_)) {
            continue;
        }

        for node in result.nodes.iter() {
            match node {
                ResultNode::Stmt(stmt) => stmt.visit_with(&mut scan),
                ResultNode::Expr(expr) => expr.visit_with(&mut scan),
                ResultNode::ExportDecl(decl) => decl.visit_with(&mut scan),
            }
        }
    }

    let InstanceScan { used, events } = scan;
    let mut dependencies = Vec::with_capacity(used.len());

    for property in used.iter() {
        let dependency = match &**property {
            "$store" => Some(composable(
                "store",
                STORE.to_owned(),
                ImportRequirement::Named {
                    source: VUEX.to_owned(),
                    name: USE_STORE.to_owned(),
                },
                property,
            )),
            "$router" => Some(composable(
                "router",
                ROUTER.to_owned(),
                ImportRequirement::Named {
                    source: VUE_ROUTER.to_owned(),
                    name: USE_ROUTER.to_owned(),
                },
                property,
            )),
            "$route" => Some(composable(
                "route",
                ROUTE.to_owned(),
                ImportRequirement::Named {
                    source: VUE_ROUTER.to_owned(),
                    name: USE_ROUTE.to_owned(),
                },
                property,
            )),
            "$attrs" => Some(composable(
                "attrs",
                ATTRS.to_owned(),
                ImportRequirement::Vue(VueImports::UseAttrs),
                property,
            )),
            "$slots" => Some(composable(
                "slots",
                SLOTS.to_owned(),
                ImportRequirement::Vue(VueImports::UseSlots),
                property,
            )),

            // The macro merge binds `$emit` and `$props`
            "$emit" => Some(emits_contribution(
                events.iter().map(|event| (event.to_owned(), None)).collect(),
            )),
            "$props" => Some(props_contribution(vec![], None)),

            "$nextTick" => Some(
                TransformResult::new(ResultKind::Import, "Import-nextTick", ReferenceKind::None)
                    .with_vue_import(VueImports::NextTick)
                    .with_binding(
                        property.to_owned(),
                        Access::Direct(VueImports::NextTick.as_atom()),
                    ),
            ),

            _ => None,
        };

        dependencies.extend(dependency);
    }

    dependencies
}

/// `const store = useStore()`
fn composable(
    label: &str,
    binding: DeclassAtom,
    import: ImportRequirement,
    property: &DeclassAtom,
) -> TransformResult {
    let function_name = match import {
        ImportRequirement::Vue(vue_import) => vue_import.as_atom(),
        ImportRequirement::Named { ref name, .. } => name.to_owned(),
        ImportRequirement::Default { ref local, .. } => local.to_owned(),
    };

    TransformResult::new(
        ResultKind::Composable,
        format!("Composable-{label}"),
        ReferenceKind::Variable,
    )
    .with_stmt(const_decl(DUMMY_SP, binding.to_owned(), call(function_name, vec![])))
    .with_output(binding.to_owned())
    .with_import(import)
    .with_binding(property.to_owned(), Access::Direct(binding))
}

#[derive(Default)]
struct InstanceScan {
    /// `$`-prefixed properties accessed through `this`
    used: IndexSet<DeclassAtom>,
    /// Literal event names of `this.$emit("event")`
    events: IndexSet<DeclassAtom>,
}

impl Visit for InstanceScan {
    fn visit_member_expr(&mut self, n: &MemberExpr) {
        if let (Expr::This(_), MemberProp::Ident(prop)) = (&*n.obj, &n.prop) {
            if prop.sym.starts_with('$') {
                self.used.insert(prop.sym.to_owned());
            }
        }
        n.visit_children_with(self);
    }

    fn visit_call_expr(&mut self, n: &CallExpr) {
        if let Callee::Expr(ref callee) = n.callee {
            if let Expr::Member(ref member) = **callee {
                let is_emit = matches!(
                    (&*member.obj, &member.prop),
                    (Expr::This(_), MemberProp::Ident(prop)) if prop.sym == *DOLLAR_EMIT
                );
                let event = n.args.first().and_then(|arg| match *arg.expr {
                    Expr::Lit(Lit::Str(ref s)) => Some(s.value.to_owned()),
                    _ => None,
                });

                if let (true, Some(event)) = (is_emit, event) {
                    self.events.insert(event);
                }
            }
        }
        n.visit_children_with(self);
    }

    fn visit_function(&mut self, _n: &Function) {}

    fn visit_class(&mut self, _n: &Class) {}

    fn visit_getter_prop(&mut self, _n: &GetterProp) {}

    fn visit_setter_prop(&mut self, _n: &SetterProp) {}
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{component, convert_ok};

    #[test]
    fn it_acquires_composables_once() {
        let output = convert_ok(&component(
            "go() { this.$router.push(this.$route.query.next as string); }\n\
             back() { this.$router.back(); }",
        ));
        assert!(output.contains("import { useRoute, useRouter } from \"vue-router\";"));
        assert_eq!(output.matches("const router = useRouter();").count(), 1);
        assert!(output.contains("const route = useRoute();"));
        assert!(output.contains("router.push(route.query.next as string);"));
    }

    #[test]
    fn it_collects_emitted_events() {
        let output = convert_ok(&component(
            "save() { this.$emit('save', 1); this.$emit('done'); }",
        ));
        assert!(output.contains("const emit = defineEmits<{"));
        assert!(output.contains("save: any[]"));
        assert!(output.contains("done: any[]"));
        assert!(output.contains("emit(\"save\", 1);"));
    }

    #[test]
    fn it_imports_next_tick_and_attrs() {
        let output = convert_ok(&component(
            "async refresh() { await this.$nextTick(); return this.$attrs.id; }",
        ));
        assert!(output.contains("import { nextTick, useAttrs } from \"vue\";"));
        assert!(output.contains("await nextTick();"));
        assert!(output.contains("const attrs = useAttrs();"));
        assert!(output.contains("return attrs.id;"));
    }
}
