use declass_core::{
    call_with_type_arg, const_decl, key_value_prop, object_lit, ts_any, ts_property_signature,
    ts_type_lit, DeclassAtom,
};
use indexmap::IndexMap;
use swc_core::{
    common::DUMMY_SP,
    ecma::ast::{Expr, Stmt, TsArrayType, TsKeywordTypeKind, TsType},
};

use crate::{
    atoms::{DEFINE_EMITS, DEFINE_PROPS, EMIT, PROPS, WITH_DEFAULTS},
    Access, MacroContribution, MacroKind, ReferenceKind, ResultKind, ThisBinding, TransformResult,
};

/// Merges every contribution to the same compiler macro into one declaration.
///
/// Properties are unioned by key in first-seen order, the first known type of a key wins.
/// The merged declarations are placed before every other result.
pub fn merge_macros(results: Vec<TransformResult>) -> Vec<TransformResult> {
    let mut merged: IndexMap<MacroKind, MergedMacro> = IndexMap::new();
    let mut rest = Vec::with_capacity(results.len());

    for result in results {
        match result.kind {
            ResultKind::Macro(contribution) => {
                let entry = merged
                    .entry(contribution.macro_kind)
                    .or_insert_with(MergedMacro::default);
                entry.absorb(*contribution, result.bindings);
            }
            kind => rest.push(TransformResult { kind, ..result }),
        }
    }

    let mut out = Vec::with_capacity(merged.len() + rest.len());
    out.extend(
        merged
            .into_iter()
            .map(|(macro_kind, merged)| merged.into_result(macro_kind)),
    );
    out.extend(rest);
    out
}

#[derive(Default)]
struct MergedMacro {
    properties: IndexMap<DeclassAtom, crate::TypeProperty>,
    defaults: IndexMap<DeclassAtom, Box<Expr>>,
    bindings: Vec<ThisBinding>,
}

impl MergedMacro {
    fn absorb(&mut self, contribution: MacroContribution, bindings: Vec<ThisBinding>) {
        for property in contribution.type_properties {
            match self.properties.get_mut(&property.key) {
                Some(existing) => {
                    if is_unknown(existing.ty.as_deref()) && !is_unknown(property.ty.as_deref()) {
                        existing.ty = property.ty;
                    }
                    existing.optional &= property.optional;
                }
                None => {
                    self.properties.insert(property.key.to_owned(), property);
                }
            }
        }

        for (key, value) in contribution.defaults {
            self.defaults.entry(key).or_insert(value);
        }

        for binding in bindings {
            if !self.bindings.iter().any(|b| b.name == binding.name) {
                self.bindings.push(binding);
            }
        }
    }

    fn into_result(self, macro_kind: MacroKind) -> TransformResult {
        let contribution = MacroContribution {
            macro_kind,
            type_properties: self.properties.into_values().collect(),
            defaults: self.defaults.into_iter().collect(),
        };

        let (name, instance_name, reference) = match macro_kind {
            MacroKind::Props => (PROPS.to_owned(), "$props", ReferenceKind::DefinableVariable),
            MacroKind::Emits => (EMIT.to_owned(), "$emit", ReferenceKind::DefinableMethod),
        };

        let stmt = macro_declaration(&contribution);
        let mut result = TransformResult::macro_contribution(contribution);
        result.reference = reference;
        result.bindings = self.bindings;

        result
            .with_stmt(stmt)
            .with_output(name.to_owned())
            .with_binding(instance_name.into(), Access::Direct(name))
    }
}

/// `const props = withDefaults(defineProps<{ ... }>(), { ... })`
/// or `const emit = defineEmits<{ ... }>()`
pub fn macro_declaration(contribution: &MacroContribution) -> Stmt {
    let ty = Some(macro_type(contribution));

    match contribution.macro_kind {
        MacroKind::Props => {
            let mut init = call_with_type_arg(DEFINE_PROPS.to_owned(), ty, vec![]);
            if !contribution.defaults.is_empty() {
                let defaults = contribution
                    .defaults
                    .iter()
                    .map(|(key, value)| key_value_prop(key.to_owned(), value.to_owned()))
                    .collect();
                init = call_with_type_arg(
                    WITH_DEFAULTS.to_owned(),
                    None,
                    vec![init, object_lit(defaults)],
                );
            }
            const_decl(DUMMY_SP, PROPS.to_owned(), init)
        }

        MacroKind::Emits => const_decl(
            DUMMY_SP,
            EMIT.to_owned(),
            call_with_type_arg(DEFINE_EMITS.to_owned(), ty, vec![]),
        ),
    }
}

/// The type literal of the merged properties.
/// Unknown prop types are `any`, unknown event payloads are `any[]`.
pub fn macro_type(contribution: &MacroContribution) -> Box<TsType> {
    let members = contribution
        .type_properties
        .iter()
        .map(|property| {
            let ty = match property.ty {
                Some(ref ty) if !is_unknown(Some(&**ty)) => ty.to_owned(),
                _ => match contribution.macro_kind {
                    MacroKind::Props => ts_any(),
                    MacroKind::Emits => Box::new(TsType::TsArrayType(TsArrayType {
                        span: DUMMY_SP,
                        elem_type: ts_any(),
                    })),
                },
            };
            let optional = contribution.macro_kind == MacroKind::Props && property.optional;
            ts_property_signature(property.key.to_owned(), ty, optional)
        })
        .collect();

    ts_type_lit(members)
}

fn is_unknown(ty: Option<&TsType>) -> bool {
    match ty {
        None => true,
        Some(TsType::TsKeywordType(keyword)) => matches!(
            keyword.kind,
            TsKeywordTypeKind::TsAnyKeyword | TsKeywordTypeKind::TsUnknownKeyword
        ),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        rules::props::{emits_contribution, props_contribution, PropOptions},
        test_utils::{to_str, ts_type},
    };

    fn prop(name: &str, ty: Option<&str>) -> TransformResult {
        props_contribution(
            vec![(
                name.into(),
                PropOptions {
                    ty: ty.map(ts_type),
                    ..Default::default()
                },
            )],
            None,
        )
    }

    fn merged_properties(result: &TransformResult) -> Vec<(String, Option<String>)> {
        let ResultKind::Macro(ref contribution) = result.kind else {
            panic!("expected a macro result");
        };
        contribution
            .type_properties
            .iter()
            .map(|p| (p.key.to_string(), p.ty.as_ref().map(|ty| to_str(&**ty))))
            .collect()
    }

    #[test]
    fn it_unions_disjoint_keys_in_first_seen_order() {
        let results = merge_macros(vec![
            prop("b", Some("string")),
            prop("a", Some("number")),
            prop("c", None),
        ]);

        assert_eq!(results.len(), 1);
        assert_eq!(
            merged_properties(&results[0]),
            vec![
                ("b".to_owned(), Some("string".to_owned())),
                ("a".to_owned(), Some("number".to_owned())),
                ("c".to_owned(), None),
            ]
        );
        assert_eq!(&*results[0].output_variables[0], "props");
    }

    #[test]
    fn it_keeps_the_first_known_type() {
        let results = merge_macros(vec![
            prop("a", None),
            prop("a", Some("string")),
            prop("a", Some("number")),
        ]);

        assert_eq!(
            merged_properties(&results[0]),
            vec![("a".to_owned(), Some("string".to_owned()))]
        );
    }

    #[test]
    fn it_merges_each_macro_kind_separately() {
        let results = merge_macros(vec![
            TransformResult::new(ResultKind::Composition, "Data-ref", ReferenceKind::None),
            emits_contribution(vec![("change".into(), None)]),
            prop("a", None),
            emits_contribution(vec![("close".into(), None)]),
        ]);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].tag, "Macro-defineEmits");
        assert_eq!(results[1].tag, "Macro-defineProps");
        assert_eq!(results[2].tag, "Data-ref");
        assert_eq!(merged_properties(&results[0]).len(), 2);

        let bindings = results[1].this_bindings();
        assert!(bindings.iter().any(|b| &*b.name == "a"));
        assert!(bindings
            .iter()
            .any(|b| &*b.name == "$props" && b.access == Access::Direct("props".into())));
    }
}
