use crate::DeclassAtom;
use flagset::{flags, FlagSet};
use strum_macros::{AsRefStr, EnumString, IntoStaticStr};

flags! {
    /// Composition API functions which generated code may import from `vue`.
    /// The declaration order is also the order of specifiers in the generated import.
    #[derive(AsRefStr, EnumString, IntoStaticStr)]
    pub enum VueImports: u64 {
        #[strum(serialize = "computed")]
        Computed,
        #[strum(serialize = "inject")]
        Inject,
        #[strum(serialize = "nextTick")]
        NextTick,
        #[strum(serialize = "onActivated")]
        OnActivated,
        #[strum(serialize = "onBeforeMount")]
        OnBeforeMount,
        #[strum(serialize = "onBeforeUnmount")]
        OnBeforeUnmount,
        #[strum(serialize = "onBeforeUpdate")]
        OnBeforeUpdate,
        #[strum(serialize = "onDeactivated")]
        OnDeactivated,
        #[strum(serialize = "onErrorCaptured")]
        OnErrorCaptured,
        #[strum(serialize = "onMounted")]
        OnMounted,
        #[strum(serialize = "onRenderTracked")]
        OnRenderTracked,
        #[strum(serialize = "onRenderTriggered")]
        OnRenderTriggered,
        #[strum(serialize = "onServerPrefetch")]
        OnServerPrefetch,
        #[strum(serialize = "onUnmounted")]
        OnUnmounted,
        #[strum(serialize = "onUpdated")]
        OnUpdated,
        #[strum(serialize = "provide")]
        Provide,
        #[strum(serialize = "reactive")]
        Reactive,
        #[strum(serialize = "ref")]
        Ref,
        #[strum(serialize = "useAttrs")]
        UseAttrs,
        #[strum(serialize = "useSlots")]
        UseSlots,
        #[strum(serialize = "watch")]
        Watch,
    }
}

impl VueImports {
    #[inline]
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    #[inline]
    pub fn as_atom(self) -> DeclassAtom {
        self.as_str().into()
    }
}

pub type VueImportsSet = FlagSet<VueImports>;

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn it_maps_names_both_ways() {
        assert_eq!(VueImports::OnMounted.as_str(), "onMounted");
        assert_eq!(VueImports::from_str("nextTick"), Ok(VueImports::NextTick));
        assert!(VueImports::from_str("defineProps").is_err());
    }

    #[test]
    fn it_iterates_in_declaration_order() {
        let set: VueImportsSet = VueImports::Watch | VueImports::Computed | VueImports::Ref;
        let names: Vec<&str> = set.into_iter().map(VueImports::as_str).collect();
        assert_eq!(names, vec!["computed", "ref", "watch"]);
    }
}
