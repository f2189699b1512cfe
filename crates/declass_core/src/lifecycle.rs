use phf::phf_map;

use crate::VueImports;

/// What happens to an Options API lifecycle hook in `<script setup>`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleHook {
    /// The hook runs at setup time, its body is inlined into the setup scope
    Inline,
    /// The hook is registered using a composition function, e.g. `onMounted`
    Register(VueImports),
}

/// Maps the Options API hook name to its Composition API counterpart.
/// Vue 2 and Vue 3 names are both recognized.
pub static LIFECYCLE_HOOKS: phf::Map<&'static str, LifecycleHook> = phf_map! {
    "beforeCreate" => LifecycleHook::Inline,
    "created" => LifecycleHook::Inline,
    "beforeMount" => LifecycleHook::Register(VueImports::OnBeforeMount),
    "mounted" => LifecycleHook::Register(VueImports::OnMounted),
    "beforeUpdate" => LifecycleHook::Register(VueImports::OnBeforeUpdate),
    "updated" => LifecycleHook::Register(VueImports::OnUpdated),
    "activated" => LifecycleHook::Register(VueImports::OnActivated),
    "deactivated" => LifecycleHook::Register(VueImports::OnDeactivated),
    "beforeDestroy" => LifecycleHook::Register(VueImports::OnBeforeUnmount),
    "beforeUnmount" => LifecycleHook::Register(VueImports::OnBeforeUnmount),
    "destroyed" => LifecycleHook::Register(VueImports::OnUnmounted),
    "unmounted" => LifecycleHook::Register(VueImports::OnUnmounted),
    "errorCaptured" => LifecycleHook::Register(VueImports::OnErrorCaptured),
    "renderTracked" => LifecycleHook::Register(VueImports::OnRenderTracked),
    "renderTriggered" => LifecycleHook::Register(VueImports::OnRenderTriggered),
    "serverPrefetch" => LifecycleHook::Register(VueImports::OnServerPrefetch),
};
