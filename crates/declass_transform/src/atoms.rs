//! Helper module to provide commonly used words as static symbols (`DeclassAtom`)

use declass_core::{declass_atom, DeclassAtom};

lazy_static! {
    // Packages
    pub static ref VUE: DeclassAtom = declass_atom!("vue");
    pub static ref VUE_CLASS_COMPONENT: DeclassAtom = declass_atom!("vue-class-component");
    pub static ref VUE_PROPERTY_DECORATOR: DeclassAtom = declass_atom!("vue-property-decorator");
    pub static ref VUE_FACING_DECORATOR: DeclassAtom = declass_atom!("vue-facing-decorator");
    pub static ref VUEX: DeclassAtom = declass_atom!("vuex");
    pub static ref VUEX_CLASS: DeclassAtom = declass_atom!("vuex-class");
    pub static ref VUE_ROUTER: DeclassAtom = declass_atom!("vue-router");

    // Decorators and class component helpers
    pub static ref COMPONENT: DeclassAtom = declass_atom!("Component");
    pub static ref OPTIONS: DeclassAtom = declass_atom!("Options");
    pub static ref PROP: DeclassAtom = declass_atom!("Prop");
    pub static ref PROP_SYNC: DeclassAtom = declass_atom!("PropSync");
    pub static ref MODEL: DeclassAtom = declass_atom!("Model");
    pub static ref REF_DECORATOR: DeclassAtom = declass_atom!("Ref");
    pub static ref INJECT_DECORATOR: DeclassAtom = declass_atom!("Inject");
    pub static ref INJECT_REACTIVE: DeclassAtom = declass_atom!("InjectReactive");
    pub static ref PROVIDE_DECORATOR: DeclassAtom = declass_atom!("Provide");
    pub static ref PROVIDE_REACTIVE: DeclassAtom = declass_atom!("ProvideReactive");
    pub static ref WATCH_DECORATOR: DeclassAtom = declass_atom!("Watch");
    pub static ref EMIT_DECORATOR: DeclassAtom = declass_atom!("Emit");
    pub static ref STATE: DeclassAtom = declass_atom!("State");
    pub static ref GETTER: DeclassAtom = declass_atom!("Getter");
    pub static ref ACTION: DeclassAtom = declass_atom!("Action");
    pub static ref MUTATION: DeclassAtom = declass_atom!("Mutation");
    pub static ref NAMESPACE: DeclassAtom = declass_atom!("namespace");
    pub static ref MIXINS: DeclassAtom = declass_atom!("Mixins");
    pub static ref VUE_CLASS: DeclassAtom = declass_atom!("Vue");

    // Compiler macros
    pub static ref DEFINE_EMITS: DeclassAtom = declass_atom!("defineEmits");
    pub static ref DEFINE_EXPOSE: DeclassAtom = declass_atom!("defineExpose");
    pub static ref DEFINE_OPTIONS: DeclassAtom = declass_atom!("defineOptions");
    pub static ref DEFINE_PROPS: DeclassAtom = declass_atom!("defineProps");
    pub static ref WITH_DEFAULTS: DeclassAtom = declass_atom!("withDefaults");

    // Generated bindings
    pub static ref PROPS: DeclassAtom = declass_atom!("props");
    pub static ref EMIT: DeclassAtom = declass_atom!("emit");
    pub static ref STORE: DeclassAtom = declass_atom!("store");
    pub static ref ROUTER: DeclassAtom = declass_atom!("router");
    pub static ref ROUTE: DeclassAtom = declass_atom!("route");
    pub static ref ATTRS: DeclassAtom = declass_atom!("attrs");
    pub static ref SLOTS: DeclassAtom = declass_atom!("slots");
    pub static ref USE_STORE: DeclassAtom = declass_atom!("useStore");
    pub static ref USE_ROUTER: DeclassAtom = declass_atom!("useRouter");
    pub static ref USE_ROUTE: DeclassAtom = declass_atom!("useRoute");
    pub static ref EMIT_VALUE: DeclassAtom = declass_atom!("emitValue");
    pub static ref PAYLOAD: DeclassAtom = declass_atom!("payload");

    // Instance properties
    pub static ref DOLLAR_EMIT: DeclassAtom = declass_atom!("$emit");
    pub static ref DOLLAR_REFS: DeclassAtom = declass_atom!("$refs");
    pub static ref DOLLAR_STORE: DeclassAtom = declass_atom!("$store");

    // Option keys
    pub static ref COMPONENTS: DeclassAtom = declass_atom!("components");
    pub static ref DEEP: DeclassAtom = declass_atom!("deep");
    pub static ref DEFAULT: DeclassAtom = declass_atom!("default");
    pub static ref EMITS: DeclassAtom = declass_atom!("emits");
    pub static ref EXPOSE: DeclassAtom = declass_atom!("expose");
    pub static ref FROM: DeclassAtom = declass_atom!("from");
    pub static ref GET: DeclassAtom = declass_atom!("get");
    pub static ref HANDLER: DeclassAtom = declass_atom!("handler");
    pub static ref IMMEDIATE: DeclassAtom = declass_atom!("immediate");
    pub static ref INHERIT_ATTRS: DeclassAtom = declass_atom!("inheritAttrs");
    pub static ref NAME: DeclassAtom = declass_atom!("name");
    pub static ref REQUIRED: DeclassAtom = declass_atom!("required");
    pub static ref SET: DeclassAtom = declass_atom!("set");
    pub static ref TYPE: DeclassAtom = declass_atom!("type");
    pub static ref WATCH_OPTION: DeclassAtom = declass_atom!("watch");
}
