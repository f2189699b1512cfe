mod builders;
mod comments;
mod lifecycle;
mod primitive;
mod sfc;
mod vue_imports;

pub use builders::*;
pub use comments::CommentSink;
pub use lifecycle::{LifecycleHook, LIFECYCLE_HOOKS};
pub use primitive::{classify_expr, classify_type, Primitiveness};
pub use sfc::*;
pub use vue_imports::{VueImports, VueImportsSet};

pub type DeclassAtom = swc_core::ecma::atoms::Atom;

/// Creates a [`DeclassAtom`] from a string literal
#[macro_export]
macro_rules! declass_atom {
    ($lit: literal) => {
        $crate::DeclassAtom::from($lit)
    };
}
