use declass_core::DeclassAtom;
use thiserror::Error;

/// Fatal conversion errors.
///
/// Constructs which merely could not be converted are not errors,
/// they are preserved with an advisory comment instead.
#[derive(Debug, Error)]
pub enum TransformError {
    /// None of the class component packages is imported
    #[error("no vue class component import")]
    NoClassComponentImport,

    /// There is no decorated class exported from the file
    #[error("no default export found")]
    NoDefaultExport,

    /// A component option has the wrong literal shape, e.g. `props: "foo"`
    #[error("invalid `{option}` option: expected {expected}")]
    InvalidOptionShape {
        option: DeclassAtom,
        expected: &'static str,
    },

    /// A decorator argument has the wrong literal shape, e.g. `@Watch(foo)`
    #[error("invalid argument of @{decorator}: expected {expected}")]
    InvalidDecoratorArgument {
        decorator: DeclassAtom,
        expected: &'static str,
    },

    /// A decorator which is allowed once per member was used several times
    #[error("duplicate @{decorator} decorator on `{member}`")]
    DuplicateDecorator {
        decorator: DeclassAtom,
        member: DeclassAtom,
    },

    /// Naming collisions were found and `stop_on_collisions` is set
    #[error("{0}")]
    NamingCollisions(String),
}
