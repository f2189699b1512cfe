mod error;
mod script;
mod sfc;

pub use error::{ParseError, ParseErrorKind, PrintError, SfcError};
pub use script::{parse_script, print_module, ParsedScript};
pub use sfc::{read_sfc, write_sfc};
