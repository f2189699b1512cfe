//! The main public crate of the `declass` project.
//!
//! Converts a Vue Class Component (`vue-class-component`, `vue-property-decorator`,
//! `vue-facing-decorator`) into `<script setup>` code using the Composition API.
//!
//! ```
//! use declass::{convert, TransformOptions};
//!
//! let input = r#"
//! import { Component, Vue } from "vue-property-decorator";
//!
//! @Component
//! export default class Counter extends Vue {
//!     count = 0;
//! }
//! "#;
//!
//! let output = convert(input, None, &TransformOptions::default()).unwrap();
//! assert!(output.code.contains("const count = ref(0);"));
//! ```

use std::path::{Path, PathBuf};

use declass_core::SfcScriptLang;
use declass_parser::{parse_script, print_module, read_sfc, write_sfc};
use thiserror::Error;

pub use declass_parser::{ParseError, PrintError, SfcError};
pub use declass_transform::{error::TransformError, MixinMode, TransformOptions};

/// The converted code and everything which needs a human look
#[derive(Debug)]
pub struct ConvertOutput {
    pub code: String,
    pub warnings: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Sfc(#[from] SfcError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Print(#[from] PrintError),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Only `.vue`, `.ts` and `.js` files are converted
    #[error("{}: unsupported file type, expected .vue, .ts or .js", .0.display())]
    UnsupportedFile(PathBuf),
}

/// Converts the text of a script containing a class component.
///
/// `path` only selects the language, `.js` is read as JavaScript and anything else as TypeScript.
/// Naming collisions found in non-strict mode are prepended to the code as a block comment.
pub fn convert(
    source: &str,
    path: Option<&Path>,
    options: &TransformOptions,
) -> Result<ConvertOutput, ConvertError> {
    let lang = match path.and_then(|p| p.extension()).and_then(|ext| ext.to_str()) {
        Some("js") => SfcScriptLang::Es,
        _ => SfcScriptLang::Typescript,
    };

    convert_script(source, lang, options)
}

/// Converts the `<script>` of a Single File Component and rebuilds the component
/// with `<script setup>`, keeping the template and the styles.
pub fn convert_sfc(
    source: &str,
    options: &TransformOptions,
) -> Result<ConvertOutput, ConvertError> {
    let container = read_sfc(source)?;
    let output = convert_script(&container.script.content, container.script.lang, options)?;

    Ok(ConvertOutput {
        code: write_sfc(&container, &output.code),
        warnings: output.warnings,
    })
}

/// Reads and converts a `.vue`, `.ts` or `.js` file.
/// The result is not written anywhere.
pub fn convert_file(
    path: &Path,
    options: &TransformOptions,
) -> Result<ConvertOutput, ConvertError> {
    let is_sfc = match path.extension().and_then(|ext| ext.to_str()) {
        Some("vue") => true,
        Some("ts" | "js") => false,
        _ => return Err(ConvertError::UnsupportedFile(path.to_owned())),
    };

    let source = std::fs::read_to_string(path).map_err(|source| ConvertError::Io {
        path: path.to_owned(),
        source,
    })?;

    let _span = tracing::debug_span!("convert_file", path = %path.display()).entered();

    if is_sfc {
        convert_sfc(&source, options)
    } else {
        convert(&source, Some(path), options)
    }
}

fn convert_script(
    source: &str,
    lang: SfcScriptLang,
    options: &TransformOptions,
) -> Result<ConvertOutput, ConvertError> {
    let mut parsed = parse_script(source, lang)?;
    let comments = parsed.comment_sink();

    let output = declass_transform::transform_script(parsed.take_module(), &comments, options)?;
    let code = print_module(&parsed, &output.module)?;

    let code = match output.collision_report {
        Some(report) => format!("/*\n{report}*/\n{code}"),
        None => code,
    };

    Ok(ConvertOutput {
        code,
        warnings: output.warnings,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const COUNTER: &str = r#"import { Component, Vue } from "vue-property-decorator";

@Component
export default class Counter extends Vue {
    count = 0;
    increment() { this.count++; }
}
"#;

    #[test]
    fn it_converts_scripts() {
        let output = convert(COUNTER, None, &TransformOptions::default()).unwrap();
        let mut lines = output.code.lines();
        assert_eq!(lines.next(), Some("import { ref } from \"vue\";"));
        assert_eq!(lines.next(), Some("const count = ref(0);"));
        assert!(output.code.contains("const increment = "));
        assert!(output.code.contains("count.value++;"));
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn it_converts_single_file_components() {
        let source = format!(
            "<template><div>{{{{ count }}}}</div></template>\n\n<script lang=\"ts\">\n{COUNTER}</script>\n\n<style scoped>.a {{ color: red; }}</style>\n"
        );
        let output = convert_sfc(&source, &TransformOptions::default()).unwrap();

        assert!(output
            .code
            .starts_with("<script setup lang=\"ts\">\nimport { ref } from \"vue\";\n"));
        assert!(output.code.contains("</script>\n\n<template><div>{{ count }}</div></template>\n"));
        assert!(output.code.ends_with("\n<style scoped>.a { color: red; }</style>\n"));
    }

    #[test]
    fn it_prepends_the_collision_report() {
        let source = COUNTER.replace("\n@Component", "\nconst count = 1;\n\n@Component");
        let output = convert(&source, None, &TransformOptions::default()).unwrap();
        assert!(output.code.starts_with("/*\nNaming collisions"));
        assert!(output.code.contains(" - `count`"));
    }

    #[test]
    fn it_fails_on_collisions_in_strict_mode() {
        let source = COUNTER.replace("\n@Component", "\nconst count = 1;\n\n@Component");
        let options = TransformOptions {
            stop_on_collisions: true,
            ..Default::default()
        };
        let error = convert(&source, None, &options).unwrap_err();
        assert!(matches!(error, ConvertError::Transform(TransformError::NamingCollisions(_))));
    }

    #[test]
    fn it_reports_container_errors() {
        let source =
            format!("<script setup>\nconst a = 1;\n</script>\n<script>\n{COUNTER}</script>\n");
        let error = convert_sfc(&source, &TransformOptions::default()).unwrap_err();
        assert_eq!(error.to_string(), "component already has script setup");
    }

    #[test]
    fn it_reports_syntax_errors() {
        let error = convert("const = ;", None, &TransformOptions::default()).unwrap_err();
        assert!(matches!(error, ConvertError::Parse(_)));
    }

    #[test]
    fn it_rejects_unsupported_files() {
        let error =
            convert_file(Path::new("styles.css"), &TransformOptions::default()).unwrap_err();
        assert!(matches!(error, ConvertError::UnsupportedFile(_)));
    }

    #[test]
    fn it_reports_missing_files() {
        let path = std::env::temp_dir().join("declass-missing-component.vue");
        let error = convert_file(&path, &TransformOptions::default()).unwrap_err();
        assert!(matches!(error, ConvertError::Io { .. }));
    }
}
