use declass_core::{declass_atom, SfcContainer, SfcScript, SfcScriptLang, SfcStyle, SfcTemplate};
use swc_core::common::{BytePos, Span, DUMMY_SP};
use swc_ecma_parser::StringInput;
use swc_html_ast::{Child, DocumentFragment, DocumentMode, Element, Namespace};
use swc_html_parser::{
    lexer::Lexer,
    parser::{Parser, ParserConfig},
};

use crate::error::SfcError;

/// Reads the blocks of a Single File Component.
///
/// Fails when there is no `<script>`, when `<script setup>` is already present,
/// or when blocks are duplicated.
pub fn read_sfc(input: &str) -> Result<SfcContainer, SfcError> {
    let fragment = parse_html_document_fragment(input)
        .map_err(|e| SfcError::Structural(vec![format!("{:?}", e.into_inner().1)]))?;

    let mut structural_errors: Vec<String> = Vec::new();
    let mut script: Option<SfcScript> = None;
    let mut has_script_setup = false;
    let mut template: Option<SfcTemplate> = None;
    let mut styles: Vec<SfcStyle> = Vec::new();

    macro_rules! report_error {
        ($message: expr, $span: expr) => {
            structural_errors.push(format!(
                "{} at offset {}",
                $message,
                $span.lo.0.saturating_sub(1)
            ))
        };
    }

    for root_node in fragment.children.into_iter() {
        // Only root elements are supported
        let Child::Element(root_element) = root_node else {
            continue;
        };

        let root_span = root_element.span;
        let tag_name = &root_element.tag_name;

        if tag_name.eq("template") {
            if template.is_some() {
                report_error!("duplicate <template>", root_span);
                continue;
            }

            template = Some(SfcTemplate {
                content: raw_inner_content(input, root_span, "template"),
                lang: attribute_value(&root_element, "lang"),
            });
        } else if tag_name.eq("script") {
            if root_element.attributes.iter().any(|attr| attr.name.eq("setup")) {
                has_script_setup = true;
                continue;
            }

            if script.is_some() {
                report_error!("duplicate <script>", root_span);
                continue;
            }

            let lang = attribute_value(&root_element, "lang");
            script = Some(SfcScript {
                content: text_content(&root_element),
                lang: SfcScriptLang::from_lang_attr(lang.as_deref()),
            });
        } else if tag_name.eq("style") {
            styles.push(SfcStyle {
                content: text_content(&root_element),
                lang: attribute_value(&root_element, "lang"),
                is_scoped: root_element
                    .attributes
                    .iter()
                    .any(|attr| attr.name.eq("scoped")),
            });
        }
        // Custom blocks are not carried over
    }

    if has_script_setup {
        return Err(SfcError::AlreadyScriptSetup);
    }

    if !structural_errors.is_empty() {
        return Err(SfcError::Structural(structural_errors));
    }

    let Some(script) = script else {
        return Err(SfcError::NoScript);
    };

    Ok(SfcContainer {
        script,
        template,
        styles,
    })
}

/// Reconstructs the component with the converted script.
///
/// Block order is `<script setup>`, `<template>`, then every `<style>`.
pub fn write_sfc(container: &SfcContainer, new_script: &str) -> String {
    let mut out = String::with_capacity(new_script.len() + 256);

    out.push_str("<script setup lang=\"ts\">\n");
    out.push_str(new_script.trim_matches('\n'));
    out.push_str("\n</script>\n");

    if let Some(ref template) = container.template {
        out.push_str("\n<template");
        if let Some(ref lang) = template.lang {
            out.push_str(&format!(" lang=\"{lang}\""));
        }
        out.push('>');
        out.push_str(&template.content);
        out.push_str("</template>\n");
    }

    for style in container.styles.iter() {
        out.push_str("\n<style");
        if let Some(ref lang) = style.lang {
            out.push_str(&format!(" lang=\"{lang}\""));
        }
        if style.is_scoped {
            out.push_str(" scoped");
        }
        out.push('>');
        out.push_str(&style.content);
        out.push_str("</style>\n");
    }

    out
}

/// Adapted from `swc_html_parser`
fn parse_html_document_fragment(
    input: &str,
) -> Result<DocumentFragment, swc_html_parser::error::Error> {
    let lexer = Lexer::new(StringInput::new(
        input,
        BytePos(1),
        BytePos(1 + input.len() as u32),
    ));

    let parser_config = ParserConfig {
        scripting_enabled: false,
        iframe_srcdoc: false,
        allow_self_closing: false,
    };
    let mut parser = Parser::new(lexer, parser_config);

    let ctx_element = Element {
        span: DUMMY_SP,
        tag_name: declass_atom!("div"),
        namespace: Namespace::HTML,
        attributes: vec![],
        children: vec![],
        content: None,
        is_self_closing: false,
    };

    let result = parser.parse_document_fragment(ctx_element, DocumentMode::NoQuirks, None);

    // Recoverable errors are expected: Vue templates are not strictly valid HTML
    let recoverable = parser.take_errors();
    if !recoverable.is_empty() {
        tracing::trace!(count = recoverable.len(), "recoverable html errors in component");
    }

    result
}

fn attribute_value(element: &Element, name: &str) -> Option<declass_core::DeclassAtom> {
    element
        .attributes
        .iter()
        .find(|attr| attr.name.eq(name))
        .and_then(|attr| attr.value.to_owned())
}

/// Raw text elements (`<script>`, `<style>`) have a single `Text` child
fn text_content(element: &Element) -> String {
    element
        .children
        .iter()
        .filter_map(|child| match child {
            Child::Text(text) => Some(text.data.as_ref()),
            _ => None,
        })
        .collect()
}

/// Slices the original input between the start tag and the end tag of an element
fn raw_inner_content(input: &str, span: Span, tag_name: &str) -> String {
    let lo = (span.lo.0 as usize).saturating_sub(1).min(input.len());
    let hi = (span.hi.0 as usize).saturating_sub(1).min(input.len());
    let Some(outer) = input.get(lo..hi) else {
        return String::new();
    };

    let Some(start_tag_end) = outer.find('>') else {
        return String::new();
    };
    let inner = &outer[start_tag_end + 1..];

    let end_tag = format!("</{tag_name}");
    match inner.rfind(&end_tag) {
        Some(end_tag_start) => inner[..end_tag_start].to_owned(),
        None => inner.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const COMPONENT: &str = r#"<template lang="pug">
div.foo {{ msg }}
</template>

<script lang="ts">
import { Component, Vue } from "vue-property-decorator";
@Component
export default class Foo extends Vue {}
</script>

<style lang="scss" scoped>
.foo { color: red; }
</style>

<style>
body { margin: 0; }
</style>
"#;

    #[test]
    fn it_reads_blocks() {
        let container = read_sfc(COMPONENT).expect("should read");

        assert_eq!(container.script.lang, SfcScriptLang::Typescript);
        assert!(container.script.content.contains("export default class Foo"));

        let template = container.template.expect("template");
        assert_eq!(template.lang.as_deref(), Some("pug"));
        assert_eq!(template.content, "\ndiv.foo {{ msg }}\n");

        assert_eq!(container.styles.len(), 2);
        assert_eq!(container.styles[0].lang.as_deref(), Some("scss"));
        assert!(container.styles[0].is_scoped);
        assert_eq!(container.styles[1].lang, None);
        assert!(!container.styles[1].is_scoped);
    }

    #[test]
    fn it_writes_blocks_in_order() {
        let container = read_sfc(COMPONENT).expect("should read");
        let written = write_sfc(&container, "const a = 1;\n");

        assert_eq!(
            written,
            "<script setup lang=\"ts\">\nconst a = 1;\n</script>\n\n\
             <template lang=\"pug\">\ndiv.foo {{ msg }}\n</template>\n\n\
             <style lang=\"scss\" scoped>\n.foo { color: red; }\n</style>\n\n\
             <style>\nbody { margin: 0; }\n</style>\n"
        );
    }

    #[test]
    fn it_requires_a_script() {
        let result = read_sfc("<template><div></div></template>");
        assert!(matches!(result, Err(SfcError::NoScript)));
        assert!(result.unwrap_err().to_string().contains("no script"));
    }

    #[test]
    fn it_rejects_script_setup() {
        let result = read_sfc("<script setup lang=\"ts\">const a = 1</script>");
        assert!(matches!(result, Err(SfcError::AlreadyScriptSetup)));
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("already has script setup"));
    }

    #[test]
    fn it_rejects_duplicate_templates() {
        let result = read_sfc("<template></template><template></template><script></script>");
        assert!(matches!(result, Err(SfcError::Structural(_))));
    }
}
