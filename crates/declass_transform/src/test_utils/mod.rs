pub mod parser;

use declass_core::SfcScriptLang;
use declass_parser::{parse_script, print_module};
use swc_core::common::{sync::Lrc, SourceMap};
use swc_core::ecma::ast::{Expr, TsType};
use swc_ecma_codegen::{text_writer::JsWriter, Emitter, Node};

use self::parser::parse_typescript_expr;
use crate::{error::TransformError, transform_script, TransformOptions};

pub fn ts(raw: &str) -> Box<Expr> {
    parse_typescript_expr(raw, 1).unwrap()
}

/// Parses a type through `null as <type>`
pub fn ts_type(raw: &str) -> Box<TsType> {
    match *ts(&format!("null as {raw}")) {
        Expr::TsAs(ts_as) => ts_as.type_ann,
        other => panic!("expected a type assertion, got {other:?}"),
    }
}

pub fn to_str(swc_node: &impl Node) -> String {
    // Emitting the result requires some setup with SWC
    let cm: Lrc<SourceMap> = Default::default();
    let mut buff: Vec<u8> = Vec::with_capacity(128);
    let writer: JsWriter<&mut Vec<u8>> = JsWriter::new(cm.clone(), "\n", &mut buff, None);

    let mut emitter_cfg = swc_ecma_codegen::Config::default();
    emitter_cfg.minify = true;

    let mut emitter = Emitter {
        cfg: emitter_cfg,
        comments: None,
        wr: writer,
        cm,
    };

    let _ = swc_node.emit_with(&mut emitter);

    String::from_utf8(buff).unwrap()
}

/// Runs the whole conversion, the collision report is prepended like the facade does
pub fn convert(
    source: &str,
    options: &TransformOptions,
) -> Result<(String, Vec<String>), TransformError> {
    let mut parsed = parse_script(source, SfcScriptLang::Typescript).unwrap();
    let comments = parsed.comment_sink();
    let output = transform_script(parsed.take_module(), &comments, options)?;

    let code = print_module(&parsed, &output.module).unwrap();
    let code = match output.collision_report {
        Some(report) => format!("/*\n{report}*/\n{code}"),
        None => code,
    };

    Ok((code, output.warnings))
}

pub fn convert_ok(source: &str) -> String {
    convert_with_warnings(source).0
}

pub fn convert_with_warnings(source: &str) -> (String, Vec<String>) {
    match convert(source, &TransformOptions::default()) {
        Ok(converted) => converted,
        Err(e) => panic!("conversion failed: {e}"),
    }
}

pub fn convert_err(source: &str) -> TransformError {
    match convert(source, &TransformOptions::default()) {
        Ok((code, _)) => panic!("conversion should fail, got:\n{code}"),
        Err(e) => e,
    }
}

pub fn convert_strict_err(source: &str) -> TransformError {
    let options = TransformOptions {
        stop_on_collisions: true,
        ..Default::default()
    };
    match convert(source, &options) {
        Ok((code, _)) => panic!("conversion should fail, got:\n{code}"),
        Err(e) => e,
    }
}

/// A default exported component with every `vue-property-decorator` helper imported
pub fn component(body: &str) -> String {
    format!(
        "import {{ Component, Prop, PropSync, Model, Ref, Inject, InjectReactive, Provide, ProvideReactive, Watch, Emit, Vue }} from \"vue-property-decorator\";\n\n@Component\nexport default class Foo extends Vue {{\n{body}\n}}\n"
    )
}

pub fn component_with_options(options: &str, body: &str) -> String {
    format!(
        "import {{ Component, Prop, Watch, Emit, Vue }} from \"vue-property-decorator\";\n\n@Component({options})\nexport default class Foo extends Vue {{\n{body}\n}}\n"
    )
}

/// A component with the store helpers of `vuex-class`, the body replaces `/*body*/`
pub const VUEX_COMPONENT: &str = r#"import { Component, Vue } from "vue-property-decorator";
import { namespace, State, Getter, Action, Mutation } from "vuex-class";

const user = namespace("user");

@Component
export default class Foo extends Vue {
/*body*/
}
"#;
