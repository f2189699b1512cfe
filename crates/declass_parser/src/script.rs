use declass_core::{CommentSink, SfcScriptLang};
use swc_core::{
    common::{
        comments::SingleThreadedComments, sync::Lrc, FileName, SourceFile, SourceMap, DUMMY_SP,
    },
    ecma::ast::{EsVersion, Module},
};
use swc_ecma_codegen::{text_writer::JsWriter, Emitter, Node};
use swc_ecma_parser::{lexer::Lexer, Parser, StringInput, Syntax, TsSyntax};

use crate::error::{ParseError, PrintError};

/// A parsed script together with everything needed to print it back
pub struct ParsedScript {
    pub module: Module,
    pub comments: SingleThreadedComments,
    pub lang: SfcScriptLang,
    cm: Lrc<SourceMap>,
    synthetic: Lrc<SourceFile>,
}

impl ParsedScript {
    /// Takes the module out, leaving an empty one.
    /// The script can still print the transformed module afterwards.
    pub fn take_module(&mut self) -> Module {
        std::mem::replace(
            &mut self.module,
            Module {
                span: DUMMY_SP,
                body: vec![],
                shebang: None,
            },
        )
    }

    /// Creates a sink for comments on generated nodes, which can also read the source text.
    /// The sink shares the comments with this script, so they are printed by [`print_module`].
    pub fn comment_sink(&self) -> CommentSink {
        CommentSink::new(
            self.comments.clone(),
            self.synthetic.start_pos,
            self.synthetic.end_pos,
        )
        .with_source_map(self.cm.clone())
    }
}

/// Parses the script as a module.
///
/// The TypeScript grammar with decorators is used for both languages,
/// because legacy decorators are not valid EcmaScript.
pub fn parse_script(source: &str, lang: SfcScriptLang) -> Result<ParsedScript, ParseError> {
    let cm: Lrc<SourceMap> = Default::default();
    let fm = cm.new_source_file(
        Lrc::new(FileName::Custom("component.ts".to_owned())),
        source.to_owned(),
    );

    let comments = SingleThreadedComments::default();
    let lexer = Lexer::new(
        Syntax::Typescript(TsSyntax {
            decorators: true,
            ..Default::default()
        }),
        EsVersion::EsNext,
        StringInput::from(&*fm),
        Some(&comments),
    );

    let mut parser = Parser::new_from(lexer);
    let module = parser.parse_module()?;

    // Recoverable errors still leave the tree in a questionable state
    if let Some(error) = parser.take_errors().into_iter().next() {
        return Err(error.into());
    }

    // Positions for comments on generated nodes.
    // Every generated comment needs two positions, a few per source byte is plenty.
    let padding_len = (source.len() * 2).max(4096);
    let synthetic = cm.new_source_file(
        Lrc::new(FileName::Custom("declass-generated".to_owned())),
        " ".repeat(padding_len),
    );

    tracing::trace!(len = source.len(), items = module.body.len(), "parsed script");

    Ok(ParsedScript {
        module,
        comments,
        lang,
        cm,
        synthetic,
    })
}

/// Prints `module` using the source map and comments of `script`
pub fn print_module(script: &ParsedScript, module: &Module) -> Result<String, PrintError> {
    let mut buff: Vec<u8> = Vec::with_capacity(4096);
    let writer = JsWriter::new(script.cm.clone(), "\n", &mut buff, None);

    let mut emitter_cfg = swc_ecma_codegen::Config::default();
    emitter_cfg.minify = false;
    emitter_cfg.target = EsVersion::EsNext;

    let mut emitter = Emitter {
        cfg: emitter_cfg,
        comments: Some(&script.comments),
        wr: writer,
        cm: script.cm.clone(),
    };

    module.emit_with(&mut emitter)?;

    Ok(String::from_utf8(buff)?)
}
