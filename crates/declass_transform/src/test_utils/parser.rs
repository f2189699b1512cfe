use swc_core::{
    common::BytePos,
    ecma::ast::{EsVersion, Expr},
};
use swc_ecma_parser::{lexer::Lexer, Parser, StringInput, Syntax, TsSyntax};

pub fn parse_typescript_expr(
    input: &str,
    span_start: u32,
) -> Result<Box<Expr>, swc_ecma_parser::error::Error> {
    let lo = BytePos(span_start);
    let hi = BytePos(span_start + input.len() as u32);

    let lexer = Lexer::new(
        Syntax::Typescript(TsSyntax {
            decorators: true,
            ..Default::default()
        }),
        EsVersion::EsNext,
        StringInput::new(input, lo, hi),
        None,
    );

    let mut parser = Parser::new_from(lexer);

    parser.parse_expr()
}
