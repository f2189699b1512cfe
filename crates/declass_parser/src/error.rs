use swc_core::common::{Span, Spanned};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{kind} at {}..{}", span.lo.0, span.hi.0)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

#[derive(Debug, Error)]
pub enum ParseErrorKind {
    /// Error while parsing EcmaScript/TypeScript
    #[error("{}", .0.msg())]
    BadScript(swc_ecma_parser::error::SyntaxError),
}

impl From<swc_ecma_parser::error::Error> for ParseError {
    fn from(value: swc_ecma_parser::error::Error) -> ParseError {
        let span = value.span();

        ParseError {
            kind: ParseErrorKind::BadScript(value.into_kind()),
            span,
        }
    }
}

/// Errors of the Single File Component container
#[derive(Debug, Error)]
pub enum SfcError {
    /// There is no `<script>` to convert
    #[error("no script block found")]
    NoScript,
    /// `<script setup>` is already present, the component was converted before
    #[error("component already has script setup")]
    AlreadyScriptSetup,
    /// The container could not be read reliably, e.g. duplicate `<template>` blocks
    #[error("component has structural errors: {}", .0.join("; "))]
    Structural(Vec<String>),
}

#[derive(Debug, Error)]
pub enum PrintError {
    #[error("failed to print the script: {0}")]
    Io(#[from] std::io::Error),
    #[error("printed script is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),
}
