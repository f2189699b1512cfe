use crate::DeclassAtom;

/// The parts of a Vue Single File Component which survive the conversion.
///
/// Only the script is rewritten, everything else is carried over as-is.
#[derive(Clone, Debug)]
pub struct SfcContainer {
    pub script: SfcScript,
    pub template: Option<SfcTemplate>,
    pub styles: Vec<SfcStyle>,
}

#[derive(Clone, Debug)]
pub struct SfcScript {
    pub content: String,
    pub lang: SfcScriptLang,
}

#[derive(Clone, Debug)]
pub struct SfcTemplate {
    /// Raw content between `<template>` and `</template>`
    pub content: String,
    pub lang: Option<DeclassAtom>,
}

#[derive(Clone, Debug)]
pub struct SfcStyle {
    pub content: String,
    pub lang: Option<DeclassAtom>,
    pub is_scoped: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SfcScriptLang {
    Es,
    #[default]
    Typescript,
}

impl SfcScriptLang {
    pub fn from_lang_attr(value: Option<&str>) -> SfcScriptLang {
        match value {
            Some("ts" | "tsx") => SfcScriptLang::Typescript,
            _ => SfcScriptLang::Es,
        }
    }
}
