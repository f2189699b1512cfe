use std::cell::Cell;

use swc_core::common::{
    comments::{Comment, CommentKind, Comments, SingleThreadedComments},
    sync::Lrc,
    BytePos, SourceMap, SourceMapper, Span, DUMMY_SP,
};

/// Attaches advisory comments to generated nodes.
///
/// Generated nodes have no position in the source, so comments for them are stored
/// at positions allocated from a reserved range. The printer must know this range
/// (e.g. as a padding source file) for the comments to be emitted.
///
/// With a source map, the sink also gives out the source text of parsed nodes,
/// so that code which cannot be converted is kept next to its comment.
pub struct CommentSink {
    comments: SingleThreadedComments,
    next: Cell<BytePos>,
    end: BytePos,
    source_map: Option<Lrc<SourceMap>>,
}

impl CommentSink {
    pub fn new(
        comments: SingleThreadedComments,
        reserved_lo: BytePos,
        reserved_hi: BytePos,
    ) -> Self {
        CommentSink {
            comments,
            next: Cell::new(reserved_lo),
            end: reserved_hi,
            source_map: None,
        }
    }

    pub fn with_source_map(mut self, source_map: Lrc<SourceMap>) -> Self {
        self.source_map = Some(source_map);
        self
    }

    /// A sink without a reserved range, comments can only be attached to existing spans
    pub fn detached(comments: SingleThreadedComments) -> Self {
        CommentSink::new(comments, BytePos(0), BytePos(0))
    }

    pub fn comments(&self) -> &SingleThreadedComments {
        &self.comments
    }

    /// Source text of a parsed node, `None` for generated nodes
    pub fn source_text(&self, span: Span) -> Option<String> {
        if span.is_dummy() {
            return None;
        }
        self.source_map.as_ref()?.span_to_snippet(span).ok()
    }

    /// Allocates a fresh span, `None` when the reserved range is exhausted
    pub fn fresh_span(&self) -> Option<Span> {
        let lo = self.next.get();
        if lo.0 == 0 || lo.0 + 1 >= self.end.0 {
            return None;
        }
        self.next.set(BytePos(lo.0 + 2));
        Some(Span::new(lo, BytePos(lo.0 + 1)))
    }

    /// Attaches `// text` before the node which will use the returned span.
    ///
    /// When `span` already points into the source, the comment joins the comments at that position.
    pub fn line_comment(&self, span: Span, text: &str) -> Span {
        self.add(span, CommentKind::Line, format!(" {text}"))
    }

    /// Attaches `/* text */` before the node which will use the returned span
    pub fn block_comment(&self, span: Span, text: &str) -> Span {
        self.add(span, CommentKind::Block, format!(" {text} "))
    }

    fn add(&self, span: Span, kind: CommentKind, text: String) -> Span {
        let span = if span.is_dummy() {
            match self.fresh_span() {
                Some(span) => span,
                None => return DUMMY_SP,
            }
        } else {
            span
        };

        self.comments.add_leading(
            span.lo,
            Comment {
                kind,
                span: DUMMY_SP,
                text: text.into(),
            },
        );

        span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_allocates_from_reserved_range() {
        let sink = CommentSink::new(Default::default(), BytePos(100), BytePos(104));
        let first = sink.line_comment(DUMMY_SP, "TODO: first");
        let second = sink.line_comment(DUMMY_SP, "TODO: second");
        let third = sink.line_comment(DUMMY_SP, "TODO: third");

        assert_eq!(first.lo, BytePos(100));
        assert_eq!(second.lo, BytePos(102));
        assert!(third.is_dummy());
        assert!(sink.comments().has_leading(BytePos(100)));
    }

    #[test]
    fn it_reuses_source_spans() {
        let sink = CommentSink::detached(Default::default());
        let span = Span::new(BytePos(5), BytePos(10));
        assert_eq!(sink.block_comment(span, "note"), span);
        assert!(sink.comments().has_leading(BytePos(5)));
    }

    #[test]
    fn it_reads_source_text() {
        let cm: Lrc<SourceMap> = Default::default();
        let fm = cm.new_source_file(
            Lrc::new(swc_core::common::FileName::Anon),
            "let a = 1;".to_owned(),
        );
        let sink = CommentSink::detached(Default::default()).with_source_map(cm);

        let span = Span::new(fm.start_pos, fm.start_pos + BytePos(5));
        assert_eq!(sink.source_text(span).as_deref(), Some("let a"));
        assert_eq!(sink.source_text(DUMMY_SP), None);
    }
}
