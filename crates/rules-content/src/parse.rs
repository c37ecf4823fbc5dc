//! Marked-document parsing.
//!
//! The inverse of generation: recover the per-source regions and the
//! trailing user-content region from an existing document. Regions are
//! captured as raw substrings, never re-rendered, so the partial-update
//! engine can replay them byte-for-byte.

use crate::marker::{GLOBAL_BEGIN, GLOBAL_END, SOURCE_BEGIN_PATTERN, source_end};

/// One source block, marker to marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceBlock {
    pub source_id: String,
    /// The `count` attribute declared on the begin marker.
    pub declared_count: usize,
    /// Raw substring including both markers. Opaque: replayed, never
    /// interpreted.
    pub raw: String,
}

/// A parsed marked document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedDocument {
    pub source_blocks: Vec<SourceBlock>,
    /// Everything after the global end marker, raw. `None` when nothing
    /// follows it.
    pub user_content: Option<String>,
}

/// True iff the document carries a well-ordered global marker pair and can
/// therefore be partially updated.
pub fn supports_partial_update(content: &str) -> bool {
    match (content.find(GLOBAL_BEGIN), content.find(GLOBAL_END)) {
        (Some(begin), Some(end)) => begin < end,
        _ => false,
    }
}

/// Parse a marked document. Returns `None` for unstructured content
/// (no valid global marker pair), signalling full regeneration.
pub fn parse_marked_file(content: &str) -> Option<ParsedDocument> {
    let begin = content.find(GLOBAL_BEGIN)?;
    let inner_start = begin + GLOBAL_BEGIN.len();
    let end = inner_start + content[inner_start..].find(GLOBAL_END)?;

    let inner = &content[inner_start..end];
    let mut source_blocks = Vec::new();
    let mut cursor = 0;

    for caps in SOURCE_BEGIN_PATTERN.captures_iter(inner) {
        let open = caps.get(0).expect("capture 0 always present");
        // A begin marker inside an already-captured block would be a
        // nesting violation; skip it.
        if open.start() < cursor {
            continue;
        }

        let source_id = caps[1].to_string();
        let declared_count = caps[2].parse().unwrap_or(0);

        let close = source_end(&source_id);
        let Some(close_rel) = inner[open.end()..].find(&close) else {
            tracing::warn!(%source_id, "source block has no end marker, skipping");
            continue;
        };
        let close_end = open.end() + close_rel + close.len();
        cursor = close_end;

        source_blocks.push(SourceBlock {
            source_id,
            declared_count,
            raw: inner[open.start()..close_end].to_string(),
        });
    }

    let after = &content[end + GLOBAL_END.len()..];
    let user_content = (!after.is_empty()).then(|| after.to_string());

    Some(ParsedDocument {
        source_blocks,
        user_content,
    })
}
