//! # Resolved View
//!
//! What a display surface needs to draw the document: the block tree with
//! list ordinals worked out and media blocks paired with their asset status.
//! Produced in read-only mode as well.

use crate::engine::AssetStatus;
use folio_blocks::{Block, BlockId, BlockKind, MediaKind};
use folio_intake::Rejection;
use std::collections::HashMap;
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq)]
pub enum MediaView {
    /// No asset yet
    Empty,
    Remote(String),
    /// Upload in flight
    Pending,
    Failed(Rejection),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBlock {
    pub id: BlockId,
    pub kind: &'static str,
    pub text: String,
    pub heading_level: Option<u8>,
    pub checked: Option<bool>,
    /// 1-based position within a run of consecutive numbered siblings
    pub ordinal: Option<usize>,
    pub media: Option<(MediaKind, MediaView)>,
    pub children: Vec<RenderedBlock>,
}

pub(crate) fn render_blocks(
    blocks: &[Block],
    assets: &HashMap<BlockId, AssetStatus>,
) -> Vec<RenderedBlock> {
    let mut ordinal = 0;

    blocks
        .iter()
        .map(|block| {
            ordinal = match block.kind {
                BlockKind::NumberedListItem { .. } => ordinal + 1,
                _ => 0,
            };
            render_block(block, (ordinal > 0).then_some(ordinal), assets)
        })
        .collect()
}

fn render_block(
    block: &Block,
    ordinal: Option<usize>,
    assets: &HashMap<BlockId, AssetStatus>,
) -> RenderedBlock {
    let (heading_level, checked) = match &block.kind {
        BlockKind::Heading { props, .. } => (Some(props.level.get()), None),
        BlockKind::CheckListItem { props, .. } => (None, Some(props.checked)),
        _ => (None, None),
    };

    let media = block.kind.media_kind().map(|kind| {
        let view = match assets.get(&block.id) {
            Some(AssetStatus::Pending) => MediaView::Pending,
            Some(AssetStatus::Failed(rejection)) => MediaView::Failed(rejection.clone()),
            None => match block.kind.media_props() {
                Some(props) if props.has_url() => MediaView::Remote(props.url.clone()),
                _ => MediaView::Empty,
            },
        };
        (kind, view)
    });

    RenderedBlock {
        id: block.id.clone(),
        kind: block.kind.type_name(),
        text: block.plain_text(),
        heading_level,
        checked,
        ordinal,
        media,
        children: render_blocks(&block.children, assets),
    }
}

/// Plain-text outline, two spaces of indent per nesting level
pub fn outline(blocks: &[RenderedBlock]) -> String {
    let mut out = String::new();
    write_outline(&mut out, blocks, 0);
    out
}

fn write_outline(out: &mut String, blocks: &[RenderedBlock], depth: usize) {
    for block in blocks {
        let indent = "  ".repeat(depth);
        let line = match (&block.media, block.heading_level, block.checked, block.ordinal) {
            (Some((kind, view)), _, _, _) => media_line(*kind, view),
            (None, Some(level), _, _) => format!("{} {}", "#".repeat(level as usize), block.text),
            (None, None, Some(checked), _) => {
                format!("[{}] {}", if checked { "x" } else { " " }, block.text)
            }
            (None, None, None, Some(n)) => format!("{}. {}", n, block.text),
            (None, None, None, None) if block.kind == "bulletListItem" => {
                format!("- {}", block.text)
            }
            _ => block.text.clone(),
        };
        let _ = writeln!(out, "{}{}", indent, line);
        write_outline(out, &block.children, depth + 1);
    }
}

fn media_line(kind: MediaKind, view: &MediaView) -> String {
    let label = match kind {
        MediaKind::Image => "image",
        MediaKind::Video => "video",
        MediaKind::Audio => "audio",
        MediaKind::File => "file",
    };
    match view {
        MediaView::Empty => format!("[{}: empty]", label),
        MediaView::Remote(url) => format!("[{}: {}]", label, url),
        MediaView::Pending => format!("[{}: uploading]", label),
        MediaView::Failed(rejection) => format!("[{}: failed, {}]", label, rejection),
    }
}
