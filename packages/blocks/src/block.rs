use crate::error::InvalidHeadingLevel;
use crate::inline::InlineContent;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Stable block identifier, unique within a document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random id (UUID v4)
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for BlockId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BlockId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for BlockId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A single block. Container semantics come from `children`; every kind may nest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,

    #[serde(flatten)]
    pub kind: BlockKind,

    #[serde(default)]
    pub children: Vec<Block>,
}

/// Closed set of block kinds. Anything else in a snapshot is malformed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BlockKind {
    Paragraph {
        #[serde(default)]
        props: TextProps,
        #[serde(default)]
        content: Vec<InlineContent>,
    },

    Heading {
        #[serde(default)]
        props: HeadingProps,
        #[serde(default)]
        content: Vec<InlineContent>,
    },

    BulletListItem {
        #[serde(default)]
        props: TextProps,
        #[serde(default)]
        content: Vec<InlineContent>,
    },

    NumberedListItem {
        #[serde(default)]
        props: TextProps,
        #[serde(default)]
        content: Vec<InlineContent>,
    },

    CheckListItem {
        #[serde(default)]
        props: CheckProps,
        #[serde(default)]
        content: Vec<InlineContent>,
    },

    Image {
        #[serde(default)]
        props: MediaProps,
    },

    Video {
        #[serde(default)]
        props: MediaProps,
    },

    Audio {
        #[serde(default)]
        props: MediaProps,
    },

    File {
        #[serde(default)]
        props: MediaProps,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlignment {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

fn default_color() -> String {
    "default".to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
    #[serde(default = "default_color")]
    pub text_color: String,
    #[serde(default = "default_color")]
    pub background_color: String,
    #[serde(default)]
    pub text_alignment: TextAlignment,
}

impl Default for TextProps {
    fn default() -> Self {
        Self {
            text_color: default_color(),
            background_color: default_color(),
            text_alignment: TextAlignment::Left,
        }
    }
}

/// Heading depth, 1 through 3
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    pub const MAX: u8 = 3;

    pub fn get(self) -> u8 {
        self.0
    }
}

impl Default for HeadingLevel {
    fn default() -> Self {
        Self(1)
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = InvalidHeadingLevel;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        if (1..=Self::MAX).contains(&level) {
            Ok(Self(level))
        } else {
            Err(InvalidHeadingLevel(level))
        }
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        level.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingProps {
    #[serde(default)]
    pub level: HeadingLevel,
    #[serde(default = "default_color")]
    pub text_color: String,
    #[serde(default = "default_color")]
    pub background_color: String,
    #[serde(default)]
    pub text_alignment: TextAlignment,
}

impl HeadingProps {
    pub fn with_level(level: HeadingLevel) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }
}

impl Default for HeadingProps {
    fn default() -> Self {
        Self {
            level: HeadingLevel::default(),
            text_color: default_color(),
            background_color: default_color(),
            text_alignment: TextAlignment::Left,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckProps {
    #[serde(default)]
    pub checked: bool,
    #[serde(default = "default_color")]
    pub text_color: String,
    #[serde(default = "default_color")]
    pub background_color: String,
    #[serde(default)]
    pub text_alignment: TextAlignment,
}

impl Default for CheckProps {
    fn default() -> Self {
        Self {
            checked: false,
            text_color: default_color(),
            background_color: default_color(),
            text_alignment: TextAlignment::Left,
        }
    }
}

/// Props shared by embedded media blocks. An empty `url` means no asset yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaProps {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default = "default_true")]
    pub show_preview: bool,
    /// Pixel width set by the resize handle; may be fractional
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_width: Option<f64>,
    #[serde(default)]
    pub text_alignment: TextAlignment,
    #[serde(default = "default_color")]
    pub background_color: String,
}

impl Default for MediaProps {
    fn default() -> Self {
        Self {
            url: String::new(),
            name: String::new(),
            caption: String::new(),
            show_preview: true,
            preview_width: None,
            text_alignment: TextAlignment::Left,
            background_color: default_color(),
        }
    }
}

impl MediaProps {
    pub fn has_url(&self) -> bool {
        !self.url.is_empty()
    }
}

/// The media-bearing subset of block kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Video,
    Audio,
    File,
}

impl MediaKind {
    /// Media type pattern an asset must match for this kind, `None` for any
    pub fn type_pattern(self) -> Option<&'static str> {
        match self {
            MediaKind::Image => Some("image/*"),
            MediaKind::Video => Some("video/*"),
            MediaKind::Audio => Some("audio/*"),
            MediaKind::File => None,
        }
    }
}

impl BlockKind {
    /// Snapshot `type` tag
    pub fn type_name(&self) -> &'static str {
        match self {
            BlockKind::Paragraph { .. } => "paragraph",
            BlockKind::Heading { .. } => "heading",
            BlockKind::BulletListItem { .. } => "bulletListItem",
            BlockKind::NumberedListItem { .. } => "numberedListItem",
            BlockKind::CheckListItem { .. } => "checkListItem",
            BlockKind::Image { .. } => "image",
            BlockKind::Video { .. } => "video",
            BlockKind::Audio { .. } => "audio",
            BlockKind::File { .. } => "file",
        }
    }

    pub fn media(kind: MediaKind, props: MediaProps) -> Self {
        match kind {
            MediaKind::Image => BlockKind::Image { props },
            MediaKind::Video => BlockKind::Video { props },
            MediaKind::Audio => BlockKind::Audio { props },
            MediaKind::File => BlockKind::File { props },
        }
    }

    pub fn media_kind(&self) -> Option<MediaKind> {
        match self {
            BlockKind::Image { .. } => Some(MediaKind::Image),
            BlockKind::Video { .. } => Some(MediaKind::Video),
            BlockKind::Audio { .. } => Some(MediaKind::Audio),
            BlockKind::File { .. } => Some(MediaKind::File),
            _ => None,
        }
    }

    pub fn media_props(&self) -> Option<&MediaProps> {
        match self {
            BlockKind::Image { props }
            | BlockKind::Video { props }
            | BlockKind::Audio { props }
            | BlockKind::File { props } => Some(props),
            _ => None,
        }
    }

    pub fn media_props_mut(&mut self) -> Option<&mut MediaProps> {
        match self {
            BlockKind::Image { props }
            | BlockKind::Video { props }
            | BlockKind::Audio { props }
            | BlockKind::File { props } => Some(props),
            _ => None,
        }
    }

    /// Inline content, `None` for media kinds
    pub fn content(&self) -> Option<&[InlineContent]> {
        match self {
            BlockKind::Paragraph { content, .. }
            | BlockKind::Heading { content, .. }
            | BlockKind::BulletListItem { content, .. }
            | BlockKind::NumberedListItem { content, .. }
            | BlockKind::CheckListItem { content, .. } => Some(content),
            BlockKind::Image { .. }
            | BlockKind::Video { .. }
            | BlockKind::Audio { .. }
            | BlockKind::File { .. } => None,
        }
    }

    pub fn content_mut(&mut self) -> Option<&mut Vec<InlineContent>> {
        match self {
            BlockKind::Paragraph { content, .. }
            | BlockKind::Heading { content, .. }
            | BlockKind::BulletListItem { content, .. }
            | BlockKind::NumberedListItem { content, .. }
            | BlockKind::CheckListItem { content, .. } => Some(content),
            BlockKind::Image { .. }
            | BlockKind::Video { .. }
            | BlockKind::Audio { .. }
            | BlockKind::File { .. } => None,
        }
    }
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            id: BlockId::generate(),
            kind,
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<BlockId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_children(mut self, children: Vec<Block>) -> Self {
        self.children = children;
        self
    }

    pub fn paragraph(text: impl Into<String>) -> Self {
        Self::new(BlockKind::Paragraph {
            props: TextProps::default(),
            content: text_content(text),
        })
    }

    pub fn heading(level: HeadingLevel, text: impl Into<String>) -> Self {
        Self::new(BlockKind::Heading {
            props: HeadingProps::with_level(level),
            content: text_content(text),
        })
    }

    pub fn bullet(text: impl Into<String>) -> Self {
        Self::new(BlockKind::BulletListItem {
            props: TextProps::default(),
            content: text_content(text),
        })
    }

    pub fn numbered(text: impl Into<String>) -> Self {
        Self::new(BlockKind::NumberedListItem {
            props: TextProps::default(),
            content: text_content(text),
        })
    }

    pub fn check(text: impl Into<String>, checked: bool) -> Self {
        Self::new(BlockKind::CheckListItem {
            props: CheckProps {
                checked,
                ..CheckProps::default()
            },
            content: text_content(text),
        })
    }

    /// Media block; pass an empty `url` for a placeholder awaiting upload
    pub fn media(kind: MediaKind, url: impl Into<String>) -> Self {
        Self::new(BlockKind::media(
            kind,
            MediaProps {
                url: url.into(),
                ..MediaProps::default()
            },
        ))
    }

    pub fn image(url: impl Into<String>) -> Self {
        Self::media(MediaKind::Image, url)
    }

    /// Concatenated text of the block's own inline content
    pub fn plain_text(&self) -> String {
        self.kind
            .content()
            .map(|runs| runs.iter().map(InlineContent::plain_text).collect())
            .unwrap_or_default()
    }
}

// Editors emit no runs for an empty line.
fn text_content(text: impl Into<String>) -> Vec<InlineContent> {
    let text = text.into();
    if text.is_empty() {
        Vec::new()
    } else {
        vec![InlineContent::plain(text)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_field_layout() {
        let block = Block::paragraph("Hello").with_id("b1");
        let json = serde_json::to_value(&block).unwrap();

        assert_eq!(json["id"], "b1");
        assert_eq!(json["type"], "paragraph");
        assert_eq!(json["props"]["textAlignment"], "left");
        assert_eq!(json["content"][0]["text"], "Hello");
        assert_eq!(json["children"], serde_json::json!([]));
    }

    #[test]
    fn test_minimal_block_takes_defaults() {
        let block: Block = serde_json::from_str(r#"{ "id": "x", "type": "image" }"#).unwrap();

        let props = block.kind.media_props().unwrap();
        assert!(!props.has_url());
        assert!(props.show_preview);
        assert!(block.children.is_empty());
    }

    #[test]
    fn test_heading_level_bounds() {
        assert!(HeadingLevel::try_from(0).is_err());
        assert!(HeadingLevel::try_from(4).is_err());
        assert_eq!(HeadingLevel::try_from(2).unwrap().get(), 2);

        let bad = r#"{ "id": "h", "type": "heading", "props": { "level": 7 } }"#;
        assert!(serde_json::from_str::<Block>(bad).is_err());
    }

    #[test]
    fn test_media_kind_accessors() {
        let block = Block::media(MediaKind::Audio, "https://store/a.mp3");
        assert_eq!(block.kind.media_kind(), Some(MediaKind::Audio));
        assert_eq!(block.kind.type_name(), "audio");
        assert!(block.kind.content().is_none());
        assert_eq!(MediaKind::Audio.type_pattern(), Some("audio/*"));
        assert_eq!(MediaKind::File.type_pattern(), None);
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        assert_ne!(Block::paragraph("a").id, Block::paragraph("a").id);
    }

    #[test]
    fn test_empty_text_has_no_runs() {
        let block = Block::paragraph("");
        assert_eq!(block.kind.content().unwrap().len(), 0);
        assert_eq!(block.plain_text(), "");
    }
}
