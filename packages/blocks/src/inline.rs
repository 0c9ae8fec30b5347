//! Inline content carried by text-like blocks.

use serde::{Deserialize, Serialize};

/// A run of inline content inside a paragraph, heading or list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InlineContent {
    Text(StyledText),

    Link {
        href: String,
        #[serde(default)]
        content: Vec<StyledText>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyledText {
    pub text: String,
    #[serde(default)]
    pub styles: Styles,
}

/// Inline formatting. Unset flags are left out of the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Styles {
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub strike: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub code: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Styles {
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Self::default()
        }
    }

    pub fn italic() -> Self {
        Self {
            italic: true,
            ..Self::default()
        }
    }
}

impl StyledText {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            styles: Styles::default(),
        }
    }
}

impl InlineContent {
    /// Unformatted text run
    pub fn plain(text: impl Into<String>) -> Self {
        InlineContent::Text(StyledText::plain(text))
    }

    pub fn styled(text: impl Into<String>, styles: Styles) -> Self {
        InlineContent::Text(StyledText {
            text: text.into(),
            styles,
        })
    }

    pub fn link(href: impl Into<String>, text: impl Into<String>) -> Self {
        InlineContent::Link {
            href: href.into(),
            content: vec![StyledText::plain(text)],
        }
    }

    /// Text with all formatting dropped
    pub fn plain_text(&self) -> String {
        match self {
            InlineContent::Text(run) => run.text.clone(),
            InlineContent::Link { content, .. } => {
                content.iter().map(|run| run.text.as_str()).collect()
            }
        }
    }
}
