//! Document tree produced by the renderer before serialization.

use std::collections::BTreeMap;
use std::sync::Arc;

/// Placeholder printed wherever a value has not been entered yet.
pub const BLANK: &str = "________________";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSize {
    Small,
    Normal,
    Large,
    Title,
}

/// A run of text inside a line or paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Strong(String),
    /// An interpolated value; `None` prints as [`BLANK`].
    Value(Option<String>),
}

impl Inline {
    pub fn text(value: impl Into<String>) -> Self {
        Inline::Text(value.into())
    }

    pub fn strong(value: impl Into<String>) -> Self {
        Inline::Strong(value.into())
    }

    /// Interpolated value; whitespace-only input counts as unset.
    pub fn value(value: impl AsRef<str>) -> Self {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            Inline::Value(None)
        } else {
            Inline::Value(Some(trimmed.to_string()))
        }
    }

    pub fn blank() -> Self {
        Inline::Value(None)
    }

    /// Plain text as it will read on the page.
    pub fn plain(&self) -> &str {
        match self {
            Inline::Text(s) | Inline::Strong(s) => s,
            Inline::Value(Some(s)) => s,
            Inline::Value(None) => BLANK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentNode {
    Line {
        spans: Vec<Inline>,
        align: Align,
        size: TextSize,
    },
    Paragraph(Vec<Inline>),
    /// Vertical space in tenths of an em.
    Spacer(u16),
    Rule,
    /// Seal on the left, centred identity lines.
    Letterhead {
        seal: Option<String>,
        lines: Vec<DocumentNode>,
    },
    /// Label/value pairs, one per row.
    Fields(Vec<(String, Inline)>),
    Signature {
        name: Option<String>,
        title: String,
    },
    /// Pushes following nodes to the bottom of the page.
    Fill,
}

impl DocumentNode {
    pub fn centered(spans: Vec<Inline>, size: TextSize) -> Self {
        DocumentNode::Line {
            spans,
            align: Align::Center,
            size,
        }
    }

    pub fn title(text: impl Into<String>) -> Self {
        DocumentNode::centered(vec![Inline::strong(text)], TextSize::Title)
    }

    /// All text of this node in reading order, for previews and assertions.
    pub fn plain_text(&self) -> String {
        match self {
            DocumentNode::Line { spans, .. } | DocumentNode::Paragraph(spans) => {
                spans.iter().map(Inline::plain).collect()
            }
            DocumentNode::Letterhead { lines, .. } => lines
                .iter()
                .map(DocumentNode::plain_text)
                .collect::<Vec<_>>()
                .join("\n"),
            DocumentNode::Fields(rows) => rows
                .iter()
                .map(|(label, value)| format!("{}: {}", label, value.plain()))
                .collect::<Vec<_>>()
                .join("\n"),
            DocumentNode::Signature { name, title } => {
                format!("{}\n{}", name.as_deref().unwrap_or(BLANK), title)
            }
            DocumentNode::Spacer(_) | DocumentNode::Rule | DocumentNode::Fill => String::new(),
        }
    }
}

/// Low-opacity seal composited behind the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Watermark {
    pub asset: String,
    pub opacity_pct: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    pub watermark: Option<Watermark>,
    pub header: Vec<DocumentNode>,
    pub body: Vec<DocumentNode>,
    pub footer: Vec<DocumentNode>,
}

impl Page {
    pub fn header_text(&self) -> String {
        join_text(&self.header)
    }

    pub fn body_text(&self) -> String {
        join_text(&self.body)
    }

    pub fn footer_text(&self) -> String {
        join_text(&self.footer)
    }
}

fn join_text(nodes: &[DocumentNode]) -> String {
    nodes
        .iter()
        .map(DocumentNode::plain_text)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// A paginated certificate plus the binary assets it references.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocumentTree {
    pub title: String,
    pub pages: Vec<Page>,
    pub assets: BTreeMap<String, Arc<[u8]>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_blank_when_unset() {
        assert_eq!(Inline::value("  "), Inline::Value(None));
        assert_eq!(Inline::value("").plain(), BLANK);
        assert_eq!(Inline::value(" 10.00 ").plain(), "10.00");
    }

    #[test]
    fn test_plain_text_of_fields_and_signature() {
        let fields = DocumentNode::Fields(vec![
            ("O.R. No.".to_string(), Inline::blank()),
            ("Amount Paid".to_string(), Inline::text("PHP 10.00")),
        ]);
        assert_eq!(
            fields.plain_text(),
            format!("O.R. No.: {}\nAmount Paid: PHP 10.00", BLANK)
        );

        let signature = DocumentNode::Signature {
            name: None,
            title: "Punong Barangay".to_string(),
        };
        assert!(signature.plain_text().starts_with(BLANK));
    }
}
