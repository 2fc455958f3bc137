//! Serialization of a document tree into Typst markup.
//!
//! Output depends only on the tree and the render options: assets are kept
//! in name order and the document date is pinned to `none`.

use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::Arc;

use super::document::{Align, DocumentNode, DocumentTree, Inline, Page, TextSize, BLANK};
use super::RenderOptions;
use crate::common::{escape_typst_markup, escape_typst_string};

/// Entry file name inside the compilation directory.
pub const MAIN_FILE: &str = "certificate.typ";

/// Typst source plus the files it references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub source: String,
    pub assets: BTreeMap<String, Arc<[u8]>>,
}

impl Artifact {
    /// Single byte stream covering the source and every asset.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.source.len());
        out.extend_from_slice(self.source.as_bytes());
        for (name, bytes) in &self.assets {
            out.extend_from_slice(format!("\n--asset {} {}\n", name, bytes.len()).as_bytes());
            out.extend_from_slice(bytes);
        }
        out
    }
}

pub fn to_artifact(tree: &DocumentTree, options: &RenderOptions) -> Artifact {
    let mut source = String::new();
    let _ = writeln!(
        source,
        "#set document(title: \"{}\", date: none)",
        escape_typst_string(&tree.title)
    );
    let _ = writeln!(
        source,
        "#set page(paper: \"{}\", margin: (x: {}mm, y: {}mm))",
        escape_typst_string(&options.paper),
        options.margin_mm,
        options.margin_mm
    );
    let _ = writeln!(
        source,
        "#set text(font: \"{}\", size: {}pt)",
        escape_typst_string(&options.font_family),
        options.font_size_pt
    );
    source.push_str("#set par(justify: true, leading: 0.8em)\n\n");

    for (i, page) in tree.pages.iter().enumerate() {
        if i > 0 {
            source.push_str("#pagebreak()\n\n");
        }
        write_page(&mut source, page, options);
    }

    Artifact {
        source,
        assets: tree.assets.clone(),
    }
}

fn write_page(out: &mut String, page: &Page, options: &RenderOptions) {
    if let Some(watermark) = &page.watermark {
        let _ = writeln!(
            out,
            "#place(center + horizon, block(width: {w}mm, height: {w}mm)[#image(\"{asset}\", width: 100%, height: 100%, fit: \"contain\") #place(top + left, rect(width: 100%, height: 100%, stroke: none, fill: white.transparentize({opacity}%)))])\n",
            w = options.watermark_width_mm,
            asset = escape_typst_string(&watermark.asset),
            opacity = watermark.opacity_pct.min(100),
        );
    }

    for node in page.header.iter().chain(&page.body).chain(&page.footer) {
        write_node(out, node, options);
    }
}

fn write_node(out: &mut String, node: &DocumentNode, options: &RenderOptions) {
    match node {
        DocumentNode::Line { spans, align, size } => {
            let _ = writeln!(
                out,
                "#align({})[#text(size: {}pt)[{}]]\n",
                align_name(*align),
                size_pt(*size, options),
                spans_markup(spans)
            );
        }
        DocumentNode::Paragraph(spans) => {
            let _ = writeln!(out, "#h(2em){}\n", spans_markup(spans));
        }
        DocumentNode::Spacer(tenths) => {
            let _ = writeln!(out, "#v({}.{}em)\n", tenths / 10, tenths % 10);
        }
        DocumentNode::Rule => out.push_str("#line(length: 100%, stroke: 1.5pt)\n\n"),
        DocumentNode::Fill => out.push_str("#v(1fr)\n\n"),
        DocumentNode::Letterhead { seal, lines } => {
            let seal_cell = match seal {
                Some(asset) => format!(
                    "image(\"{}\", width: {}mm)",
                    escape_typst_string(asset),
                    options.seal_width_mm
                ),
                None => "[]".to_string(),
            };
            let mut center = String::new();
            for line in lines {
                write_node(&mut center, line, options);
            }
            let _ = writeln!(
                out,
                "#grid(columns: ({w}mm, 1fr, {w}mm), align: center + horizon, {seal}, [\n{center}], [])\n",
                w = options.seal_width_mm,
                seal = seal_cell,
                center = center,
            );
        }
        DocumentNode::Fields(rows) => {
            out.push_str("#grid(columns: (auto, auto), column-gutter: 6pt, row-gutter: 4pt,\n");
            for (label, value) in rows {
                let _ = writeln!(
                    out,
                    "  [{}:], [{}],",
                    escape_typst_markup(label),
                    inline_markup(value)
                );
            }
            out.push_str(")\n\n");
        }
        DocumentNode::Signature { name, title } => {
            let name = match name {
                Some(name) => format!("#strong[{}]", escape_typst_markup(name)),
                None => format!("#\"{}\"", BLANK),
            };
            let _ = writeln!(
                out,
                "#align(right)[#block(width: 75mm)[#align(center)[{} \\ {}]]]\n",
                name,
                escape_typst_markup(title)
            );
        }
    }
}

fn spans_markup(spans: &[Inline]) -> String {
    spans.iter().map(inline_markup).collect()
}

fn inline_markup(inline: &Inline) -> String {
    match inline {
        Inline::Text(text) => escape_typst_markup(text),
        Inline::Strong(text) | Inline::Value(Some(text)) => {
            format!("#strong[{}]", escape_typst_markup(text))
        }
        Inline::Value(None) => format!("#\"{}\"", BLANK),
    }
}

fn align_name(align: Align) -> &'static str {
    match align {
        Align::Left => "left",
        Align::Center => "center",
        Align::Right => "right",
    }
}

fn size_pt(size: TextSize, options: &RenderOptions) -> u8 {
    match size {
        TextSize::Small => options.font_size_pt.saturating_sub(2),
        TextSize::Normal => options.font_size_pt,
        TextSize::Large => options.font_size_pt.saturating_add(4),
        TextSize::Title => options.font_size_pt.saturating_add(8),
    }
}
