//! HTML rendering of the assembled node tree
//!
//! Output is a fragment (no `<html>`/`<body>` wrapper). Margin numbers use
//! the custom elements `<border-number>`, `<number>` and `<content>`, which
//! downstream consumers style and index themselves.

use base64::{engine::general_purpose, Engine as _};
use docx2html_core::{
    BorderNumber, ContentNode, Inline, InlineImage, ListContainer, Paragraph, ParagraphStyle,
    RunFlags, Table,
};
use quick_xml::escape::{escape, partial_escape};

const TABLE_STYLE: &str = "border-collapse:collapse;";
const CELL_STYLE: &str = "border:1px solid black;padding:5px;";
const TAB_HTML: &str = r#"<span style="white-space:pre;">&#9;</span>"#;

/// Serializes [`ContentNode`]s to HTML
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtmlRenderer {
    embed_images: bool,
}

impl Default for HtmlRenderer {
    #[inline]
    fn default() -> Self {
        Self { embed_images: true }
    }
}

impl HtmlRenderer {
    /// Renderer that embeds images as `data:` URIs when `embed_images` is set
    /// and leaves them out otherwise
    #[inline]
    #[must_use]
    pub const fn new(embed_images: bool) -> Self {
        Self { embed_images }
    }

    /// Render a node sequence
    #[must_use = "returns the rendered html"]
    pub fn render(&self, nodes: &[ContentNode]) -> String {
        let mut html = String::new();
        self.render_nodes(nodes, &mut html);
        html
    }

    fn render_nodes(&self, nodes: &[ContentNode], out: &mut String) {
        for node in nodes {
            self.render_node(node, out);
        }
    }

    fn render_node(&self, node: &ContentNode, out: &mut String) {
        match node {
            ContentNode::TextParagraph(paragraph) => self.render_paragraph(paragraph, out),
            ContentNode::BorderNumber(border_number) => {
                self.render_border_number(border_number, out);
            }
            ContentNode::Table(table) => self.render_table(table, out),
            ContentNode::List(list) => self.render_list(list, out),
            // Entries are normally consumed by the list assembler
            ContentNode::ListEntry(entry) => self.render_nodes(&entry.text, out),
        }
    }

    fn render_paragraph(&self, paragraph: &Paragraph, out: &mut String) {
        let style = paragraph_css(&paragraph.style);
        if style.is_empty() {
            out.push_str("<p>");
        } else {
            out.push_str(&format!(r#"<p style="{}">"#, escape(&style)));
        }

        for inline in &paragraph.runs {
            match inline {
                Inline::Text(run) => {
                    let text = partial_escape(&run.text);
                    if run.flags.is_plain() {
                        out.push_str(&text);
                    } else {
                        let css = run_css(run.flags);
                        out.push_str(&format!(r#"<span style="{css}">{text}</span>"#));
                    }
                }
                Inline::Tab => out.push_str(TAB_HTML),
                Inline::LineBreak => out.push_str("<br/>"),
                Inline::Image(image) => {
                    if self.embed_images {
                        render_image(image, out);
                    }
                }
            }
        }

        out.push_str("</p>");
    }

    fn render_border_number(&self, border_number: &BorderNumber, out: &mut String) {
        out.push_str("<border-number><number>");
        out.push_str(&partial_escape(&border_number.number_text));
        out.push_str("</number>");
        if !border_number.content.is_empty() {
            out.push_str("<content>");
            self.render_nodes(&border_number.content, out);
            out.push_str("</content>");
        }
        out.push_str("</border-number>");
    }

    fn render_table(&self, table: &Table, out: &mut String) {
        out.push_str(&format!(r#"<table style="{TABLE_STYLE}">"#));
        for row in &table.rows {
            out.push_str("<tr>");
            for cell in row {
                if cell.column_span > 1 {
                    out.push_str(&format!(
                        r#"<td style="{CELL_STYLE}" colspan="{}">"#,
                        cell.column_span
                    ));
                } else {
                    out.push_str(&format!(r#"<td style="{CELL_STYLE}">"#));
                }
                self.render_nodes(&cell.content, out);
                out.push_str("</td>");
            }
            out.push_str("</tr>");
        }
        out.push_str("</table>");
    }

    fn render_list(&self, list: &ListContainer, out: &mut String) {
        let tag = list.format.container_tag();
        out.push_str(&format!(
            r#"<{tag} style="list-style-type:{};">"#,
            list.format.list_style_type()
        ));
        for item in &list.items {
            out.push_str("<li>");
            self.render_nodes(&item.content, out);
            out.push_str("</li>");
        }
        out.push_str(&format!("</{tag}>"));
    }
}

/// CSS declarations for paragraph formatting; empty for plain paragraphs
fn paragraph_css(style: &ParagraphStyle) -> String {
    let mut css = String::new();
    if let Some(alignment) = style.alignment {
        css.push_str(&format!("text-align:{};", alignment.as_css()));
    }
    if style.bold {
        css.push_str("font-weight:bold;");
    }
    if style.italic {
        css.push_str("font-style:italic;");
    }
    if let Some(size) = &style.font_size {
        css.push_str(&format!("font-size:{size}pt;"));
    }
    if let Some(color) = &style.color {
        css.push_str(&format!("color:#{color};"));
    }
    css
}

/// CSS declarations for character formatting
fn run_css(flags: RunFlags) -> String {
    let mut css = String::new();
    if flags.bold {
        css.push_str("font-weight:bold;");
    }
    if flags.italic {
        css.push_str("font-style:italic;");
    }
    match (flags.underline, flags.strike) {
        (true, true) => css.push_str("text-decoration:underline line-through;"),
        (true, false) => css.push_str("text-decoration:underline;"),
        (false, true) => css.push_str("text-decoration:line-through;"),
        (false, false) => {}
    }
    if flags.superscript {
        css.push_str("vertical-align:super;");
    } else if flags.subscript {
        css.push_str("vertical-align:sub;");
    }
    css
}

fn render_image(image: &InlineImage, out: &mut String) {
    let data = general_purpose::STANDARD.encode(&image.data);
    out.push_str(&format!(
        r#"<img src="data:{};base64,{data}""#,
        escape(&image.content_type)
    ));
    if let Some(width) = image.width_px {
        out.push_str(&format!(r#" width="{width}""#));
    }
    if let Some(height) = image.height_px {
        out.push_str(&format!(r#" height="{height}""#));
    }
    if let Some(alt) = &image.alt_text {
        out.push_str(&format!(r#" alt="{}""#, escape(alt)));
    }
    out.push_str("/>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx2html_core::{Alignment, ListItem, NumberingFormat, TableCell, TextRun};

    fn render(nodes: &[ContentNode]) -> String {
        HtmlRenderer::default().render(nodes)
    }

    #[test]
    fn test_plain_paragraph_is_escaped() {
        assert_eq!(
            render(&[ContentNode::paragraph("a < b & c")]),
            "<p>a &lt; b &amp; c</p>"
        );
    }

    #[test]
    fn test_paragraph_style_attribute() {
        let paragraph = ContentNode::TextParagraph(Paragraph {
            runs: vec![Inline::Text(TextRun::plain("Urteil"))],
            style: ParagraphStyle {
                alignment: Some(Alignment::Center),
                bold: true,
                font_size: Some("14".to_string()),
                color: Some("1F3864".to_string()),
                ..ParagraphStyle::default()
            },
        });
        assert_eq!(
            render(&[paragraph]),
            r#"<p style="text-align:center;font-weight:bold;font-size:14pt;color:#1F3864;">Urteil</p>"#
        );
    }

    #[test]
    fn test_inline_formatting() {
        let paragraph = ContentNode::TextParagraph(Paragraph {
            runs: vec![
                Inline::Text(TextRun::with_flags(
                    "fett",
                    RunFlags {
                        bold: true,
                        underline: true,
                        ..RunFlags::default()
                    },
                )),
                Inline::Tab,
                Inline::Text(TextRun::with_flags(
                    "2",
                    RunFlags {
                        superscript: true,
                        ..RunFlags::default()
                    },
                )),
                Inline::LineBreak,
            ],
            style: ParagraphStyle::default(),
        });
        assert_eq!(
            render(&[paragraph]),
            concat!(
                r#"<p><span style="font-weight:bold;text-decoration:underline;">fett</span>"#,
                r#"<span style="white-space:pre;">&#9;</span>"#,
                r#"<span style="vertical-align:super;">2</span><br/></p>"#
            )
        );
    }

    #[test]
    fn test_image_embedding_switch() {
        let image = InlineImage {
            rel_id: "rId1".to_string(),
            content_type: "image/png".to_string(),
            data: b"abc".to_vec(),
            width_px: Some(10),
            height_px: None,
            alt_text: Some("Logo \"A\"".to_string()),
        };
        let paragraph = [ContentNode::TextParagraph(Paragraph {
            runs: vec![Inline::Image(image)],
            style: ParagraphStyle::default(),
        })];

        assert_eq!(
            HtmlRenderer::new(true).render(&paragraph),
            r#"<p><img src="data:image/png;base64,YWJj" width="10" alt="Logo &quot;A&quot;"/></p>"#
        );
        assert_eq!(HtmlRenderer::new(false).render(&paragraph), "<p></p>");
    }

    #[test]
    fn test_border_number_markup() {
        let nodes = [
            ContentNode::BorderNumber(BorderNumber {
                number_text: "1".to_string(),
                content: vec![ContentNode::paragraph("Text")],
            }),
            ContentNode::border_number("2"),
        ];
        assert_eq!(
            render(&nodes),
            concat!(
                "<border-number><number>1</number><content><p>Text</p></content></border-number>",
                "<border-number><number>2</number></border-number>"
            )
        );
    }

    #[test]
    fn test_table_markup() {
        let table = ContentNode::Table(Table {
            rows: vec![vec![
                TableCell {
                    content: vec![ContentNode::paragraph("A")],
                    column_span: 2,
                },
                TableCell::new(vec![]),
            ]],
        });
        assert_eq!(
            render(&[table]),
            concat!(
                r#"<table style="border-collapse:collapse;"><tr>"#,
                r#"<td style="border:1px solid black;padding:5px;" colspan="2"><p>A</p></td>"#,
                r#"<td style="border:1px solid black;padding:5px;"></td>"#,
                "</tr></table>"
            )
        );
    }

    #[test]
    fn test_list_markup() {
        let list = ContentNode::List(ListContainer {
            format: NumberingFormat::UpperRoman,
            items: vec![ListItem {
                content: vec![ContentNode::paragraph("eins")],
            }],
        });
        assert_eq!(
            render(&[list]),
            r#"<ol style="list-style-type:upper-roman;"><li><p>eins</p></li></ol>"#
        );
    }
}
