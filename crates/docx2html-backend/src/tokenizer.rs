//! Body tokenizer: `word/document.xml` → flat [`ContentNode`] stream
//!
//! Block elements are classified through [`BLOCK_BUILDERS`] and inline
//! elements through [`INLINE_BUILDERS`]; both map a WordprocessingML local
//! name to a builder function. Elements without an entry are skipped.
//!
//! ```xml
//! <w:body>
//!   <w:p>…</w:p>                       <!-- paragraph / list entry / border number -->
//!   <w:tbl><w:tr><w:tc>…</w:tc></w:tr></w:tbl>
//!   <w:sdt><w:sdtContent>…</w:sdtContent></w:sdt>
//!   <w:sectPr>…</w:sectPr>             <!-- ignored here, see metadata -->
//! </w:body>
//! ```

use crate::images::ImageResolver;
use crate::numbering::NumberingRegistry;
use crate::styles::{parse_color, underline_on, RunProperties, StyleRegistry, VerticalAlign};
use crate::xml::{
    half_points_to_pt, in_unselected_branch, is_alternate_content, is_w, nearest_w_ancestor,
    selected_branch, w_child, w_child_val, w_toggle, A_NS, R_NS, W_NS, WP_NS,
};
use docx2html_core::{
    Alignment, BorderNumber, ContentNode, Inline, InlineImage, ListEntry, Paragraph, Table,
    TableCell, TextRun,
};
use log::trace;
use roxmltree::Node;

/// English Metric Units per CSS pixel (96 dpi)
const EMU_PER_PX: u64 = 9525;

/// VML namespace (`v:imagedata` in legacy `w:pict` images)
const V_NS: &str = "urn:schemas-microsoft-com:vml";

/// Builder for a block-level element
type BlockBuilder = fn(&ContentTokenizer<'_>, Node<'_, '_>, &mut Vec<ContentNode>);

/// Builder for an inline element inside a paragraph
type InlineBuilder = fn(&ContentTokenizer<'_>, Node<'_, '_>, &mut Vec<Inline>);

/// Block element → builder
static BLOCK_BUILDERS: &[(&str, BlockBuilder)] = &[
    ("p", build_paragraph),
    ("tbl", build_table),
    ("sdt", build_block_sdt),
    ("customXml", build_block_wrapper),
];

/// Inline element → builder
static INLINE_BUILDERS: &[(&str, InlineBuilder)] = &[
    ("r", build_run),
    ("hyperlink", build_inline_wrapper),
    ("ins", build_inline_wrapper),
    ("smartTag", build_inline_wrapper),
    ("fldSimple", build_inline_wrapper),
    ("customXml", build_inline_wrapper),
    ("sdt", build_inline_sdt),
    ("del", skip_inline),
];

fn block_builder(node: Node<'_, '_>) -> Option<BlockBuilder> {
    if !node.is_element() || node.tag_name().namespace() != Some(W_NS) {
        return None;
    }
    let local = node.tag_name().name();
    BLOCK_BUILDERS
        .iter()
        .find(|(name, _)| *name == local)
        .map(|(_, builder)| *builder)
}

fn inline_builder(node: Node<'_, '_>) -> Option<InlineBuilder> {
    if !node.is_element() || node.tag_name().namespace() != Some(W_NS) {
        return None;
    }
    let local = node.tag_name().name();
    INLINE_BUILDERS
        .iter()
        .find(|(name, _)| *name == local)
        .map(|(_, builder)| *builder)
}

/// Classifies body elements using the per-document side tables
pub struct ContentTokenizer<'r> {
    styles: &'r StyleRegistry,
    numbering: &'r NumberingRegistry,
    images: &'r ImageResolver,
}

impl<'r> ContentTokenizer<'r> {
    pub const fn new(
        styles: &'r StyleRegistry,
        numbering: &'r NumberingRegistry,
        images: &'r ImageResolver,
    ) -> Self {
        Self {
            styles,
            numbering,
            images,
        }
    }

    /// Tokenize the `w:body` of a parsed `word/document.xml`
    ///
    /// A document without a body yields no nodes.
    pub fn tokenize_document(&self, document: &roxmltree::Document<'_>) -> Vec<ContentNode> {
        let root = document.root_element();
        match w_child(root, "body") {
            Some(body) => self.tokenize_children(body),
            None => Vec::new(),
        }
    }

    /// Tokenize the element children of a block container (body, cell,
    /// content control)
    pub fn tokenize_children(&self, container: Node<'_, '_>) -> Vec<ContentNode> {
        let mut nodes = Vec::new();
        self.tokenize_into(container, &mut nodes);
        nodes
    }

    fn tokenize_into(&self, container: Node<'_, '_>, out: &mut Vec<ContentNode>) {
        for child in container.children().filter(Node::is_element) {
            match block_builder(child) {
                Some(builder) => builder(self, child, out),
                None => trace!("Skipping block element <{}>", child.tag_name().name()),
            }
        }
    }

    fn inlines_into(&self, container: Node<'_, '_>, out: &mut Vec<Inline>) {
        for child in container.children().filter(Node::is_element) {
            match inline_builder(child) {
                Some(builder) => builder(self, child, out),
                None => trace!("Skipping inline element <{}>", child.tag_name().name()),
            }
        }
    }

    /// Tokenize the text boxes anchored in `paragraph`, in document order
    ///
    /// Only text boxes whose nearest enclosing paragraph is `paragraph` are
    /// visited; nested ones are reached through their own host paragraph.
    fn text_boxes_into(&self, paragraph: Node<'_, '_>, out: &mut Vec<ContentNode>) {
        let text_boxes = paragraph.descendants().filter(|n| {
            is_w(*n, "txbxContent")
                && nearest_w_ancestor(*n, "p") == Some(paragraph)
                && !in_unselected_branch(*n)
        });
        for text_box in text_boxes {
            trace!("Tokenizing text box content");
            self.tokenize_into(text_box, out);
        }
    }

    /// `(numId, ilvl)` from direct `w:numPr` or the paragraph style
    fn paragraph_numbering(
        &self,
        ppr: Option<Node<'_, '_>>,
        style_id: Option<&str>,
    ) -> Option<(i32, i32)> {
        let from_style = style_id.and_then(|id| self.styles.numbering(id));
        let direct = ppr.and_then(|ppr| w_child(ppr, "numPr"));

        let Some(num_pr) = direct else {
            return from_style;
        };
        let num_id = w_child_val(num_pr, "numId")
            .and_then(|v| v.trim().parse().ok())
            .or(from_style.map(|(num_id, _)| num_id))?;
        let ilvl = w_child_val(num_pr, "ilvl")
            .and_then(|v| v.trim().parse().ok())
            .or(from_style.map(|(_, ilvl)| ilvl))
            .unwrap_or(0);
        Some((num_id, ilvl))
    }

    fn image(&self, container: Node<'_, '_>) -> Option<InlineImage> {
        // Images inside a text box belong to the text box's own paragraphs
        let scope = nearest_w_ancestor(container, "txbxContent");
        let rel_id = container
            .descendants()
            .filter(|n| nearest_w_ancestor(*n, "txbxContent") == scope)
            .find_map(|n| {
                let name = n.tag_name();
                if name.namespace() == Some(A_NS) && name.name() == "blip" {
                    n.attribute((R_NS, "embed"))
                } else if name.namespace() == Some(V_NS) && name.name() == "imagedata" {
                    n.attribute((R_NS, "id"))
                } else {
                    None
                }
            })?;

        let Some(part) = self.images.get(rel_id) else {
            trace!("Dropping image with unresolved relationship {rel_id}");
            return None;
        };

        let extent = container
            .descendants()
            .find(|n| n.tag_name().namespace() == Some(WP_NS) && n.tag_name().name() == "extent");
        let emu_to_px = |attr: &str| {
            let emu: u64 = extent?.attribute(attr)?.trim().parse().ok()?;
            let px = emu.checked_add(EMU_PER_PX / 2)? / EMU_PER_PX;
            u32::try_from(px).ok()
        };
        let alt_text = container
            .descendants()
            .find(|n| n.tag_name().namespace() == Some(WP_NS) && n.tag_name().name() == "docPr")
            .and_then(|n| n.attribute("descr"))
            .filter(|descr| !descr.is_empty())
            .map(str::to_string);

        Some(InlineImage {
            rel_id: rel_id.to_string(),
            content_type: part.content_type.clone(),
            data: part.bytes.clone(),
            width_px: emu_to_px("cx"),
            height_px: emu_to_px("cy"),
            alt_text,
        })
    }
}

/// Direct character formatting of a `w:rPr`
fn direct_run_properties(rpr: Node<'_, '_>) -> RunProperties {
    let mut props = RunProperties::default();
    for child in rpr.children().filter(Node::is_element) {
        if child.tag_name().namespace() != Some(W_NS) {
            continue;
        }
        let val = child.attribute((W_NS, "val"));
        match child.tag_name().name() {
            "b" => props.bold = Some(w_toggle(child)),
            "i" => props.italic = Some(w_toggle(child)),
            "u" => props.underline = Some(underline_on(val)),
            "strike" | "dstrike" => props.strike = Some(w_toggle(child)),
            "vertAlign" => props.vertical_align = val.map(VerticalAlign::parse),
            "sz" => props.font_size = val.and_then(half_points_to_pt),
            "color" => props.color = val.and_then(parse_color),
            _ => {}
        }
    }
    props
}

/// Append text, merging into the previous run when the flags match
fn push_text(out: &mut Vec<Inline>, run: TextRun) {
    if run.text.is_empty() {
        return;
    }
    if let Some(Inline::Text(last)) = out.last_mut() {
        if last.flags == run.flags {
            last.text.push_str(&run.text);
            return;
        }
    }
    out.push(Inline::Text(run));
}

// ========================================================================
// Block builders
// ========================================================================

fn build_paragraph(
    tokenizer: &ContentTokenizer<'_>,
    node: Node<'_, '_>,
    out: &mut Vec<ContentNode>,
) {
    let ppr = w_child(node, "pPr");
    let style_id = ppr.and_then(|ppr| w_child_val(ppr, "pStyle"));

    let mut runs = Vec::new();
    tokenizer.inlines_into(node, &mut runs);

    let mut style = style_id
        .map(|id| tokenizer.styles.paragraph_style(id))
        .unwrap_or_default();
    if let Some(alignment) = ppr
        .and_then(|ppr| w_child_val(ppr, "jc"))
        .and_then(Alignment::parse_jc)
    {
        style.alignment = Some(alignment);
    }
    let paragraph = Paragraph { runs, style };

    if style_id.is_some_and(|id| tokenizer.styles.is_border_number_style(id)) {
        let number_text = paragraph.plain_text().trim().to_string();
        trace!("Border number paragraph {number_text:?}");
        out.push(ContentNode::BorderNumber(BorderNumber::new(number_text)));
        tokenizer.text_boxes_into(node, out);
        return;
    }

    let index = tokenizer
        .paragraph_numbering(ppr, style_id)
        .and_then(|(num_id, ilvl)| tokenizer.numbering.index_for(num_id, ilvl));
    match index {
        Some(index) => {
            trace!("List entry level {} format {}", index.level, index.format);
            out.push(ContentNode::ListEntry(ListEntry {
                text: vec![ContentNode::TextParagraph(paragraph)],
                index,
            }));
        }
        None => out.push(ContentNode::TextParagraph(paragraph)),
    }

    tokenizer.text_boxes_into(node, out);
}

fn build_table(
    tokenizer: &ContentTokenizer<'_>,
    node: Node<'_, '_>,
    out: &mut Vec<ContentNode>,
) {
    let rows = node
        .children()
        .filter(|row| is_w(*row, "tr"))
        .map(|row| {
            row.children()
                .filter(|cell| is_w(*cell, "tc"))
                .map(|cell| {
                    let column_span = w_child(cell, "tcPr")
                        .and_then(|tc_pr| w_child_val(tc_pr, "gridSpan"))
                        .and_then(|v| v.trim().parse::<u32>().ok())
                        .filter(|span| *span > 0)
                        .unwrap_or(1);
                    TableCell {
                        content: tokenizer.tokenize_children(cell),
                        column_span,
                    }
                })
                .collect()
        })
        .collect();
    out.push(ContentNode::Table(Table { rows }));
}

fn build_block_sdt(
    tokenizer: &ContentTokenizer<'_>,
    node: Node<'_, '_>,
    out: &mut Vec<ContentNode>,
) {
    if let Some(content) = w_child(node, "sdtContent") {
        tokenizer.tokenize_into(content, out);
    }
}

fn build_block_wrapper(
    tokenizer: &ContentTokenizer<'_>,
    node: Node<'_, '_>,
    out: &mut Vec<ContentNode>,
) {
    tokenizer.tokenize_into(node, out);
}

// ========================================================================
// Inline builders
// ========================================================================

fn build_run(
    tokenizer: &ContentTokenizer<'_>,
    node: Node<'_, '_>,
    out: &mut Vec<Inline>,
) {
    let rpr = w_child(node, "rPr");
    let character_style = rpr
        .and_then(|rpr| w_child_val(rpr, "rStyle"))
        .map(|id| tokenizer.styles.run_properties(id))
        .unwrap_or_default();
    let direct = rpr.map(direct_run_properties).unwrap_or_default();
    let flags = character_style.overlay(&direct).flags();

    for child in node.children().filter(Node::is_element) {
        if is_alternate_content(child) {
            let graphics = selected_branch(child)
                .into_iter()
                .flat_map(|branch| branch.children())
                .filter(|n| is_w(*n, "drawing") || is_w(*n, "pict"));
            for graphic in graphics {
                if let Some(image) = tokenizer.image(graphic) {
                    out.push(Inline::Image(image));
                }
            }
            continue;
        }
        if child.tag_name().namespace() != Some(W_NS) {
            continue;
        }
        match child.tag_name().name() {
            "t" => push_text(out, TextRun::with_flags(child.text().unwrap_or_default(), flags)),
            "noBreakHyphen" => push_text(out, TextRun::with_flags("\u{2011}", flags)),
            "tab" => out.push(Inline::Tab),
            "br" => match child.attribute((W_NS, "type")) {
                Some("page" | "column") => {}
                _ => out.push(Inline::LineBreak),
            },
            "cr" => out.push(Inline::LineBreak),
            "drawing" | "pict" => {
                if let Some(image) = tokenizer.image(child) {
                    out.push(Inline::Image(image));
                }
            }
            _ => {}
        }
    }
}

fn build_inline_wrapper(
    tokenizer: &ContentTokenizer<'_>,
    node: Node<'_, '_>,
    out: &mut Vec<Inline>,
) {
    tokenizer.inlines_into(node, out);
}

fn build_inline_sdt(
    tokenizer: &ContentTokenizer<'_>,
    node: Node<'_, '_>,
    out: &mut Vec<Inline>,
) {
    if let Some(content) = w_child(node, "sdtContent") {
        tokenizer.inlines_into(content, out);
    }
}

fn skip_inline(_: &ContentTokenizer<'_>, _: Node<'_, '_>, _: &mut Vec<Inline>) {}
