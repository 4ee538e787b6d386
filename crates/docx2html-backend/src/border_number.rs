//! Border-number merge pass
//!
//! Court decisions number their paragraphs in the margin ("Randnummern").
//! In the source package the number is a paragraph of its own, followed by
//! the paragraphs it numbers. This pass moves those followers into the
//! marker's content so the renderer can emit them together.

use docx2html_core::{BorderNumber, ContentNode};

/// Pure pass attaching trailing content to the preceding border number
pub struct BorderNumberMerger;

impl BorderNumberMerger {
    /// Merge a node stream, recursing into tables and list items
    ///
    /// An empty marker absorbs every following node until the next marker
    /// or the next table / list. A marker directly followed by one of those
    /// keeps empty content.
    #[must_use]
    pub fn merge(nodes: Vec<ContentNode>) -> Vec<ContentNode> {
        let mut output = Vec::with_capacity(nodes.len());
        let mut open: Option<BorderNumber> = None;

        for node in nodes {
            let node = merge_nested(node);
            match node {
                ContentNode::BorderNumber(marker) => {
                    if let Some(done) = open.take() {
                        output.push(ContentNode::BorderNumber(done));
                    }
                    if marker.content.is_empty() {
                        open = Some(marker);
                    } else {
                        output.push(ContentNode::BorderNumber(marker));
                    }
                }
                block if block.is_structural_block() => {
                    if let Some(done) = open.take() {
                        output.push(ContentNode::BorderNumber(done));
                    }
                    output.push(block);
                }
                other => match open.as_mut() {
                    Some(marker) => marker.content.push(other),
                    None => output.push(other),
                },
            }
        }

        if let Some(done) = open {
            output.push(ContentNode::BorderNumber(done));
        }
        output
    }
}

fn merge_nested(node: ContentNode) -> ContentNode {
    match node {
        ContentNode::Table(mut table) => {
            for cell in table.rows.iter_mut().flatten() {
                cell.content = BorderNumberMerger::merge(std::mem::take(&mut cell.content));
            }
            ContentNode::Table(table)
        }
        ContentNode::List(mut list) => {
            for item in &mut list.items {
                item.content = BorderNumberMerger::merge(std::mem::take(&mut item.content));
            }
            ContentNode::List(list)
        }
        ContentNode::ListEntry(mut entry) => {
            entry.text = BorderNumberMerger::merge(std::mem::take(&mut entry.text));
            ContentNode::ListEntry(entry)
        }
        ContentNode::BorderNumber(mut marker) => {
            marker.content = BorderNumberMerger::merge(std::mem::take(&mut marker.content));
            ContentNode::BorderNumber(marker)
        }
        other => other,
    }
}
