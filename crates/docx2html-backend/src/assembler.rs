//! List assembly: consecutive [`ContentNode::ListEntry`] nodes → nested
//! [`ContentNode::List`] containers
//!
//! The assembler is a stack machine. Each open container is a [`ListFrame`];
//! frame levels strictly increase from the bottom of the stack to the top,
//! so the stack mirrors the `<ul>`/`<ol>` elements that would be open in the
//! rendered HTML. Closing a frame attaches its container to the last item
//! of the frame below it, or to the output when it was the outermost one.

use docx2html_core::{ContentNode, ListContainer, ListEntry, ListItem, NumberingFormat};
use log::trace;

/// One open list container
#[derive(Debug)]
struct ListFrame {
    level: u32,
    container: ListContainer,
}

impl ListFrame {
    fn new(level: u32, format: NumberingFormat) -> Self {
        Self {
            level,
            container: ListContainer::new(format),
        }
    }
}

/// Stack machine turning flat list entries into nested containers
#[derive(Debug, Default)]
pub struct NumberingListAssembler {
    stack: Vec<ListFrame>,
    output: Vec<ContentNode>,
}

impl NumberingListAssembler {
    /// Assemble a node stream, recursing into tables, list items and
    /// border-number content
    #[must_use]
    pub fn assemble(nodes: Vec<ContentNode>) -> Vec<ContentNode> {
        let mut assembler = Self::default();
        for node in nodes {
            assembler.push(node);
        }
        assembler.finish()
    }

    fn push(&mut self, node: ContentNode) {
        match node {
            ContentNode::ListEntry(entry) => self.push_entry(entry),
            other => {
                self.close_all();
                self.output.push(assemble_nested(other));
            }
        }
    }

    fn push_entry(&mut self, entry: ListEntry) {
        let level = entry.index.level;
        let format = entry.index.format;
        let item = ListItem {
            content: Self::assemble(entry.text),
        };

        // Rule 3: close deeper containers
        while self.stack.last().is_some_and(|top| top.level > level) {
            self.close_top();
        }

        match self.stack.last() {
            // Rule 2: same level, same format
            Some(top) if top.level == level && top.container.format == format => {}
            // Rule 2: same level, format switch opens a sibling container
            Some(top) if top.level == level => {
                trace!("Format switch at level {level}: {} → {format}", top.container.format);
                self.close_top();
                self.stack.push(ListFrame::new(level, format));
            }
            // Rule 1: empty stack or deeper level
            _ => self.stack.push(ListFrame::new(level, format)),
        }

        if let Some(top) = self.stack.last_mut() {
            top.container.items.push(item);
        }
    }

    /// Pop the top frame and attach its container to its parent
    fn close_top(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        let list = ContentNode::List(frame.container);

        match self
            .stack
            .last_mut()
            .and_then(|parent| parent.container.items.last_mut())
        {
            Some(parent_item) => parent_item.content.push(list),
            None => self.output.push(list),
        }
    }

    fn close_all(&mut self) {
        while !self.stack.is_empty() {
            self.close_top();
        }
    }

    fn finish(mut self) -> Vec<ContentNode> {
        self.close_all();
        self.output
    }
}

/// Run the assembler inside a non-entry node's children
fn assemble_nested(node: ContentNode) -> ContentNode {
    match node {
        ContentNode::Table(mut table) => {
            for cell in table.rows.iter_mut().flatten() {
                let content = std::mem::take(&mut cell.content);
                cell.content = NumberingListAssembler::assemble(content);
            }
            ContentNode::Table(table)
        }
        ContentNode::BorderNumber(mut border_number) => {
            border_number.content =
                NumberingListAssembler::assemble(std::mem::take(&mut border_number.content));
            ContentNode::BorderNumber(border_number)
        }
        ContentNode::List(mut list) => {
            for item in &mut list.items {
                item.content = NumberingListAssembler::assemble(std::mem::take(&mut item.content));
            }
            ContentNode::List(list)
        }
        other => other,
    }
}
