//! Arena of decoded TLV nodes.
//!
//! The tree starts with only the top-level TLVs ([`Asn1Tree::outline`]).
//! Constructed nodes are decoded one level at a time when the caller asks
//! for them with [`Asn1Tree::expand`]; presentation code keeps [`NodeId`]s
//! and reads everything else back from the arena.

use std::ops::Range;

use buf::ByteBuffer;
use der::{Header, ObjectIdentifier, UniversalTag, parse_header};
use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Stage, StageExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Node {
    header: Header,
    offset: usize,
    length: usize,
    value_offset: usize,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    #[serde(skip)]
    expanded: bool,
}

impl Node {
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Offset of the identifier octet.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Header plus value length.
    pub fn length(&self) -> usize {
        self.length
    }

    pub fn value_offset(&self) -> usize {
        self.value_offset
    }

    pub fn value_length(&self) -> usize {
        self.header.length() as usize
    }

    /// Byte range covered by the whole TLV.
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.length
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_expanded(&self) -> bool {
        self.expanded
    }
}

#[derive(Debug, Clone, Default)]
pub struct Asn1Tree {
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
}

impl Asn1Tree {
    /// Records every top-level TLV of `buffer`.
    ///
    /// The first one must be a constructed SEQUENCE. Anything after it is
    /// kept as additional roots. Each TLV must fit inside the buffer. The
    /// cursor is left where it was.
    pub fn outline(buffer: &mut ByteBuffer) -> Result<Self, Error> {
        let cursor = buffer.cursor();
        let mut tree = Asn1Tree::default();
        let result = tree.decode_roots(buffer);
        buffer.set_cursor(cursor).stage(Stage::Structure)?;
        result?;
        debug!(roots = tree.roots.len(), "outlined certificate");
        Ok(tree)
    }

    fn decode_roots(&mut self, buffer: &mut ByteBuffer) -> Result<(), Error> {
        let end = buffer.len();
        let mut offset = 0;
        loop {
            let header = decode_at(buffer, offset)?;
            if self.roots.is_empty() {
                header.expect_sequence(offset).stage(Stage::Structure)?;
            }
            let id = self.push(header, offset, end, None)?;
            self.roots.push(id);
            offset += self.nodes[id.0].length;
            if offset >= end {
                return Ok(());
            }
        }
    }

    /// Decodes the immediate children of `id`, once.
    ///
    /// Primitive nodes have no children. A child that runs past the end of
    /// its parent fails with [`der::Error::ValueOverrun`] and leaves the
    /// tree unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    pub fn expand(&mut self, buffer: &mut ByteBuffer, id: NodeId) -> Result<&[NodeId], Error> {
        if !self.nodes[id.0].expanded {
            let cursor = buffer.cursor();
            let mark = self.nodes.len();
            let result = self.decode_children(buffer, id);
            buffer.set_cursor(cursor).stage(Stage::Structure)?;
            match result {
                Ok(children) => {
                    let node = &mut self.nodes[id.0];
                    node.children = children;
                    node.expanded = true;
                }
                Err(e) => {
                    self.nodes.truncate(mark);
                    return Err(e);
                }
            }
        }
        Ok(&self.nodes[id.0].children)
    }

    fn decode_children(&mut self, buffer: &mut ByteBuffer, id: NodeId) -> Result<Vec<NodeId>, Error> {
        let node = &self.nodes[id.0];
        if !node.header.constructed() {
            return Ok(Vec::new());
        }

        let end = node.offset + node.length;
        let mut offset = node.value_offset;
        let mut children = Vec::new();
        while offset < end {
            let header = decode_at(buffer, offset)?;
            let child = self.push(header, offset, end, Some(id))?;
            offset += self.nodes[child.0].length;
            children.push(child);
        }
        debug!(offset = self.nodes[id.0].offset, children = children.len(), "expanded node");
        Ok(children)
    }

    /// Expands every constructed node down to `depth` levels below the roots.
    pub fn expand_to_depth(&mut self, buffer: &mut ByteBuffer, depth: usize) -> Result<(), Error> {
        let mut pending: Vec<(NodeId, usize)> = self.roots.iter().map(|id| (*id, 0)).collect();
        while let Some((id, level)) = pending.pop() {
            if level >= depth {
                continue;
            }
            let children = self.expand(buffer, id)?;
            pending.extend(children.iter().map(|child| (*child, level + 1)));
        }
        Ok(())
    }

    fn push(&mut self, header: Header, offset: usize, limit: usize, parent: Option<NodeId>) -> Result<NodeId, Error> {
        let length = header.total_length();
        let available = limit.saturating_sub(offset);
        if length > available {
            let overrun = der::Error::ValueOverrun {
                offset,
                needed: length,
                available,
            };
            return Err(Error::new(Stage::Structure, overrun));
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            value_offset: offset + header.header_length(),
            header,
            offset,
            length,
            parent,
            children: Vec::new(),
            expanded: false,
        });
        Ok(id)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Number of ancestors of `id`; roots are at depth 0.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut current = self.nodes[id.0].parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.nodes[parent.0].parent;
        }
        depth
    }

    /// Depth-first, pre-order walk over the nodes decoded so far.
    pub fn walk(&self) -> Vec<(NodeId, usize)> {
        let mut visited = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(NodeId, usize)> = self.roots.iter().rev().map(|id| (*id, 0)).collect();
        while let Some((id, depth)) = stack.pop() {
            visited.push((id, depth));
            stack.extend(
                self.nodes[id.0]
                    .children
                    .iter()
                    .rev()
                    .map(|child| (*child, depth + 1)),
            );
        }
        visited
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrows the value octets of `id`.
    pub fn value<'a>(&self, buffer: &'a ByteBuffer, id: NodeId) -> Result<&'a [u8], Error> {
        let node = &self.nodes[id.0];
        buffer
            .bytes(node.value_offset, node.value_length())
            .stage(Stage::Structure)
    }

    /// Decodes `id` as an OBJECT IDENTIFIER, `None` if it is a different type.
    pub fn object_identifier(
        &self,
        buffer: &ByteBuffer,
        id: NodeId,
    ) -> Result<Option<ObjectIdentifier>, Error> {
        let node = &self.nodes[id.0];
        if node.header.constructed()
            || node.header.universal_tag() != Some(UniversalTag::ObjectIdentifier)
        {
            return Ok(None);
        }
        let value = self.value(buffer, id)?;
        ObjectIdentifier::from_der_value(value)
            .map(Some)
            .stage(Stage::Structure)
    }
}

fn decode_at(buffer: &mut ByteBuffer, offset: usize) -> Result<Header, Error> {
    buffer.set_cursor(offset).stage(Stage::Structure)?;
    let (header, _) = parse_header(buffer).stage(Stage::Structure)?;
    Ok(header)
}
