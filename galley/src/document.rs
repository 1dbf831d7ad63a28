// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The block-structured document model.
//!
//! A document is an ordered sequence of [`Block`]s (paragraphs). The total
//! offset space is the concatenation of the block contents plus one
//! separator per block boundary; all offsets are code point counts. A
//! document always contains at least one block, so offset `0` is always
//! valid and an empty document has length `0`.

use crate::layout::BlockLayout;

/// Marker state for checklist-like blocks.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub enum Marker {
    /// Plain paragraph, no marker.
    #[default]
    None,
    /// Unchecked checklist item.
    Unchecked,
    /// Checked checklist item.
    Checked,
}

/// A paragraph: the unit of document structure and of layout invalidation.
#[derive(Clone, Debug)]
pub struct Block {
    text: String,
    char_len: usize,
    visible: bool,
    marker: Marker,
    pub(crate) layout: BlockLayout,
}

impl Block {
    pub(crate) fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        debug_assert!(
            !text.contains('\n'),
            "block text must not contain separators"
        );
        let char_len = text.chars().count();
        Self {
            text,
            char_len,
            visible: true,
            marker: Marker::None,
            layout: BlockLayout::default(),
        }
    }

    /// Returns the text of the block, without any separator.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the length of the block in code points.
    pub fn char_len(&self) -> usize {
        self.char_len
    }

    /// Returns `true` if the block participates in layout.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Returns the checklist marker state of the block.
    pub fn marker(&self) -> Marker {
        self.marker
    }

    /// Returns the byte index corresponding to a code point index.
    ///
    /// Indices past the end clamp to the end of the text.
    pub(crate) fn byte_of(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    /// Returns the sub-slice between two code point indices.
    pub(crate) fn slice(&self, start: usize, end: usize) -> &str {
        let a = self.byte_of(start);
        let b = self.byte_of(end);
        &self.text[a..b]
    }
}

/// Position of a document offset inside a block.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Location {
    /// Index of the containing block.
    pub block: usize,
    /// Code point offset within the block, `0..=char_len`.
    ///
    /// An offset equal to `char_len` sits on the block's trailing separator
    /// (or at the end of the document for the last block).
    pub offset: usize,
}

/// Record of a single document mutation.
///
/// Edits describe a replacement in the document's offset space together with
/// the block-level consequences, which is everything the layout engine and
/// live cursors need to bring themselves up to date.
#[derive(Clone, Debug)]
pub struct Edit {
    /// Offset at which the replacement starts.
    pub start: usize,
    /// Number of code points removed (separators included).
    pub removed: usize,
    /// Number of code points inserted (separators included).
    pub added: usize,
    /// First affected block index.
    pub block: usize,
    /// Number of blocks spanned before the edit.
    pub old_blocks: usize,
    /// Number of blocks spanning the edited region afterwards.
    pub new_blocks: usize,
    /// Sum of the cached line counts of the replaced blocks, taken before
    /// the edit was applied.
    pub old_lines: usize,
}

impl Edit {
    /// Shifts a document offset across this edit.
    ///
    /// Offsets inside the removed region collapse to the end of the
    /// inserted text.
    pub fn transform(&self, offset: usize) -> usize {
        if offset <= self.start {
            offset
        } else if offset >= self.start + self.removed {
            offset - self.removed + self.added
        } else {
            self.start + self.added
        }
    }
}

/// A block-structured plain text document.
#[derive(Clone, Debug)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    /// Creates an empty document containing a single empty block.
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::new("")],
        }
    }

    /// Creates a document from text, splitting blocks on `'\n'`.
    pub fn from_text(text: &str) -> Self {
        Self {
            blocks: text.split('\n').map(Block::new).collect(),
        }
    }

    /// Returns the length of the document in code points, separators
    /// included.
    pub fn len(&self) -> usize {
        self.blocks.iter().map(|b| b.char_len + 1).sum::<usize>() - 1
    }

    /// Returns `true` if the document contains no text.
    pub fn is_empty(&self) -> bool {
        self.blocks.len() == 1 && self.blocks[0].char_len == 0
    }

    /// Returns the number of blocks. Always at least one.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Returns the block at `index`.
    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub(crate) fn block_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.blocks.get_mut(index)
    }

    /// Resolves a document offset to a block and an offset within it.
    ///
    /// Out-of-range offsets clamp to the end of the document.
    pub fn locate(&self, offset: usize) -> Location {
        let mut rest = offset;
        for (index, block) in self.blocks.iter().enumerate() {
            if rest <= block.char_len {
                return Location {
                    block: index,
                    offset: rest,
                };
            }
            rest -= block.char_len + 1;
        }
        Location {
            block: self.blocks.len() - 1,
            offset: self.blocks[self.blocks.len() - 1].char_len,
        }
    }

    /// Returns the document offset of the start of a block.
    ///
    /// Indices past the last block return the document length.
    pub fn block_start(&self, index: usize) -> usize {
        self.blocks
            .iter()
            .take(index)
            .map(|b| b.char_len + 1)
            .sum::<usize>()
            .min(self.len())
    }

    /// Returns the document offset just past the end of a block's text,
    /// before its trailing separator.
    pub fn block_end(&self, index: usize) -> usize {
        let index = index.min(self.blocks.len() - 1);
        self.block_start(index) + self.blocks[index].char_len
    }

    /// Returns the text of an offset range, with separators rendered as
    /// `'\n'`.
    pub fn text_range(&self, start: usize, end: usize) -> String {
        let len = self.len();
        let start = start.min(len);
        let end = end.clamp(start, len);
        let from = self.locate(start);
        let to = self.locate(end);
        if from.block == to.block {
            return self.blocks[from.block].slice(from.offset, to.offset).into();
        }
        let mut out = String::new();
        let first = &self.blocks[from.block];
        out.push_str(first.slice(from.offset, first.char_len));
        for block in &self.blocks[from.block + 1..to.block] {
            out.push('\n');
            out.push_str(&block.text);
        }
        out.push('\n');
        out.push_str(self.blocks[to.block].slice(0, to.offset));
        out
    }

    /// Returns the full text of the document.
    pub fn text(&self) -> String {
        self.text_range(0, self.len())
    }

    /// Replaces an offset range with new text, splitting and merging blocks
    /// as needed. Returns the edit record and the removed text.
    ///
    /// Offsets are clamped to the document bounds; the operation never
    /// fails.
    pub fn replace(&mut self, start: usize, end: usize, text: &str) -> (Edit, String) {
        let len = self.len();
        let start = start.min(len);
        let end = end.clamp(start, len);
        let from = self.locate(start);
        let to = self.locate(end);

        let removed_text = self.text_range(start, end);
        let old_lines = self.blocks[from.block..=to.block]
            .iter()
            .map(|b| b.layout.line_count())
            .sum();

        let first = &self.blocks[from.block];
        let last = &self.blocks[to.block];
        let mut combined = String::with_capacity(
            first.byte_of(from.offset) + text.len() + (last.text.len() - last.byte_of(to.offset)),
        );
        combined.push_str(first.slice(0, from.offset));
        combined.push_str(text);
        combined.push_str(last.slice(to.offset, last.char_len));

        let first_attrs = (first.visible, first.marker);
        let last_attrs = (last.visible, last.marker);

        let segments: Vec<Block> = combined.split('\n').map(Block::new).collect();
        let new_blocks = segments.len();
        let spliced = self
            .blocks
            .splice(from.block..=to.block, segments)
            .count();
        debug_assert!(spliced == to.block - from.block + 1, "splice range mismatch");

        // The first block inherits the leading block's attributes; a
        // surviving trailing block keeps the attributes of the block that
        // contributed its tail.
        let (visible, marker) = first_attrs;
        self.blocks[from.block].visible = visible;
        self.blocks[from.block].marker = marker;
        for block in &mut self.blocks[from.block + 1..from.block + new_blocks] {
            block.visible = visible;
            block.marker = marker;
        }
        if new_blocks > 1 && to.block > from.block {
            let last = &mut self.blocks[from.block + new_blocks - 1];
            last.visible = last_attrs.0;
            last.marker = last_attrs.1;
        }

        let edit = Edit {
            start,
            removed: end - start,
            added: text.chars().count(),
            block: from.block,
            old_blocks: to.block - from.block + 1,
            new_blocks,
            old_lines,
        };
        (edit, removed_text)
    }

    /// Inserts text at an offset. Convenience over [`replace`](Self::replace).
    pub fn insert(&mut self, offset: usize, text: &str) -> Edit {
        self.replace(offset, offset, text).0
    }

    /// Removes an offset range. Convenience over [`replace`](Self::replace).
    pub fn remove(&mut self, start: usize, end: usize) -> (Edit, String) {
        self.replace(start, end, "")
    }

    /// Sets the visibility of a block. Returns `true` if it changed.
    pub fn set_block_visible(&mut self, index: usize, visible: bool) -> bool {
        match self.blocks.get_mut(index) {
            Some(block) if block.visible != visible => {
                block.visible = visible;
                true
            }
            _ => false,
        }
    }

    /// Sets the checklist marker of a block. Returns `true` if it changed.
    pub fn set_block_marker(&mut self, index: usize, marker: Marker) -> bool {
        match self.blocks.get_mut(index) {
            Some(block) if block.marker != marker => {
                block.marker = marker;
                true
            }
            _ => false,
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
