// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Line-granular layout types.
//!
//! Layout here is deliberately not pixel-exact: a block's layout is a list
//! of [`Line`] records carrying offsets and coarse geometry, which is what
//! lets the engine scale to very large documents. The incremental engine
//! lives in [`engine`]; the greedy breaker in `line_break`.

mod line_break;

pub(crate) mod engine;

use core::cmp::Ordering;

use smallvec::SmallVec;

pub use engine::LayoutEngine;

/// Line wrapping policy.
#[derive(Copy, Clone, PartialEq, Eq, Default, Debug)]
pub enum WrapMode {
    /// Never wrap; every block is a single line.
    None,
    /// Wrap at UAX-14 break opportunities, falling back to breaking inside
    /// a word that is wider than the available width on its own.
    #[default]
    Word,
    /// Wrap at any code point boundary.
    Anywhere,
}

/// A visually wrapped sub-range of a block, with its own geometry.
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub struct Line {
    /// Code point offset of the line start within its block.
    pub start: usize,
    /// Length of the line in code points.
    pub len: usize,
    /// Natural width of the line, trailing whitespace included.
    pub width: f32,
    /// Height of the line.
    pub height: f32,
    /// Vertical offset of the line top within its block.
    pub y: f32,
}

impl Line {
    /// Code point offset just past the end of the line, within its block.
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// Document size in layout units: the widest block and the total line count.
#[derive(Copy, Clone, PartialEq, Default, Debug)]
pub struct DocumentSize {
    /// Width of the widest block.
    pub width: f32,
    /// Number of laid out lines across all blocks.
    pub lines: usize,
}

/// Cached layout of a single block.
///
/// Invalid until the first layout query after a change; queries against an
/// invalid layout return the stale records, which the engine accounts for
/// when maintaining its aggregates.
#[derive(Clone, Default, Debug)]
pub(crate) struct BlockLayout {
    lines: SmallVec<[Line; 1]>,
    width: f32,
    valid: bool,
}

impl BlockLayout {
    pub(crate) fn is_valid(&self) -> bool {
        self.valid
    }

    pub(crate) fn set(&mut self, lines: SmallVec<[Line; 1]>) {
        self.width = lines.iter().map(|l| l.width).fold(0.0, f32::max);
        self.lines = lines;
        self.valid = true;
    }

    pub(crate) fn clear(&mut self) {
        self.lines.clear();
        self.width = 0.0;
        self.valid = true;
    }

    /// Number of cached lines. Zero for invisible blocks.
    pub(crate) fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Width of the widest cached line.
    pub(crate) fn width(&self) -> f32 {
        self.width
    }

    /// Total height of the cached lines.
    pub(crate) fn height(&self) -> f32 {
        self.lines.iter().map(|l| l.height).sum()
    }

    pub(crate) fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    /// Returns the index of the line containing a code point offset.
    ///
    /// An offset on a wrap boundary belongs to the later line; the block
    /// end offset belongs to the last line.
    pub(crate) fn line_for_offset(&self, offset: usize) -> Option<usize> {
        if self.lines.is_empty() {
            return None;
        }
        let last = self.lines.len() - 1;
        if offset >= self.lines[last].start {
            return Some(last);
        }
        self.lines
            .binary_search_by(|line| {
                if offset < line.start {
                    Ordering::Greater
                } else if offset >= line.end() {
                    Ordering::Less
                } else {
                    Ordering::Equal
                }
            })
            .ok()
    }
}
