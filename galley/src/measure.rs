// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The measurement boundary.
//!
//! Font metrics belong to the platform rendering surface, not to this crate.
//! The layout engine only ever asks two questions: how wide is a code point,
//! and how tall is a line. Hosts answer them by implementing [`TextMeasure`].

/// Source of text metrics for layout.
///
/// Implementations are expected to be cheap to query; the layout engine calls
/// [`advance`](Self::advance) once per code point of every block it lays out.
pub trait TextMeasure {
    /// Returns the horizontal advance of a single code point.
    fn advance(&self, ch: char) -> f32;

    /// Returns the uniform height of a laid out line.
    fn line_height(&self) -> f32;

    /// Returns the total advance of a string.
    fn text_advance(&self, text: &str) -> f32 {
        text.chars().map(|ch| self.advance(ch)).sum()
    }
}

/// Fixed-advance metrics.
///
/// Suitable for monospace hosts and for tests that should not depend on a
/// platform font stack.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FixedMeasure {
    /// Advance applied to every code point.
    pub advance: f32,
    /// Height of every line.
    pub line_height: f32,
}

impl Default for FixedMeasure {
    fn default() -> Self {
        Self {
            advance: 8.0,
            line_height: 16.0,
        }
    }
}

impl TextMeasure for FixedMeasure {
    fn advance(&self, _ch: char) -> f32 {
        self.advance
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }
}
