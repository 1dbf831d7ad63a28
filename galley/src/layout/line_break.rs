// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Greedy line breaking over code point advances.

use smallvec::SmallVec;
use unicode_linebreak::{linebreaks, BreakOpportunity};

use crate::layout::{Line, WrapMode};
use crate::measure::TextMeasure;

/// Accumulated state for the line currently being built.
#[derive(Clone, Default)]
struct LineState {
    start: usize,
    len: usize,
    width: f32,
}

/// Snapshot of the breaker at the most recent break opportunity, kept so
/// the opportunity can be taken retroactively once the line overflows.
#[derive(Clone)]
struct PrevBoundaryState {
    char_index: usize,
    line: LineState,
}

/// Breaks a block's text into lines.
///
/// `max_advance` is the available width; pass `f32::MAX` for unconstrained
/// layout. The result always contains at least one line, so an empty block
/// still occupies vertical space.
pub(crate) fn break_block<M: TextMeasure>(
    text: &str,
    wrap: WrapMode,
    max_advance: f32,
    measure: &M,
) -> SmallVec<[Line; 1]> {
    let line_height = measure.line_height();
    let mut lines: SmallVec<[Line; 1]> = SmallVec::new();
    let mut state = LineState::default();
    let mut prev_boundary: Option<PrevBoundaryState> = None;

    // Byte offsets of UAX-14 break opportunities, consumed in order.
    let mut opportunities = match wrap {
        WrapMode::Word => linebreaks(text)
            .filter(|(_, kind)| *kind == BreakOpportunity::Allowed)
            .map(|(offset, _)| offset)
            .collect::<Vec<_>>(),
        _ => Vec::new(),
    };
    opportunities.reverse();

    let mut commit = |lines: &mut SmallVec<[Line; 1]>, state: &LineState| {
        lines.push(Line {
            start: state.start,
            len: state.len,
            width: state.width,
            height: line_height,
            y: lines.len() as f32 * line_height,
        });
    };

    let mut char_index = 0;
    for (byte_index, ch) in text.char_indices() {
        if wrap == WrapMode::Word {
            while opportunities.last() == Some(&byte_index) {
                opportunities.pop();
                if state.len > 0 {
                    prev_boundary = Some(PrevBoundaryState {
                        char_index,
                        line: state.clone(),
                    });
                }
            }
        }

        let advance = measure.advance(ch);
        // Trailing whitespace hangs past the margin rather than wrapping.
        let overflows = wrap != WrapMode::None
            && state.len > 0
            && !ch.is_whitespace()
            && state.width + advance > max_advance;
        if overflows {
            match (wrap, prev_boundary.take()) {
                (WrapMode::Word, Some(boundary)) => {
                    // Revert to the last break opportunity and restart the
                    // line from there.
                    commit(&mut lines, &boundary.line);
                    let resumed = boundary.char_index;
                    state = LineState {
                        start: resumed,
                        len: char_index - resumed,
                        width: text
                            .chars()
                            .skip(resumed)
                            .take(char_index - resumed)
                            .map(|c| measure.advance(c))
                            .sum(),
                    };
                }
                _ => {
                    // No opportunity in this line (or breaking anywhere):
                    // break right before the overflowing code point.
                    commit(&mut lines, &state);
                    state = LineState {
                        start: char_index,
                        len: 0,
                        width: 0.0,
                    };
                }
            }
        }

        state.len += 1;
        state.width += advance;
        char_index += 1;
    }

    commit(&mut lines, &state);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::FixedMeasure;

    fn measure() -> FixedMeasure {
        FixedMeasure {
            advance: 10.0,
            line_height: 16.0,
        }
    }

    fn starts(lines: &[Line]) -> Vec<usize> {
        lines.iter().map(|l| l.start).collect()
    }

    #[test]
    fn empty_text_is_one_line() {
        let lines = break_block("", WrapMode::Word, 100.0, &measure());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len, 0);
        assert_eq!(lines[0].width, 0.0);
    }

    #[test]
    fn no_wrap_is_one_line() {
        let lines = break_block("hello world wide", WrapMode::None, 50.0, &measure());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len, 16);
    }

    #[test]
    fn word_wrap_breaks_at_spaces() {
        // 8 columns: "hello " fits, "world" goes to the next line.
        let lines = break_block("hello world", WrapMode::Word, 80.0, &measure());
        assert_eq!(starts(&lines), vec![0, 6]);
        assert_eq!(lines[1].len, 5);
    }

    #[test]
    fn word_wrap_falls_back_inside_long_words() {
        let lines = break_block("abcdefghij", WrapMode::Word, 40.0, &measure());
        assert_eq!(starts(&lines), vec![0, 4, 8]);
    }

    #[test]
    fn anywhere_breaks_at_any_boundary() {
        let lines = break_block("abcdef", WrapMode::Anywhere, 20.0, &measure());
        assert_eq!(starts(&lines), vec![0, 2, 4]);
        assert_eq!(lines[2].width, 20.0);
    }

    #[test]
    fn line_vertical_offsets_accumulate() {
        let lines = break_block("aaa bbb ccc", WrapMode::Word, 40.0, &measure());
        for (index, line) in lines.iter().enumerate() {
            assert_eq!(line.y, index as f32 * 16.0);
        }
    }
}
