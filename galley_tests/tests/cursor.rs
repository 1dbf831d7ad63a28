// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cursor positioning and motion tests.

use galley::{Cursor, Motion};

use crate::util::editor;

#[test]
fn set_position_round_trips_over_every_offset() {
    let mut editor = editor("abc\ndefg\nhi");
    let len = editor.document().len();
    assert_eq!(len, 11);
    for p in 0..=len {
        editor.set_cursor(Cursor::at(p));
        assert_eq!(editor.cursor().position(), p);
    }
}

#[test]
fn out_of_range_cursor_clamps() {
    let mut editor = editor("abc");
    editor.set_cursor(Cursor::at(99));
    assert_eq!(editor.cursor().position(), 3);
}

#[test]
fn char_left_then_right_returns_to_origin() {
    let mut editor = editor("abc\ndefg\nhi");
    editor.set_cursor(Cursor::at(5));
    editor.move_position(Motion::CharLeft, false);
    assert_eq!(editor.cursor().position(), 4);
    editor.move_position(Motion::CharRight, false);
    assert_eq!(editor.cursor().position(), 5);
}

#[test]
fn char_motion_crosses_separators() {
    let mut editor = editor("ab\ncd");
    editor.set_cursor(Cursor::at(2));
    editor.move_position(Motion::CharRight, false);
    assert_eq!(editor.cursor().position(), 3);
    assert_eq!(editor.document().locate(3).block, 1);
}

#[test]
fn down_down_end_of_line_reaches_document_end() {
    // Blocks "abc", "defg", "hi"; the final offset is the sum of the block
    // lengths plus two separators.
    let mut editor = editor("abc\ndefg\nhi");
    editor.set_cursor(Cursor::at(0));
    editor.move_position(Motion::Down, false);
    editor.move_position(Motion::Down, false);
    editor.move_position(Motion::LineEnd, false);
    assert_eq!(editor.cursor().position(), 11);
}

#[test]
fn vertical_motion_preserves_horizontal_position() {
    let mut editor = editor("abcdef\nab\nabcdef");
    editor.set_cursor(Cursor::at(4));
    editor.move_position(Motion::Down, false);
    // The short middle line clamps to its end.
    assert_eq!(editor.cursor().position(), 9);
    editor.move_position(Motion::Down, false);
    // The remembered horizontal position carries through to the long line.
    assert_eq!(editor.cursor().position(), 14);
}

#[test]
fn up_from_first_line_degrades_to_document_start() {
    let mut editor = editor("abc");
    editor.set_cursor(Cursor::at(2));
    editor.move_position(Motion::Up, false);
    assert_eq!(editor.cursor().position(), 0);
}

#[test]
fn down_from_last_line_degrades_to_document_end() {
    let mut editor = editor("abc");
    editor.set_cursor(Cursor::at(1));
    editor.move_position(Motion::Down, false);
    assert_eq!(editor.cursor().position(), 3);
}

#[test]
fn word_motion_stops_at_word_starts() {
    let mut editor = editor("hello world foo");
    editor.set_cursor(Cursor::at(0));
    editor.move_position(Motion::WordRight, false);
    assert_eq!(editor.cursor().position(), 6);
    editor.move_position(Motion::WordRight, false);
    assert_eq!(editor.cursor().position(), 12);
    editor.move_position(Motion::WordLeft, false);
    assert_eq!(editor.cursor().position(), 6);
}

#[test]
fn word_motion_crosses_blocks() {
    let mut editor = editor("ab\ncd");
    editor.set_cursor(Cursor::at(2));
    editor.move_position(Motion::WordRight, false);
    assert_eq!(editor.cursor().position(), 3);
    editor.move_position(Motion::WordLeft, false);
    assert_eq!(editor.cursor().position(), 0);
}

#[test]
fn block_motion_targets_block_bounds() {
    let mut editor = editor("abc\ndefg");
    editor.set_cursor(Cursor::at(6));
    editor.move_position(Motion::BlockStart, false);
    assert_eq!(editor.cursor().position(), 4);
    editor.move_position(Motion::BlockEnd, false);
    assert_eq!(editor.cursor().position(), 8);
}

#[test]
fn keep_anchor_extends_and_move_anchor_collapses() {
    let mut editor = editor("abcdef");
    editor.set_cursor(Cursor::at(1));
    editor.move_position(Motion::CharRight, true);
    editor.move_position(Motion::CharRight, true);
    assert_eq!(editor.cursor().selection_range(), 1..3);
    editor.move_position(Motion::CharRight, false);
    assert!(editor.cursor().is_collapsed());
}
