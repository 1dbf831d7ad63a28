// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout engine tests: wrapping, invalidation, and size tracking.

use galley::{Cursor, EditorEvent, WrapMode};
use kurbo::Rect;

use crate::util::{editor, editor_sized, ADVANCE, LINE};

#[test]
fn word_wrap_fills_the_available_width() {
    let editor = editor_sized("hello world", 8, 10);
    assert_eq!(editor.document_size().lines, 2);
}

#[test]
fn wrap_mode_none_keeps_one_line_per_block() {
    let mut editor = editor_sized("hello world", 8, 10);
    editor.set_wrap_mode(WrapMode::None);
    assert_eq!(editor.document_size().lines, 1);
}

#[test]
fn wrap_anywhere_breaks_inside_words() {
    let mut editor = editor_sized("abcdefghij", 4, 10);
    editor.set_wrap_mode(WrapMode::Anywhere);
    assert_eq!(editor.document_size().lines, 3);
}

#[test]
fn block_bounding_rect_is_idempotent() {
    let mut editor = editor("abc\ndefg");
    let first = editor.block_bounding_rect(1);
    let second = editor.block_bounding_rect(1);
    assert_eq!(first, second);
    assert_eq!(first.y0, LINE as f64);
    assert_eq!(first.width(), 4.0 * ADVANCE as f64);
    assert_eq!(first.height(), LINE as f64);
}

#[test]
fn block_bounding_rect_out_of_range_is_empty() {
    let mut editor = editor("abc");
    assert_eq!(editor.block_bounding_rect(7), Rect::ZERO);
}

#[test]
fn invisible_blocks_lay_out_to_zero_lines() {
    let mut editor = editor("a\nb\nc");
    assert_eq!(editor.document_size().lines, 3);
    editor.set_block_visible(1, false);
    assert_eq!(editor.document_size().lines, 2);
    assert_eq!(editor.block_bounding_rect(1).height(), 0.0);
    // The block below moves up.
    assert_eq!(editor.block_bounding_rect(2).y0, LINE as f64);
    // Offsets are unaffected by visibility.
    assert_eq!(editor.document().len(), 5);
}

#[test]
fn single_block_edit_relays_out_only_that_block() {
    let text = vec!["line"; 10_000].join("\n");
    let mut editor = editor(&text);
    assert_eq!(editor.document().block_count(), 10_000);
    editor.set_cursor(Cursor::at(editor.document().block_start(5_000)));
    let before = editor.relayouts();
    editor.insert_or_replace_selection("x", 0.0);
    assert_eq!(editor.relayouts() - before, 1);
}

#[test]
fn widest_block_rescan_after_shrink() {
    let mut editor = editor("aaaa\naa");
    assert_eq!(editor.document_size().width, 4.0 * ADVANCE);
    editor.set_cursor(Cursor::between(0, 2));
    editor.delete_selection(0.0);
    assert_eq!(editor.text(), "aa\naa");
    assert_eq!(editor.document_size().width, 2.0 * ADVANCE);
}

#[test]
fn growing_a_block_updates_the_widest_without_rescan() {
    let mut editor = editor("aa\nbb");
    editor.set_cursor(Cursor::at(2));
    editor.insert_or_replace_selection("aaa", 0.0);
    assert_eq!(editor.document_size().width, 5.0 * ADVANCE);
}

#[test]
fn splitting_a_block_updates_line_count() {
    let mut editor = editor("abcdef");
    editor.set_cursor(Cursor::at(3));
    editor.insert_or_replace_selection("\n", 0.0);
    assert_eq!(editor.document().block_count(), 2);
    assert_eq!(editor.document_size().lines, 2);
}

#[test]
fn events_keep_layout_before_size_before_repaint() {
    let mut editor = editor("ab");
    editor.set_cursor(Cursor::at(2));
    editor.insert_or_replace_selection("cdef", 0.0);
    let events = editor.drain_events();
    let layout = events
        .iter()
        .position(|e| matches!(e, EditorEvent::LayoutChanged { .. }));
    let size = events
        .iter()
        .position(|e| matches!(e, EditorEvent::DocumentSizeChanged(_)));
    let repaint = events
        .iter()
        .position(|e| matches!(e, EditorEvent::UpdateRequested(_)));
    let (layout, size, repaint) = (layout.unwrap(), size.unwrap(), repaint.unwrap());
    assert!(layout < size, "layout change must precede size change");
    assert!(size < repaint, "size change must precede repaint request");
}

#[test]
fn size_changed_is_not_emitted_when_size_is_stable() {
    let mut editor = editor("abcd\nxy");
    editor.drain_events();
    // Replacing a character in the narrow block keeps both aggregates.
    editor.set_cursor(Cursor::between(5, 6));
    editor.insert_or_replace_selection("z", 0.0);
    let events = editor.drain_events();
    assert!(
        !events
            .iter()
            .any(|e| matches!(e, EditorEvent::DocumentSizeChanged(_))),
        "stable size must not notify"
    );
}
