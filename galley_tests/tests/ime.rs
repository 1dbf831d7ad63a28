// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! IME composition tests.

use galley::{Cursor, EditPolicy, ImeEvent, PreeditSpan};

use crate::util::editor;

fn preedit(text: &str) -> ImeEvent {
    ImeEvent {
        preedit: text.into(),
        cursor: Some((text.chars().count(), 1)),
        ..ImeEvent::default()
    }
}

fn commit(text: &str) -> ImeEvent {
    ImeEvent {
        commit: text.into(),
        ..ImeEvent::default()
    }
}

#[test]
fn preedit_then_commit_adds_exactly_the_committed_text() {
    let mut editor = editor("ab");
    editor.set_cursor(Cursor::at(1));

    assert!(editor.ime_event(&preedit("ni"), 0.0));
    assert!(editor.is_composing());
    // The preedit is an overlay; the document is untouched.
    assert_eq!(editor.text(), "ab");
    assert_eq!(editor.document().len(), 2);

    assert!(editor.ime_event(&commit("n"), 50.0));
    assert!(!editor.is_composing());
    assert!(editor.composition().is_none());
    assert_eq!(editor.text(), "anb");
    // The cursor advanced by exactly the committed length.
    assert_eq!(editor.cursor().position(), 2);
}

#[test]
fn empty_commit_without_attributes_is_not_consumed() {
    let mut editor = editor("ab");
    assert!(!editor.ime_event(&ImeEvent::default(), 0.0));
}

#[test]
fn empty_event_while_composing_ends_composition() {
    let mut editor = editor("ab");
    editor.ime_event(&preedit("x"), 0.0);
    assert!(editor.is_composing());
    assert!(editor.ime_event(&ImeEvent::default(), 50.0));
    assert!(!editor.is_composing());
    assert_eq!(editor.text(), "ab");
}

#[test]
fn commit_replaces_the_selection() {
    let mut editor = editor("abc");
    editor.set_cursor(Cursor::between(0, 2));
    editor.ime_event(&commit("X"), 0.0);
    assert_eq!(editor.text(), "Xc");
    assert_eq!(editor.cursor().position(), 1);
}

#[test]
fn composition_is_bound_to_the_cursor_block() {
    let mut editor = editor("abc\ndef");
    editor.set_cursor(Cursor::at(6));
    editor.ime_event(&preedit("zz"), 0.0);
    assert_eq!(editor.composition().unwrap().block, 1);
}

#[test]
fn zero_length_embedded_cursor_hides_the_cursor() {
    let mut editor = editor("ab");
    let ev = ImeEvent {
        preedit: "x".into(),
        cursor: Some((0, 0)),
        ..ImeEvent::default()
    };
    editor.ime_event(&ev, 0.0);
    let compose = editor.composition().unwrap();
    assert!(compose.hide_cursor);
    assert!(!editor.cursor_visible());
}

#[test]
fn preedit_spans_are_carried_in_the_buffer() {
    let mut editor = editor("ab");
    let ev = ImeEvent {
        preedit: "nihao".into(),
        cursor: Some((5, 1)),
        spans: vec![PreeditSpan {
            range: 0..2,
            underline: true,
            highlight: false,
        }],
        ..ImeEvent::default()
    };
    editor.ime_event(&ev, 0.0);
    let compose = editor.composition().unwrap();
    assert_eq!(compose.text, "nihao");
    assert_eq!(compose.cursor, Some(5));
    assert_eq!(compose.spans.len(), 1);
    assert!(compose.spans[0].underline);
}

#[test]
fn read_only_ignores_composition() {
    let mut editor = editor("ab");
    editor.set_policy(EditPolicy {
        read_only: true,
        ..EditPolicy::default()
    });
    assert!(!editor.ime_event(&preedit("x"), 0.0));
    assert!(!editor.is_composing());
}

#[test]
fn focus_out_cancels_composition() {
    let mut editor = editor("ab");
    editor.focus_in();
    editor.ime_event(&preedit("x"), 0.0);
    editor.focus_out();
    assert!(!editor.is_composing());
    assert_eq!(editor.text(), "ab");
}

#[test]
fn keys_are_unconsumed_while_composing() {
    let mut editor = editor("ab");
    editor.ime_event(&preedit("x"), 0.0);
    assert!(!editor.key_down(galley::Key::Char('q'), galley::Modifiers::default(), 50.0));
    assert_eq!(editor.text(), "ab");
}
