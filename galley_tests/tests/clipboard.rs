// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clipboard boundary tests: copy/cut snapshots and paste resolution.

use galley::{Cursor, EditPolicy, EditorEvent, Fragment, Marker, PastePayload};

use crate::util::editor;

#[test]
fn copy_publishes_a_multi_encoding_snapshot() {
    let mut editor = editor("abc\ndef");
    editor.set_cursor(Cursor::between(1, 6));
    editor.drain_events();
    assert!(editor.copy_selection());
    let events = editor.drain_events();
    let content = events
        .iter()
        .find_map(|e| match e {
            EditorEvent::ClipboardSet(content) => Some(content.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(content.plain(), "bc\nde");
    assert_eq!(content.fragments().len(), 2);
    assert_eq!(content.to_html(), "<p>bc</p>\n<p>de</p>\n");
}

#[test]
fn copy_without_selection_does_nothing() {
    let mut editor = editor("abc");
    assert!(!editor.copy_selection());
}

#[test]
fn cut_removes_the_selection() {
    let mut editor = editor("abcdef");
    editor.set_cursor(Cursor::between(1, 4));
    assert!(editor.cut_selection(0.0));
    assert_eq!(editor.text(), "aef");
}

#[test]
fn snapshot_carries_block_markers() {
    let mut editor = editor("milk\neggs");
    editor.set_block_marker(0, Marker::Unchecked);
    editor.set_block_marker(1, Marker::Checked);
    editor.select_all();
    let content = editor.selection_content().unwrap();
    assert_eq!(content.fragments()[0].marker, Marker::Unchecked);
    assert_eq!(content.fragments()[1].marker, Marker::Checked);
    assert_eq!(content.to_markdown(), "- [ ] milk\n- [x] eggs");
}

#[test]
fn paste_plain_text_splits_blocks() {
    let mut editor = editor("ab");
    editor.set_cursor(Cursor::at(1));
    assert!(editor.paste(&PastePayload::plain("x\ny"), 0.0));
    assert_eq!(editor.text(), "ax\nyb");
    assert_eq!(editor.document().block_count(), 2);
}

#[test]
fn paste_replaces_the_selection() {
    let mut editor = editor("abcdef");
    editor.set_cursor(Cursor::between(1, 4));
    assert!(editor.paste(&PastePayload::plain("Z"), 0.0));
    assert_eq!(editor.text(), "aZef");
}

#[test]
fn paste_prefers_structured_over_plain() {
    let mut editor = editor("");
    let payload = PastePayload {
        fragments: Some(vec![
            Fragment {
                text: "task".into(),
                marker: Marker::Checked,
            },
            Fragment::plain("note"),
        ]),
        plain: Some("ignored".into()),
        ..PastePayload::default()
    };
    assert!(editor.paste(&payload, 0.0));
    assert_eq!(editor.text(), "task\nnote");
    assert_eq!(editor.document().block(0).unwrap().marker(), Marker::Checked);
}

#[test]
fn paste_markdown_restores_markers() {
    let mut editor = editor("");
    let payload = PastePayload {
        markdown: Some("- [x] done\n- [ ] todo".into()),
        ..PastePayload::default()
    };
    assert!(editor.paste(&payload, 0.0));
    assert_eq!(editor.text(), "done\ntodo");
    assert_eq!(editor.document().block(0).unwrap().marker(), Marker::Checked);
    assert_eq!(
        editor.document().block(1).unwrap().marker(),
        Marker::Unchecked
    );
}

#[test]
fn paste_without_rich_acceptance_degrades_to_plain() {
    let mut editor = editor("");
    editor.set_policy(EditPolicy {
        accept_rich_text: false,
        ..EditPolicy::default()
    });
    let payload = PastePayload {
        fragments: Some(vec![Fragment {
            text: "task".into(),
            marker: Marker::Checked,
        }]),
        ..PastePayload::default()
    };
    assert!(editor.paste(&payload, 0.0));
    assert_eq!(editor.text(), "task");
    assert_eq!(editor.document().block(0).unwrap().marker(), Marker::None);
}

#[test]
fn paste_html_strips_markup() {
    let mut editor = editor("");
    let payload = PastePayload {
        html: Some("<p>a &amp; b</p><p>c</p>".into()),
        ..PastePayload::default()
    };
    assert!(editor.paste(&payload, 0.0));
    assert_eq!(editor.text(), "a & b\nc");
}

#[test]
fn empty_payload_is_rejected() {
    let mut editor = editor("abc");
    assert!(!editor.paste(&PastePayload::default(), 0.0));
    assert_eq!(editor.text(), "abc");
}
