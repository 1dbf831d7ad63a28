// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Block-structured plain text editing.
//!
//! Galley is an embeddable editing engine: a paragraph document, an
//! incremental line-granular layout engine built to scale to very large
//! documents, a position/anchor cursor with word- and block-granular
//! selection extension, a viewport controller, and an input state machine
//! covering keyboard, mouse, drag-and-drop and IME composition.
//!
//! The crate has no rendering, font, clipboard or timer machinery of its
//! own. Hosts supply metrics through [`TextMeasure`], feed input events to
//! the [`Editor`] handlers, and drain [`EditorEvent`]s to drive their
//! rendering surface, scrollbar and system clipboard.

mod clipboard;
mod document;
mod editing;
mod editor;
mod event;
mod history;
mod input;
mod layout;
mod measure;
mod viewport;

pub use clipboard::{ClipboardContent, Fragment, PastePayload};
pub use document::{Block, Document, Edit, Location, Marker};
pub use editing::{Cursor, Motion};
pub use editor::{Editor, VisibleLine};
pub use event::{EditorEvent, Generation, ScrollInfo, TimerToken};
pub use input::{
    Composition, DropAction, EditPolicy, ImeEvent, Key, Modifiers, PointerEvent, PreeditSpan,
};
pub use layout::{DocumentSize, LayoutEngine, Line, WrapMode};
pub use measure::{FixedMeasure, TextMeasure};
