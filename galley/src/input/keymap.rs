// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The fixed, platform-neutral key chord table.

use crate::editing::Motion;

/// Modifier keys held during an input event.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub struct Modifiers {
    /// Shift: navigation chords extend the selection.
    pub shift: bool,
    /// Control (or the platform command key).
    pub ctrl: bool,
}

/// A platform-neutral key.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Backspace,
    Delete,
    Enter,
    /// A printable character, already translated by the platform.
    Char(char),
}

/// An editor operation resolved from a key chord.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum Command {
    Move(Motion),
    /// Page move; `true` is down.
    Page(bool),
    SelectAll,
    Copy,
    Cut,
    Paste,
    Undo,
    Redo,
    DeleteBackward,
    DeleteForward,
    InsertNewline,
    Insert(char),
}

impl Command {
    /// Whether the command is permitted in read-only mode.
    pub(crate) fn allowed_read_only(self) -> bool {
        matches!(
            self,
            Self::Move(_) | Self::Page(_) | Self::SelectAll | Self::Copy
        )
    }
}

/// Resolves a chord to a command and its extend-selection flag.
///
/// Unknown chords resolve to `None` and are left unconsumed.
pub(crate) fn command_for(key: Key, mods: Modifiers) -> Option<(Command, bool)> {
    let extend = mods.shift;
    let command = match key {
        Key::Left if mods.ctrl => Command::Move(Motion::WordLeft),
        Key::Left => Command::Move(Motion::CharLeft),
        Key::Right if mods.ctrl => Command::Move(Motion::WordRight),
        Key::Right => Command::Move(Motion::CharRight),
        Key::Up => Command::Move(Motion::Up),
        Key::Down => Command::Move(Motion::Down),
        Key::Home if mods.ctrl => Command::Move(Motion::DocumentStart),
        Key::Home => Command::Move(Motion::LineStart),
        Key::End if mods.ctrl => Command::Move(Motion::DocumentEnd),
        Key::End => Command::Move(Motion::LineEnd),
        Key::PageUp => Command::Page(false),
        Key::PageDown => Command::Page(true),
        Key::Backspace => Command::DeleteBackward,
        Key::Delete => Command::DeleteForward,
        Key::Enter => Command::InsertNewline,
        Key::Char(c) if mods.ctrl => match c.to_ascii_lowercase() {
            'a' => Command::SelectAll,
            'c' => Command::Copy,
            'x' => Command::Cut,
            'v' => Command::Paste,
            'z' => Command::Undo,
            'y' => Command::Redo,
            _ => return None,
        },
        Key::Char(c) if !c.is_control() => Command::Insert(c),
        Key::Char(_) => return None,
    };
    Some((command, extend))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_motion_needs_ctrl() {
        let plain = command_for(Key::Left, Modifiers::default());
        assert_eq!(plain, Some((Command::Move(Motion::CharLeft), false)));
        let ctrl = command_for(
            Key::Left,
            Modifiers {
                ctrl: true,
                shift: false,
            },
        );
        assert_eq!(ctrl, Some((Command::Move(Motion::WordLeft), false)));
    }

    #[test]
    fn shift_marks_extension() {
        let (_, extend) = command_for(
            Key::End,
            Modifiers {
                shift: true,
                ctrl: false,
            },
        )
        .unwrap();
        assert!(extend);
    }

    #[test]
    fn unknown_ctrl_chords_are_unconsumed() {
        assert!(command_for(
            Key::Char('q'),
            Modifiers {
                ctrl: true,
                shift: false
            }
        )
        .is_none());
    }

    #[test]
    fn control_characters_do_not_insert() {
        assert!(command_for(Key::Char('\u{7}'), Modifiers::default()).is_none());
    }
}
