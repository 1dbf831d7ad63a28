// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cursor and selection handling.

mod cursor;
mod selection;

pub use cursor::Cursor;
pub use selection::Motion;

pub(crate) use selection::{AnchorBase, SelectState};
