// Copyright 2025 the Galley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integration tests for Galley.

mod util;

mod clipboard;
mod cursor;
mod ime;
mod layout;
