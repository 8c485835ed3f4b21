// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Observable collections backing list- and map-valued properties.
//!
//! Every mutating operation follows the same state machine:
//! validate, mutate, notify, mark-modified. A rejected validation leaves
//! the collection completely unchanged: no partial mutation, no
//! notification, no modified-flag change.
//!
//! The *modified* flag starts `false`, becomes `true` on the first
//! accepted structural change and can be reset explicitly. It tells the
//! configuration-merge layer "explicitly set" apart from
//! "default/inherited" and is never part of equality.
//!
//! Collections are single-writer; they provide no synchronization beyond
//! the shared handler used for notification fan-out.

mod list;
mod map;

pub use list::ObservableList;
pub use map::ObservableMap;
