// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Grammar productions, one module per node family.
//!
//! All of them extend [`Parser`](crate::Parser); the split is by what is
//! being parsed, not by who calls it.

mod decl;
mod expr;
mod stmt;
mod types;
mod ui;
