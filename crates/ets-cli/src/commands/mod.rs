// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! CLI command implementations.

pub mod check;
pub mod explain;
pub mod inspect;
pub mod validate;

use std::fs;
use std::path::Path;
use std::process;

use crate::output;

/// Read a source file or exit with an error.
pub(crate) fn read_source(path: &Path) -> String {
    match fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}: reading {}: {}", output::error_label(), output::file_path(&path.display().to_string()), e);
            process::exit(1);
        }
    }
}
