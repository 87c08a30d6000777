//! Directory rename fallback.
//!
//! Projects that renamed a directory (`tipos/` -> `types/`) leave imports
//! that name the old segment. Renames are applied to whole path segments
//! only, in configured order.

use serde::{Deserialize, Serialize};

/// One renamed path segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rename {
    pub from: String,
    pub to: String,
}

impl Rename {
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Apply `renames` to the segments of `specifier`.
///
/// Returns `None` when nothing changed.
#[must_use]
pub fn apply_renames(specifier: &str, renames: &[Rename]) -> Option<String> {
    let mut segments: Vec<&str> = specifier.split('/').collect();
    let mut changed = false;

    for rename in renames {
        if rename.from.is_empty() || rename.from == rename.to {
            continue;
        }
        for segment in &mut segments {
            if *segment == rename.from {
                *segment = rename.to.as_str();
                changed = true;
            }
        }
    }

    changed.then(|| segments.join("/"))
}
