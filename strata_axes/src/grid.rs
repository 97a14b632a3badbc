// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Separator grid-line accumulation.
//!
//! The engine draws all grouped-axis grid lines itself (the host's native
//! tick marks are suppressed while grouped). Lines are accumulated into one
//! `BezPath` per render pass and handed to the host in a single draw call.

extern crate alloc;

use hashbrown::HashSet;
use kurbo::BezPath;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::category::CategoryId;

/// Per-render-pass grid state: the accumulated path plus the set of groups
/// whose separator has already been emitted.
///
/// Recreated at the start of every render pass, never reused across passes.
#[derive(Clone, Debug, Default)]
pub(crate) struct GridPass {
    pub(crate) path: BezPath,
    visited: HashSet<CategoryId>,
}

impl GridPass {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends a crisp-aligned line segment `[x0, y0, x1, y1]`.
    ///
    /// Axis-parallel segments are rounded to whole device pixels, with a
    /// half-pixel nudge for odd stroke widths, so a thin line renders sharply
    /// instead of anti-aliased across two pixels.
    pub(crate) fn add_part(&mut self, seg: [f64; 4], stroke_width: f64) {
        add_grid_part(&mut self.path, seg, stroke_width);
    }

    /// Marks a group's separator as emitted; returns `false` if it already
    /// was this pass. Many leaf ticks share an ancestor, but each ancestor
    /// gets exactly one separator line per pass.
    pub(crate) fn first_visit(&mut self, id: CategoryId) -> bool {
        self.visited.insert(id)
    }
}

fn add_grid_part(path: &mut BezPath, mut seg: [f64; 4], stroke_width: f64) {
    let nudge = (stroke_width % 2.0) / 2.0;
    if seg[0] == seg[2] {
        let x = seg[0].round() - nudge;
        seg[0] = x;
        seg[2] = x;
    }
    if seg[1] == seg[3] {
        let y = seg[1].round() + nudge;
        seg[1] = y;
        seg[3] = y;
    }
    path.move_to((seg[0], seg[1]));
    path.line_to((seg[2], seg[3]));
}
