// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-level size accounting for stacked group labels.
//!
//! Each hierarchy level reserves a pixel thickness along the axis normal.
//! Thicknesses grow monotonically within a categories cycle as labels are
//! measured, and the cumulative sums position each level's centerline.

extern crate alloc;

use smallvec::SmallVec;

use crate::category::{CategoryId, CategoryTree};

/// Fixed padding added around a group label when reserving level thickness.
const LEVEL_PADDING: f64 = 15.0;

/// Pixel thickness reserved for each hierarchy level's labels.
///
/// Level 0 is the leaf label row; level `n` is the ancestor row `n` steps up.
/// Stored sizes are unsigned; [`LevelLayout::size`] applies the axis's
/// outward direction factor.
#[derive(Clone, Debug)]
pub(crate) struct LevelLayout {
    sizes: SmallVec<[f64; 4]>,
    font_heights: SmallVec<[f64; 4]>,
    direction: f64,
}

impl LevelLayout {
    pub(crate) fn new(direction: f64, font_heights: SmallVec<[f64; 4]>) -> Self {
        Self {
            sizes: SmallVec::new(),
            font_heights,
            direction,
        }
    }

    fn slot(&mut self, level: usize) -> &mut f64 {
        if self.sizes.len() <= level {
            self.sizes.resize(level + 1, 0.0);
        }
        &mut self.sizes[level]
    }

    /// Folds a measured label extent into a level's running thickness.
    ///
    /// The reserved size is `extent` plus fixed padding plus the magnitude of
    /// the level's user offset, folded with max semantics so a level only
    /// ever grows within a cycle.
    pub(crate) fn record(&mut self, level: usize, extent: f64, user_offset: f64) {
        let reserved = extent + LEVEL_PADDING + user_offset.abs();
        let slot = self.slot(level);
        if reserved > *slot {
            *slot = reserved;
        }
    }

    /// Folds the host's default leaf-label thickness into level 0.
    pub(crate) fn record_leaf_thickness(&mut self, size: f64) {
        let slot = self.slot(0);
        if size > *slot {
            *slot = size;
        }
    }

    /// Signed thickness of one level (0 when the level is unknown).
    pub(crate) fn size(&self, level: usize) -> f64 {
        self.sizes.get(level).copied().unwrap_or(0.0) * self.direction
    }

    /// Signed total thickness across all levels.
    pub(crate) fn stacked(&self) -> f64 {
        self.total() * self.direction
    }

    /// Unsigned total thickness (the axis-space the labels need).
    pub(crate) fn total(&self) -> f64 {
        self.sizes.iter().sum()
    }

    /// Baseline alignment height for a level's font.
    pub(crate) fn font_height(&self, level: usize) -> f64 {
        self.font_heights.get(level).copied().unwrap_or(0.0)
    }
}

/// Start-boundary correction for the first visible tick.
///
/// When the axis's first visible leaf sits mid-group (its group only
/// partially overlaps the visible range), the group's span start must be
/// pulled back by the leaf's position within its immediate parent's child
/// list, otherwise the clamped span extends past the group's real end.
pub(crate) fn first_tick_fix_offset(
    tree: &CategoryTree,
    leaf: CategoryId,
    is_first: bool,
) -> usize {
    if !is_first {
        return 0;
    }
    tree.child_index(leaf).unwrap_or(0)
}
