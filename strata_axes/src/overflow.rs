// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Group-label overflow resolution.
//!
//! A group label gets a pixel slot spanning its clamped leaf range. When the
//! text is wider than the slot it is wrapped, rotated, or truncated according
//! to the level's [`OverflowMode`]. Measurements are cached in a side table
//! keyed by element id, owned here rather than stashed on host objects, so a
//! recomputation at an unchanged slot size can never flip a decision.

extern crate alloc;

use hashbrown::HashMap;
use strata_host::{AxisHost, ElementId};

use crate::options::OverflowMode;

/// Extra width granted to rotated labels so the last word doesn't re-wrap.
const ROTATED_WIDTH_ALLOWANCE: f64 = 10.0;

/// Cached measurements for one label element.
#[derive(Clone, Copy, Debug, Default)]
struct LabelMeasure {
    /// Unconstrained single-layout width; measured once.
    full_width: Option<f64>,
    /// `(width, height)` measured at the first constrained layout.
    wrapped: Option<(f64, f64)>,
    rotated: bool,
}

/// Measurement side table for label elements.
///
/// Cleared wholesale on category teardown; per-entry values are never
/// recomputed while the element lives, which keeps overflow resolution
/// idempotent across repeated layout passes.
#[derive(Clone, Debug, Default)]
pub(crate) struct MeasureCache {
    labels: HashMap<ElementId, LabelMeasure>,
    reserved_text: HashMap<ElementId, f64>,
}

impl MeasureCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn clear(&mut self) {
        self.labels.clear();
        self.reserved_text.clear();
    }

    /// Records a leaf label's measured text width and returns the reserved
    /// width, the maximum seen for that element.
    ///
    /// Re-measurement after a text change must not shrink the reserved width,
    /// otherwise labels oscillate between wrapped and unwrapped layouts.
    pub(crate) fn note_text_width(&mut self, el: ElementId, width: f64) -> f64 {
        let entry = self.reserved_text.entry(el).or_insert(width);
        if width > *entry {
            *entry = width;
        }
        *entry
    }

    fn full_width(&mut self, host: &mut dyn AxisHost, el: ElementId) -> f64 {
        let entry = self.labels.entry(el).or_default();
        if let Some(w) = entry.full_width {
            return w;
        }
        host.set_label_width_limit(el, None);
        let w = host.label_bounds(el).width;
        self.labels.entry(el).or_default().full_width = Some(w);
        w
    }

    fn wrapped(&mut self, host: &mut dyn AxisHost, el: ElementId, max_width: f64) -> (f64, f64) {
        let entry = self.labels.entry(el).or_default();
        if let Some(wh) = entry.wrapped {
            return wh;
        }
        host.set_label_width_limit(el, Some(max_width));
        let bounds = host.label_bounds(el);
        let wh = (bounds.width, bounds.height);
        self.labels.entry(el).or_default().wrapped = Some(wh);
        wh
    }

    fn set_rotated(&mut self, el: ElementId, rotated: bool) {
        self.labels.entry(el).or_default().rotated = rotated;
    }
}

/// The outcome of overflow resolution, applied to the host element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OverflowDecision {
    /// No width constraint; label fits (or the policy never wraps).
    Unconstrained,
    /// Width limited to the slot, optionally with ellipsis truncation.
    Constrained {
        /// Whether ellipsis truncation is enabled.
        ellipsis: bool,
    },
    /// Rotated 90° out of the slot.
    Rotated,
}

/// Fits a group label into `max_slot` pixels according to `mode`.
///
/// Decisions are a pure function of the cached measurements, the slot size,
/// and the mode, so recomputing for an unchanged slot yields the same
/// rotation/wrap decision.
pub(crate) fn resolve(
    host: &mut dyn AxisHost,
    cache: &mut MeasureCache,
    el: ElementId,
    max_slot: f64,
    mode: OverflowMode,
) -> OverflowDecision {
    let full = cache.full_width(host, el);
    let decision = match mode {
        OverflowMode::Auto => {
            let (wrapped_w, _wrapped_h) = cache.wrapped(host, el, max_slot);
            if full > max_slot && wrapped_w > max_slot {
                OverflowDecision::Rotated
            } else {
                OverflowDecision::Constrained {
                    ellipsis: wrapped_w > max_slot,
                }
            }
        }
        OverflowMode::Rotate => {
            if full > max_slot {
                OverflowDecision::Rotated
            } else {
                OverflowDecision::Unconstrained
            }
        }
        OverflowMode::Ellipsis => OverflowDecision::Constrained { ellipsis: true },
    };

    match decision {
        OverflowDecision::Rotated => {
            host.rotate_label(el, -90.0);
            // Undo any wrapping applied before the rotation.
            host.set_label_width_limit(el, Some(full + ROTATED_WIDTH_ALLOWANCE));
            host.set_label_ellipsis(el, false);
            cache.set_rotated(el, true);
        }
        OverflowDecision::Constrained { ellipsis } => {
            host.rotate_label(el, 0.0);
            host.set_label_width_limit(el, Some(max_slot));
            host.set_label_ellipsis(el, ellipsis);
            cache.set_rotated(el, false);
        }
        OverflowDecision::Unconstrained => {
            host.rotate_label(el, 0.0);
            host.set_label_width_limit(el, None);
            host.set_label_ellipsis(el, false);
            cache.set_rotated(el, false);
        }
    }
    decision
}
