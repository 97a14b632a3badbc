// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host charting-library hooks for Strata grouped axes.
//!
//! Strata computes hierarchical axis layout; it never draws anything itself.
//! The host chart owns text/path primitives, bounding-box measurement, font
//! metrics, and the base single-level axis lifecycle. This crate is the seam
//! between the two: a small trait the host implements so the grouped-axis
//! engine can create label elements, measure them, and hand back grid paths.
//!
//! This crate is intentionally:
//! - small and dependency-light,
//! - `no_std`-friendly (it uses `alloc` for label text), and
//! - renderer-agnostic (an SVG renderer and a canvas renderer can both
//!   implement the same trait).

#![no_std]

extern crate alloc;

use alloc::string::String;

use kurbo::{BezPath, Point, Rect, Size};
use peniko::Brush;
use peniko::color::palette::css;

/// A stable identifier for a host-owned text element.
///
/// The engine never holds references into the host's display tree; all label
/// bookkeeping (measurement caches, group bindings) is keyed by this id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

/// Axis placement relative to the plot area.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AxisOrient {
    /// A horizontal axis placed above the plot area.
    Top,
    /// A horizontal axis placed below the plot area.
    Bottom,
    /// A vertical axis placed to the left of the plot area.
    Left,
    /// A vertical axis placed to the right of the plot area.
    Right,
}

impl AxisOrient {
    /// Returns `true` for top/bottom axes.
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }

    /// Sign of the outward direction along the axis normal.
    ///
    /// Group label levels stack away from the plot; this factor converts a
    /// positive level thickness into a signed cross-axis offset.
    #[must_use]
    pub fn direction_factor(self) -> f64 {
        match self {
            Self::Top | Self::Left => -1.0,
            Self::Bottom | Self::Right => 1.0,
        }
    }
}

/// Horizontal anchoring for label text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// Anchor at the start of the text.
    Start,
    /// Anchor at the middle of the text.
    #[default]
    Middle,
    /// Anchor at the end of the text.
    End,
}

/// Positional attributes for a label element.
///
/// These are geometry inputs, kept separate from [`LabelStyle`]: the host
/// consumes one as placement and the other as presentation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelAttrs {
    /// X offset from the computed position, in scene coordinates.
    pub x: f64,
    /// Y offset from the computed position, in scene coordinates.
    pub y: f64,
    /// Rotation angle in degrees.
    pub rotation: f64,
    /// Horizontal anchor.
    pub anchor: TextAnchor,
}

impl Default for LabelAttrs {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            anchor: TextAnchor::Middle,
        }
    }
}

/// Resolved presentation style for a label element.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelStyle {
    /// Font size in scene coordinates.
    pub font_size: f64,
    /// Fill paint.
    pub fill: Brush,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            font_size: 11.0,
            fill: Brush::Solid(css::BLACK),
        }
    }
}

/// Measured metrics for a single line of text at a given font size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    /// Distance from baseline to the top of typical glyphs.
    pub ascent: f64,
    /// Distance from baseline to the bottom of typical glyphs.
    pub descent: f64,
    /// Additional line spacing beyond ascent+descent.
    pub leading: f64,
}

impl TextMetrics {
    /// Returns `ascent + descent + leading`.
    #[must_use]
    pub fn line_height(&self) -> f64 {
        self.ascent + self.descent + self.leading
    }

    /// Distance from the top of the line box to the baseline.
    #[must_use]
    pub fn baseline(&self) -> f64 {
        self.ascent
    }

    /// A tiny heuristic metric suitable for demos and tests: baseline at
    /// ~0.8em, descent at ~0.2em.
    #[must_use]
    pub fn heuristic(font_size: f64) -> Self {
        Self {
            ascent: 0.8 * font_size,
            descent: 0.2 * font_size,
            leading: 0.0,
        }
    }
}

/// Inputs handed to label formatters.
///
/// Mirrors what the host's own default formatter receives for flat category
/// axes, so custom formatters can be shared between grouped and ungrouped
/// axes.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelContext {
    /// The category name being formatted.
    pub value: String,
    /// Leaf tick position (index into the flat leaf list).
    pub pos: usize,
    /// Whether this is the first visible tick.
    pub is_first: bool,
    /// Whether this is the last visible tick.
    pub is_last: bool,
}

/// The contract a host axis implements so Strata can lay out grouped labels.
///
/// All methods are synchronous; the engine runs entirely inside the host's
/// render call stack. Methods that mutate display state take `&mut self` so
/// exclusive ownership of the per-axis display objects is explicit.
pub trait AxisHost {
    /// Axis placement.
    fn orient(&self) -> AxisOrient;

    /// The axis's own rectangle (left/top/width/height) in scene coordinates.
    fn frame(&self) -> Rect;

    /// The currently visible leaf index range `(min, max)`, inclusive.
    fn visible_range(&self) -> (f64, f64);

    /// Screen position of the tick boundary at a logical leaf index.
    ///
    /// `leaf` may lie one slot outside the visible range (the engine asks for
    /// `min - 1` when clamping group spans). Returns `None` when the position
    /// cannot be computed this pass; the engine skips the affected update and
    /// retries on the next render.
    fn tick_position(&self, leaf: f64) -> Option<Point>;

    /// Whether the axis currently has visible series or data.
    fn has_visible_data(&self) -> bool;

    /// The host's default tick label formatter.
    fn default_label_format(&self, ctx: &LabelContext) -> String;

    /// Overrides the host's native tick mark length.
    ///
    /// When grouped, the engine draws all grid lines itself and forces this
    /// to a negligible value so the host never draws its own tick marks.
    /// `None` restores the host's configured length.
    fn set_tick_length(&mut self, length: Option<f64>);

    /// Creates a text element and adds it to the axis label group.
    fn create_label(&mut self, text: &str, attrs: &LabelAttrs, style: &LabelStyle) -> ElementId;

    /// Replaces the text content of a label element.
    fn set_label_text(&mut self, el: ElementId, text: &str);

    /// Moves a label element to an absolute position.
    fn move_label(&mut self, el: ElementId, pos: Point);

    /// Sets the rotation of a label element, in degrees.
    fn rotate_label(&mut self, el: ElementId, degrees: f64);

    /// Constrains the width available to a label, or lifts the constraint.
    ///
    /// Hosts that support text wrapping reflow the label; measurement via
    /// [`AxisHost::label_bounds`] must reflect the constrained layout.
    fn set_label_width_limit(&mut self, el: ElementId, width: Option<f64>);

    /// Enables or disables ellipsis truncation at the current width limit.
    fn set_label_ellipsis(&mut self, el: ElementId, ellipsis: bool);

    /// Shows or hides a single label element.
    fn set_label_visible(&mut self, el: ElementId, visible: bool);

    /// Shows or hides the whole axis label group.
    fn set_label_group_visible(&mut self, visible: bool);

    /// Measures a label element's bounding box under its current constraints.
    fn label_bounds(&self, el: ElementId) -> Size;

    /// Destroys a label element, releasing host resources.
    fn destroy_label(&mut self, el: ElementId);

    /// Font metrics for the given font size.
    fn font_metrics(&self, font_size: f64) -> TextMetrics;

    /// Replaces the grouped-axis grid path for this render pass.
    ///
    /// The path is already crisp-aligned; the host should stroke it with the
    /// given width and its configured tick color.
    fn draw_grid(&mut self, path: &BezPath, stroke_width: f64, visible: bool);
}
