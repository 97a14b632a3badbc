// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grouped-axis configuration.
//!
//! Options mirror the host's flat-axis label options, extended with a
//! per-level array (`grouped`, indexed by depth-1). Presentation style and
//! positional attributes are layered separately: one is consumed by the host
//! as paint, the other as geometry.

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use peniko::Brush;
use strata_host::{AxisHost, LabelAttrs, LabelContext, LabelStyle, TextAnchor};

use crate::category::CategorySpec;

/// Policy governing how an oversized group label is fit into its slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OverflowMode {
    /// Wrap first; rotate if even the wrapped width overflows.
    #[default]
    Auto,
    /// Rotate whenever the unwrapped width overflows; never wrap.
    Rotate,
    /// Constrain to the slot and truncate with an ellipsis; never rotate.
    Ellipsis,
}

/// Partial presentation style, merged over the shared label style.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LabelStyleOverride {
    /// Font size override.
    pub font_size: Option<f64>,
    /// Fill paint override.
    pub fill: Option<Brush>,
}

impl LabelStyleOverride {
    /// Layers this override on top of `base`.
    #[must_use]
    pub fn merge_over(&self, base: &LabelStyle) -> LabelStyle {
        LabelStyle {
            font_size: self.font_size.unwrap_or(base.font_size),
            fill: self.fill.clone().unwrap_or_else(|| base.fill.clone()),
        }
    }
}

/// Per-hierarchy-level label options, indexed by depth-1 in
/// [`LabelOptions::grouped`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LevelOptions {
    /// X offset applied to labels at this level.
    pub x: Option<f64>,
    /// Y offset applied to labels at this level.
    pub y: Option<f64>,
    /// Rotation override in degrees.
    pub rotation: Option<f64>,
    /// Anchor override.
    pub anchor: Option<TextAnchor>,
    /// Style override, merged over the shared label style.
    pub style: Option<LabelStyleOverride>,
    /// Overflow policy for this level.
    pub overflow: Option<OverflowMode>,
}

impl LevelOptions {
    /// Creates empty level options (everything inherited).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the positional offsets.
    #[must_use]
    pub fn with_offsets(mut self, x: f64, y: f64) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// Sets the rotation override.
    #[must_use]
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = Some(degrees);
        self
    }

    /// Sets the style override.
    #[must_use]
    pub fn with_style(mut self, style: LabelStyleOverride) -> Self {
        self.style = Some(style);
        self
    }

    /// Sets the overflow policy.
    #[must_use]
    pub fn with_overflow(mut self, overflow: OverflowMode) -> Self {
        self.overflow = Some(overflow);
        self
    }
}

/// A custom label formatter.
pub type LabelFormatter = Arc<dyn Fn(&LabelContext) -> String>;

/// Label options shared by all levels, with per-level overrides.
#[derive(Clone)]
pub struct LabelOptions {
    /// Whether labels are drawn at all.
    pub enabled: bool,
    /// Shared presentation style; per-level styles merge over this.
    pub style: LabelStyle,
    /// Default rotation for group labels, in degrees.
    pub rotation: f64,
    /// Custom formatter function; first in the fallback chain.
    pub formatter: Option<LabelFormatter>,
    /// Format template; used when no formatter is supplied. `{text}` expands
    /// to the host's default-formatted label, `{value}` to the raw name.
    pub format: Option<String>,
    /// Per-level options, indexed by depth-1.
    pub grouped: Vec<LevelOptions>,
}

impl core::fmt::Debug for LabelOptions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LabelOptions")
            .field("enabled", &self.enabled)
            .field("style", &self.style)
            .field("rotation", &self.rotation)
            .field("formatter", &self.formatter.is_some())
            .field("format", &self.format)
            .field("grouped", &self.grouped)
            .finish()
    }
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            style: LabelStyle::default(),
            rotation: 0.0,
            formatter: None,
            format: None,
            grouped: Vec::new(),
        }
    }
}

impl LabelOptions {
    /// Level options for a hierarchy depth (`depth >= 1`), if configured.
    #[must_use]
    pub fn level(&self, depth: usize) -> Option<&LevelOptions> {
        if depth == 0 {
            return None;
        }
        self.grouped.get(depth - 1)
    }

    /// Resolved positional attributes for a level: per-level overrides merged
    /// over the shared defaults.
    #[must_use]
    pub fn level_attrs(&self, depth: usize) -> LabelAttrs {
        let mut attrs = LabelAttrs {
            x: 0.0,
            y: 0.0,
            rotation: self.rotation,
            anchor: TextAnchor::Middle,
        };
        if let Some(level) = self.level(depth) {
            if let Some(x) = level.x {
                attrs.x = x;
            }
            if let Some(y) = level.y {
                attrs.y = y;
            }
            if let Some(rotation) = level.rotation {
                attrs.rotation = rotation;
            }
            if let Some(anchor) = level.anchor {
                attrs.anchor = anchor;
            }
        }
        attrs
    }

    /// Resolved presentation style for a level.
    #[must_use]
    pub fn level_style(&self, depth: usize) -> LabelStyle {
        match self.level(depth).and_then(|l| l.style.as_ref()) {
            Some(over) => over.merge_over(&self.style),
            None => self.style.clone(),
        }
    }

    /// Overflow policy for a level, defaulting to [`OverflowMode::Auto`].
    #[must_use]
    pub fn level_overflow(&self, depth: usize) -> OverflowMode {
        self.level(depth)
            .and_then(|l| l.overflow)
            .unwrap_or_default()
    }

    /// Formats a label through the override chain: custom formatter, then
    /// format template, then the host's default formatter.
    pub fn format_label(&self, host: &dyn AxisHost, ctx: &LabelContext) -> String {
        if let Some(formatter) = &self.formatter {
            return formatter(ctx);
        }
        if let Some(template) = &self.format {
            let text = host.default_label_format(ctx);
            return apply_template(template, &text, &ctx.value);
        }
        host.default_label_format(ctx)
    }
}

fn apply_template(template: &str, text: &str, value: &str) -> String {
    let mut out = String::with_capacity(template.len() + text.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];
        if let Some(end) = rest.find('}') {
            match &rest[1..end] {
                "text" => out.push_str(text),
                "value" => out.push_str(value),
                other => {
                    // Unknown placeholders pass through untouched.
                    out.push('{');
                    out.push_str(other);
                    out.push('}');
                }
            }
            rest = &rest[end + 1..];
        } else {
            out.push_str(rest);
            rest = "";
        }
    }
    out.push_str(rest);
    out
}

/// Top-level grouped-axis options.
#[derive(Clone, Debug, Default)]
pub struct GroupedAxisOptions {
    /// The nested category specification.
    pub categories: Vec<CategorySpec>,
    /// Label options.
    pub labels: LabelOptions,
    /// User tick length override. When set, the deepest ancestor level's
    /// separators are omitted (the host's own tick marks close that level).
    pub tick_length: Option<f64>,
    /// Grid stroke width. Defaults to 1 for horizontal (x) axes, 0 otherwise.
    pub tick_width: Option<f64>,
    /// When `false`, suppresses the deepest two levels' separators (used when
    /// an outer border already visually closes the grid).
    pub draw_horizontal_borders: bool,
}

impl GroupedAxisOptions {
    /// Creates options for the given nested categories.
    #[must_use]
    pub fn new(categories: Vec<CategorySpec>) -> Self {
        Self {
            categories,
            labels: LabelOptions::default(),
            tick_length: None,
            tick_width: None,
            draw_horizontal_borders: true,
        }
    }

    /// Appends options for the next hierarchy level.
    #[must_use]
    pub fn with_level(mut self, level: LevelOptions) -> Self {
        self.labels.grouped.push(level);
        self
    }

    /// Sets the shared label style.
    #[must_use]
    pub fn with_label_style(mut self, style: LabelStyle) -> Self {
        self.labels.style = style;
        self
    }

    /// Sets a custom label formatter.
    #[must_use]
    pub fn with_formatter(mut self, f: impl Fn(&LabelContext) -> String + 'static) -> Self {
        self.labels.formatter = Some(Arc::new(f));
        self
    }

    /// Sets a format template (see [`LabelOptions::format`]).
    #[must_use]
    pub fn with_format(mut self, template: impl Into<String>) -> Self {
        self.labels.format = Some(template.into());
        self
    }

    /// Enables or disables labels.
    #[must_use]
    pub fn with_labels_enabled(mut self, enabled: bool) -> Self {
        self.labels.enabled = enabled;
        self
    }

    /// Sets the user tick length.
    #[must_use]
    pub fn with_tick_length(mut self, length: f64) -> Self {
        self.tick_length = Some(length);
        self
    }

    /// Sets the grid stroke width.
    #[must_use]
    pub fn with_tick_width(mut self, width: f64) -> Self {
        self.tick_width = Some(width);
        self
    }

    /// Enables or disables the deepest two levels' separators.
    #[must_use]
    pub fn with_horizontal_borders(mut self, draw: bool) -> Self {
        self.draw_horizontal_borders = draw;
        self
    }
}
