// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A scripted [`AxisHost`] for unit tests.
//!
//! Text measurement uses a flat 0.6em-per-glyph model with greedy wrapping,
//! which is close enough to a real renderer to exercise every layout branch
//! deterministically.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use kurbo::{BezPath, Point, Rect, Size};
use strata_host::{
    AxisHost, AxisOrient, ElementId, LabelAttrs, LabelContext, LabelStyle, TextMetrics,
};

const GLYPH_WIDTH_EM: f64 = 0.6;

/// Recorded state of one host label element.
#[derive(Clone, Debug)]
pub(crate) struct MockLabel {
    pub(crate) text: String,
    pub(crate) attrs: LabelAttrs,
    pub(crate) style: LabelStyle,
    pub(crate) pos: Option<Point>,
    pub(crate) rotation: f64,
    pub(crate) width_limit: Option<f64>,
    pub(crate) ellipsis: bool,
    pub(crate) visible: bool,
    pub(crate) destroyed: bool,
    /// When set, wrapping never reduces the measured width (an unbreakable
    /// single run of text).
    unbreakable: bool,
}

/// One recorded [`AxisHost::draw_grid`] call.
#[derive(Clone, Debug)]
pub(crate) struct GridDraw {
    pub(crate) path: BezPath,
    pub(crate) stroke_width: f64,
    pub(crate) visible: bool,
}

#[derive(Debug)]
pub(crate) struct MockHost {
    orient: AxisOrient,
    frame: Rect,
    visible_range: (f64, f64),
    /// Pixel distance between adjacent tick boundaries.
    step: f64,
    has_data: bool,
    labels: Vec<MockLabel>,
    pub(crate) tick_length: Option<f64>,
    pub(crate) group_visible: Option<bool>,
    pub(crate) grid_draws: Vec<GridDraw>,
    /// Leaf values for which `tick_position` reports failure.
    fail_positions: Vec<f64>,
}

impl MockHost {
    /// A bottom axis with `leaves` visible leaf slots of 100px each.
    pub(crate) fn horizontal(leaves: usize) -> Self {
        Self {
            orient: AxisOrient::Bottom,
            frame: Rect::new(0.0, 300.0, 100.0 * leaves as f64, 340.0),
            visible_range: (0.0, leaves as f64 - 1.0),
            step: 100.0,
            has_data: true,
            labels: Vec::new(),
            tick_length: None,
            group_visible: None,
            grid_draws: Vec::new(),
            fail_positions: Vec::new(),
        }
    }

    /// A left axis with `leaves` visible leaf slots of 40px each.
    pub(crate) fn vertical(leaves: usize) -> Self {
        Self {
            orient: AxisOrient::Left,
            frame: Rect::new(0.0, 0.0, 80.0, 40.0 * leaves as f64),
            visible_range: (0.0, leaves as f64 - 1.0),
            step: 40.0,
            has_data: true,
            labels: Vec::new(),
            tick_length: None,
            group_visible: None,
            grid_draws: Vec::new(),
            fail_positions: Vec::new(),
        }
    }

    pub(crate) fn set_visible_range(&mut self, min: f64, max: f64) {
        self.visible_range = (min, max);
    }

    pub(crate) fn set_has_data(&mut self, has_data: bool) {
        self.has_data = has_data;
    }

    pub(crate) fn fail_position(&mut self, leaf: f64) {
        self.fail_positions.push(leaf);
    }

    pub(crate) fn label(&self, el: ElementId) -> &MockLabel {
        &self.labels[el.0 as usize]
    }

    pub(crate) fn set_min_wrap_width(&mut self, el: ElementId) {
        self.labels[el.0 as usize].unbreakable = true;
    }

    pub(crate) fn labels(&self) -> &[MockLabel] {
        &self.labels
    }

    pub(crate) fn last_grid(&self) -> &GridDraw {
        self.grid_draws.last().expect("no grid drawn")
    }

    fn measure(&self, label: &MockLabel) -> Size {
        let natural = label.text.chars().count() as f64 * GLYPH_WIDTH_EM * label.style.font_size;
        let line = label.style.font_size;
        let (w, h) = match label.width_limit {
            Some(limit) if !label.unbreakable && natural > limit && limit > 0.0 => {
                let lines = (natural / limit).ceil();
                (natural.min(limit), lines * line)
            }
            _ => (natural, line),
        };
        if (label.rotation.abs() - 90.0).abs() < 1e-9 {
            Size::new(h, w)
        } else {
            Size::new(w, h)
        }
    }
}

impl AxisHost for MockHost {
    fn orient(&self) -> AxisOrient {
        self.orient
    }

    fn frame(&self) -> Rect {
        self.frame
    }

    fn visible_range(&self) -> (f64, f64) {
        self.visible_range
    }

    fn tick_position(&self, leaf: f64) -> Option<Point> {
        if self.fail_positions.contains(&leaf) {
            return None;
        }
        let (min, _) = self.visible_range;
        let along = (leaf - (min - 1.0)) * self.step;
        Some(if self.orient.is_horizontal() {
            Point::new(self.frame.x0 + along, self.frame.y0)
        } else {
            Point::new(self.frame.x1, self.frame.y0 + along)
        })
    }

    fn has_visible_data(&self) -> bool {
        self.has_data
    }

    fn default_label_format(&self, ctx: &LabelContext) -> String {
        ctx.value.to_string()
    }

    fn set_tick_length(&mut self, length: Option<f64>) {
        self.tick_length = length;
    }

    fn create_label(&mut self, text: &str, attrs: &LabelAttrs, style: &LabelStyle) -> ElementId {
        let id = ElementId(self.labels.len() as u64);
        self.labels.push(MockLabel {
            text: text.to_string(),
            attrs: *attrs,
            style: style.clone(),
            pos: None,
            rotation: attrs.rotation,
            width_limit: None,
            ellipsis: false,
            visible: true,
            destroyed: false,
            unbreakable: false,
        });
        id
    }

    fn set_label_text(&mut self, el: ElementId, text: &str) {
        self.labels[el.0 as usize].text = text.to_string();
    }

    fn move_label(&mut self, el: ElementId, pos: Point) {
        self.labels[el.0 as usize].pos = Some(pos);
    }

    fn rotate_label(&mut self, el: ElementId, degrees: f64) {
        self.labels[el.0 as usize].rotation = degrees;
    }

    fn set_label_width_limit(&mut self, el: ElementId, width: Option<f64>) {
        self.labels[el.0 as usize].width_limit = width;
    }

    fn set_label_ellipsis(&mut self, el: ElementId, ellipsis: bool) {
        self.labels[el.0 as usize].ellipsis = ellipsis;
    }

    fn set_label_visible(&mut self, el: ElementId, visible: bool) {
        self.labels[el.0 as usize].visible = visible;
    }

    fn set_label_group_visible(&mut self, visible: bool) {
        self.group_visible = Some(visible);
    }

    fn label_bounds(&self, el: ElementId) -> Size {
        self.measure(&self.labels[el.0 as usize])
    }

    fn destroy_label(&mut self, el: ElementId) {
        let label = &mut self.labels[el.0 as usize];
        label.destroyed = true;
        label.visible = false;
    }

    fn font_metrics(&self, font_size: f64) -> TextMetrics {
        TextMetrics::heuristic(font_size)
    }

    fn draw_grid(&mut self, path: &BezPath, stroke_width: f64, visible: bool) {
        self.grid_draws.push(GridDraw {
            path: path.clone(),
            stroke_width,
            visible,
        });
    }
}
