// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The grouped-axis engine.
//!
//! [`GroupedAxis`] sits beside a host category axis and reacts to its tick
//! lifecycle. The host keeps full ownership of ticks and leaf labels; the
//! engine owns the hierarchy, the group-label elements it creates through
//! [`AxisHost`], and the separator grid path.
//!
//! One render pass is driven as:
//!
//! 1. [`GroupedAxis::begin_render`] once,
//! 2. [`GroupedAxis::tick_label_added`] as the host (re)builds tick labels,
//! 3. [`GroupedAxis::tick_rendered`] as the host positions each tick,
//! 4. [`GroupedAxis::finish_render`] once.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::Point;
use smallvec::SmallVec;
use strata_host::{AxisHost, ElementId, LabelContext};

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use crate::category::{CategoryError, CategoryId, CategorySpec, CategoryTree};
use crate::grid::GridPass;
use crate::layout::{LevelLayout, first_tick_fix_offset};
use crate::options::GroupedAxisOptions;
use crate::overflow::{MeasureCache, resolve};

/// Extra thickness added to the host's own leaf-label size when grouped, so
/// the first ancestor row clears the leaf row.
const LEAF_ROW_PADDING: f64 = 10.0;

/// Tick length forced onto the host while grouped. Small enough that the
/// host's native tick marks are invisible, nonzero so hosts that special-case
/// zero still lay out label offsets.
const SUPPRESSED_TICK_LENGTH: f64 = 0.001;

/// A group label element and the leaf span it covers.
#[derive(Clone, Copy, Debug)]
pub(crate) struct GroupBinding {
    pub(crate) label: ElementId,
    /// Leaf position of the tick that first reached this group.
    pub(crate) start_at: usize,
    /// Number of descendant leaves.
    pub(crate) leaves: usize,
    /// User x/y offsets resolved from the level options at creation.
    offsets: (f64, f64),
    /// Leaf ticks destroyed under this group since it last left the
    /// visible range.
    pub(crate) destroyed: u32,
}

/// Hierarchical category layout for one host axis.
///
/// Holds the built [`CategoryTree`], per-level size accounting, group-label
/// bindings, and measurement caches. All host display objects are referenced
/// by [`ElementId`] only.
#[derive(Debug)]
pub struct GroupedAxis {
    options: GroupedAxisOptions,
    tree: CategoryTree,
    levels: LevelLayout,
    measures: MeasureCache,
    bindings: HashMap<CategoryId, GroupBinding>,
    grid: Option<GridPass>,
    tick_width: f64,
    horizontal: bool,
    direction: f64,
}

impl GroupedAxis {
    /// Builds the engine for a host axis.
    ///
    /// Fails fast on a malformed category specification; the host must not
    /// render a partially grouped axis. After construction the host should
    /// adopt [`GroupedAxis::leaf_names`] as its flat category list.
    pub fn new(host: &dyn AxisHost, options: GroupedAxisOptions) -> Result<Self, CategoryError> {
        let tree = CategoryTree::build(&options.categories)?;
        let orient = host.orient();
        let horizontal = orient.is_horizontal();
        let direction = orient.direction_factor();
        // Grid stroke defaults differ per orientation; vertical grouped axes
        // historically draw no separator strokes unless asked to.
        let tick_width = options
            .tick_width
            .unwrap_or(if horizontal { 1.0 } else { 0.0 });
        let levels = LevelLayout::new(direction, font_heights(host, &options, tree.max_depth()));
        Ok(Self {
            options,
            tree,
            levels,
            measures: MeasureCache::new(),
            bindings: HashMap::new(),
            grid: None,
            tick_width,
            horizontal,
            direction,
        })
    }

    /// The built category hierarchy.
    #[must_use]
    pub fn tree(&self) -> &CategoryTree {
        &self.tree
    }

    /// Whether any group levels exist. A flat specification leaves the host
    /// axis's behavior untouched.
    #[must_use]
    pub fn is_grouped(&self) -> bool {
        self.tree.is_grouped()
    }

    /// Leaf display names in tick-position order, for the host's flat
    /// category assignment.
    #[must_use]
    pub fn leaf_names(&self) -> Vec<String> {
        self.tree.leaf_names()
    }

    /// Whether the host may reuse a moved label element for a new position.
    ///
    /// Data-sorting label reuse assumes one label per tick; group labels
    /// break that assumption, so reuse is disabled while grouped.
    #[must_use]
    pub fn reuse_moved_label(&self) -> bool {
        !self.is_grouped()
    }

    /// Replaces the category specification.
    ///
    /// Tears down all group labels and caches, rebuilds the tree, and returns
    /// the new leaf names for the host to adopt. On error the axis is left
    /// ungrouped rather than half-rebuilt.
    pub fn set_categories(
        &mut self,
        host: &mut dyn AxisHost,
        categories: Vec<CategorySpec>,
    ) -> Result<Vec<String>, CategoryError> {
        self.clean_groups(host);
        match CategoryTree::build(&categories) {
            Ok(tree) => self.tree = tree,
            Err(err) => {
                // Leave the axis ungrouped rather than half-rebuilt.
                self.tree = CategoryTree::default();
                return Err(err);
            }
        }
        self.options.categories = categories;
        self.levels = LevelLayout::new(
            self.direction,
            font_heights(host, &self.options, self.tree.max_depth()),
        );
        log::debug!(
            "categories replaced: {} leaves, depth {}",
            self.tree.leaves().len(),
            self.tree.max_depth()
        );
        Ok(self.leaf_names())
    }

    /// Destroys every group label and clears all per-tree state.
    pub fn clean_groups(&mut self, host: &mut dyn AxisHost) {
        for binding in self.bindings.values() {
            host.destroy_label(binding.label);
        }
        self.bindings.clear();
        self.measures.clear();
        self.grid = None;
    }

    /// Starts a render pass.
    ///
    /// Resets the grid path and separator dedup set, and suppresses the
    /// host's native tick marks while grouped.
    pub fn begin_render(&mut self, host: &mut dyn AxisHost) {
        if self.is_grouped() {
            self.grid = Some(GridPass::new());
            host.set_tick_length(Some(SUPPRESSED_TICK_LENGTH));
        } else {
            self.grid = None;
            host.set_tick_length(None);
        }
    }

    /// Reacts to the host creating or re-creating a leaf tick label.
    ///
    /// Sets the formatted text, then walks the leaf's ancestor chain creating
    /// any group labels not yet materialized this categories cycle. Overflow
    /// fitting runs here, before positioning, so level sizes already reflect
    /// wrapped or rotated extents when [`GroupedAxis::tick_rendered`] places
    /// labels. Overflow fitting applies to horizontal axes only; vertical
    /// group labels stack along the unconstrained direction.
    ///
    /// Returns the width the host should reserve for this leaf label, or
    /// `None` when `pos` maps to no leaf. The reservation never shrinks while
    /// the label lives, even when a rebuild produces shorter text, so host
    /// wrap decisions for neighboring labels stay stable across passes.
    pub fn tick_label_added(
        &mut self,
        host: &mut dyn AxisHost,
        pos: usize,
        is_first: bool,
        is_last: bool,
        label: ElementId,
    ) -> Option<f64> {
        let leaf = self.tree.leaf_at(pos)?;

        let ctx = LabelContext {
            value: self.tree.node(leaf).name.clone(),
            pos,
            is_first,
            is_last,
        };
        let text = self.options.labels.format_label(&*host, &ctx);
        host.set_label_text(label, &text);
        // Remeasure after the text change, folding into the reservation.
        let width = host.label_bounds(label).width;
        let reserved = self.measures.note_text_width(label, width);

        if !self.is_grouped() || !self.options.labels.enabled {
            return Some(reserved);
        }

        let leaf_bounds = host.label_bounds(label);
        let extent = if self.horizontal {
            leaf_bounds.height
        } else {
            leaf_bounds.width
        };
        self.levels.record(0, extent, 0.0);

        let (min, max) = host.visible_range();
        let fix = first_tick_fix_offset(&self.tree, leaf, is_first) as f64;

        for (i, anc) in self.tree.ancestors(leaf).iter().enumerate() {
            let depth = i + 1;
            if !self.bindings.contains_key(anc) {
                let node = self.tree.node(*anc);
                let attrs = self.options.labels.level_attrs(depth);
                let style = self.options.labels.level_style(depth);
                let group_ctx = LabelContext {
                    value: node.name.clone(),
                    pos,
                    is_first,
                    is_last,
                };
                let text = match &self.options.labels.formatter {
                    Some(formatter) => formatter(&group_ctx),
                    None => node.name.clone(),
                };
                let el = host.create_label(&text, &attrs, &style);
                self.bindings.insert(
                    *anc,
                    GroupBinding {
                        label: el,
                        start_at: pos,
                        leaves: node.leaf_count,
                        offsets: (attrs.x, attrs.y),
                        destroyed: 0,
                    },
                );
                log::trace!("group label created for {:?} at leaf {pos}", node.name);
            }

            let binding = self.bindings[anc];

            // Fit into the clamped slot. Vertical axes skip fitting; their
            // labels stack along the unconstrained direction.
            if self.horizontal {
                let span = clamped_span(host, &binding, min, max, fix);
                if let Some((a, b)) = span {
                    let slot = b.x - a.x;
                    let mode = self.options.labels.level_overflow(depth);
                    resolve(host, &mut self.measures, binding.label, slot, mode);
                } else {
                    log::debug!("overflow fit skipped at depth {depth}: no tick position");
                }
            }

            let bounds = host.label_bounds(binding.label);
            let level_extent = if self.horizontal {
                bounds.height
            } else {
                bounds.width
            };
            // The reservation absorbs whichever user offset pushes along the
            // stacking direction.
            let (user_x, user_y) = binding.offsets;
            let user = if self.direction == -1.0 { user_x } else { user_y };
            self.levels.record(depth, level_extent, user);
        }
        Some(reserved)
    }

    /// Reacts to the host positioning one leaf tick.
    ///
    /// Draws the leaf's boundary line, then walks the ancestor chain to place
    /// each group label at the midpoint of its clamped leaf span and emit its
    /// trailing separator (once per group per pass). A span endpoint the host
    /// cannot position yet skips that group's update for this pass.
    pub fn tick_rendered(&mut self, host: &mut dyn AxisHost, pos: usize, is_first: bool) {
        if !self.is_grouped() {
            return;
        }
        let Some(leaf) = self.tree.leaf_at(pos) else {
            return;
        };
        let (min, max) = host.visible_range();
        if pos as f64 > max {
            return;
        }
        let Some(xy) = host.tick_position(pos as f64) else {
            log::debug!("tick {pos} skipped: no tick position");
            return;
        };
        let Some(grid) = self.grid.as_mut() else {
            return;
        };

        let frame = host.frame();
        let horizontal = self.horizontal;
        let size0 = self.levels.size(0);

        if is_first {
            // Closing edge of the whole label block at the axis start.
            let stacked = self.levels.stacked();
            let seg = if horizontal {
                [frame.x0, xy.y, frame.x0, xy.y + stacked]
            } else {
                [xy.x, frame.y1, xy.x + stacked, frame.y1]
            };
            grid.add_part(seg, self.tick_width);
        }

        let edge =
            if (horizontal && xy.x == frame.x1) || (!horizontal && xy.y == frame.y0) {
                -1.0
            } else {
                0.0
            };
        if self.options.draw_horizontal_borders {
            if horizontal && frame.x0 < xy.x {
                grid.add_part([xy.x - edge, xy.y, xy.x - edge, xy.y + size0], self.tick_width);
            } else if !horizontal && frame.y0 <= xy.y {
                grid.add_part([xy.x, xy.y + edge, xy.x + size0, xy.y + edge], self.tick_width);
            }
        }

        if !self.options.labels.enabled {
            return;
        }

        let start = if horizontal { xy.y } else { xy.x };
        let mut size = size0 + start;
        let draw_borders = self.options.draw_horizontal_borders;
        // A user tick length means the host draws its own marks at the
        // deepest level; a second separator there would double-strike.
        let skip_deepest = self.options.tick_length.is_some();
        let max_depth = self.tree.max_depth();
        let baseline = host
            .font_metrics(self.options.labels.style.font_size)
            .baseline();
        let fix = first_tick_fix_offset(&self.tree, leaf, is_first) as f64;
        let ancestors: SmallVec<[CategoryId; 4]> = self.tree.ancestors(leaf);

        for (i, anc) in ancestors.iter().enumerate() {
            let depth = i + 1;
            let Some(binding) = self.bindings.get(anc).copied() else {
                break;
            };
            let level = self.levels.size(depth);

            if let Some((a, b)) = clamped_span(host, &binding, min, max, fix) {
                let bounds = host.label_bounds(binding.label);
                let edge =
                    if (horizontal && b.x == frame.x1) || (!horizontal && b.y == frame.y0) {
                        -1.0
                    } else {
                        0.0
                    };
                let (user_x, user_y) = binding.offsets;
                let target = if horizontal {
                    Point::new(
                        (a.x + b.x) / 2.0 + user_x,
                        size + self.levels.font_height(depth) + level / 2.0 + user_y / 2.0,
                    )
                } else {
                    Point::new(
                        size + level / 2.0 + user_x,
                        (a.y + b.y - bounds.height) / 2.0 + baseline + user_y,
                    )
                };
                host.move_label(binding.label, target);

                let wanted = (draw_borders || depth != 1) && (!skip_deepest || depth != max_depth);
                if wanted && grid.first_visit(*anc) {
                    if horizontal && frame.x0 < b.x {
                        grid.add_part(
                            [b.x - edge, xy.y, b.x - edge, size + level],
                            self.tick_width,
                        );
                    } else if !horizontal && frame.y0 <= b.y {
                        grid.add_part(
                            [xy.x, b.y + edge, size + level, b.y + edge],
                            self.tick_width,
                        );
                    }
                }
            } else {
                log::debug!("group update skipped at depth {depth}: no tick position");
            }

            size += level;
        }
    }

    /// Reacts to the host destroying one leaf tick.
    ///
    /// Group labels are not released here. They are shared across leaf ticks
    /// and stay alive for the categories cycle; destruction only advances the
    /// per-group counter that [`GroupedAxis::finish_render`] resets when the
    /// group scrolls out of range. [`GroupedAxis::clean_groups`] is the real
    /// teardown.
    pub fn tick_destroyed(&mut self, pos: usize) {
        let Some(leaf) = self.tree.leaf_at(pos) else {
            return;
        };
        for anc in self.tree.ancestors(leaf) {
            if let Some(binding) = self.bindings.get_mut(&anc) {
                binding.destroyed += 1;
            }
        }
    }

    /// Ends a render pass: hands the accumulated grid to the host and
    /// reconciles group-label visibility with the visible leaf range.
    pub fn finish_render(&mut self, host: &mut dyn AxisHost) {
        let Some(grid) = self.grid.take() else {
            host.draw_grid(&kurbo::BezPath::new(), self.tick_width, false);
            return;
        };
        let visible = host.has_visible_data();
        host.draw_grid(&grid.path, self.tick_width, visible);
        host.set_label_group_visible(visible);

        let (min, max) = host.visible_range();
        for binding in self.bindings.values_mut() {
            let last = (binding.start_at + binding.leaves) as f64 - 1.0;
            if last < min || binding.start_at as f64 > max {
                host.set_label_visible(binding.label, false);
                binding.destroyed = 0;
            } else {
                host.set_label_visible(binding.label, visible);
            }
        }
    }

    /// Cross-axis thickness the labels need, replacing the host's own
    /// leaf-label measurement while grouped.
    pub fn label_thickness(&mut self, host_label_size: f64) -> f64 {
        if !self.is_grouped() {
            return host_label_size;
        }
        self.levels
            .record_leaf_thickness(host_label_size + LEAF_ROW_PADDING);
        self.levels.total()
    }

    #[cfg(test)]
    pub(crate) fn binding(&self, id: CategoryId) -> Option<&GroupBinding> {
        self.bindings.get(&id)
    }
}

/// Positions of the clamped span endpoints for a group: from one slot before
/// the span start (or the visible minimum) to the span end (or the visible
/// maximum), with the first visible tick's offset within its group corrected.
fn clamped_span(
    host: &dyn AxisHost,
    binding: &GroupBinding,
    min: f64,
    max: f64,
    fix: f64,
) -> Option<(Point, Point)> {
    let lo = (binding.start_at as f64 - 1.0).max(min - 1.0);
    let hi = ((binding.start_at + binding.leaves) as f64 - 1.0 - fix).min(max);
    let a = host.tick_position(lo)?;
    let b = host.tick_position(hi)?;
    Some((a, b))
}

fn font_heights(
    host: &dyn AxisHost,
    options: &GroupedAxisOptions,
    max_depth: usize,
) -> SmallVec<[f64; 4]> {
    let mut heights = SmallVec::new();
    for depth in 0..=max_depth {
        let style = options.labels.level_style(depth);
        let baseline = host.font_metrics(style.font_size).baseline();
        heights.push((baseline * 0.3).round());
    }
    heights
}
