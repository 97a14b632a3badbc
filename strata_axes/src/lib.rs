// Copyright 2025 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hierarchical (grouped) category axis layout.
//!
//! A charting library's category axis maps one label to one tick slot.
//! Grouped axes add named levels above that: leaves are annotated with group
//! labels spanning their tick range, and a separator grid outlines each
//! group. This crate computes that layout: it builds the category hierarchy,
//! sizes and positions every level's labels, fits oversized labels into
//! their spans, and accumulates the separator grid path.
//!
//! Rendering stays with the host chart. [`GroupedAxis`] drives a small trait
//! ([`strata_host::AxisHost`]) through which the host creates, measures, and
//! moves label elements; see that crate for the contract and [`GroupedAxis`]
//! for the render-pass protocol.
//!
//! ```
//! use strata_axes::{CategorySpec, GroupedAxis, GroupedAxisOptions};
//! # fn demo(host: &mut dyn strata_host::AxisHost) -> Result<(), strata_axes::CategoryError> {
//! let options = GroupedAxisOptions::new(vec![
//!     CategorySpec::group("Week 1", vec!["Mon".into(), "Tue".into()]),
//!     CategorySpec::group("Week 2", vec!["Wed".into()]),
//! ]);
//! let axis = GroupedAxis::new(host, options)?;
//! assert_eq!(axis.leaf_names(), vec!["Mon", "Tue", "Wed"]);
//! # Ok(())
//! # }
//! ```

#![no_std]

extern crate alloc;

mod axis;
mod category;
#[cfg(not(feature = "std"))]
mod float;
mod grid;
mod layout;
#[cfg(test)]
mod mock;
mod options;
mod overflow;


pub use axis::GroupedAxis;
pub use category::{Category, CategoryError, CategoryId, CategorySpec, CategoryTree};
pub use options::{
    GroupedAxisOptions, LabelFormatter, LabelOptions, LabelStyleOverride, LevelOptions,
    OverflowMode,
};
