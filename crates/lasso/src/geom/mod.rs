//! Planar predicates used by loop detection.
//!
//! Purpose
//! - Segment crossing (orientation signs + collinear bounding-box fallback).
//! - Shoelace area of a closed sub-path and the minimum-area gate.
//! - Ray-casting point-in-polygon and candidate selection.
//!
//! Degenerate inputs (fewer than 3 polygon points) never panic: area is 0 and
//! containment is empty.

mod area;
mod contain;
mod segment;

pub use area::{area, is_valid_loop, signed_area};
pub use contain::{contains_point, select_inside};
pub use segment::{
    on_segment, orientation, orientation_eps, segments_intersect, segments_intersect_eps,
    Orientation,
};
