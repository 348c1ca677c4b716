//! Read-only views over the execution state store: the per-node status
//! badge overlaid on the canvas, the run panel listing touched nodes,
//! the pin board, and the per-block-type node renderer descriptors.
//!
//! Nothing here mutates the store; controls (replay, pin) are issued
//! as requests to the run controller or the pin sink.

mod badge;
mod panel;
mod pins;
mod renderers;

pub use badge::{BadgeGlyph, StatusBadge};
pub use panel::{copy_output_text, RunPanelState, RunRow};
pub use pins::{PinBoard, PinSink, PinSnapshot};
pub use renderers::{DeliveryStats, HandleLayout, NodeRenderer};
