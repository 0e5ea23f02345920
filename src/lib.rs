//! Developmental milestone timeline tracker.
//!
//! The [`engine`] owns the milestone collection and turns drag gestures into
//! placements; [`model`] holds the serializable snapshot exchanged with the
//! session store in [`io`].

pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod logging;
pub mod model;

pub use engine::MilestoneEngine;
pub use error::{Result, TrackerError};
pub use model::{Category, Milestone, MilestoneCollectionState, MilestoneStatus, TimelineAxis};
