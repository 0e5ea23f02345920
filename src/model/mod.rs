pub mod catalog;
pub mod collection;
pub mod milestone;
pub mod timeline;

pub use collection::MilestoneCollectionState;
pub use milestone::{Category, Milestone, MilestoneStatus};
pub use timeline::TimelineAxis;
