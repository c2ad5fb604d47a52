//! Per-track download status.
//!
//! The tracker records what the user asked for and what the backend answered.
//! It does not look at the active-jobs snapshot; the two views are kept
//! independently and may disagree until the next poll.

mod status;
mod tracker;

pub use status::{DownloadRequest, DownloadStatus, DownloadSubmitter};
pub use tracker::DownloadStatusTracker;
