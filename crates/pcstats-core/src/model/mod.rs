//! Domain model: paper keys, per-paper review state, per-reviewer aggregate.

pub mod paper;
pub mod review;
pub mod reviewer;

pub use paper::PaperKey;
pub use review::ReviewState;
pub use reviewer::ReviewerAggregate;
