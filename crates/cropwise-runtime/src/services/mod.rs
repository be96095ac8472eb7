//! Services that wire the evaluator and the collaborators together.

mod advice;
mod forum;

pub use advice::{AdviceOutcome, AdviceService};
pub use forum::{ForumService, PointsSummary, PostDetail, ReferenceBoard};
