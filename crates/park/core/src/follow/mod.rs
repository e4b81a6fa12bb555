//! Target following and reachability.
//!
//! [`update_following`] is the per-tick entry point used by every behavior
//! driver. It steers the agent with the destination optimizer while the
//! target is reachable in a straight line, checks that assumption with
//! [`slide_check`], and falls back to [`escalate`] when it breaks.
mod crowd;
mod direction;
mod error;
mod escalation;
mod instruction;
mod optimizer;
mod slide;

pub use crowd::{Candidate, approach_cost, crowd_penalty, others};
pub use direction::{Direction, EdgeSet};
pub use error::{FollowError, SlideFailure};
pub use escalation::escalate;
pub use instruction::{FollowInstruction, FollowOutcome};
pub use optimizer::update_following;
pub(crate) use optimizer::settle;
pub use slide::{SlideQuery, connected_height, slide, slide_check};
