pub mod field;
mod lenient;
pub mod match_details;
pub mod match_result;
pub mod player_summaries;

pub use field::{FieldGroup, FieldSelector};
pub use match_details::{MatchDetailsEnvelope, RawMatch, RawPickBan, RawPlayer};
pub use match_result::{BySide, DraftAction, DraftEntry, MatchResult, PlayerDetail, Side};
pub use player_summaries::{PlayerSummariesEnvelope, PlayerSummary};
