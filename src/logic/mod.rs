//! Tournament business logic: fixtures, round progression, standings, finalization.

mod finalize;
mod fixtures;
mod rounds;
mod standings;

pub use finalize::{finalize_event, refinalize_event};
pub use fixtures::{apply_schedule, generate_fixtures, Round, ScheduleConfig};
pub use rounds::{
    current_round, delete_manual_match, record_manual_match, submit_round, RoundState,
};
pub use standings::compute_standings;
