//! Live standings: pure recomputation from the match list.

use crate::models::{Match, MatchStatus, StandingRow, Team};
use std::collections::HashMap;

fn row_index(
    rows: &mut Vec<StandingRow>,
    index: &mut HashMap<String, usize>,
    team: &str,
) -> usize {
    if let Some(&i) = index.get(team) {
        return i;
    }
    // A completed match can name a team missing from the configuration
    // (legacy data); give it a row rather than losing its results.
    rows.push(StandingRow::zero(team));
    let i = rows.len() - 1;
    index.insert(team.to_string(), i);
    i
}

/// Compute per-team standings over the event's completed matches.
///
/// Only `Completed` matches count; scheduled, active and cancelled ones are
/// ignored, so partial tournaments rank correctly. Every configured team gets
/// a row even with no completed matches. Rows sort by points, then goal
/// difference, then goals for (all descending); remaining ties keep input
/// order (stable sort), which fixes which team is offered "declare winner".
pub fn compute_standings(teams: &[Team], matches: &[Match]) -> Vec<StandingRow> {
    let mut rows: Vec<StandingRow> = teams.iter().map(|t| StandingRow::zero(&t.name)).collect();
    let mut index: HashMap<String, usize> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| (r.team.clone(), i))
        .collect();

    for m in matches.iter().filter(|m| m.status == MatchStatus::Completed) {
        let hi = row_index(&mut rows, &mut index, &m.home_team);
        let ai = row_index(&mut rows, &mut index, &m.away_team);

        rows[hi].played += 1;
        rows[ai].played += 1;
        rows[hi].goals_for += m.home_score;
        rows[hi].goals_against += m.away_score;
        rows[ai].goals_for += m.away_score;
        rows[ai].goals_against += m.home_score;

        if m.home_score > m.away_score {
            rows[hi].wins += 1;
            rows[hi].points += 3;
            rows[ai].losses += 1;
        } else if m.away_score > m.home_score {
            rows[ai].wins += 1;
            rows[ai].points += 3;
            rows[hi].losses += 1;
        } else {
            rows[hi].draws += 1;
            rows[hi].points += 1;
            rows[ai].draws += 1;
            rows[ai].points += 1;
        }
    }

    for row in &mut rows {
        row.goal_difference = row.goals_for as i32 - row.goals_against as i32;
    }

    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.goal_difference.cmp(&a.goal_difference))
            .then(b.goals_for.cmp(&a.goals_for))
    });
    rows
}
