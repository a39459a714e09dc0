//! Integration tests for fixture generation and schedule application.

use chrono::{TimeZone, Utc};
use pickup_tournament_web::{
    apply_schedule, generate_fixtures, Event, EventMode, MatchStatus, ScheduleConfig, Team,
    TournamentError,
};
use std::collections::HashSet;

fn teams(names: &[&str]) -> Vec<Team> {
    names.iter().map(|n| Team::new(*n, "")).collect()
}

fn config(duration: u32, warmup: u32, match_len: u32, fields: usize) -> ScheduleConfig {
    ScheduleConfig {
        event_duration_minutes: duration,
        warmup_minutes: warmup,
        match_length_minutes: match_len,
        concurrent_fields: fields,
    }
}

/// Unordered pairs scheduled across all rounds.
fn all_pairs(rounds: &[pickup_tournament_web::Round]) -> Vec<(String, String)> {
    rounds
        .iter()
        .flat_map(|r| r.pairings.iter())
        .map(|(h, a)| {
            if h < a {
                (h.clone(), a.clone())
            } else {
                (a.clone(), h.clone())
            }
        })
        .collect()
}

#[test]
fn three_teams_one_field_produces_three_rounds() {
    // 60 min - 10 warmup = 5 slots of 10 min, but only 3 rotations exist.
    let rounds = generate_fixtures(&teams(&["Red", "Blue", "Green"]), &config(60, 10, 10, 1))
        .unwrap();
    assert_eq!(rounds.len(), 3);
    assert_eq!(
        rounds[0].pairings,
        vec![("Red".to_string(), "Blue".to_string())]
    );
    assert_eq!(
        rounds[1].pairings,
        vec![("Green".to_string(), "Red".to_string())]
    );
    assert_eq!(
        rounds[2].pairings,
        vec![("Blue".to_string(), "Green".to_string())]
    );
    assert_eq!(rounds[0].number, 1);
    assert_eq!(rounds[2].number, 3);
    assert_eq!(rounds[0].offset_minutes, 10);
    assert_eq!(rounds[1].offset_minutes, 20);
    assert_eq!(rounds[2].offset_minutes, 30);
}

#[test]
fn even_team_count_is_full_round_robin() {
    let names = ["A", "B", "C", "D"];
    let rounds = generate_fixtures(&teams(&names), &config(10_000, 0, 10, 10)).unwrap();
    assert_eq!(rounds.len(), 3); // n - 1

    let pairs = all_pairs(&rounds);
    let unique: HashSet<_> = pairs.iter().cloned().collect();
    assert_eq!(pairs.len(), 6); // C(4, 2)
    assert_eq!(unique.len(), 6);
}

#[test]
fn odd_team_count_gets_a_bye_round_each() {
    let names = ["A", "B", "C", "D", "E"];
    let rounds = generate_fixtures(&teams(&names), &config(10_000, 0, 10, 10)).unwrap();
    assert_eq!(rounds.len(), 5); // n rounds when n is odd

    let pairs = all_pairs(&rounds);
    let unique: HashSet<_> = pairs.iter().cloned().collect();
    assert_eq!(pairs.len(), 10); // C(5, 2)
    assert_eq!(unique.len(), 10);

    // Two pairs per rotation, one team sitting out.
    for round in &rounds {
        assert_eq!(round.pairings.len(), 2);
    }
}

#[test]
fn field_cap_drops_excess_pairs_without_duplicating() {
    let names = ["A", "B", "C", "D", "E", "F"];
    let wide = generate_fixtures(&teams(&names), &config(10_000, 0, 10, 3)).unwrap();
    let narrow = generate_fixtures(&teams(&names), &config(10_000, 0, 10, 1)).unwrap();

    for (w, n) in wide.iter().zip(narrow.iter()) {
        assert_eq!(w.pairings.len(), 3);
        assert_eq!(n.pairings.len(), 1);
        // The capped round keeps a prefix of the uncapped rotation.
        assert_eq!(&w.pairings[..1], &n.pairings[..]);
    }

    // Fewer fields never invents a pairing that the full rotation lacked,
    // and never repeats one from an earlier rotation.
    let narrow_pairs = all_pairs(&narrow);
    let unique: HashSet<_> = narrow_pairs.iter().cloned().collect();
    assert_eq!(narrow_pairs.len(), unique.len());
    let wide_pairs: HashSet<_> = all_pairs(&wide).into_iter().collect();
    assert!(unique.is_subset(&wide_pairs));
}

#[test]
fn no_rounds_when_no_time_fits() {
    let rounds = generate_fixtures(&teams(&["A", "B"]), &config(15, 10, 10, 1)).unwrap();
    assert!(rounds.is_empty());
}

#[test]
fn configuration_errors_fail_fast() {
    assert!(matches!(
        generate_fixtures(&teams(&["A"]), &config(60, 10, 10, 1)),
        Err(TournamentError::NotEnoughTeams { required: 2, got: 1 })
    ));
    assert!(matches!(
        generate_fixtures(&teams(&["A", "B"]), &config(60, 10, 0, 1)),
        Err(TournamentError::InvalidMatchLength)
    ));
    assert!(matches!(
        generate_fixtures(&teams(&["A", "B"]), &config(60, 10, 10, 0)),
        Err(TournamentError::InvalidFieldCount)
    ));
}

#[test]
fn kickoff_resolves_offset_against_event_start() {
    let rounds = generate_fixtures(&teams(&["A", "B"]), &config(60, 10, 15, 1)).unwrap();
    let start = Utc.with_ymd_and_hms(2025, 6, 1, 18, 0, 0).unwrap();
    assert_eq!(
        rounds[0].kickoff(start),
        Utc.with_ymd_and_hms(2025, 6, 1, 18, 10, 0).unwrap()
    );
}

#[test]
fn apply_schedule_creates_scheduled_matches() {
    let mut event = Event::new(
        "Tuesday 5s",
        teams(&["Red", "Blue", "Green"]),
        EventMode::RoundRobin,
    )
    .unwrap();
    let rounds = generate_fixtures(&event.teams, &config(60, 10, 10, 1)).unwrap();
    apply_schedule(&mut event, &rounds).unwrap();

    assert_eq!(event.matches.len(), 3);
    for m in &event.matches {
        assert_eq!(m.status, MatchStatus::Scheduled);
        assert_eq!(m.home_score, 0);
        assert_eq!(m.away_score, 0);
        assert!(!m.is_final);
        assert!(m.round_number >= 1 && m.round_number <= 3);
    }

    // Re-scheduling over existing fixtures means a new tournament: rejected.
    assert_eq!(
        apply_schedule(&mut event, &rounds),
        Err(TournamentError::InvalidState)
    );
}

#[test]
fn apply_schedule_rejects_unknown_pairings() {
    let mut event =
        Event::new("Pickup", teams(&["Red", "Blue"]), EventMode::RoundRobin).unwrap();
    let rounds =
        generate_fixtures(&teams(&["Red", "Purple"]), &config(60, 0, 10, 1)).unwrap();
    assert_eq!(
        apply_schedule(&mut event, &rounds),
        Err(TournamentError::UnknownTeam("Purple".to_string()))
    );
    assert!(event.matches.is_empty());
}

#[test]
fn teams_are_frozen_once_fixtures_exist() {
    let mut event =
        Event::new("Pickup", teams(&["Red", "Blue"]), EventMode::RoundRobin).unwrap();
    let rounds = generate_fixtures(&event.teams, &config(60, 0, 10, 1)).unwrap();
    apply_schedule(&mut event, &rounds).unwrap();

    assert_eq!(
        event.add_team(Team::new("Green", "")),
        Err(TournamentError::InvalidState)
    );
    assert_eq!(event.remove_team("Red"), Err(TournamentError::InvalidState));
}
