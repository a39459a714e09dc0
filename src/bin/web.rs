//! Single binary web server: JSON REST API over the tournament core.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default so the app is reachable via DNS on a VPS.
//! Override with env: HOST (e.g. 0.0.0.0), PORT (e.g. 8080).

use actix_web::{
    delete, get, post,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{DateTime, Utc};
use pickup_tournament_web::{
    apply_schedule, compute_standings, current_round, delete_manual_match, finalize_event,
    generate_fixtures, record_manual_match, refinalize_event, submit_round, AwardLedger, Event,
    EventId, EventMode, MatchId, ParticipantId, RoundState, ScheduleConfig, ScoreEntry, Team,
    TeamMembership, TournamentError,
};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Per-event entry: event data, its roster, and last activity time (for
/// auto-cleanup).
struct EventEntry {
    event: Event,
    roster: Vec<TeamMembership>,
    last_activity: Instant,
}

/// Everything behind one lock: events by id plus the global award ledger.
/// Each handler takes the write lock for its whole transition, so a logical
/// step (round submit, finalize) is never observable half-applied.
struct Registry {
    events: HashMap<EventId, EventEntry>,
    awards: AwardLedger,
}

type AppState = Data<RwLock<Registry>>;

/// Inactivity threshold: events not accessed for this long are removed.
const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(12 * 3600);

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct CreateEventBody {
    name: String,
    #[serde(default)]
    mode: EventMode,
    #[serde(default)]
    teams: Vec<Team>,
}

#[derive(Deserialize)]
struct ScheduleBody {
    duration_minutes: u32,
    #[serde(default = "default_warmup")]
    warmup_minutes: u32,
    #[serde(default = "default_match_length")]
    match_length_minutes: u32,
    #[serde(default = "default_fields")]
    fields: usize,
    /// Optional absolute event start; when present, previews carry kickoffs.
    start_time: Option<DateTime<Utc>>,
}

fn default_warmup() -> u32 {
    10
}

fn default_match_length() -> u32 {
    10
}

fn default_fields() -> usize {
    1
}

impl ScheduleBody {
    fn config(&self) -> ScheduleConfig {
        ScheduleConfig {
            event_duration_minutes: self.duration_minutes,
            warmup_minutes: self.warmup_minutes,
            match_length_minutes: self.match_length_minutes,
            concurrent_fields: self.fields,
        }
    }
}

/// A round as previewed to the admin, with kickoff resolved when the event
/// start was supplied.
#[derive(Serialize)]
struct RoundPreview {
    number: u32,
    offset_minutes: u32,
    kickoff: Option<DateTime<Utc>>,
    pairings: Vec<(String, String)>,
}

#[derive(Deserialize)]
struct ScoreBody {
    match_id: MatchId,
    home: i64,
    away: i64,
}

#[derive(Deserialize)]
struct SubmitRoundBody {
    #[serde(default)]
    scores: Vec<ScoreBody>,
}

#[derive(Deserialize)]
struct ManualMatchBody {
    home_team: String,
    away_team: String,
    #[serde(default)]
    home_score: i64,
    #[serde(default)]
    away_score: i64,
}

#[derive(Deserialize)]
struct RosterAssignBody {
    participant_id: ParticipantId,
    team: String,
}

#[derive(Deserialize)]
struct FinalizeBody {
    /// Omitted: the top standings row wins.
    winning_team: Option<String>,
    mvp_player_id: Option<ParticipantId>,
}

#[derive(Deserialize)]
struct RefinalizeBody {
    #[serde(default)]
    score_overrides: Vec<ScoreBody>,
    mvp_player_id: Option<ParticipantId>,
}

/// Path segment: event id (e.g. /api/events/{id})
#[derive(Deserialize)]
struct EventPath {
    id: EventId,
}

#[derive(Deserialize)]
struct EventTeamPath {
    id: EventId,
    team: String,
}

#[derive(Deserialize)]
struct EventMatchPath {
    id: EventId,
    match_id: MatchId,
}

#[derive(Deserialize)]
struct EventRoundPath {
    id: EventId,
    round: u32,
}

#[derive(Deserialize)]
struct ParticipantPath {
    participant_id: ParticipantId,
}

fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "error": "No event" }))
}

fn bad_request(e: TournamentError) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

/// Convert raw score bodies into validated entries, rejecting negatives
/// before any state is touched.
fn parse_scores(scores: &[ScoreBody]) -> Result<HashMap<MatchId, ScoreEntry>, TournamentError> {
    let mut out = HashMap::with_capacity(scores.len());
    for s in scores {
        out.insert(s.match_id, ScoreEntry::new(s.home, s.away)?);
    }
    Ok(out)
}

fn event_json(entry: &EventEntry) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "event": entry.event,
        "roster": entry.roster,
    }))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "pickup-tournament-web",
    })
}

/// Create a new event (returns it with id; client stores id for subsequent requests).
#[post("/api/events")]
async fn api_create_event(state: AppState, body: Json<CreateEventBody>) -> HttpResponse {
    let body = body.into_inner();
    let event = match Event::new(body.name, body.teams, body.mode) {
        Ok(e) => e,
        Err(e) => return bad_request(e),
    };
    let id = event.id;
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.events.insert(
        id,
        EventEntry {
            event,
            roster: Vec::new(),
            last_activity: Instant::now(),
        },
    );
    event_json(g.events.get(&id).unwrap())
}

/// Get an event by id (404 if not found). Touching it refreshes last_activity.
#[get("/api/events/{id}")]
async fn api_get_event(state: AppState, path: Path<EventPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.events.get_mut(&path.id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            event_json(entry)
        }
        None => not_found(),
    }
}

/// Delete an event; its matches and roster go with it.
#[delete("/api/events/{id}")]
async fn api_delete_event(state: AppState, path: Path<EventPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.events.remove(&path.id) {
        Some(_) => HttpResponse::Ok().json(serde_json::json!({ "deleted": true })),
        None => not_found(),
    }
}

/// Add a team (only before any match exists).
#[post("/api/events/{id}/teams")]
async fn api_add_team(state: AppState, path: Path<EventPath>, body: Json<Team>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.events.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    match entry.event.add_team(body.into_inner()) {
        Ok(()) => event_json(entry),
        Err(e) => bad_request(e),
    }
}

/// Remove a team by name (only before any match exists).
#[delete("/api/events/{id}/teams/{team}")]
async fn api_remove_team(state: AppState, path: Path<EventTeamPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.events.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    match entry.event.remove_team(&path.team) {
        Ok(()) => event_json(entry),
        Err(e) => bad_request(e),
    }
}

/// Preview a schedule for the event's teams without persisting anything.
#[post("/api/events/{id}/schedule/preview")]
async fn api_preview_schedule(
    state: AppState,
    path: Path<EventPath>,
    body: Json<ScheduleBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.events.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    match generate_fixtures(&entry.event.teams, &body.config()) {
        Ok(rounds) => {
            let preview: Vec<RoundPreview> = rounds
                .iter()
                .map(|r| RoundPreview {
                    number: r.number,
                    offset_minutes: r.offset_minutes,
                    kickoff: body.start_time.map(|start| r.kickoff(start)),
                    pairings: r.pairings.clone(),
                })
                .collect();
            HttpResponse::Ok().json(preview)
        }
        Err(e) => bad_request(e),
    }
}

/// Generate fixtures and persist them as scheduled matches.
#[post("/api/events/{id}/schedule")]
async fn api_apply_schedule(
    state: AppState,
    path: Path<EventPath>,
    body: Json<ScheduleBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.events.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let result = generate_fixtures(&entry.event.teams, &body.config())
        .and_then(|rounds| apply_schedule(&mut entry.event, &rounds));
    match result {
        Ok(()) => event_json(entry),
        Err(e) => bad_request(e),
    }
}

/// Current round state plus the matches of that round.
#[get("/api/events/{id}/round")]
async fn api_current_round(state: AppState, path: Path<EventPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.events.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    let state_now = current_round(&entry.event);
    let matches: Vec<_> = match state_now {
        RoundState::InRound(r) => entry
            .event
            .matches
            .iter()
            .filter(|m| m.round_number == r)
            .collect(),
        _ => Vec::new(),
    };
    HttpResponse::Ok().json(serde_json::json!({
        "state": state_now,
        "matches": matches,
    }))
}

/// Submit scores for one round; untouched matches close as 0-0.
#[post("/api/events/{id}/rounds/{round}/submit")]
async fn api_submit_round(
    state: AppState,
    path: Path<EventRoundPath>,
    body: Json<SubmitRoundBody>,
) -> HttpResponse {
    let scores = match parse_scores(&body.scores) {
        Ok(s) => s,
        Err(e) => return bad_request(e),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.events.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    match submit_round(&mut entry.event, path.round, &scores) {
        Ok(next) => HttpResponse::Ok().json(serde_json::json!({
            "state": next,
            "event": entry.event,
        })),
        Err(e) => bad_request(e),
    }
}

/// Record a completed match directly (manual mode only).
#[post("/api/events/{id}/matches")]
async fn api_record_match(
    state: AppState,
    path: Path<EventPath>,
    body: Json<ManualMatchBody>,
) -> HttpResponse {
    let score = match ScoreEntry::new(body.home_score, body.away_score) {
        Ok(s) => s,
        Err(e) => return bad_request(e),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.events.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    match record_manual_match(&mut entry.event, &body.home_team, &body.away_team, score) {
        Ok(_) => event_json(entry),
        Err(e) => bad_request(e),
    }
}

/// Delete a manually recorded match.
#[delete("/api/events/{id}/matches/{match_id}")]
async fn api_delete_match(state: AppState, path: Path<EventMatchPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.events.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    match delete_manual_match(&mut entry.event, path.match_id) {
        Ok(()) => event_json(entry),
        Err(e) => bad_request(e),
    }
}

/// Live standings, recomputed from durable match state on every call.
#[get("/api/events/{id}/standings")]
async fn api_standings(state: AppState, path: Path<EventPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.events.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    HttpResponse::Ok().json(compute_standings(&entry.event.teams, &entry.event.matches))
}

/// Assign (or move) a participant to a team.
#[post("/api/events/{id}/roster")]
async fn api_assign_roster(
    state: AppState,
    path: Path<EventPath>,
    body: Json<RosterAssignBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.events.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    if !entry.event.has_team(&body.team) {
        return bad_request(TournamentError::UnknownTeam(body.team.clone()));
    }
    match entry
        .roster
        .iter_mut()
        .find(|m| m.participant_id == body.participant_id)
    {
        Some(membership) => {
            membership.team = body.team.clone();
            membership.is_winner = false;
        }
        None => entry
            .roster
            .push(TeamMembership::new(body.participant_id, body.team.clone())),
    }
    event_json(entry)
}

/// Shuffle the roster and deal participants across teams round-robin.
#[post("/api/events/{id}/roster/randomize")]
async fn api_randomize_roster(state: AppState, path: Path<EventPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let entry = match g.events.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    if entry.event.teams.is_empty() {
        return bad_request(TournamentError::InvalidState);
    }
    entry.roster.shuffle(&mut rand::thread_rng());
    let team_names: Vec<String> = entry.event.teams.iter().map(|t| t.name.clone()).collect();
    for (i, membership) in entry.roster.iter_mut().enumerate() {
        membership.team = team_names[i % team_names.len()].clone();
        membership.is_winner = false;
    }
    event_json(entry)
}

/// Finalize: flag winners on the roster, record the MVP, complete the event.
#[post("/api/events/{id}/finalize")]
async fn api_finalize(
    state: AppState,
    path: Path<EventPath>,
    body: Json<FinalizeBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let registry = &mut *g;
    let entry = match registry.events.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    match finalize_event(
        &mut entry.event,
        &mut entry.roster,
        &mut registry.awards,
        body.winning_team.as_deref(),
        body.mvp_player_id,
    ) {
        Ok(winner) => HttpResponse::Ok().json(serde_json::json!({
            "winner": winner,
            "event": entry.event,
            "roster": entry.roster,
        })),
        Err(e) => bad_request(e),
    }
}

/// Edit a finalized event: score overrides plus an optional MVP swap.
#[post("/api/events/{id}/refinalize")]
async fn api_refinalize(
    state: AppState,
    path: Path<EventPath>,
    body: Json<RefinalizeBody>,
) -> HttpResponse {
    let overrides = match parse_scores(&body.score_overrides) {
        Ok(s) => s,
        Err(e) => return bad_request(e),
    };
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let registry = &mut *g;
    let entry = match registry.events.get_mut(&path.id) {
        Some(e) => e,
        None => return not_found(),
    };
    entry.last_activity = Instant::now();
    match refinalize_event(
        &mut entry.event,
        &mut entry.roster,
        &mut registry.awards,
        &overrides,
        body.mvp_player_id,
    ) {
        Ok(winner) => HttpResponse::Ok().json(serde_json::json!({
            "winner": winner,
            "event": entry.event,
            "roster": entry.roster,
        })),
        Err(e) => bad_request(e),
    }
}

/// Cumulative MVP award count for one participant.
#[get("/api/awards/{participant_id}")]
async fn api_awards(state: AppState, path: Path<ParticipantPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(serde_json::json!({
        "participant_id": path.participant_id,
        "mvp_awards": g.awards.count(path.participant_id),
    }))
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(RwLock::new(Registry {
        events: HashMap::new(),
        awards: AwardLedger::new(),
    }));

    // Background task: every 30 minutes, remove events inactive for 12+ hours
    let state_cleanup = state.clone();
    actix_web::rt::spawn(async move {
        let mut interval = actix_web::rt::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.events.len();
            g.events
                .retain(|_, entry| entry.last_activity.elapsed() < INACTIVITY_TIMEOUT);
            let removed = before - g.events.len();
            if removed > 0 {
                log::info!("Cleaned up {} inactive event(s) (no activity for 12h)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(favicon)
            .service(api_create_event)
            .service(api_get_event)
            .service(api_delete_event)
            .service(api_add_team)
            .service(api_remove_team)
            .service(api_preview_schedule)
            .service(api_apply_schedule)
            .service(api_current_round)
            .service(api_submit_round)
            .service(api_record_match)
            .service(api_delete_match)
            .service(api_standings)
            .service(api_assign_roster)
            .service(api_randomize_roster)
            .service(api_finalize)
            .service(api_refinalize)
            .service(api_awards)
    })
    .bind(bind)?
    .run()
    .await
}
