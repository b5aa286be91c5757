//! Single binary web server: JSON API over the bracket contest library.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.
//! Season data: TOURNAMENT_CONFIG (JSON file) or TEAMS_CSV (seeded standard layout);
//! falls back to the built-in 64-team layout. Submission gate: STOP_SUBMIT_TOGGLE,
//! STOP_SUBMIT_DATE_TIME (RFC 3339). Config cache lifetime: CONFIG_CACHE_TTL_SECS.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use bracket_contest_web::{
    apply_scores, build_results, check_submission_allowed, load_teams_csv, reconcile_config, record_result,
    score_bracket, standings, validate_bracket_submission, Bracket, BracketError, BracketId, BracketSubmission,
    Game, SiteConfig, SlotRef, SystemClock, TournamentConfig, TtlCache,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::{Mutex, RwLock, RwLockWriteGuard};
use std::time::Duration;

/// Contest data kept in memory for the lifetime of the process.
struct ContestState {
    site: SiteConfig,
    /// Season config `results` was built from; reloads go through `reconcile_config`.
    config: TournamentConfig,
    brackets: Vec<Bracket>,
    /// Real tournament games.
    results: Vec<Game>,
}

type AppState = Data<RwLock<ContestState>>;

/// Where the season config is read from when the cache is cold.
#[derive(Clone, Default)]
struct ConfigSource {
    tournament_config: Option<PathBuf>,
    teams_csv: Option<PathBuf>,
}

type ConfigCache = Data<Mutex<TtlCache<&'static str, TournamentConfig, SystemClock>>>;

const CONFIG_KEY: &str = "tournament";

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct RecordResultBody {
    round: u32,
    game_number: u32,
    winner: String,
    #[serde(default)]
    score1: Option<u32>,
    #[serde(default)]
    score2: Option<u32>,
}

/// Path segment: bracket id (e.g. /api/brackets/{id})
#[derive(Deserialize)]
struct BracketPath {
    id: BracketId,
}

fn load_config(source: &ConfigSource) -> Result<TournamentConfig, BracketError> {
    if let Some(path) = &source.tournament_config {
        let body = std::fs::read_to_string(path)
            .map_err(|e| BracketError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        let config: TournamentConfig =
            serde_json::from_str(&body).map_err(|e| BracketError::InvalidConfig(e.to_string()))?;
        config.check()?;
        return Ok(config);
    }
    if let Some(path) = &source.teams_csv {
        let file = std::fs::File::open(path)
            .map_err(|e| BracketError::InvalidTeamData(format!("{}: {}", path.display(), e)))?;
        let teams = load_teams_csv(file)?;
        let base = TournamentConfig::ncaa_default();
        return TournamentConfig::standard(base.regions, &teams, base.rounds, base.start_date, base.end_date);
    }
    Ok(TournamentConfig::ncaa_default())
}

/// Season config through the cache; a failing source falls back to the built-in layout.
fn current_config(cache: &ConfigCache, source: &ConfigSource) -> TournamentConfig {
    let mut cache = match cache.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    if let Some(config) = cache.get(&CONFIG_KEY) {
        return config;
    }
    let config = load_config(source).unwrap_or_else(|e| {
        log::warn!("Using built-in tournament layout: {}", e);
        TournamentConfig::ncaa_default()
    });
    cache.set(CONFIG_KEY, config.clone());
    config
}

/// Write access to the contest after offering it the current season config.
fn synced_contest<'a>(
    state: &'a AppState,
    cache: &ConfigCache,
    source: &ConfigSource,
) -> Option<RwLockWriteGuard<'a, ContestState>> {
    let fresh = current_config(cache, source);
    let mut g = state.write().ok()?;
    let contest = &mut *g;
    reconcile_config(&mut contest.config, &mut contest.results, &mut contest.brackets, fresh);
    Some(g)
}

fn bad_request_body() -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({
        "success": false,
        "error": "Invalid bracket submission",
    }))
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "bracket-contest-web",
    })
}

/// Avoid 404 in browser tab: favicon not required for app logic.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Current season layout (regions, rounds, points, topology).
#[get("/api/tournament")]
async fn api_get_tournament(state: AppState, cache: ConfigCache, source: Data<ConfigSource>) -> HttpResponse {
    let g = match synced_contest(&state, &cache, &source) {
        Some(guard) => guard,
        None => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(&g.config)
}

/// Whether new brackets are accepted right now.
#[get("/api/submission-status")]
async fn api_submission_status(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(check_submission_allowed(&g.site, &SystemClock))
}

/// Validate without storing. An invalid bracket is still a successful response.
#[post("/api/brackets/validate")]
async fn api_validate_bracket(
    state: AppState,
    cache: ConfigCache,
    source: Data<ConfigSource>,
    body: String,
) -> HttpResponse {
    let submission = match BracketSubmission::from_json(&body) {
        Ok(s) => s,
        Err(e) => {
            log::info!("Rejected unparseable bracket: {}", e);
            return bad_request_body();
        }
    };
    let g = match synced_contest(&state, &cache, &source) {
        Some(guard) => guard,
        None => return HttpResponse::InternalServerError().body("lock error"),
    };
    match validate_bracket_submission(&g.config, &submission) {
        Ok(validation) => HttpResponse::Ok().json(serde_json::json!({ "success": true, "validation": validation })),
        Err(e) => {
            log::error!("Validation aborted: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({ "success": false, "error": "Tournament configuration unavailable" }))
        }
    }
}

/// Submit a bracket: gate, validate, and store it when valid (one per email).
#[post("/api/brackets")]
async fn api_create_bracket(
    state: AppState,
    cache: ConfigCache,
    source: Data<ConfigSource>,
    body: String,
) -> HttpResponse {
    let submission = match BracketSubmission::from_json(&body) {
        Ok(s) => s,
        Err(e) => {
            log::info!("Rejected unparseable bracket: {}", e);
            return bad_request_body();
        }
    };
    let mut g = match synced_contest(&state, &cache, &source) {
        Some(guard) => guard,
        None => return HttpResponse::InternalServerError().body("lock error"),
    };
    let status = check_submission_allowed(&g.site, &SystemClock);
    if !status.allowed {
        log::info!("Submission from {} blocked by gate", submission.player_email);
        return HttpResponse::Forbidden().json(serde_json::json!({
            "success": false,
            "allowed": false,
            "reason": status.reason,
        }));
    }

    let validation = match validate_bracket_submission(&g.config, &submission) {
        Ok(v) => v,
        Err(e) => {
            log::error!("Validation aborted: {}", e);
            return HttpResponse::InternalServerError()
                .json(serde_json::json!({ "success": false, "error": "Tournament configuration unavailable" }));
        }
    };
    if !validation.is_valid {
        log::info!(
            "Bracket from {} not accepted: {} error(s)",
            submission.player_email,
            validation.errors.len()
        );
        return HttpResponse::Ok().json(serde_json::json!({ "success": true, "validation": validation }));
    }

    let email = submission.player_email.trim();
    if g.brackets.iter().any(|b| b.player_email.eq_ignore_ascii_case(email)) {
        let e = BracketError::DuplicatePlayer(email.to_string());
        return HttpResponse::Conflict().json(serde_json::json!({ "success": false, "error": e.to_string() }));
    }

    let mut bracket = Bracket::from_submission(&submission, Utc::now());
    bracket.total_points = score_bracket(&g.config, &bracket, &g.results);
    log::info!("Accepted bracket {} from {}", bracket.id, bracket.player_email);
    g.brackets.push(bracket.clone());
    HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "validation": validation,
        "bracket": bracket,
    }))
}

/// Get a bracket by id (404 if not found).
#[get("/api/brackets/{id}")]
async fn api_get_bracket(state: AppState, path: Path<BracketPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.brackets.iter().find(|b| b.id == path.id) {
        Some(b) => HttpResponse::Ok().json(b),
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": BracketError::BracketNotFound(path.id).to_string() })),
    }
}

/// Leaderboard of public brackets.
#[get("/api/standings")]
async fn api_standings(state: AppState, cache: ConfigCache, source: Data<ConfigSource>) -> HttpResponse {
    let g = match synced_contest(&state, &cache, &source) {
        Some(guard) => guard,
        None => return HttpResponse::InternalServerError().body("lock error"),
    };
    let public: Vec<Bracket> = g.brackets.iter().filter(|b| b.is_public).cloned().collect();
    HttpResponse::Ok().json(standings(&g.config, &public, &g.results))
}

/// Real tournament games.
#[get("/api/results")]
async fn api_results(state: AppState) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(&g.results)
}

/// Record a real result and rescore every bracket.
#[put("/api/admin/results")]
async fn api_admin_record_result(
    state: AppState,
    cache: ConfigCache,
    source: Data<ConfigSource>,
    body: Json<RecordResultBody>,
) -> HttpResponse {
    let mut g = match synced_contest(&state, &cache, &source) {
        Some(guard) => guard,
        None => return HttpResponse::InternalServerError().body("lock error"),
    };
    let slot = SlotRef::new(body.round, body.game_number);
    let contest = &mut *g;
    if let Err(e) = record_result(&contest.config, &mut contest.results, slot, &body.winner, body.score1, body.score2) {
        return HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }));
    }
    apply_scores(&contest.config, &mut contest.brackets, &contest.results);
    HttpResponse::Ok().json(&contest.results)
}

/// Replace the submission gate settings.
#[put("/api/admin/site-config")]
async fn api_admin_site_config(state: AppState, body: Json<SiteConfig>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.site = body.into_inner();
    log::info!(
        "Site config updated: stop_submit_toggle={}, stop_submit_date_time={:?}",
        g.site.stop_submit_toggle,
        g.site.stop_submit_date_time
    );
    HttpResponse::Ok().json(serde_json::json!({
        "site": &g.site,
        "status": check_submission_allowed(&g.site, &SystemClock),
    }))
}

/// Remove a bracket by id.
#[delete("/api/admin/brackets/{id}")]
async fn api_admin_delete_bracket(state: AppState, path: Path<BracketPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let before = g.brackets.len();
    g.brackets.retain(|b| b.id != path.id);
    if g.brackets.len() == before {
        return HttpResponse::NotFound().json(serde_json::json!({ "error": BracketError::BracketNotFound(path.id).to_string() }));
    }
    HttpResponse::NoContent().finish()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_cache_ttl_secs() -> i64 {
    300
}

fn site_config_from_env() -> SiteConfig {
    let stop_submit_toggle = std::env::var("STOP_SUBMIT_TOGGLE")
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);
    let stop_submit_date_time = std::env::var("STOP_SUBMIT_DATE_TIME").ok().and_then(|v| {
        match DateTime::parse_from_rfc3339(v.trim()) {
            Ok(dt) => Some(dt.with_timezone(&Utc)),
            Err(e) => {
                log::warn!("Ignoring STOP_SUBMIT_DATE_TIME '{}': {}", v, e);
                None
            }
        }
    });
    SiteConfig {
        stop_submit_toggle,
        stop_submit_date_time,
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let ttl_secs = std::env::var("CONFIG_CACHE_TTL_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(default_cache_ttl_secs);
    let source = ConfigSource {
        tournament_config: std::env::var_os("TOURNAMENT_CONFIG").map(PathBuf::from),
        teams_csv: std::env::var_os("TEAMS_CSV").map(PathBuf::from),
    };
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let cache: ConfigCache = Data::new(Mutex::new(TtlCache::new(chrono::Duration::seconds(ttl_secs), SystemClock)));
    let config = current_config(&cache, &source);
    log::info!(
        "Season {} to {}: {} teams, {} rounds",
        config.start_date,
        config.end_date,
        config.total_teams,
        config.rounds.len()
    );

    let state = Data::new(RwLock::new(ContestState {
        site: site_config_from_env(),
        results: build_results(&config),
        config,
        brackets: Vec::new(),
    }));
    let source = Data::new(source);

    // Background task: every 30 minutes, drop the config if it has gone stale
    let cache_cleanup = cache.clone();
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(30 * 60));
        loop {
            interval.tick().await;
            let mut c = match cache_cleanup.lock() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let removed = c.purge_expired();
            if removed > 0 {
                log::info!("Expired {} cached config entr(ies)", removed);
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .app_data(cache.clone())
            .app_data(source.clone())
            .service(api_health)
            .service(favicon)
            .service(api_get_tournament)
            .service(api_submission_status)
            .service(api_validate_bracket)
            .service(api_create_bracket)
            .service(api_get_bracket)
            .service(api_standings)
            .service(api_results)
            .service(api_admin_record_result)
            .service(api_admin_site_config)
            .service(api_admin_delete_bracket)
    })
    .bind(bind)?
    .run()
    .await
}
