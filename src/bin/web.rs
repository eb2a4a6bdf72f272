//! Single binary web server exposing the ladder as a JSON API.
//! Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default.
//! Override with env: HOST, PORT, plus the LADDER_* settings read by `LadderConfig::from_env`.
//! Set LADDER_ROSTER to a CSV file (id,tier,wins,losses,goals_for,goals_against,rank) to seed players at startup.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path},
    App, HttpResponse, HttpServer,
};
use serde::{Deserialize, Serialize};
use tier_ladder::{logic::parse_roster, InitialStats, Ladder, LadderConfig, LadderError, StatsUpdate};

/// One ladder shared by every worker.
type AppState = Data<Ladder>;

#[derive(Deserialize)]
struct AddPlayerBody {
    id: String,
    tier: String,
    #[serde(flatten)]
    stats: InitialStats,
}

#[derive(Deserialize)]
struct ScoreBody {
    player1: String,
    score1: u32,
    player2: String,
    score2: u32,
}

#[derive(Deserialize)]
struct UndoBody {
    player1: String,
    player2: String,
}

/// Path segment: player id (e.g. /api/players/{id})
#[derive(Deserialize)]
struct PlayerPath {
    id: String,
}

/// Path segment: tier name, URL-encoded (e.g. /api/tiers/Gold%201)
#[derive(Deserialize)]
struct TierPath {
    tier: String,
}

fn error_response(e: &LadderError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    match e {
        LadderError::NotFound(_) | LadderError::NoMatchFound(..) => HttpResponse::NotFound().json(body),
        LadderError::Storage(_) => {
            log::error!("{}", e);
            HttpResponse::InternalServerError().json(body)
        }
        _ => HttpResponse::BadRequest().json(body),
    }
}

fn respond<T: Serialize>(result: Result<T, LadderError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(value),
        Err(e) => error_response(&e),
    }
}

/// Add a player to a tier, optionally with starting stats and rank.
#[post("/api/players")]
async fn api_add_player(state: AppState, body: Json<AddPlayerBody>) -> HttpResponse {
    let body = body.into_inner();
    respond(state.add_player(&body.id, &body.tier, Some(body.stats)))
}

#[get("/api/players/{id}")]
async fn api_get_player(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    respond(state.get_player(&path.id))
}

/// Remove a player and cascade ranks down through the tiers.
#[delete("/api/players/{id}")]
async fn api_remove_player(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    respond(state.remove_player(&path.id))
}

/// Manually update a player's stats, tier or rank.
#[put("/api/players/{id}/stats")]
async fn api_set_stats(state: AppState, path: Path<PlayerPath>, body: Json<StatsUpdate>) -> HttpResponse {
    respond(state.set_stats(&path.id, body.into_inner()))
}

#[get("/api/players/{id}/matches")]
async fn api_match_history(state: AppState, path: Path<PlayerPath>) -> HttpResponse {
    respond(state.match_history(&path.id))
}

/// Submit a match score.
#[post("/api/matches")]
async fn api_submit_score(state: AppState, body: Json<ScoreBody>) -> HttpResponse {
    respond(state.submit_score(&body.player1, body.score1, &body.player2, body.score2))
}

/// Undo the most recent match between two players.
#[post("/api/matches/undo")]
async fn api_undo_match(state: AppState, body: Json<UndoBody>) -> HttpResponse {
    respond(state.undo_last_match(&body.player1, &body.player2))
}

/// Overview of all tiers and their players.
#[get("/api/tiers")]
async fn api_overview(state: AppState) -> HttpResponse {
    respond(state.overview())
}

#[get("/api/tiers/{tier}")]
async fn api_get_tier(state: AppState, path: Path<TierPath>) -> HttpResponse {
    respond(state.get_tier(&path.tier))
}

#[get("/api/tiers/{tier}/matchups")]
async fn api_matchups(state: AppState, path: Path<TierPath>) -> HttpResponse {
    respond(state.get_matchups(&path.tier))
}

/// Current round bracket for a tier.
#[get("/api/tiers/{tier}/bracket")]
async fn api_bracket(state: AppState, path: Path<TierPath>) -> HttpResponse {
    respond(state.bracket(&path.tier))
}

/// Process promotions and demotions for one tier.
#[post("/api/tiers/{tier}/finalize")]
async fn api_finalize_tier(state: AppState, path: Path<TierPath>) -> HttpResponse {
    respond(state.finalize_tier(&path.tier))
}

/// Process every tier at once, merge pending players and take the snapshot.
#[post("/api/ladder/finalize")]
async fn api_finalize_ladder(state: AppState) -> HttpResponse {
    respond(state.finalize_ladder())
}

#[get("/api/snapshot")]
async fn api_snapshot(state: AppState) -> HttpResponse {
    respond(state.get_snapshot())
}

#[get("/api/snapshot.csv")]
async fn api_snapshot_csv(state: AppState) -> HttpResponse {
    match state.get_snapshot().and_then(|s| s.to_csv()) {
        Ok(csv) => HttpResponse::Ok().content_type("text/csv; charset=utf-8").body(csv),
        Err(e) => error_response(&e),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn seed_from_env(ladder: &Ladder) -> std::io::Result<()> {
    let Ok(path) = std::env::var("LADDER_ROSTER") else {
        return Ok(());
    };
    let file = std::fs::File::open(&path)?;
    let entries = parse_roster(file).map_err(std::io::Error::other)?;
    let added = ladder.seed_roster(&entries).map_err(std::io::Error::other)?;
    log::info!("Seeded {} players from {}", added.len(), path);
    Ok(())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = LadderConfig::from_env().map_err(std::io::Error::other)?;
    log::info!(
        "Ladder: {} tiers of {}, promotion at {} wins, demotion at {} losses, bottom policy {:?}",
        config.tiers.len(),
        config.capacity,
        config.promotion_threshold,
        config.demotion_threshold,
        config.bottom_demotion
    );
    let ladder = Ladder::in_memory(config);
    seed_from_env(&ladder)?;

    let host = std::env::var("HOST").unwrap_or_else(|_| default_host());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or_else(default_port);
    let bind = (host.as_str(), port);
    log::info!("Starting server at http://{}:{}", bind.0, bind.1);

    let state = Data::new(ladder);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_add_player)
            .service(api_get_player)
            .service(api_remove_player)
            .service(api_set_stats)
            .service(api_match_history)
            .service(api_submit_score)
            .service(api_undo_match)
            .service(api_overview)
            .service(api_get_tier)
            .service(api_matchups)
            .service(api_bracket)
            .service(api_finalize_tier)
            .service(api_finalize_ladder)
            .service(api_snapshot)
            .service(api_snapshot_csv)
    })
    .bind(bind)?
    .run()
    .await
}
