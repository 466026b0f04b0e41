//! Single binary web server: REST API over the tournament engine with an
//! in-memory store. Run with: cargo run --bin web
//! Listens on 0.0.0.0:8080 by default. Override with env: HOST, PORT.

use actix_web::{
    delete, get, post, put,
    web::{Data, Json, Path, Query},
    App, HttpResponse, HttpServer, Responder,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use sportsfest_web::logic::{eligibility, standings};
use sportsfest_web::{
    create_match, delete_match, update_match, CreateMatchRequest, EngineError, EventId,
    EventWindow, Gender, GenderResolver, InMemoryStore, MatchSeq, MatchType, Participant, Player,
    PlayerId, Sport, SportType, Store, TeamRoster, UpdateMatchRequest,
};
use std::sync::RwLock;
use uuid::Uuid;

/// Engine state: the store plus the gender lookup cache, guarded together by
/// one lock so every match write is a single-writer unit of work.
struct AppState {
    store: InMemoryStore,
    genders: GenderResolver,
}

type SharedState = Data<RwLock<AppState>>;

#[derive(serde::Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

#[derive(Deserialize)]
struct EventWindowBody {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Deserialize)]
struct RegisterPlayerBody {
    name: String,
    gender: Gender,
    /// Client-supplied id, e.g. when syncing from a roster sheet; generated
    /// when absent.
    id: Option<PlayerId>,
}

#[derive(Deserialize)]
struct RegisterSportBody {
    name: String,
    sport_type: SportType,
    #[serde(default)]
    teams: Vec<TeamRoster>,
    #[serde(default)]
    players: Vec<PlayerId>,
}

#[derive(Deserialize)]
struct CreateMatchBody {
    match_type: MatchType,
    participants: Vec<Participant>,
    match_date: NaiveDate,
}

#[derive(Deserialize)]
struct GenderQuery {
    gender: Gender,
}

/// Path segment: event year (e.g. /api/events/{event}/...)
#[derive(Deserialize)]
struct EventPath {
    event: EventId,
}

/// Path segments: event year and sport name.
#[derive(Deserialize)]
struct SportPath {
    event: EventId,
    sport: String,
}

/// Path segments: event year, sport name, and match sequence number.
#[derive(Deserialize)]
struct MatchPath {
    event: EventId,
    sport: String,
    seq: MatchSeq,
}

fn error_response(e: &EngineError) -> HttpResponse {
    let body = serde_json::json!({ "error": e.to_string() });
    if e.is_not_found() {
        HttpResponse::NotFound().json(body)
    } else {
        HttpResponse::BadRequest().json(body)
    }
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "sportsfest-web",
    })
}

/// Configure the event's date window for the year.
#[put("/api/events/{event}/window")]
async fn api_put_event_window(
    state: SharedState,
    path: Path<EventPath>,
    body: Json<EventWindowBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let window = EventWindow {
        start: body.start,
        end: body.end,
    };
    match g.store.put_event_window(path.event, window) {
        Ok(()) => HttpResponse::Ok().json(window),
        Err(e) => error_response(&e),
    }
}

/// Register a player (gender feeds bracket partitioning).
#[post("/api/players")]
async fn api_register_player(state: SharedState, body: Json<RegisterPlayerBody>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let body = body.into_inner();
    let player = Player {
        id: body.id.unwrap_or_else(Uuid::new_v4),
        name: body.name,
        gender: body.gender,
    };
    match g.store.put_player(player.clone()) {
        Ok(()) => HttpResponse::Ok().json(player),
        Err(e) => error_response(&e),
    }
}

/// Register (or replace) a sport and its roster for an event. Cached gender
/// lookups for the sport are dropped, since roster edits can change a
/// team's bucket.
#[post("/api/events/{event}/sports")]
async fn api_register_sport(
    state: SharedState,
    path: Path<EventPath>,
    body: Json<RegisterSportBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let body = body.into_inner();
    let mut sport = Sport::new(body.name, path.event, body.sport_type);
    sport.teams = body.teams;
    sport.players = body.players;
    let name = sport.name.clone();
    match g.store.put_sport(sport.clone()) {
        Ok(()) => {
            g.genders.invalidate(&name, path.event);
            HttpResponse::Ok().json(sport)
        }
        Err(e) => error_response(&e),
    }
}

/// All matches of a sport/event, both gender brackets, in sequence order.
#[get("/api/events/{event}/sports/{sport}/matches")]
async fn api_list_matches(state: SharedState, path: Path<SportPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    HttpResponse::Ok().json(g.store.matches(&path.sport, path.event))
}

/// One match by sequence number.
#[get("/api/events/{event}/sports/{sport}/matches/{seq}")]
async fn api_get_match(state: SharedState, path: Path<MatchPath>) -> HttpResponse {
    let g = match state.read() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.store.match_by_seq(&path.sport, path.event, path.seq) {
        Some(m) => HttpResponse::Ok().json(m),
        None => error_response(&EngineError::MatchNotFound(path.seq)),
    }
}

/// Schedule a new match (validated by the progression state machine).
#[post("/api/events/{event}/sports/{sport}/matches")]
async fn api_create_match(
    state: SharedState,
    path: Path<SportPath>,
    body: Json<CreateMatchBody>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let body = body.into_inner();
    let req = CreateMatchRequest {
        sport: path.sport.clone(),
        event: path.event,
        match_type: body.match_type,
        participants: body.participants,
        match_date: body.match_date,
    };
    let st = &mut *g;
    match create_match(&mut st.store, &mut st.genders, req) {
        Ok(m) => HttpResponse::Ok().json(m),
        Err(e) => error_response(&e),
    }
}

/// Update a match: move its date or record a result.
#[put("/api/events/{event}/sports/{sport}/matches/{seq}")]
async fn api_update_match(
    state: SharedState,
    path: Path<MatchPath>,
    body: Json<UpdateMatchRequest>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let today = Utc::now().date_naive();
    match update_match(
        &mut g.store,
        &path.sport,
        path.event,
        path.seq,
        body.into_inner(),
        today,
    ) {
        Ok(m) => HttpResponse::Ok().json(m),
        Err(e) => error_response(&e),
    }
}

/// Remove a match (only while still scheduled).
#[delete("/api/events/{event}/sports/{sport}/matches/{seq}")]
async fn api_delete_match(state: SharedState, path: Path<MatchPath>) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match delete_match(&mut g.store, &path.sport, path.event, path.seq) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

/// Eligible participant picker for a new knockout/final match.
#[get("/api/events/{event}/sports/{sport}/eligible")]
async fn api_eligible(
    state: SharedState,
    path: Path<SportPath>,
    query: Query<GenderQuery>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let st = &mut *g;
    let sport = match st.store.sport(&path.sport, path.event) {
        Some(s) => s,
        None => return error_response(&EngineError::SportNotFound(path.sport.clone())),
    };
    let list = eligibility::eligible(&st.store, &mut st.genders, &sport, query.gender);
    HttpResponse::Ok().json(list)
}

/// Ranked points table for one gender bracket.
#[get("/api/events/{event}/sports/{sport}/standings")]
async fn api_standings(
    state: SharedState,
    path: Path<SportPath>,
    query: Query<GenderQuery>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let st = &mut *g;
    let sport = match st.store.sport(&path.sport, path.event) {
        Some(s) => s,
        None => return error_response(&EngineError::SportNotFound(path.sport.clone())),
    };
    let table = standings::standings(&st.store, &mut st.genders, &sport, query.gender);
    HttpResponse::Ok().json(table)
}

/// Rebuild the points table for one gender bracket from league history.
/// Idempotent; safe to invoke at any time.
#[post("/api/events/{event}/sports/{sport}/standings/recompute")]
async fn api_recompute_standings(
    state: SharedState,
    path: Path<SportPath>,
    query: Query<GenderQuery>,
) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    let st = &mut *g;
    let sport = match st.store.sport(&path.sport, path.event) {
        Some(s) => s,
        None => return error_response(&EngineError::SportNotFound(path.sport.clone())),
    };
    match standings::recompute(&mut st.store, &mut st.genders, &sport, query.gender) {
        Ok(report) => {
            log::info!(
                "recomputed standings for {}/{}: {} matches, {} errors",
                path.sport,
                path.event,
                report.processed,
                report.errors
            );
            HttpResponse::Ok().json(report)
        }
        Err(e) => error_response(&e),
    }
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

    let state = Data::new(RwLock::new(AppState {
        store: InMemoryStore::new(),
        genders: GenderResolver::new(),
    }));

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .service(api_health)
            .service(api_put_event_window)
            .service(api_register_player)
            .service(api_register_sport)
            .service(api_list_matches)
            .service(api_get_match)
            .service(api_create_match)
            .service(api_update_match)
            .service(api_delete_match)
            .service(api_eligible)
            .service(api_standings)
            .service(api_recompute_standings)
    })
    .bind(bind)?
    .run()
    .await
}
