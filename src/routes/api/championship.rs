use log::error;
use rocket::http::uri::Origin;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{get, post};
use serde::Deserialize;

use crate::macros::database_error_handeler::db_handle_get_error_http;
use crate::macros::request_caching::{cache_response, read_cache_request};
use crate::modules::models::championship::{Championship, NewChampionship};
use crate::modules::models::general::{establish_connection, try_establish_connection};
use crate::modules::models::season::Season;
use crate::modules::redis::Redis;

#[get("/championships/all")]
pub fn get_all(origin: &Origin) -> Result<String, Status> {
    read_cache_request!(origin);

    // an unreachable store degrades to an empty list as well, the
    // degraded response is not cached so it disappears on recovery
    let mut conn = match try_establish_connection() {
        Ok(conn) => conn,
        Err(error) => {
            error!(target:"routes/api/championship:get_all", "Error connecting to database: {}", error);
            return Ok("[]".to_string());
        }
    };
    let conn = &mut conn;
    let championships = match Championship::get_all(conn) {
        Ok(championships) => championships,
        Err(error) => {
            error!(target:"routes/api/championship:get_all", "Error getting championships: {}", error);
            Vec::new()
        }
    };

    cache_response!(origin, serde_json::to_string(&championships).unwrap());
}

/// # all championships of one season
#[get("/championships/season/<season_id>")]
pub fn from_season(season_id: i32) -> Result<String, Status> {
    let conn = &mut establish_connection();

    db_handle_get_error_http!(
        Season::get_by_id(conn, season_id),
        "routes/api/championship:from_season",
        "season"
    );

    let championships = db_handle_get_error_http!(
        Championship::from_season(conn, season_id),
        "routes/api/championship:from_season",
        "championships"
    );

    Ok(serde_json::to_string(&championships).unwrap())
}

/// # current standings of one championship
/// standings are recomputed from the results table on every uncached
/// read. a store failure degrades to an empty list, a missing
/// championship is a 404.
#[get("/championships/<championship_id>/standings")]
pub fn get_standings(championship_id: i32, origin: &Origin) -> Result<String, Status> {
    read_cache_request!(origin);

    let mut conn = match try_establish_connection() {
        Ok(conn) => conn,
        Err(error) => {
            error!(target:"routes/api/championship:get_standings", "Error connecting to database: {}", error);
            return Ok("[]".to_string());
        }
    };
    let conn = &mut conn;
    let championship = db_handle_get_error_http!(
        Championship::get_by_id(conn, championship_id),
        "routes/api/championship:get_standings",
        "championship"
    );

    let standings = match championship.get_standings(conn) {
        Ok(standings) => standings,
        Err(error) => {
            error!(target:"routes/api/championship:get_standings", "Error computing standings: {}", error);
            Vec::new()
        }
    };

    cache_response!(origin, serde_json::to_string(&standings).unwrap());
}

#[derive(Deserialize)]
pub struct NewChampionshipForm {
    pub season_id: i32,
    pub name: String,
    pub game: String,
    pub platform: String,
    pub description: Option<String>,
}

#[post("/championships", data = "<form>")]
pub fn create(form: Json<NewChampionshipForm>) -> Result<String, Status> {
    let form = form.into_inner();
    let conn = &mut establish_connection();

    // the season has to exist before a championship can hang off it
    db_handle_get_error_http!(
        Season::get_by_id(conn, form.season_id),
        "routes/api/championship:create",
        "season"
    );

    let championship = db_handle_get_error_http!(
        Championship::new(
            conn,
            NewChampionship {
                season_id: form.season_id,
                name: form.name,
                game: form.game,
                platform: form.platform,
                description: form.description,
            },
        ),
        "routes/api/championship:create",
        "championship"
    );

    Ok(serde_json::to_string(&championship).unwrap())
}
