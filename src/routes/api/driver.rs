use log::error;
use rocket::http::uri::Origin;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{get, post};
use serde::{Deserialize, Serialize};

use json_response_derive::JsonResponse;

use crate::macros::database_error_handeler::db_handle_get_error_http;
use crate::macros::request_caching::{cache_response, read_cache_request};
use crate::modules::helpers::stats::StatsAggregator;
use crate::modules::models::championship::Championship;
use crate::modules::models::driver::{sanitize_name, Driver, DriverStats, NewDriver};
use crate::modules::models::event::Event;
use crate::modules::models::general::{establish_connection, try_establish_connection};
use crate::modules::models::race_result::RaceResult;
use crate::modules::redis::Redis;

/**************************************************************************************************/
/**************** ROUTES **************************************************************************/
/**************************************************************************************************/

/// # list every driver with its statistics
/// degrades to an empty list when the store cannot be reached; a
/// broken statistics widget must not take the page down with it.
#[get("/drivers/all")]
pub fn get_all(origin: &Origin) -> Result<String, Status> {
    read_cache_request!(origin);

    // an unreachable store degrades to an empty list as well, the
    // degraded response is not cached so it disappears on recovery
    let mut conn = match try_establish_connection() {
        Ok(conn) => conn,
        Err(error) => {
            error!(target:"routes/api/driver:get_all", "Error connecting to database: {}", error);
            return Ok("[]".to_string());
        }
    };
    let conn = &mut conn;
    let stats = match Driver::get_all_with_stats(conn) {
        Ok(stats) => stats,
        Err(error) => {
            error!(target:"routes/api/driver:get_all", "Error getting driver statistics: {}", error);
            Vec::new()
        }
    };

    cache_response!(origin, serde_json::to_string(&stats).unwrap());
}

#[get("/drivers/<driver_name>", rank = 1)]
pub fn get_one_stats(driver_name: String, origin: &Origin) -> Result<DriverStats, Status> {
    let sanitized = sanitize_name(&driver_name);
    if sanitized != driver_name {
        return Err(Status::BadRequest);
    }

    read_cache_request!(origin);

    let conn = &mut establish_connection();
    let stats = match Driver::get_driver_with_stats(conn, &driver_name) {
        Ok(stats) => stats,
        Err(diesel::result::Error::NotFound) => return Err(Status::NotFound),
        Err(error) => {
            error!(target:"routes/api/driver:get_one_stats", "Error getting driver: {}", error);
            return Err(Status::InternalServerError);
        }
    };

    cache_response!(origin, stats);
}

/// # one driver with its full per-championship record
#[get("/drivers/<driver_name>/full", rank = 1)]
pub fn get_one(driver_name: String, origin: &Origin) -> Result<ApiDriver, Status> {
    // check the input before touching the cache, rejecting is cheaper
    let sanitized = sanitize_name(&driver_name);
    if sanitized != driver_name {
        return Err(Status::BadRequest);
    }

    read_cache_request!(origin);

    let conn = &mut establish_connection();
    let driver = db_handle_get_error_http!(
        Driver::get_by_name(conn, &driver_name),
        "routes/api/driver:get_one",
        "driver"
    );

    let results = db_handle_get_error_http!(
        driver.get_results(conn),
        "routes/api/driver:get_one",
        "results"
    );
    let events = db_handle_get_error_http!(
        Event::from_results(conn, &results),
        "routes/api/driver:get_one",
        "events"
    );
    let championships = db_handle_get_error_http!(
        Championship::get_all(conn),
        "routes/api/driver:get_one",
        "championships"
    );

    let api_driver = ApiDriver::new(&driver, &championships, &events, &results);

    cache_response!(origin, api_driver);
}

#[derive(Deserialize)]
pub struct NewDriverForm {
    pub name: String,
    pub team: Option<String>,
    pub nationality: Option<String>,
    pub psn_id: Option<String>,
    pub avatar_url: Option<String>,
}

/// # register a new driver profile
#[post("/drivers", data = "<form>")]
pub fn create(form: Json<NewDriverForm>) -> Result<String, Status> {
    let form = form.into_inner();

    let sanitized = sanitize_name(&form.name);
    if sanitized != form.name || form.name.is_empty() {
        return Err(Status::BadRequest);
    }

    let conn = &mut establish_connection();

    match Driver::exists(conn, &form.name) {
        Ok(true) => return Err(Status::Conflict),
        Ok(false) => {}
        Err(error) => {
            error!(target:"routes/api/driver:create", "Error checking driver: {}", error);
            return Err(Status::InternalServerError);
        }
    }

    let driver = db_handle_get_error_http!(
        Driver::new(
            conn,
            NewDriver {
                name: form.name,
                team: form.team,
                nationality: form.nationality,
                psn_id: form.psn_id,
                avatar_url: form.avatar_url,
            },
        ),
        "routes/api/driver:create",
        "driver"
    );

    Ok(serde_json::to_string(&driver).unwrap())
}

/**************************************************************************************************/
/**************** HELPERS *************************************************************************/
/**************************************************************************************************/

/// # full json record of one driver
/// the profile plus one block per championship the driver has scored
/// results in, each with the scoped rollup and its result lines.
#[derive(Serialize, Deserialize, Clone, JsonResponse)]
pub struct ApiDriver {
    pub name: String,
    pub team: Option<String>,
    pub nationality: Option<String>,
    pub psn_id: Option<String>,
    pub avatar_url: Option<String>,
    pub championships: Vec<ApiChampionshipRecord>,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct ApiChampionshipRecord {
    pub championship_id: i32,
    pub championship_name: String,
    pub races: i64,
    pub wins: i64,
    pub podiums: i64,
    pub total_points: i64,
    pub results: Vec<ApiResultLine>,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct ApiResultLine {
    pub event_name: String,
    pub track: String,
    pub event_date: chrono::NaiveDateTime,
    pub position: i32,
    pub points: i32,
    pub fastest_lap: bool,
}

impl ApiDriver {
    /// # build the record from already fetched rows
    /// we expect the events to cover every result and the championship
    /// list to cover every event.
    pub fn new(
        driver: &Driver,
        championships: &[Championship],
        events: &[Event],
        results: &[RaceResult],
    ) -> ApiDriver {
        let records = championships
            .iter()
            .filter_map(|championship| {
                let championship_events: Vec<&Event> = events
                    .iter()
                    .filter(|e| e.championship_id == championship.id)
                    .collect();

                let scoped: Vec<RaceResult> = results
                    .iter()
                    .filter(|r| championship_events.iter().any(|e| e.id == r.event_id))
                    .cloned()
                    .collect();

                if scoped.is_empty() {
                    return None;
                }

                let rollup = StatsAggregator::rollup_for_driver(&scoped, driver.id);

                Some(ApiChampionshipRecord {
                    championship_id: championship.id,
                    championship_name: championship.name.clone(),
                    races: rollup.races,
                    wins: rollup.wins,
                    podiums: rollup.podiums,
                    total_points: rollup.total_points,
                    results: scoped
                        .iter()
                        .filter_map(|result| {
                            let event = championship_events.iter().find(|e| e.id == result.event_id)?;

                            Some(ApiResultLine {
                                event_name: event.name.clone(),
                                track: event.track.clone(),
                                event_date: event.event_date,
                                position: result.position,
                                points: result.points,
                                fastest_lap: result.fastest_lap,
                            })
                        })
                        .collect(),
                })
            })
            .collect();

        ApiDriver {
            name: driver.name.clone(),
            team: driver.team.clone(),
            nationality: driver.nationality.clone(),
            psn_id: driver.psn_id.clone(),
            avatar_url: driver.avatar_url.clone(),
            championships: records,
        }
    }
}
