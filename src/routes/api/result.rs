use log::error;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{get, post};

use crate::errors::Error;
use crate::macros::database_error_handeler::db_handle_get_error_http;
use crate::modules::models::event::Event;
use crate::modules::models::general::establish_connection;
use crate::modules::models::race_result::RaceResult;
use crate::modules::result_entry::{save_result_sheet, ResultSheet};

/// # the raw finishing classification of one event
#[get("/events/<event_id>/results")]
pub fn for_event(event_id: i32) -> Result<String, Status> {
    let conn = &mut establish_connection();

    let event = db_handle_get_error_http!(
        Event::get_by_id(conn, event_id),
        "routes/api/result:for_event",
        "event"
    );

    let results = db_handle_get_error_http!(
        RaceResult::from_event(conn, &event),
        "routes/api/result:for_event",
        "results"
    );

    Ok(serde_json::to_string(&results).unwrap())
}

/// # file the results of an event
/// the body is one whole result sheet; it is validated before any row
/// is written, so the classification lands all-or-nothing.
#[post("/results", data = "<sheet>")]
pub fn save(sheet: Json<ResultSheet>) -> Result<String, Status> {
    let conn = &mut establish_connection();

    match save_result_sheet(conn, sheet.into_inner()) {
        Ok(inserted) => Ok(serde_json::to_string(&inserted).unwrap()),
        Err(Error::InvalidResultSheetError { .. })
        | Err(Error::InvalidNameError { .. })
        | Err(Error::UnknownStatusError { .. }) => Err(Status::BadRequest),
        Err(Error::ResultsNotOpenError { .. }) => Err(Status::Forbidden),
        Err(Error::AlreadyExistsError { .. }) => Err(Status::Conflict),
        Err(Error::DatabaseError {
            source: diesel::result::Error::NotFound,
        }) => Err(Status::NotFound),
        Err(error) => {
            error!(target:"routes/api/result:save", "Error saving result sheet: {}", error);
            Err(Status::InternalServerError)
        }
    }
}
