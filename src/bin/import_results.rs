use std::env;

use dotenvy::dotenv;
use log::{error, info, warn};

use gt_league_backend::errors::Error;
use gt_league_backend::modules::helpers::logging::setup_logging;
use gt_league_backend::modules::helpers::sheets::SheetsHelper;
use gt_league_backend::modules::models::general::establish_connection;
use gt_league_backend::modules::result_entry::save_result_sheet;

/// load result sheets from a json file and file them event by event.
/// events that already have results are skipped, a broken sheet only
/// skips that one event.
fn main() {
    dotenv().ok();
    setup_logging().expect("failed to setup logging");

    let path = env::args().nth(1).unwrap_or_else(|| "./results.json".to_string());

    let sheets = match SheetsHelper::load_sheets_from_file(&path) {
        Ok(sheets) => sheets,
        Err(Error::FileDoesNotExistError { path }) => {
            error!(target:"import_results", "File does not exist: {}", path);
            return;
        }
        Err(Error::PermissionDeniedError { path }) => {
            error!(target:"import_results", "Permission denied: {}", path);
            return;
        }
        Err(error) => {
            error!(target:"import_results", "Could not load sheets: {}", error);
            return;
        }
    };

    let connection = &mut establish_connection();
    for sheet in sheets {
        let event_id = sheet.event_id;

        match save_result_sheet(connection, sheet) {
            Ok(inserted) => {
                info!(target:"import_results", "filed {} results for event {}", inserted.len(), event_id);
            }
            Err(Error::AlreadyExistsError { .. }) => {
                info!(target:"import_results", "event {} already has results, skipping", event_id);
            }
            Err(Error::InvalidResultSheetError { reason }) => {
                warn!(target:"import_results", "invalid sheet for event {}: {}", event_id, reason);
            }
            Err(Error::InvalidNameError { name }) => {
                warn!(target:"import_results", "invalid driver name in sheet for event {}: {}", event_id, name);
            }
            Err(error) => {
                error!(target:"import_results", "failed filing results for event {}: {}", event_id, error);
            }
        }
    }
}
