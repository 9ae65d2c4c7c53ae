use std::collections::HashSet;

use diesel::PgConnection;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::errors::{CustomResult, Error};
use crate::modules::models::driver::{sanitize_name, Driver};
use crate::modules::models::event::Event;
use crate::modules::models::race_result::{NewRaceResult, RaceResult};

/// the finishing classification of one event, as filed by an admin.
/// one row per classified driver.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ResultSheet {
    pub event_id: i32,
    pub rows: Vec<SheetRow>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SheetRow {
    pub driver_name: String,
    pub position: i32,
    pub points: i32,
    #[serde(default)]
    pub fastest_lap: bool,
}

/// # validate a result sheet before anything is written
/// the read-side aggregation takes rows at face value, so every
/// integrity rule lives here: positive unique positions, non-negative
/// points, one row per driver, at most one fastest lap.
pub fn validate_sheet(sheet: &ResultSheet) -> CustomResult<()> {
    if sheet.rows.is_empty() {
        return Err(Error::InvalidResultSheetError {
            reason: "sheet has no rows".to_string(),
        });
    }

    let mut seen_positions: HashSet<i32> = HashSet::new();
    let mut seen_drivers: HashSet<String> = HashSet::new();
    let mut fastest_laps = 0;

    for row in &sheet.rows {
        if row.position < 1 {
            return Err(Error::InvalidResultSheetError {
                reason: format!("position {} is not a positive integer", row.position),
            });
        }
        if !seen_positions.insert(row.position) {
            return Err(Error::InvalidResultSheetError {
                reason: format!("position {} appears twice", row.position),
            });
        }
        if row.points < 0 {
            return Err(Error::InvalidResultSheetError {
                reason: format!("negative points for position {}", row.position),
            });
        }
        if !seen_drivers.insert(row.driver_name.clone()) {
            return Err(Error::InvalidResultSheetError {
                reason: format!("driver {} appears twice", row.driver_name),
            });
        }
        if row.fastest_lap {
            fastest_laps += 1;
        }
    }

    if fastest_laps > 1 {
        return Err(Error::InvalidResultSheetError {
            reason: "more than one fastest lap".to_string(),
        });
    }

    Ok(())
}

/// # file the results of an event
/// validates the sheet, checks that the event accepts results in its
/// current status and has none filed yet, creates unknown drivers, and
/// inserts all rows in one bulk write. the derived views of the
/// affected championship are invalidated by the insert.
///
/// ## Arguments
/// * `conn` - the database connection
/// * `sheet` - the sheet to file
///
/// ## Returns
/// * `Vec<RaceResult>` - the inserted result rows
pub fn save_result_sheet(conn: &mut PgConnection, sheet: ResultSheet) -> CustomResult<Vec<RaceResult>> {
    validate_sheet(&sheet)?;

    let event = Event::get_by_id(conn, sheet.event_id)?;
    if !event.event_status()?.allows_results() {
        warn!(target:"result_entry:save_result_sheet", "event {} is not accepting results (status: {})", event.id, event.status);
        return Err(Error::ResultsNotOpenError { event_id: event.id });
    }

    if RaceResult::event_has_results(conn, event.id)? {
        return Err(Error::AlreadyExistsError {
            what: format!("results for event {}", event.id),
        });
    }

    let mut new_results = Vec::with_capacity(sheet.rows.len());
    for row in &sheet.rows {
        if sanitize_name(&row.driver_name) != row.driver_name {
            return Err(Error::InvalidNameError {
                name: row.driver_name.clone(),
            });
        }

        let driver = Driver::ensure_exists(conn, &row.driver_name)?;
        new_results.push(NewRaceResult {
            event_id: event.id,
            driver_id: driver.id,
            position: row.position,
            points: row.points,
            fastest_lap: row.fastest_lap,
        });
    }

    let inserted = RaceResult::insert_bulk(conn, &new_results)?;

    info!(target:"result_entry:save_result_sheet", "filed {} results for event {}", inserted.len(), event.id);
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(driver_name: &str, position: i32, points: i32, fastest_lap: bool) -> SheetRow {
        SheetRow {
            driver_name: driver_name.to_string(),
            position,
            points,
            fastest_lap,
        }
    }

    fn sheet(rows: Vec<SheetRow>) -> ResultSheet {
        ResultSheet { event_id: 1, rows }
    }

    #[test]
    fn a_clean_sheet_passes() {
        let sheet = sheet(vec![
            row("a", 1, 25, true),
            row("b", 2, 18, false),
            row("c", 3, 15, false),
        ]);
        assert!(validate_sheet(&sheet).is_ok());
    }

    #[test]
    fn empty_sheet_is_rejected() {
        assert!(matches!(
            validate_sheet(&sheet(vec![])),
            Err(Error::InvalidResultSheetError { .. })
        ));
    }

    #[test]
    fn duplicate_positions_are_rejected() {
        let sheet = sheet(vec![row("a", 1, 25, false), row("b", 1, 18, false)]);
        assert!(validate_sheet(&sheet).is_err());
    }

    #[test]
    fn non_positive_positions_are_rejected() {
        assert!(validate_sheet(&sheet(vec![row("a", 0, 25, false)])).is_err());
        assert!(validate_sheet(&sheet(vec![row("a", -2, 25, false)])).is_err());
    }

    #[test]
    fn negative_points_are_rejected() {
        assert!(validate_sheet(&sheet(vec![row("a", 1, -5, false)])).is_err());
    }

    #[test]
    fn zero_points_are_fine() {
        assert!(validate_sheet(&sheet(vec![row("a", 11, 0, false)])).is_ok());
    }

    #[test]
    fn duplicate_drivers_are_rejected() {
        let sheet = sheet(vec![row("a", 1, 25, false), row("a", 2, 18, false)]);
        assert!(validate_sheet(&sheet).is_err());
    }

    #[test]
    fn two_fastest_laps_are_rejected() {
        let sheet = sheet(vec![row("a", 1, 25, true), row("b", 2, 18, true)]);
        assert!(validate_sheet(&sheet).is_err());
    }
}
