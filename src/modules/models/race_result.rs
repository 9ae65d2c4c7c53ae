
use diesel::pg::PgConnection;
use diesel::prelude::*;
use log::error;
use serde::{Deserialize, Serialize};

use crate::macros::database_error_handeler::db_handle_get_error;
use crate::modules::models::championship::Championship;
use crate::modules::models::driver::Driver;
use crate::modules::models::event::Event;
use crate::modules::redis::Redis;
use crate::schema::results;

#[derive(Insertable, Serialize, Debug, Clone, Deserialize)]
#[diesel(table_name = results)]
pub struct NewRaceResult {
    pub event_id: i32,
    pub driver_id: i32,
    pub position: i32,
    pub points: i32,
    pub fastest_lap: bool,
}

/// one finishing record of one driver in one event. the atomic fact
/// every statistic and standing is derived from.
#[derive(
    Queryable, Serialize, Associations, Identifiable, PartialEq, Debug, Clone, Deserialize,
)]
#[diesel(belongs_to(Event, foreign_key = event_id))]
#[diesel(belongs_to(Driver, foreign_key = driver_id))]
#[diesel(table_name = results)]
pub struct RaceResult {
    pub id: i32,
    pub event_id: i32,
    pub driver_id: i32,
    pub position: i32,
    pub points: i32,
    pub fastest_lap: bool,
}

impl RaceResult {
    /************ INSERTERS ************/
    /// # insert the results of a whole event in one query
    /// derived views for the affected drivers and championship are
    /// invalidated before returning, so a read issued after the write
    /// completes never re-caches a view computed from the old rows.
    /// a read that raced the write itself can still cache a stale
    /// view, the daily flush bounds how long it lives.
    ///
    /// ## Arguments
    /// * `conn` - The database connection to use
    /// * `new_results` - The results to insert
    ///
    /// ## Returns
    /// * `Vec<RaceResult>` - The inserted results
    pub fn insert_bulk(
        conn: &mut PgConnection,
        new_results: &Vec<NewRaceResult>,
    ) -> QueryResult<Vec<RaceResult>> {
        use crate::schema::results::dsl::*;

        let inserted_results = match diesel::insert_into(results)
            .values(new_results)
            .get_results::<RaceResult>(conn)
        {
            Ok(inserted_results) => inserted_results,
            Err(error) => {
                error!(target:"models/race_result:insert_bulk", "Error inserting results: (error: {})", error);
                return Err(error);
            }
        };

        RaceResult::invalidate_derived_views(conn, &inserted_results);

        Ok(inserted_results)
    }

    /// every cached view derived from the given results is stale once
    /// they are written. clears the caches of the involved drivers,
    /// events and championships.
    fn invalidate_derived_views(db_conn: &mut PgConnection, changed: &[RaceResult]) {
        let r_conn = &mut match Redis::connect() {
            Ok(rc) => rc,
            Err(error) => {
                error!(target:"models/race_result:invalidate_derived_views", "Error connecting to redis: (error: {})", error);
                return;
            }
        };

        match Driver::from_results(db_conn, changed) {
            Ok(involved) => {
                involved.iter().for_each(|d| d.clear_cache(r_conn));
            }
            Err(error) => {
                error!(target:"models/race_result:invalidate_derived_views", "Error clearing cache could not get drivers: (error: {})", error);
            }
        }

        match Event::from_results(db_conn, changed) {
            Ok(involved) => {
                for event in involved {
                    event.clear_cache(r_conn);

                    match Championship::get_by_id(db_conn, event.championship_id) {
                        Ok(championship) => championship.clear_cache(r_conn),
                        Err(error) => {
                            error!(target:"models/race_result:invalidate_derived_views", "Error clearing cache could not get championship: (error: {})", error);
                        }
                    }
                }
            }
            Err(error) => {
                error!(target:"models/race_result:invalidate_derived_views", "Error clearing cache could not get events: (error: {})", error);
            }
        }
    }

    /************ GETTERS ************/
    pub fn get_all(conn: &mut PgConnection) -> QueryResult<Vec<RaceResult>> {
        use crate::schema::results::dsl::*;
        results.load::<RaceResult>(conn)
    }

    /// # get all results of one event
    pub fn from_event(conn: &mut PgConnection, event_in: &Event) -> QueryResult<Vec<RaceResult>> {
        RaceResult::from_events(conn, &[event_in.to_owned()])
    }

    /// # get all results of a list of events
    pub fn from_events(conn: &mut PgConnection, events_in: &[Event]) -> QueryResult<Vec<RaceResult>> {
        use crate::schema::results::dsl::*;
        results
            .filter(event_id.eq_any(events_in.iter().map(|e| e.id).collect::<Vec<i32>>()))
            .load::<RaceResult>(conn)
    }

    /// # get all results of one driver
    pub fn from_driver(conn: &mut PgConnection, driver_in: &Driver) -> QueryResult<Vec<RaceResult>> {
        use crate::schema::results::dsl::*;
        results
            .filter(driver_id.eq(driver_in.id))
            .load::<RaceResult>(conn)
    }

    /// # get all results of one championship
    /// the scope of the standings ranker. collected through the
    /// championship's events, never through a stored rollup.
    pub fn from_championship(
        conn: &mut PgConnection,
        championship_in: &Championship,
    ) -> QueryResult<Vec<RaceResult>> {
        let events_in = db_handle_get_error!(
            Event::from_championship(conn, championship_in.id),
            "models/race_result:from_championship",
            "events of championship"
        );

        RaceResult::from_events(conn, &events_in)
    }

    /// # check whether an event already has results filed
    pub fn event_has_results(conn: &mut PgConnection, event_id_in: i32) -> QueryResult<bool> {
        use crate::schema::results::dsl::*;
        use diesel::dsl::exists;
        use diesel::select;

        select(exists(results.filter(event_id.eq(event_id_in)))).get_result(conn)
    }

    /************ DELETERS ************/
    /// # delete all results of one event
    pub fn delete_for_event(conn: &mut PgConnection, event_id_in: i32) -> QueryResult<usize> {
        diesel::delete(results::table.filter(results::event_id.eq(event_id_in))).execute(conn)
    }
}
