use std::thread;

use chrono::NaiveDateTime;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use log::error;
use serde::{Deserialize, Serialize};

use crate::errors::{CustomResult, Error};
use crate::modules::models::championship::Championship;
use crate::modules::models::driver::Driver;
use crate::modules::models::race_result::RaceResult;
use crate::modules::models::registration::Registration;
use crate::modules::redis::Redis;
use crate::schema::events;

/// lifecycle of an event. the status is a forward moving attribute set
/// by an admin; it gates registration and result entry but no state
/// machine is enforced here.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Open,
    Live,
    Completed,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Upcoming => "upcoming",
            EventStatus::Open => "open",
            EventStatus::Live => "live",
            EventStatus::Completed => "completed",
        }
    }

    pub fn parse(status: &str) -> CustomResult<EventStatus> {
        match status {
            "upcoming" => Ok(EventStatus::Upcoming),
            "open" => Ok(EventStatus::Open),
            "live" => Ok(EventStatus::Live),
            "completed" => Ok(EventStatus::Completed),
            other => Err(Error::UnknownStatusError {
                status: other.to_string(),
            }),
        }
    }

    /// drivers can only register while the entry list is open
    pub fn allows_registration(&self) -> bool {
        matches!(self, EventStatus::Open)
    }

    /// results can only be filed once the event is on track or done
    pub fn allows_results(&self) -> bool {
        matches!(self, EventStatus::Live | EventStatus::Completed)
    }
}

#[derive(Insertable, Serialize, Debug, Clone, Deserialize)]
#[diesel(table_name = events)]
pub struct NewEvent {
    pub championship_id: i32,
    pub name: String,
    pub track: String,
    pub event_date: NaiveDateTime,
    pub status: String,
    pub max_entries: i32,
    pub image_url: Option<String>,
}

#[derive(
    Queryable, Serialize, Associations, Identifiable, PartialEq, Debug, Clone, Deserialize, Eq, Hash,
)]
#[diesel(belongs_to(Championship, foreign_key = championship_id))]
pub struct Event {
    pub id: i32,
    pub championship_id: i32,
    pub name: String,
    pub track: String,
    pub event_date: NaiveDateTime,
    pub status: String,
    pub max_entries: i32,
    pub image_url: Option<String>,
}

impl Event {
    /************ INSERTERS ************/
    /// # create a new event in a championship
    ///
    /// ## Arguments
    /// * `conn` - the database connection
    /// * `new_event` - the event to insert, status must be one of the
    ///   known status strings
    ///
    /// ## Returns
    /// * `Event` - the created event
    pub fn new(conn: &mut PgConnection, new_event: NewEvent) -> CustomResult<Event> {
        use crate::schema::events::dsl::*;

        // reject unknown status strings before they hit the table
        EventStatus::parse(&new_event.status)?;

        let event: Event = match diesel::insert_into(events)
            .values(&new_event)
            .get_result::<Event>(conn)
        {
            Ok(event) => event,
            Err(error) => {
                error!(target:"models/event:new", "Error inserting new event: {}", error);
                return Err(error.into());
            }
        };

        Ok(event)
    }

    /************ GETTERS ************/
    pub fn get_by_id(conn: &mut PgConnection, id_in: i32) -> QueryResult<Event> {
        use crate::schema::events::dsl::*;
        events.filter(id.eq(id_in)).first::<Event>(conn)
    }

    pub fn get_all(conn: &mut PgConnection) -> QueryResult<Vec<Event>> {
        use crate::schema::events::dsl::*;
        events.order(event_date.asc()).load::<Event>(conn)
    }

    /// # get all events belonging to one championship
    pub fn from_championship(
        conn: &mut PgConnection,
        championship_id_in: i32,
    ) -> QueryResult<Vec<Event>> {
        use crate::schema::events::dsl::*;
        events
            .filter(championship_id.eq(championship_id_in))
            .order(event_date.asc())
            .load::<Event>(conn)
    }

    /// # get the events a list of results was scored in
    pub fn from_results(conn: &mut PgConnection, results_in: &[RaceResult]) -> QueryResult<Vec<Event>> {
        use crate::schema::events::dsl::*;
        let event_ids: Vec<i32> = results_in.iter().map(|r| r.event_id).collect();

        events.filter(id.eq_any(event_ids)).load::<Event>(conn)
    }

    /// parsed form of the stored status string
    pub fn event_status(&self) -> CustomResult<EventStatus> {
        EventStatus::parse(&self.status)
    }

    /************ UPDATERS ************/
    /// # move the event to another status
    pub fn set_status(&self, conn: &mut PgConnection, status_in: EventStatus) -> QueryResult<Event> {
        use crate::schema::events::dsl::*;

        let updated = diesel::update(events.filter(id.eq(self.id)))
            .set(status.eq(status_in.as_str()))
            .get_result::<Event>(conn)?;

        Ok(updated)
    }

    /************ DELETERS ************/
    /// # delete the event together with its registrations and results
    /// the caches derived from the deleted results are cleared on a
    /// background thread.
    pub fn delete(&self, conn: &mut PgConnection) -> QueryResult<()> {
        use crate::schema::registrations;

        let removed_results = RaceResult::from_event(conn, self)?;
        let involved_drivers = Driver::from_results(conn, &removed_results)?;

        RaceResult::delete_for_event(conn, self.id)?;
        diesel::delete(registrations::table.filter(registrations::event_id.eq(self.id)))
            .execute(conn)?;
        diesel::delete(events::table.filter(events::id.eq(self.id))).execute(conn)?;

        let event = self.clone();
        let championship = Championship::get_by_id(conn, self.championship_id);
        thread::spawn(move || {
            let r_conn = &mut match Redis::connect() {
                Ok(rc) => rc,
                Err(error) => {
                    error!(target:"models/event:delete", "Error connecting to redis: (error: {})", error);
                    return;
                }
            };

            for driver in involved_drivers {
                driver.clear_cache(r_conn);
            }
            event.clear_cache(r_conn);

            match championship {
                Ok(championship) => championship.clear_cache(r_conn),
                Err(error) => {
                    error!(target:"models/event:delete", "Error clearing cache could not get championship: (error: {})", error);
                }
            }
        });

        Ok(())
    }

    /************ CACHE ************/
    pub fn clear_cache(&self, r_conn: &mut redis::Connection) {
        let mut keys = match Redis::keys(r_conn, format!("*/events/{}*", self.id)) {
            Ok(keys) => keys,
            Err(error) => {
                error!(target:"models/event:clear_cache", "Error getting keys from redis: {}", error);
                return;
            }
        };

        keys.push("/api/events/all".to_string());

        for key in keys {
            if let Err(error) = Redis::delete(r_conn, &key) {
                error!(target:"models/event:clear_cache", "Error deleting key: {}", error);
            }
        }
    }

    /// # the filed entry list of this event, oldest entry first
    pub fn get_registrations(&self, conn: &mut PgConnection) -> QueryResult<Vec<Registration>> {
        Registration::from_event(conn, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::EventStatus;

    #[test]
    fn status_strings_round_trip() {
        for status in [
            EventStatus::Upcoming,
            EventStatus::Open,
            EventStatus::Live,
            EventStatus::Completed,
        ] {
            assert_eq!(EventStatus::parse(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!(EventStatus::parse("cancelled").is_err());
        assert!(EventStatus::parse("").is_err());
    }

    #[test]
    fn only_open_events_take_registrations() {
        assert!(EventStatus::Open.allows_registration());
        assert!(!EventStatus::Upcoming.allows_registration());
        assert!(!EventStatus::Live.allows_registration());
        assert!(!EventStatus::Completed.allows_registration());
    }

    #[test]
    fn results_only_after_lights_out() {
        assert!(EventStatus::Live.allows_results());
        assert!(EventStatus::Completed.allows_results());
        assert!(!EventStatus::Upcoming.allows_results());
        assert!(!EventStatus::Open.allows_results());
    }
}
