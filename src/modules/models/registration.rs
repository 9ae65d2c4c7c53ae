use chrono::NaiveDateTime;
use diesel::dsl::{count_star, exists};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::select;
use log::error;
use serde::{Deserialize, Serialize};

use crate::errors::{CustomResult, Error};
use crate::modules::models::driver::Driver;
use crate::modules::models::event::Event;
use crate::schema::registrations;

#[derive(Insertable, Serialize, Debug, Clone, Deserialize)]
#[diesel(table_name = registrations)]
pub struct NewRegistration {
    pub event_id: i32,
    pub driver_id: i32,
}

#[derive(Queryable, Serialize, Associations, Identifiable, PartialEq, Debug, Clone, Deserialize)]
#[diesel(belongs_to(Event, foreign_key = event_id))]
#[diesel(belongs_to(Driver, foreign_key = driver_id))]
pub struct Registration {
    pub id: i32,
    pub event_id: i32,
    pub driver_id: i32,
    pub registered_at: NaiveDateTime,
}

impl Registration {
    /// # register a driver to an event
    /// the write path enforces what the read side assumes: one entry
    /// per (event, driver), only while the event is open, and never
    /// beyond the entry capacity.
    ///
    /// ## Arguments
    /// * `conn` - the database connection
    /// * `event_in` - the event to register to
    /// * `driver_in` - the driver to register
    ///
    /// ## Returns
    /// * `Registration` - the created registration
    pub fn new(
        conn: &mut PgConnection,
        event_in: &Event,
        driver_in: &Driver,
    ) -> CustomResult<Registration> {
        use crate::schema::registrations::dsl::*;

        if !event_in.event_status()?.allows_registration() {
            return Err(Error::RegistrationClosedError {
                event_id: event_in.id,
            });
        }

        if Registration::exists(conn, event_in.id, driver_in.id)? {
            return Err(Error::AlreadyExistsError {
                what: format!(
                    "registration of driver {} for event {}",
                    driver_in.id, event_in.id
                ),
            });
        }

        if Registration::count_for_event(conn, event_in.id)? >= event_in.max_entries as i64 {
            return Err(Error::EventFullError {
                event_id: event_in.id,
            });
        }

        let new_registration = NewRegistration {
            event_id: event_in.id,
            driver_id: driver_in.id,
        };

        match diesel::insert_into(registrations)
            .values(&new_registration)
            .get_result::<Registration>(conn)
        {
            Ok(registration) => Ok(registration),
            Err(error) => {
                error!(target:"models/registration:new", "Error inserting new registration: {}", error);
                Err(error.into())
            }
        }
    }

    pub fn exists(conn: &mut PgConnection, event_id_in: i32, driver_id_in: i32) -> QueryResult<bool> {
        use crate::schema::registrations::dsl::*;
        select(exists(
            registrations
                .filter(event_id.eq(event_id_in))
                .filter(driver_id.eq(driver_id_in)),
        ))
        .get_result(conn)
    }

    pub fn from_event(conn: &mut PgConnection, event_id_in: i32) -> QueryResult<Vec<Registration>> {
        use crate::schema::registrations::dsl::*;
        registrations
            .filter(event_id.eq(event_id_in))
            .order(registered_at.asc())
            .load::<Registration>(conn)
    }

    pub fn count_for_event(conn: &mut PgConnection, event_id_in: i32) -> QueryResult<i64> {
        use crate::schema::registrations::dsl::*;
        registrations
            .filter(event_id.eq(event_id_in))
            .select(count_star())
            .first(conn)
    }
}
