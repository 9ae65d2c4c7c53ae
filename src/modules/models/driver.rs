use std::thread;

use chrono::NaiveDateTime;
use diesel::dsl::exists;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::select;
use json_response_derive::JsonResponse;
use log::error;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::macros::redis::clear_cache;
use crate::modules::helpers::stats::{DriverRollup, StatsAggregator};
use crate::modules::models::race_result::RaceResult;
use crate::modules::redis::Redis;
use crate::schema::drivers;

#[derive(Insertable, Serialize, Debug, Clone, Deserialize)]
#[diesel(table_name = drivers)]
pub struct NewDriver {
    pub name: String,
    pub team: Option<String>,
    pub nationality: Option<String>,
    pub psn_id: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Queryable, Serialize, Identifiable, PartialEq, Debug, Clone, Deserialize, Eq, Hash)]
pub struct Driver {
    pub id: i32,
    pub name: String,
    pub team: Option<String>,
    pub nationality: Option<String>,
    pub psn_id: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: NaiveDateTime,
}

impl Driver {
    /************ INSERTERS ************/
    /// # Insert a new driver into the database
    ///
    /// ## Arguments
    /// * `conn` - The database connection to use
    /// * `new_driver` - The profile fields of the driver to insert
    ///
    /// ## Returns
    /// * `Driver` - The inserted driver
    pub fn new(conn: &mut PgConnection, new_driver: NewDriver) -> QueryResult<Driver> {
        let driver: Driver = match diesel::insert_into(drivers::table)
            .values(&new_driver)
            .get_result::<Driver>(conn)
        {
            Ok(driver) => driver,
            Err(error) => {
                error!(target:"models/driver:new", "Error inserting new driver: {}", error);
                return Err(error);
            }
        };

        let inserted = driver.clone();
        thread::spawn(move || {
            clear_cache!(inserted);
        });

        Ok(driver)
    }

    /// # Get the driver with the given name, creating it first if it is unknown
    pub fn ensure_exists(conn: &mut PgConnection, name: &str) -> QueryResult<Driver> {
        if !Driver::exists(conn, name)? {
            Driver::new(
                conn,
                NewDriver {
                    name: name.to_string(),
                    team: None,
                    nationality: None,
                    psn_id: None,
                    avatar_url: None,
                },
            )
        } else {
            Driver::get_by_name(conn, name)
        }
    }

    /************ GETTERS ************/
    pub fn exists(conn: &mut PgConnection, name_in: &str) -> QueryResult<bool> {
        use crate::schema::drivers::dsl::*;
        select(exists(drivers.filter(name.eq(name_in)))).get_result(conn)
    }

    pub fn get_by_name(conn: &mut PgConnection, name_in: &str) -> QueryResult<Driver> {
        use crate::schema::drivers::dsl::*;
        drivers.filter(name.eq(name_in)).first::<Driver>(conn)
    }

    pub fn get_by_id(conn: &mut PgConnection, id_in: i32) -> QueryResult<Driver> {
        use crate::schema::drivers::dsl::*;
        drivers.filter(id.eq(id_in)).first::<Driver>(conn)
    }

    pub fn get_all(conn: &mut PgConnection) -> QueryResult<Vec<Driver>> {
        use crate::schema::drivers::dsl::*;
        drivers.order(id.asc()).load::<Driver>(conn)
    }

    /// # get the drivers that appear in a list of results
    /// every driver is returned once, no matter how many results reference it
    pub fn from_results(conn: &mut PgConnection, results_in: &[RaceResult]) -> QueryResult<Vec<Driver>> {
        use crate::schema::drivers::dsl::*;
        let driver_ids: Vec<i32> = results_in.iter().map(|r| r.driver_id).collect();

        drivers.filter(id.eq_any(driver_ids)).load::<Driver>(conn)
    }

    /// # get all results of this driver, across all championships
    pub fn get_results(&self, conn: &mut PgConnection) -> QueryResult<Vec<RaceResult>> {
        RaceResult::from_driver(conn, self)
    }

    /************ STATISTICS ************/
    /// # get every driver together with its aggregated statistics
    /// the statistics are recomputed from the results table on every call.
    /// drivers without any result are included with zeroed statistics.
    pub fn get_all_with_stats(conn: &mut PgConnection) -> QueryResult<Vec<DriverStats>> {
        let all_drivers = Driver::get_all(conn)?;
        let all_results = RaceResult::get_all(conn)?;

        let rollups = StatsAggregator::aggregate(&all_results);

        Ok(all_drivers
            .iter()
            .map(|driver| {
                let rollup = rollups.get(&driver.id).copied().unwrap_or_default();
                DriverStats::new(driver, rollup)
            })
            .collect())
    }

    /// # get one driver, by name, together with its aggregated statistics
    pub fn get_driver_with_stats(conn: &mut PgConnection, name_in: &str) -> QueryResult<DriverStats> {
        let driver = Driver::get_by_name(conn, name_in)?;
        let results = driver.get_results(conn)?;

        let rollup = StatsAggregator::rollup_for_driver(&results, driver.id);
        Ok(DriverStats::new(&driver, rollup))
    }

    /************ CACHE ************/
    pub fn clear_cache(&self, r_conn: &mut redis::Connection) {
        let mut keys = match Redis::keys(r_conn, format!("*/drivers/{}*", self.name)) {
            Ok(keys) => keys,
            Err(error) => {
                error!(target:"models/driver:clear_cache", "Error getting keys from redis: {}", error);
                return;
            }
        };

        keys.append(&mut vec![
            "/api/drivers/all".to_string(),
            "/api/drivers/all/full".to_string(),
        ]);

        for key in keys {
            if let Err(error) = Redis::delete(r_conn, &key) {
                error!(target:"models/driver:clear_cache", "Error deleting key: {}", error);
            }
        }
    }
}

/// # per-driver statistics as served to the presentation layer
/// a pure view over the results table, equal in shape to the
/// `driver_statistics` view of the store. never persisted.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonResponse)]
pub struct DriverStats {
    pub id: i32,
    pub name: String,
    pub team: Option<String>,
    pub nationality: Option<String>,
    pub psn_id: Option<String>,
    pub avatar_url: Option<String>,
    pub races: i64,
    pub wins: i64,
    pub podiums: i64,
    pub total_points: i64,
}

impl DriverStats {
    pub fn new(driver: &Driver, rollup: DriverRollup) -> DriverStats {
        DriverStats {
            id: driver.id,
            name: driver.name.clone(),
            team: driver.team.clone(),
            nationality: driver.nationality.clone(),
            psn_id: driver.psn_id.clone(),
            avatar_url: driver.avatar_url.clone(),
            races: rollup.races,
            wins: rollup.wins,
            podiums: rollup.podiums,
            total_points: rollup.total_points,
        }
    }
}

/// strip every character that is not allowed in a driver name.
/// route handlers reject the request when the sanitized name differs
/// from the input.
pub fn sanitize_name(name: &str) -> String {
    let re = Regex::new(r"[^A-Za-z0-9 \-_'.]").unwrap();
    re.replace_all(name, "").to_string()
}
