use diesel::pg::PgConnection;
use diesel::prelude::*;
use log::error;
use serde::{Deserialize, Serialize};

use crate::macros::database_error_handeler::db_handle_get_error;
use crate::modules::helpers::standings::{Standing, StandingsRanker};
use crate::modules::models::driver::Driver;
use crate::modules::models::race_result::RaceResult;
use crate::modules::models::season::Season;
use crate::modules::redis::Redis;
use crate::schema::championships;

#[derive(Insertable, Serialize, Debug, Clone, Deserialize)]
#[diesel(table_name = championships)]
pub struct NewChampionship {
    pub season_id: i32,
    pub name: String,
    pub game: String,
    pub platform: String,
    pub description: Option<String>,
}

#[derive(
    Queryable, Serialize, Associations, Identifiable, PartialEq, Debug, Clone, Deserialize, Eq, Hash,
)]
#[diesel(belongs_to(Season, foreign_key = season_id))]
pub struct Championship {
    pub id: i32,
    pub season_id: i32,
    pub name: String,
    pub game: String,
    pub platform: String,
    pub description: Option<String>,
}

impl Championship {
    /************ INSERTERS ************/
    pub fn new(conn: &mut PgConnection, new_championship: NewChampionship) -> QueryResult<Championship> {
        match diesel::insert_into(championships::table)
            .values(&new_championship)
            .get_result::<Championship>(conn)
        {
            Ok(championship) => Ok(championship),
            Err(error) => {
                error!(target:"models/championship:new", "Error inserting new championship: {}", error);
                Err(error)
            }
        }
    }

    /************ GETTERS ************/
    pub fn get_by_id(conn: &mut PgConnection, id_in: i32) -> QueryResult<Championship> {
        use crate::schema::championships::dsl::*;
        championships.filter(id.eq(id_in)).first::<Championship>(conn)
    }

    pub fn get_all(conn: &mut PgConnection) -> QueryResult<Vec<Championship>> {
        use crate::schema::championships::dsl::*;
        championships.order(id.asc()).load::<Championship>(conn)
    }

    pub fn from_season(conn: &mut PgConnection, season_id_in: i32) -> QueryResult<Vec<Championship>> {
        use crate::schema::championships::dsl::*;
        championships
            .filter(season_id.eq(season_id_in))
            .load::<Championship>(conn)
    }

    /// # every result scored in this championship, across all its events
    pub fn get_results(&self, conn: &mut PgConnection) -> QueryResult<Vec<RaceResult>> {
        RaceResult::from_championship(conn, self)
    }

    /************ STANDINGS ************/
    /// # compute the current standings of this championship
    /// a fresh snapshot of the championship's results is fetched and
    /// ranked on every call; nothing derived is read back from the
    /// store. a championship without events or results yields an empty
    /// list.
    ///
    /// ## Returns
    /// * `Vec<Standing>` - ranked standings, leader first
    pub fn get_standings(&self, conn: &mut PgConnection) -> QueryResult<Vec<Standing>> {
        let results = db_handle_get_error!(
            self.get_results(conn),
            "models/championship:get_standings",
            "results of championship"
        );
        let drivers = db_handle_get_error!(
            Driver::from_results(conn, &results),
            "models/championship:get_standings",
            "drivers of championship"
        );

        Ok(StandingsRanker::rank(&results, &drivers))
    }

    /************ CACHE ************/
    pub fn clear_cache(&self, r_conn: &mut redis::Connection) {
        let mut keys = match Redis::keys(r_conn, format!("*/championships/{}*", self.id)) {
            Ok(keys) => keys,
            Err(error) => {
                error!(target:"models/championship:clear_cache", "Error getting keys from redis: {}", error);
                return;
            }
        };

        keys.append(&mut vec![
            "/api/championships/all".to_string(),
            "/api/standings/all".to_string(),
        ]);

        for key in keys {
            if let Err(error) = Redis::delete(r_conn, &key) {
                error!(target:"models/championship:clear_cache", "Error deleting key: {}", error);
            }
        }
    }
}
