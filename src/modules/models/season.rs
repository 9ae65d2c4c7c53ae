use diesel::pg::PgConnection;
use diesel::prelude::*;
use log::error;
use serde::{Deserialize, Serialize};

use crate::schema::seasons;

#[derive(Insertable, Serialize, Debug, Clone, Deserialize)]
#[diesel(table_name = seasons)]
pub struct NewSeason {
    pub name: String,
    pub year: i32,
    pub is_active: bool,
}

#[derive(Queryable, Serialize, Identifiable, PartialEq, Debug, Clone, Deserialize)]
pub struct Season {
    pub id: i32,
    pub name: String,
    pub year: i32,
    pub is_active: bool,
}

impl Season {
    pub fn new(conn: &mut PgConnection, new_season: NewSeason) -> QueryResult<Season> {
        match diesel::insert_into(seasons::table)
            .values(&new_season)
            .get_result::<Season>(conn)
        {
            Ok(season) => Ok(season),
            Err(error) => {
                error!(target:"models/season:new", "Error inserting new season: {}", error);
                Err(error)
            }
        }
    }

    pub fn get_by_id(conn: &mut PgConnection, id_in: i32) -> QueryResult<Season> {
        use crate::schema::seasons::dsl::*;
        seasons.filter(id.eq(id_in)).first::<Season>(conn)
    }

    pub fn get_all(conn: &mut PgConnection) -> QueryResult<Vec<Season>> {
        use crate::schema::seasons::dsl::*;
        seasons.order(year.desc()).load::<Season>(conn)
    }

    pub fn get_active(conn: &mut PgConnection) -> QueryResult<Vec<Season>> {
        use crate::schema::seasons::dsl::*;
        seasons.filter(is_active.eq(true)).load::<Season>(conn)
    }
}
