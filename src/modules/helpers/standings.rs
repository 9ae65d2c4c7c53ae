use json_response_derive::JsonResponse;
use serde::{Deserialize, Serialize};

use crate::modules::helpers::stats::{DriverRollup, StatsAggregator};
use crate::modules::models::driver::Driver;
use crate::modules::models::race_result::RaceResult;

/// one ranked row of a championship leaderboard: the driver's rollup
/// plus its computed position and the points gap to the leader.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, JsonResponse)]
pub struct Standing {
    pub driver_id: i32,
    pub driver_name: String,
    pub team: Option<String>,
    pub avatar_url: Option<String>,
    pub races: i64,
    pub wins: i64,
    pub podiums: i64,
    pub points: i64,
    pub position: i32,
    pub gap: i64,
}

pub struct StandingsRanker {}

impl StandingsRanker {
    /// # rank a championship's results into standings
    /// rolls the results up per driver and orders them by total points,
    /// highest first. ties are broken deterministically: more wins
    /// first, then more podiums, then the lower driver id (the earliest
    /// registered driver). the incoming row order never influences the
    /// outcome.
    ///
    /// positions are sequential starting at 1, tied drivers do not
    /// share a position. the gap is the leader's points minus the
    /// driver's points, 0 for the leader. drivers without a result in
    /// the given set do not appear.
    ///
    /// ## Arguments
    /// * `results` - all results of one championship, in any order
    /// * `drivers` - the driver records the rows reference
    ///
    /// ## Returns
    /// * `Vec<Standing>` - the ordered standings, leader first
    pub fn rank(results: &[RaceResult], drivers: &[Driver]) -> Vec<Standing> {
        let rollups = StatsAggregator::aggregate(results);

        let mut ranked: Vec<(i32, DriverRollup)> = rollups.into_iter().collect();
        ranked.sort_by(|(a_id, a), (b_id, b)| {
            b.total_points
                .cmp(&a.total_points)
                .then(b.wins.cmp(&a.wins))
                .then(b.podiums.cmp(&a.podiums))
                .then(a_id.cmp(b_id))
        });

        let leader_points = ranked
            .first()
            .map(|(_, rollup)| rollup.total_points)
            .unwrap_or(0);

        ranked
            .iter()
            .enumerate()
            .map(|(index, (driver_id, rollup))| {
                let driver = drivers.iter().find(|d| d.id == *driver_id);

                Standing {
                    driver_id: *driver_id,
                    driver_name: driver.map(|d| d.name.clone()).unwrap_or_default(),
                    team: driver.and_then(|d| d.team.clone()),
                    avatar_url: driver.and_then(|d| d.avatar_url.clone()),
                    races: rollup.races,
                    wins: rollup.wins,
                    podiums: rollup.podiums,
                    points: rollup.total_points,
                    position: (index + 1) as i32,
                    gap: leader_points - rollup.total_points,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;

    use super::*;

    fn driver(id: i32, name: &str) -> Driver {
        Driver {
            id,
            name: name.to_string(),
            team: None,
            nationality: None,
            psn_id: None,
            avatar_url: None,
            created_at: NaiveDateTime::from_timestamp_opt(0, 0).unwrap(),
        }
    }

    fn result(driver_id: i32, position: i32, points: i32) -> RaceResult {
        RaceResult {
            id: 0,
            event_id: 1,
            driver_id,
            position,
            points,
            fastest_lap: false,
        }
    }

    #[test]
    fn empty_results_yield_empty_standings() {
        let standings = StandingsRanker::rank(&[], &[driver(1, "a")]);
        assert!(standings.is_empty());
    }

    #[test]
    fn championship_without_drivers_or_results_does_not_panic() {
        assert!(StandingsRanker::rank(&[], &[]).is_empty());
    }

    #[test]
    fn two_driver_scenario() {
        // driver A: P1 for 25 and P3 for 15, driver B: P2 for 18
        let drivers = vec![driver(1, "a"), driver(2, "b")];
        let results = vec![result(1, 1, 25), result(1, 3, 15), result(2, 2, 18)];

        let standings = StandingsRanker::rank(&results, &drivers);

        assert_eq!(standings.len(), 2);
        assert_eq!(standings[0].driver_name, "a");
        assert_eq!(standings[0].points, 40);
        assert_eq!(standings[0].position, 1);
        assert_eq!(standings[0].gap, 0);

        assert_eq!(standings[1].driver_name, "b");
        assert_eq!(standings[1].points, 18);
        assert_eq!(standings[1].position, 2);
        assert_eq!(standings[1].gap, 22);
    }

    #[test]
    fn leader_has_zero_gap_and_gaps_are_non_negative() {
        let drivers = vec![driver(1, "a"), driver(2, "b"), driver(3, "c")];
        let results = vec![result(1, 1, 25), result(2, 2, 18), result(3, 3, 15)];

        let standings = StandingsRanker::rank(&results, &drivers);

        assert_eq!(standings[0].gap, 0);
        for standing in &standings[1..] {
            assert_eq!(standing.gap, standings[0].points - standing.points);
            assert!(standing.gap >= 0);
        }
    }

    #[test]
    fn positions_are_contiguous_from_one() {
        let drivers: Vec<Driver> = (1..=5).map(|i| driver(i, &format!("d{}", i))).collect();
        let results: Vec<RaceResult> = (1..=5).map(|i| result(i, i, 30 - i)).collect();

        let standings = StandingsRanker::rank(&results, &drivers);

        for (index, standing) in standings.iter().enumerate() {
            assert_eq!(standing.position, (index + 1) as i32);
        }
    }

    #[test]
    fn equal_points_are_broken_by_wins() {
        // both on 30 points, driver 2 with a win, driver 1 without
        let drivers = vec![driver(1, "a"), driver(2, "b")];
        let results = vec![
            result(1, 2, 15),
            result(1, 2, 15),
            result(2, 1, 25),
            result(2, 6, 5),
        ];

        let standings = StandingsRanker::rank(&results, &drivers);

        assert_eq!(standings[0].driver_name, "b");
        assert_eq!(standings[0].points, 30);
        assert_eq!(standings[1].driver_name, "a");
        assert_eq!(standings[1].points, 30);
        assert_eq!(standings[1].gap, 0);
    }

    #[test]
    fn equal_points_and_wins_are_broken_by_podiums() {
        let drivers = vec![driver(1, "a"), driver(2, "b")];
        let results = vec![
            result(1, 4, 10),
            result(1, 5, 10),
            result(2, 3, 10),
            result(2, 6, 10),
        ];

        let standings = StandingsRanker::rank(&results, &drivers);

        assert_eq!(standings[0].driver_name, "b");
        assert_eq!(standings[1].driver_name, "a");
    }

    #[test]
    fn full_ties_fall_back_to_driver_id() {
        let drivers = vec![driver(9, "late"), driver(4, "early")];
        let results = vec![result(9, 2, 18), result(4, 2, 18)];

        let standings = StandingsRanker::rank(&results, &drivers);

        assert_eq!(standings[0].driver_id, 4);
        assert_eq!(standings[1].driver_id, 9);
    }

    #[test]
    fn ranking_is_independent_of_input_order() {
        let drivers = vec![driver(1, "a"), driver(2, "b"), driver(3, "c")];
        let mut results = vec![
            result(1, 1, 25),
            result(2, 2, 18),
            result(3, 3, 15),
            result(2, 1, 25),
            result(1, 4, 12),
        ];

        let forward = StandingsRanker::rank(&results, &drivers);
        results.reverse();
        let backward = StandingsRanker::rank(&results, &drivers);

        assert_eq!(forward, backward);
    }

    #[test]
    fn unknown_driver_rows_still_rank() {
        // the driver record can lag behind its results; the row must
        // not be dropped from the standings
        let standings = StandingsRanker::rank(&[result(42, 1, 25)], &[]);

        assert_eq!(standings.len(), 1);
        assert_eq!(standings[0].driver_id, 42);
        assert_eq!(standings[0].driver_name, "");
    }
}
