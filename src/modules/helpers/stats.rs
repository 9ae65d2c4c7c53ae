use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::modules::models::race_result::RaceResult;

/// per-driver rollup over a set of results. always recomputed from the
/// raw rows, never read back from the store.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DriverRollup {
    pub races: i64,
    pub wins: i64,
    pub podiums: i64,
    pub total_points: i64,
}

pub struct StatsAggregator {}

impl StatsAggregator {
    /// # roll up a set of results per driver
    /// counts races, wins (position 1) and podiums (positions 1 to 3)
    /// and sums the awarded points, grouped by driver. rows are taken
    /// at face value; the write path is responsible for their
    /// integrity. an empty input yields an empty map.
    ///
    /// ## Arguments
    /// * `results` - the result rows to aggregate, in any order
    ///
    /// ## Returns
    /// * `HashMap<i32, DriverRollup>` - one rollup per driver present
    ///   in the input
    pub fn aggregate(results: &[RaceResult]) -> HashMap<i32, DriverRollup> {
        let mut rollups: HashMap<i32, DriverRollup> = HashMap::new();

        for result in results {
            let rollup = rollups.entry(result.driver_id).or_default();

            rollup.races += 1;
            if result.position == 1 {
                rollup.wins += 1;
            }
            if (1..=3).contains(&result.position) {
                rollup.podiums += 1;
            }
            rollup.total_points += result.points as i64;
        }

        rollups
    }

    /// # roll up the results of a single driver
    /// rows belonging to other drivers are ignored, so the full result
    /// set can be passed in unfiltered.
    pub fn rollup_for_driver(results: &[RaceResult], driver_id: i32) -> DriverRollup {
        let mut rollup = DriverRollup::default();

        for result in results {
            if result.driver_id != driver_id {
                continue;
            }

            rollup.races += 1;
            if result.position == 1 {
                rollup.wins += 1;
            }
            if (1..=3).contains(&result.position) {
                rollup.podiums += 1;
            }
            rollup.total_points += result.points as i64;
        }

        rollup
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn empty_input_yields_empty_map() {
        assert!(StatsAggregator::aggregate(&[]).is_empty());
    }

    #[test]
    fn rollup_for_driver_on_empty_input_is_zeroed() {
        let rollup = StatsAggregator::rollup_for_driver(&[], 7);
        assert_eq!(rollup, DriverRollup::default());
    }

    #[test]
    fn counts_races_wins_podiums_and_points() {
        // driver 1: P1 for 25 and P3 for 15, driver 2: P2 for 18
        let results = vec![result(1, 1, 25), result(1, 3, 15), result(2, 2, 18)];

        let rollups = StatsAggregator::aggregate(&results);

        let a = rollups.get(&1).unwrap();
        assert_eq!(a.races, 2);
        assert_eq!(a.wins, 1);
        assert_eq!(a.podiums, 2);
        assert_eq!(a.total_points, 40);

        let b = rollups.get(&2).unwrap();
        assert_eq!(b.races, 1);
        assert_eq!(b.wins, 0);
        assert_eq!(b.podiums, 1);
        assert_eq!(b.total_points, 18);
    }

    #[test]
    fn points_are_summed_exactly() {
        let results = vec![result(5, 4, 12), result(5, 6, 8), result(5, 9, 2)];

        let rollups = StatsAggregator::aggregate(&results);
        assert_eq!(rollups.get(&5).unwrap().total_points, 12 + 8 + 2);
    }

    #[test]
    fn wins_never_exceed_podiums_never_exceed_races() {
        let results = vec![
            result(1, 1, 25),
            result(1, 2, 18),
            result(1, 10, 1),
            result(2, 1, 25),
            result(2, 1, 25),
            result(3, 15, 0),
        ];

        for rollup in StatsAggregator::aggregate(&results).values() {
            assert!(rollup.wins <= rollup.podiums);
            assert!(rollup.podiums <= rollup.races);
        }
    }

    #[test]
    fn aggregation_is_idempotent() {
        let results = vec![result(1, 1, 25), result(2, 2, 18), result(1, 5, 10)];

        let first = StatsAggregator::aggregate(&results);
        let second = StatsAggregator::aggregate(&results);
        assert_eq!(first, second);
    }

    #[test]
    fn malformed_rows_do_not_panic() {
        // integrity of position/points is the write path's problem;
        // the aggregator only has to stay well behaved
        let results = vec![result(1, 0, -5), result(1, -3, 10)];

        let rollups = StatsAggregator::aggregate(&results);
        let rollup = rollups.get(&1).unwrap();
        assert_eq!(rollup.races, 2);
        assert_eq!(rollup.wins, 0);
        assert_eq!(rollup.podiums, 0);
        assert_eq!(rollup.total_points, 5);
    }

    #[test]
    fn drivers_without_results_are_absent() {
        let results = vec![result(1, 1, 25)];

        let rollups = StatsAggregator::aggregate(&results);
        assert!(rollups.get(&2).is_none());
        assert_eq!(rollups.len(), 1);
    }

    #[test]
    fn rollup_for_driver_ignores_other_drivers() {
        let results = vec![result(1, 1, 25), result(2, 2, 18), result(1, 2, 18)];

        let rollup = StatsAggregator::rollup_for_driver(&results, 1);
        assert_eq!(rollup.races, 2);
        assert_eq!(rollup.total_points, 43);
    }
}
