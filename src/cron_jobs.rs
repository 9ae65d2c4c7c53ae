use std::time::Duration;

use log::{error, info};
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::macros::redis::delete_keys;
use crate::modules::redis::Redis;

/// drop every cached api response. standings and statistics are
/// recomputed from the results table on the next read, so a flush can
/// never lose data.
pub async fn flush_cached_views() {
    let r_conn = &mut match Redis::connect() {
        Ok(rc) => rc,
        Err(error) => {
            error!(target:"cron_jobs:flush_cached_views", "Error connecting to redis: {}", error);
            return;
        }
    };

    let keys = match Redis::keys(r_conn, "/api/*") {
        Ok(keys) => keys,
        Err(error) => {
            error!(target:"cron_jobs:flush_cached_views", "Error getting keys from redis: {}", error);
            return;
        }
    };

    let amount = keys.len();
    delete_keys!(r_conn, keys, "cron_jobs:flush_cached_views");

    info!(target:"cron_jobs:flush_cached_views", "flushed {} cached responses", amount);
}

pub async fn register_cron_jobs() {
    let scheduler = JobScheduler::new().await.unwrap();

    // run once a day
    let j = Job::new_repeated_async(Duration::from_secs(86400), |_uuid, _l| {
        Box::pin(async {
            flush_cached_views().await;
        })
    })
    .unwrap();

    scheduler.add(j).await.unwrap();
    scheduler.start().await.unwrap();
}
