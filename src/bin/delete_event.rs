use std::env;

use dotenvy::dotenv;
use log::{error, info};

use gt_league_backend::modules::helpers::logging::setup_logging;
use gt_league_backend::modules::models::event::Event;
use gt_league_backend::modules::models::general::establish_connection;

/// delete the events passed as arguments, together with their
/// registrations and results.
fn main() {
    dotenv().ok();
    setup_logging().expect("failed to setup logging");

    let event_ids: Vec<i32> = env::args()
        .skip(1)
        .filter_map(|arg| arg.parse::<i32>().ok())
        .collect();

    if event_ids.is_empty() {
        println!("usage: delete_event <event_id>...");
        return;
    }

    let connection = &mut establish_connection();
    for event_id in event_ids {
        let event = match Event::get_by_id(connection, event_id) {
            Ok(event) => event,
            Err(err) => {
                error!(target:"delete_event", "could not load event {}: {}", event_id, err);
                continue;
            }
        };

        match event.delete(connection) {
            Ok(()) => {
                info!(target:"delete_event", "deleted event {} ({})", event_id, event.name);
                println!("Deleted event: {}", event_id);
            }
            Err(err) => {
                error!(target:"delete_event", "could not delete event {}: {}", event_id, err);
            }
        }
    }
}
