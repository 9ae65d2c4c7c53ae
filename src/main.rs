use rocket::{launch, routes, Build, Rocket};

use gt_league_backend::cron_jobs::register_cron_jobs;
use gt_league_backend::modules::helpers::fairings::cors::CORS;
use gt_league_backend::modules::helpers::logging::setup_logging;
use gt_league_backend::routes::api;

#[launch]
async fn rocket() -> Rocket<Build> {
    setup_logging().expect("Failed to setup logging");

    // register cron jobs that need to run.
    // these are jobs that either need to effect the database, redis, or both.
    register_cron_jobs().await;

    // start the webserver
    rocket::build().attach(CORS).mount(
        "/api",
        routes![
            // drivers
            api::driver::get_all,
            api::driver::get_one_stats,
            api::driver::get_one,
            api::driver::create,
            // seasons
            api::season::get_all,
            api::season::get_active,
            api::season::create,
            // championships
            api::championship::get_all,
            api::championship::from_season,
            api::championship::get_standings,
            api::championship::create,
            // events
            api::event::get_all,
            api::event::from_championship,
            api::event::registrations,
            api::event::create,
            api::event::set_status,
            api::event::register,
            api::event::delete,
            // results
            api::result::for_event,
            api::result::save,
        ],
    )
}
