pub mod cron_jobs;
pub mod errors;
pub mod modules;
pub mod schema;

pub mod macros {
    pub mod database_error_handeler;
    pub mod redis;
    pub mod request_caching;
}

pub mod routes {
    pub mod api {
        pub mod championship;
        pub mod driver;
        pub mod event;
        pub mod result;
        pub mod season;
    }
}
