pub mod result_entry;
pub mod redis;

pub mod models {
    pub mod championship;
    pub mod driver;
    pub mod event;
    pub mod race_result;
    pub mod registration;
    pub mod season;

    pub mod general;
}

pub mod helpers {
    pub mod sheets;
    pub mod standings;
    pub mod stats;

    pub mod logging;

    pub mod fairings {
        pub mod cors;
    }
}
