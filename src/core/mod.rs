pub mod compute;
pub mod cron;
pub mod error;
pub mod human;
pub mod model;
pub mod repeat_at;
pub mod rule;
pub mod timezone;
pub mod utils;
pub mod window;
