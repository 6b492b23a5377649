pub mod engine_config;
pub mod ids;
pub mod outcome;
pub mod ratings;
pub mod update_schedule;
