pub mod cleaning;
pub mod config;
pub mod demand;
pub mod fetch;
pub mod forecast;
pub mod output;
pub mod positions;
pub mod record;
pub mod report;
pub mod scheduling;
pub mod seed;
pub mod store;
