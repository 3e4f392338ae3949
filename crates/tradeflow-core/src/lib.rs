pub mod batch;
pub mod category;
pub mod cleaning;
pub mod coerce;
pub mod columns;
pub mod config;
pub mod costs;
pub mod db;
pub mod error;
pub mod features;
pub mod loader;
pub mod outputs;
pub mod units;
