pub mod collection;
pub mod telemetry;
