pub mod aggregator;
pub mod sink;
