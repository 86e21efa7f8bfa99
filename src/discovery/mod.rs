pub mod coordinator;
pub mod coverage;
pub mod filter;
pub mod intake;
pub mod relevance;
pub mod store;
pub mod strategies;
