pub mod error;
pub mod fetcher;
#[cfg(test)]
pub mod scripted;
