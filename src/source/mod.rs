pub mod client;
pub mod gamma;
#[cfg(test)]
pub mod simulator;
