pub mod app;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod fetcher;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod profile;
pub mod state;

#[cfg(test)]
mod tests;
