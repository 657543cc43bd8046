// wildlife-id - Wildlife species identification with Gemini
// Author: kelexine (https://github.com/kelexine)

pub mod cli;
pub mod config;
pub mod error;
pub mod gemini;
pub mod metrics;
pub mod models;
pub mod report;
pub mod server;
pub mod session;
pub mod utils;
pub mod validation;
pub mod vision;
