// src/lib.rs
pub mod config;
pub mod errors;
pub mod models;
pub mod prompts;
pub mod interpreter;
pub mod providers;
pub mod runner;
pub mod banner;
pub mod api;
