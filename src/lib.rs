pub mod config;
pub mod controller;
pub mod data_sources;
pub mod error;
pub mod models;
pub mod services;
