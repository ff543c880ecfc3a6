pub mod app;
pub mod catalog;
pub mod config;
pub mod models;
pub mod pages;
pub mod player;
pub mod provider;
pub mod routes;
pub mod utils;
