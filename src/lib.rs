pub mod address;
pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod highlight;
pub mod render;
pub mod search;
pub mod session;
pub mod ui;
