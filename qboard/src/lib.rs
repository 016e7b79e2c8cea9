pub mod api;
pub mod board;
pub mod cli;
pub mod error;
pub mod models;
pub mod render;
pub mod services;
pub mod settings;
pub mod store;
pub mod validation;
pub mod view;
