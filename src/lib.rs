pub mod a1;
pub mod api;
pub mod args;
pub mod auth;
pub mod color;
pub mod config;
pub mod errors;
pub mod resources;
pub mod server;
pub mod state;
pub mod tools;
