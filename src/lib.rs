//! Model-to-document mapping over MongoDB, plus the account API of the trip
//! planner built on top of it.

pub mod api;
pub mod config;
pub mod database;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;
