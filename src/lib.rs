#![doc = "The `taskboard` library crate."]
#![doc = ""]
#![doc = "Authentication (access/refresh token pairs), the in-memory credential and task"]
#![doc = "stores, routing configuration and error handling for the taskboard API."]
#![doc = "The binary (`main.rs`) wires these into an actix-web server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;
