#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod auth;
pub mod auth_handlers_tide;
pub mod change_feed;
pub mod database;
pub mod file_store;
pub mod http_server_state;
pub mod network;
pub mod persistence;
pub mod score_handlers_tide;
pub mod server_config;
pub mod server_main;
