#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod battery;
pub mod client;
pub mod event;
pub mod network;
pub mod score;
pub mod session;
pub mod team;

pub use score::{Score, TeamScoreRecord, TeamView};
pub use team::{TeamNumber, TeamNumberError};
