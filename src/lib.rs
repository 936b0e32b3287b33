//! Rating engine for an informal game ladder.
//!
//! Ratings are never stored.  Every mutation replays the whole match log through the Elo and
//! Glicko-2 pipelines and swaps the result into a [`cache::RatingCache`] snapshot that serves all
//! reads.

pub mod archive;
pub mod cache;
pub mod card;
pub mod command;
pub mod config;
pub mod context;
pub mod elo;
pub mod error;
pub mod glicko2;
pub mod handler;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod persistent_state;
pub mod ranking;
pub mod replay;
pub mod service;
pub mod store;

pub use error::{Error, Result};
pub use service::LadderService;
