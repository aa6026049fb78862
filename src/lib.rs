//! tubeport - FreeTube subscription and history import/export
//!
//! Moves subscriptions and watch history between FreeTube's own database
//! files, YouTube's OPML feed list and NewPipe's JSON export.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap
//! - [`codec`] - Interchange formats (native `.db`, OPML, NewPipe JSON)
//! - [`sanitize`] - Allow-list filtering of imported records
//! - [`resolver`] - Channel metadata lookup with backend fallback
//! - [`transfer`] - Import/export orchestration
//! - [`store`] - Profile and history persistence
//! - [`model`] - Data types (Profile, Subscription, HistoryEntry)
//! - [`config`] - Configuration management
//! - [`error`] - Error types and handling

#![forbid(unsafe_code)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod codec;
pub mod config;
pub mod error;
pub mod model;
pub mod resolver;
pub mod sanitize;
pub mod store;
pub mod transfer;

pub use error::{Error, Result};
