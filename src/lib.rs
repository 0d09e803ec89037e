//! # Kviz Game Library
//!
//! This library provides the core game logic for a presenter-operated trivia
//! game. One trusted operator drives a two-round question board with fixed
//! point tables, hidden questions that must be handed to another player, a
//! per-question countdown, and a theme-elimination betting finale. The
//! library is a pure state machine: the embedding shell renders the state,
//! feeds presenter intents in, and runs the few delayed alarms the machine
//! schedules for itself.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::ignored_unit_patterns)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_panics_doc)]

pub mod constants;

pub mod catalog;
pub mod game;
pub mod ledger;
pub mod persist;
pub mod redirect;
pub mod super_game;
pub mod timer;
