//! codequest-core: question catalogue, adaptive difficulty, attempt ledger
//! and report aggregation.
//!
//! This crate holds the data model and every stateful piece of the trainer.
//! Interactive prompting and file rendering live in the other crates.

pub mod bank;
pub mod catalogue;
pub mod config;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod ledger;
pub mod lesson;
pub mod model;
pub mod report;
pub mod roster;
pub mod statistics;
pub mod tracker;

pub use catalogue::Catalogue;
pub use config::{load_config, load_config_from, CodequestConfig};
pub use engine::Trainer;
pub use error::TrainerError;
pub use ledger::AttemptLedger;
pub use roster::RosterStore;
