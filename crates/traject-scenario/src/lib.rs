//! Scenario loading: the thin layer between an ASCII scenario file and a
//! ready-to-run [`Scheduler`](traject_engine::Scheduler).
//!
//! A scenario names the modules to compose (with their phases), assigns
//! `data`/`init` slot values by name, pulls in table decks, and declares
//! `IF … ENDIF` events. Parsing ([`ScenarioSpec::parse`]) is pure text →
//! structure with line-numbered errors; binding ([`build`]) resolves
//! names against the store, loads decks, registers events and the
//! standard terminators, and hands back the scheduler.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod build;
pub mod error;
pub mod parse;

pub use build::build;
pub use error::ScenarioError;
pub use parse::{EventBlock, ScenarioSpec};
