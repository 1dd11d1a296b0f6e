//! # Holocron
//!
//! A two-pipeline aggregator for a public sci-fi media catalog API.
//!
//! Holocron fetches characters and films from the catalog and persists
//! the aggregated results either to MySQL or to a JSON file:
//!
//! ```text
//! ┌─────────┐   ┌───────────────────────┐   ┌─────────────┐
//! │ Catalog │──▶│ sample: random chars   │──▶│ MySQL       │
//! │   API   │   │ grouped by film        │   │ (table/film)│
//! │ (JSON)  │──▶│ hydrate: one film,     │──▶│ JSON file   │
//! └─────────┘   │ references expanded    │   │ (indented)  │
//!               └───────────────────────┘   └─────────────┘
//! ```
//!
//! Both pipelines are strictly sequential: every fetch completes before
//! the next begins, and a failed fetch aborts the run.
//!
//! ## Quick Start
//!
//! ```bash
//! holocron sample               # prompts for MySQL credentials
//! holocron hydrate              # writes ./task_two.json
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`fetch`] | Catalog resource fetching |
//! | [`sample`] | Random-sampling pipeline (film index) |
//! | [`db`] | MySQL bootstrap and per-film persistence |
//! | [`hydrate`] | Single-film hydration pipeline |
//! | [`normalize`] | Unit conversion and reference stripping |

pub mod config;
pub mod db;
pub mod fetch;
pub mod hydrate;
pub mod models;
pub mod normalize;
pub mod sample;
