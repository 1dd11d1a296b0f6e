//! Core data models used by both pipelines.
//!
//! Pipeline output shapes are fixed here: [`FilmEntry`] serializes with
//! the `film`/`character` keys of the sampling index, and the field order
//! of [`FilmRecord`] fixes the key order of the hydrated JSON document.

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// One film's entry in the sampling index: the film title plus the
/// characters sampled into it, in first-seen order.
#[derive(Debug, Clone, Serialize)]
pub struct FilmEntry {
    #[serde(rename = "film")]
    pub title: String,
    #[serde(rename = "character")]
    pub characters: Vec<String>,
}

impl FilmEntry {
    pub fn new(title: String) -> Self {
        Self {
            title,
            characters: Vec::new(),
        }
    }

    /// Append a character name unless it is already present.
    pub fn add_character(&mut self, name: &str) {
        if !self.characters.iter().any(|existing| existing == name) {
            self.characters.push(name.to_string());
        }
    }
}

/// Mapping from `"episode <id>"` keys to film entries.
pub type FilmIndex = BTreeMap<String, FilmEntry>;

/// The five reference-list fields a film carries.
pub const REFERENCE_FIELDS: [&str; 5] = ["characters", "planets", "starships", "vehicles", "species"];

/// A fully hydrated film.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilmRecord {
    pub title: String,
    pub episode_id: i64,
    pub opening_crawl: String,
    pub director: String,
    pub producer: String,
    pub release_date: String,
    pub characters: Vec<Value>,
    pub planets: Vec<Value>,
    pub starships: Vec<Value>,
    pub vehicles: Vec<Value>,
    pub species: Vec<Value>,
    pub created: String,
    pub edited: String,
    pub url: String,
}

impl FilmRecord {
    /// The five expanded reference lists, in [`REFERENCE_FIELDS`] order.
    pub fn reference_lists_mut(&mut self) -> [&mut Vec<Value>; 5] {
        [
            &mut self.characters,
            &mut self.planets,
            &mut self.starships,
            &mut self.vehicles,
            &mut self.species,
        ]
    }
}
