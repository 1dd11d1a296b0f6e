//! Single-film hydration pipeline.
//!
//! Fetches one film and replaces each of its five reference lists
//! (characters, planets, starships, vehicles, species) with the fully
//! fetched records, in order. The hydrated record is then normalized
//! (unit conversion, reference stripping) and written as indented JSON.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

use crate::config::Config;
use crate::fetch::{Fetch, HttpFetcher};
use crate::models::{FilmRecord, REFERENCE_FIELDS};
use crate::normalize;

/// Fetch a film and expand every referenced sub-resource.
///
/// Scalar fields are copied verbatim. Reference lists are resolved
/// strictly in order, one fetch at a time, with no deduplication; a
/// failed fetch for any sub-resource aborts the whole hydration.
pub async fn hydrate_film(fetcher: &dyn Fetch, film_url: &str) -> Result<FilmRecord> {
    let film = fetcher.fetch_json(film_url).await?;

    let mut record = FilmRecord {
        title: text_field(&film, "title"),
        episode_id: film["episode_id"].as_i64().unwrap_or_default(),
        opening_crawl: text_field(&film, "opening_crawl"),
        director: text_field(&film, "director"),
        producer: text_field(&film, "producer"),
        release_date: text_field(&film, "release_date"),
        created: text_field(&film, "created"),
        edited: text_field(&film, "edited"),
        url: film["url"].as_str().unwrap_or(film_url).to_string(),
        ..FilmRecord::default()
    };

    for (field, target) in REFERENCE_FIELDS.iter().zip(record.reference_lists_mut()) {
        if let Some(references) = film[*field].as_array() {
            for reference in references {
                if let Some(url) = reference.as_str() {
                    target.push(fetcher.fetch_json(url).await?);
                }
            }
        }
    }

    Ok(record)
}

/// Serialize a film record as indented JSON, overwriting `path`.
pub fn write_record(record: &FilmRecord, path: &Path) -> Result<()> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    record
        .serialize(&mut serializer)
        .context("failed to serialize film record")?;

    std::fs::write(path, &buffer).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Run the full hydration pipeline for the configured film.
pub async fn run_hydrate(config: &Config) -> Result<()> {
    let fetcher = HttpFetcher::new();
    let film_url = config.api.resource_url(&config.hydrate.film_path);

    let mut record = hydrate_film(&fetcher, &film_url).await?;
    normalize::convert_measurements(&mut record.characters);
    normalize::strip_nested_references(&fetcher, &mut record).await?;

    write_record(&record, &config.hydrate.output)?;

    println!("hydrate {}", film_url);
    println!("  characters: {}", record.characters.len());
    println!("  planets: {}", record.planets.len());
    println!("  starships: {}", record.starships.len());
    println!("  vehicles: {}", record.vehicles.len());
    println!("  species: {}", record.species.len());
    println!("  wrote {}", config.hydrate.output.display());
    println!("ok");

    Ok(())
}

fn text_field(film: &Value, key: &str) -> String {
    film[key].as_str().unwrap_or_default().to_string()
}
