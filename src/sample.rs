//! Random-sampling pipeline.
//!
//! Draws random character ids, fetches each character and every film it
//! appears in, and accumulates a [`FilmIndex`] grouping character names
//! by film. The index is printed as pretty JSON and then persisted to
//! MySQL, one table per film.
//!
//! Sampling does not deduplicate draws: the same character may be
//! fetched more than once in one run, and films are re-fetched for every
//! character appearing in them. Any failed fetch aborts the run.

use anyhow::{bail, Result};
use rand::Rng;

use crate::config::Config;
use crate::db;
use crate::fetch::{Fetch, HttpFetcher};
use crate::models::{FilmEntry, FilmIndex};

/// Redraws allowed per sampled id before giving up. A draw only repeats
/// when it hits the excluded id, so the cap is unreachable in practice;
/// it bounds the loop.
const MAX_REDRAWS: u32 = 100;

/// Generate `count` character resource URLs with random ids.
///
/// Ids are drawn uniformly from `1..=max_id`; a draw equal to the
/// excluded id is discarded and redrawn. Returns exactly `count` URLs.
pub fn sample_character_urls<R: Rng>(
    rng: &mut R,
    config: &Config,
    count: usize,
) -> Result<Vec<String>> {
    let mut urls = Vec::with_capacity(count);

    for _ in 0..count {
        let mut drawn = None;
        for _ in 0..MAX_REDRAWS {
            let id = rng.random_range(1..=config.sample.max_id);
            if id == config.sample.excluded_id {
                continue;
            }
            drawn = Some(id);
            break;
        }

        match drawn {
            Some(id) => urls.push(config.api.people_url(id)),
            None => bail!(
                "exhausted {} redraws while sampling a character id",
                MAX_REDRAWS
            ),
        }
    }

    Ok(urls)
}

/// Fetch every sampled character and index their film appearances.
///
/// Index keys are `"episode <episode_id>"`. Character names are
/// deduplicated per film; duplicate draws of the same character are
/// therefore harmless.
pub async fn collect_film_appearances(fetcher: &dyn Fetch, urls: &[String]) -> Result<FilmIndex> {
    let mut index = FilmIndex::new();

    for url in urls {
        let character = fetcher.fetch_json(url).await?;
        let name = character["name"].as_str().unwrap_or_default().to_string();

        let film_urls: Vec<String> = character["films"]
            .as_array()
            .map(|films| {
                films
                    .iter()
                    .filter_map(|film| film.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        for film_url in &film_urls {
            let film = fetcher.fetch_json(film_url).await?;
            let title = film["title"].as_str().unwrap_or_default().to_string();
            let key = format!("episode {}", film["episode_id"].as_i64().unwrap_or_default());

            index
                .entry(key)
                .or_insert_with(|| FilmEntry::new(title))
                .add_character(&name);
        }
    }

    Ok(index)
}

/// Run the full sampling pipeline.
///
/// Prompts for MySQL credentials, connects (creating the database on
/// first run), samples characters, prints the film index as pretty JSON,
/// and writes one table per film with one unique row per character.
pub async fn run_sample(config: &Config, count: Option<usize>) -> Result<()> {
    let credentials = db::prompt_credentials()?;
    let pool = db::connect(&config.db, &credentials).await?;

    let count = count.unwrap_or(config.sample.count);
    let urls = {
        let mut rng = rand::rng();
        sample_character_urls(&mut rng, config, count)?
    };

    let fetcher = HttpFetcher::new();
    let index = collect_film_appearances(&fetcher, &urls).await?;

    println!("{}", serde_json::to_string_pretty(&index)?);

    db::ensure_tables(&pool, &index).await?;
    let inserted = db::write_records(&pool, &index).await?;

    println!();
    println!("sample");
    println!("  characters sampled: {}", urls.len());
    println!("  films indexed: {}", index.len());
    println!("  rows inserted: {}", inserted);
    println!("Database records written successfully.");

    pool.close().await;
    Ok(())
}
