//! Post-hydration cleanup: unit conversion and reference stripping.
//!
//! Applied to the expanded sub-resource records of a hydrated film.
//! Character heights and masses are rewritten from metric to imperial,
//! and every sub-resource loses its nested reference lists and `url`
//! field, with `homeworld` references resolved to just the planet name.

use anyhow::Result;
use serde_json::Value;

use crate::fetch::Fetch;
use crate::models::FilmRecord;

/// Centimeters per inch.
const CM_PER_IN: f64 = 2.54;
/// Pounds per kilogram.
const LB_PER_KG: f64 = 2.205;

/// Convert each character's `height` (cm to inches) and `mass` (kg to
/// pounds) in place.
///
/// The `"unknown"` sentinel passes through unchanged. Values are parsed
/// from their digit characters only, so strings like `"1,358"` convert;
/// a value with no digits at all is left untouched rather than treated
/// as an error. Entries that are not JSON objects pass through.
pub fn convert_measurements(characters: &mut [Value]) {
    for character in characters {
        let object = match character.as_object_mut() {
            Some(object) => object,
            None => continue,
        };

        if let Some(height) = object.get_mut("height") {
            convert_in_place(height, |cm| cm / CM_PER_IN);
        }
        if let Some(mass) = object.get_mut("mass") {
            convert_in_place(mass, |kg| kg * LB_PER_KG);
        }
    }
}

fn convert_in_place(value: &mut Value, convert: impl Fn(f64) -> f64) {
    let text = match value.as_str() {
        Some(text) => text,
        None => return,
    };
    if text == "unknown" {
        return;
    }

    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    let metric = match digits.parse::<i64>() {
        Ok(metric) => metric,
        Err(_) => return,
    };

    *value = Value::String(convert(metric as f64).to_string());
}

/// Remove nested references from every expanded sub-resource.
///
/// For each record in the five reference lists: every key holding an
/// array is removed, the key `url` is removed, and a `homeworld` key
/// holding a resource URL is replaced with the fetched planet's name.
/// Entries that are not JSON objects pass through unchanged.
pub async fn strip_nested_references(fetcher: &dyn Fetch, record: &mut FilmRecord) -> Result<()> {
    for list in record.reference_lists_mut() {
        for item in list.iter_mut() {
            let object = match item.as_object_mut() {
                Some(object) => object,
                None => continue,
            };

            object.retain(|key, value| key.as_str() != "url" && !value.is_array());

            let homeworld_url = object
                .get("homeworld")
                .and_then(Value::as_str)
                .filter(|url| url.starts_with("http"))
                .map(str::to_string);

            if let Some(url) = homeworld_url {
                let planet = fetcher.fetch_json(&url).await?;
                object.insert("homeworld".to_string(), planet["name"].clone());
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;

    struct MapFetcher {
        resources: HashMap<String, Value>,
    }

    #[async_trait]
    impl Fetch for MapFetcher {
        async fn fetch_json(&self, url: &str) -> Result<Value> {
            match self.resources.get(url) {
                Some(value) => Ok(value.clone()),
                None => bail!("request to {} returned an error status: 404", url),
            }
        }
    }

    #[test]
    fn test_height_converts_to_inches() {
        let mut characters = vec![json!({"name": "Luke", "height": "172", "mass": "77"})];
        convert_measurements(&mut characters);
        assert_eq!(characters[0]["height"], "67.71653543307086");
        assert_eq!(characters[0]["mass"], "169.785");
    }

    #[test]
    fn test_unknown_sentinel_passes_through() {
        let mut characters = vec![json!({"height": "unknown", "mass": "unknown"})];
        convert_measurements(&mut characters);
        assert_eq!(characters[0]["height"], "unknown");
        assert_eq!(characters[0]["mass"], "unknown");
    }

    #[test]
    fn test_digits_extracted_from_formatted_value() {
        // Jabba's mass is reported as "1,358".
        let mut characters = vec![json!({"height": "175", "mass": "1,358"})];
        convert_measurements(&mut characters);
        assert_eq!(characters[0]["mass"], (1358.0 * LB_PER_KG).to_string().as_str());
    }

    #[test]
    fn test_digitless_value_left_untouched() {
        let mut characters = vec![json!({"height": "n/a", "mass": "77"})];
        convert_measurements(&mut characters);
        assert_eq!(characters[0]["height"], "n/a");
        assert_eq!(characters[0]["mass"], "169.785");
    }

    #[test]
    fn test_non_object_entries_pass_through() {
        let mut characters = vec![json!("not an object")];
        convert_measurements(&mut characters);
        assert_eq!(characters[0], "not an object");
    }

    #[tokio::test]
    async fn test_strip_removes_lists_and_url() {
        let mut record = FilmRecord {
            planets: vec![json!({
                "name": "Tatooine",
                "residents": ["url1", "url2"],
                "url": "http://x",
                "films": ["url3"]
            })],
            ..FilmRecord::default()
        };

        let fetcher = MapFetcher {
            resources: HashMap::new(),
        };
        strip_nested_references(&fetcher, &mut record).await.unwrap();

        assert_eq!(record.planets[0], json!({"name": "Tatooine"}));
    }

    #[tokio::test]
    async fn test_strip_resolves_homeworld_to_name() {
        let mut record = FilmRecord {
            characters: vec![json!({"name": "Luke", "homeworld": "http://api/planets/1"})],
            ..FilmRecord::default()
        };

        let mut resources = HashMap::new();
        resources.insert(
            "http://api/planets/1".to_string(),
            json!({"name": "Tatooine", "residents": []}),
        );
        let fetcher = MapFetcher { resources };

        strip_nested_references(&fetcher, &mut record).await.unwrap();
        assert_eq!(
            record.characters[0],
            json!({"name": "Luke", "homeworld": "Tatooine"})
        );
    }

    #[tokio::test]
    async fn test_strip_leaves_non_url_homeworld_alone() {
        let mut record = FilmRecord {
            characters: vec![json!({"name": "Luke", "homeworld": "Tatooine"})],
            ..FilmRecord::default()
        };

        let fetcher = MapFetcher {
            resources: HashMap::new(),
        };
        strip_nested_references(&fetcher, &mut record).await.unwrap();
        assert_eq!(record.characters[0]["homeworld"], "Tatooine");
    }
}
