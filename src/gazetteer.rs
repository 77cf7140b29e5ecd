// WHY: All reference data behind one read-only store, loaded and validated
// once so replacement strategies can sample without re-checking resources

use anyhow::{bail, Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Way types whose nomenclator records make up the street subset
pub const STREET_WAY_TYPES: &[&str] = &["carrer", "via", "carreró", "avinguda", "passeig"];

/// Way types whose nomenclator records make up the park subset
pub const PARK_WAY_TYPES: &[&str] = &["jardí", "placeta", "plaça", "jardins", "parc"];

/// One nomenclator entry: a named way with its type and linking particle,
/// e.g. `carrer` / `de` / `Mallorca`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WayRecord {
    pub way_type: String,
    pub particle: String,
    pub name: String,
}

/// Locations of the four gazetteer resource files
#[derive(Debug, Clone)]
pub struct GazetteerConfig {
    /// Given-name list, one name per line
    pub names_path: PathBuf,
    /// Surname list, one name per line
    pub surnames_path: PathBuf,
    /// Tabular way dataset with `way_type`, `particle` and `name` columns
    pub nomenclator_path: PathBuf,
    /// Neighborhood/district list, one entry per line
    pub districts_path: PathBuf,
}

/// Read-only reference data used to generate plausible replacements.
///
/// Loaded once at construction and shared by every strategy invocation
/// afterwards; nothing here mutates, so an instance can back any number of
/// anonymization passes. Every list is validated non-empty at load time,
/// so a missing or empty resource is a construction error rather than a
/// silent empty sample later.
#[derive(Debug, Clone)]
pub struct Gazetteer {
    names: Vec<String>,
    surnames: Vec<String>,
    streets: Vec<WayRecord>,
    parks: Vec<WayRecord>,
    districts: Vec<String>,
}

impl Gazetteer {
    /// Load and validate all gazetteer resources from disk.
    pub fn load(config: &GazetteerConfig) -> Result<Self> {
        let names = read_resource(&config.names_path)?;
        let surnames = read_resource(&config.surnames_path)?;
        let nomenclator = read_resource(&config.nomenclator_path)?;
        let districts = read_resource(&config.districts_path)?;
        Self::from_raw(&names, &surnames, &nomenclator, &districts)
    }

    /// Async variant of [`Gazetteer::load`] for callers already inside a
    /// runtime (e.g. format adapters with async ingestion pipelines).
    pub async fn load_async(config: &GazetteerConfig) -> Result<Self> {
        let names = read_resource_async(&config.names_path).await?;
        let surnames = read_resource_async(&config.surnames_path).await?;
        let nomenclator = read_resource_async(&config.nomenclator_path).await?;
        let districts = read_resource_async(&config.districts_path).await?;
        Self::from_raw(&names, &surnames, &nomenclator, &districts)
    }

    /// Build a store from already-parsed lists, for collaborators that load
    /// resources through their own serialization. Way records are filtered
    /// into the street and park subsets; other way types are dropped.
    pub fn from_parts(
        names: Vec<String>,
        surnames: Vec<String>,
        ways: Vec<WayRecord>,
        districts: Vec<String>,
    ) -> Result<Self> {
        let mut streets = Vec::new();
        let mut parks = Vec::new();
        for record in ways {
            if STREET_WAY_TYPES.contains(&record.way_type.as_str()) {
                streets.push(record);
            } else if PARK_WAY_TYPES.contains(&record.way_type.as_str()) {
                parks.push(record);
            }
        }

        if names.is_empty() {
            bail!("given-name list is empty");
        }
        if surnames.is_empty() {
            bail!("surname list is empty");
        }
        if districts.is_empty() {
            bail!("district list is empty");
        }
        if streets.is_empty() {
            bail!("nomenclator has no street records (way types {STREET_WAY_TYPES:?})");
        }
        if parks.is_empty() {
            bail!("nomenclator has no park records (way types {PARK_WAY_TYPES:?})");
        }

        info!(
            "Gazetteer loaded: {} names, {} surnames, {} streets, {} parks, {} districts",
            names.len(),
            surnames.len(),
            streets.len(),
            parks.len(),
            districts.len()
        );
        Ok(Self {
            names,
            surnames,
            streets,
            parks,
            districts,
        })
    }

    fn from_raw(names: &str, surnames: &str, nomenclator: &str, districts: &str) -> Result<Self> {
        Self::from_parts(
            parse_list(names),
            parse_list(surnames),
            parse_nomenclator(nomenclator)?,
            parse_list(districts),
        )
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn surnames(&self) -> &[String] {
        &self.surnames
    }

    pub fn streets(&self) -> &[WayRecord] {
        &self.streets
    }

    pub fn parks(&self) -> &[WayRecord] {
        &self.parks
    }

    pub fn districts(&self) -> &[String] {
        &self.districts
    }

    /// Uniformly sample one given name.
    pub fn sample_name<R: Rng>(&self, rng: &mut R) -> Result<&str> {
        sample(rng, &self.names, "given-name").map(String::as_str)
    }

    /// Uniformly sample one surname.
    pub fn sample_surname<R: Rng>(&self, rng: &mut R) -> Result<&str> {
        sample(rng, &self.surnames, "surname").map(String::as_str)
    }

    /// Uniformly sample one street record.
    pub fn sample_street<R: Rng>(&self, rng: &mut R) -> Result<&WayRecord> {
        sample(rng, &self.streets, "street")
    }

    /// Uniformly sample two distinct street records.
    pub fn sample_street_pair<R: Rng>(&self, rng: &mut R) -> Result<(&WayRecord, &WayRecord)> {
        if self.streets.len() < 2 {
            bail!(
                "an intersection needs two distinct street records, gazetteer has {}",
                self.streets.len()
            );
        }
        let first = rng.random_range(0..self.streets.len());
        let mut second = rng.random_range(0..self.streets.len() - 1);
        if second >= first {
            second += 1;
        }
        Ok((&self.streets[first], &self.streets[second]))
    }

    /// Uniformly sample one park record.
    pub fn sample_park<R: Rng>(&self, rng: &mut R) -> Result<&WayRecord> {
        sample(rng, &self.parks, "park")
    }

    /// Uniformly sample one district entry.
    pub fn sample_district<R: Rng>(&self, rng: &mut R) -> Result<&str> {
        sample(rng, &self.districts, "district").map(String::as_str)
    }
}

// Draws are uniform and independent across calls; an empty set is an
// error, never an empty-string fallback.
fn sample<'a, R: Rng, T>(rng: &mut R, records: &'a [T], what: &str) -> Result<&'a T> {
    if records.is_empty() {
        bail!("cannot sample from empty {what} gazetteer");
    }
    Ok(&records[rng.random_range(0..records.len())])
}

fn read_resource(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("cannot read gazetteer resource {}", path.display()))
}

async fn read_resource_async(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("cannot read gazetteer resource {}", path.display()))
}

/// Parse a one-entry-per-line list, skipping blank lines.
fn parse_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Parse the nomenclator table: a comma-separated header naming the
/// `way_type`, `particle` and `name` columns (any order, case-insensitive),
/// followed by one record per line.
fn parse_nomenclator(content: &str) -> Result<Vec<WayRecord>> {
    let mut lines = content.lines();
    let header = lines.next().context("nomenclator file is empty")?;
    let columns: Vec<String> = header.split(',').map(|c| c.trim().to_lowercase()).collect();

    let column_index = |name: &str| -> Result<usize> {
        columns
            .iter()
            .position(|c| c == name)
            .with_context(|| format!("nomenclator header is missing the {name} column"))
    };
    let way_type_idx = column_index("way_type")?;
    let particle_idx = column_index("particle")?;
    let name_idx = column_index("name")?;
    let width = way_type_idx.max(particle_idx).max(name_idx) + 1;

    let mut records = Vec::new();
    for (line_number, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() < width {
            bail!(
                "nomenclator line {} has {} fields, expected at least {}",
                line_number + 2,
                fields.len(),
                width
            );
        }
        records.push(WayRecord {
            way_type: fields[way_type_idx].to_string(),
            particle: fields[particle_idx].to_string(),
            name: fields[name_idx].to_string(),
        });
    }
    Ok(records)
}
