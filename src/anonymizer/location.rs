// WHY: Location spans carry very different shapes (full addresses, corners,
// districts, parks); a keyword-driven grammar picks the matching template

use anyhow::Result;
use rand::Rng;

use crate::gazetteer::{Gazetteer, WayRecord};

/// Aliases that mark the span as carrying its own street descriptor, which
/// selects the fully-qualified address template
const STREET_DESCRIPTORS: &[&str] = &["carrer", "calle", "vía", "via", "carrero", "carreró"];

/// Markers for a street corner ("X amb Y")
const INTERSECTION_MARKERS: &[&str] = &[" amb ", " i ", " cantonada "];

/// Keywords naming a neighborhood or district
const DISTRICT_KEYWORDS: &[&str] = &["districte", "district", "distrito", "barrio", "barri", "zona"];

/// Keywords naming a park or garden
const PARK_KEYWORDS: &[&str] = &["park", "parque", "jardín", "parc", "plaça"];

/// Conjunctions joining the two sides of a generated intersection
const CONJUNCTIONS: &[&str] = &["amb", "i", "con", "y", "cantonada"];

/// Generate a synthetic location for the spanned text.
///
/// The lower-cased input is matched against five address shapes, first hit
/// wins:
/// 1. contains a digit: full street address, numbered 1 to 100; the way
///    type and particle are included only when the text itself carries a
///    street descriptor
/// 2. intersection marker: two distinct streets joined by a random
///    conjunction
/// 3. district keyword: a district entry, verbatim
/// 4. park keyword: a park record
/// 5. anything else: a bare street record
///
/// Keyword checks are plain substring containment over the fixed alias
/// tables above; every draw is uniform and independent, so repeated spans
/// in one document may well receive the same replacement.
pub fn generate<R: Rng>(rng: &mut R, gazetteer: &Gazetteer, text: &str) -> Result<String> {
    let lower = text.to_lowercase();

    if lower.chars().any(char::is_numeric) {
        let street = gazetteer.sample_street(rng)?;
        let number = rng.random_range(1..=100);
        if contains_any(&lower, STREET_DESCRIPTORS) {
            return Ok(format!("{} {}", format_way(street), number));
        }
        return Ok(format!("{} {}", street.name, number));
    }

    if contains_any(&lower, INTERSECTION_MARKERS) {
        let (first, second) = gazetteer.sample_street_pair(rng)?;
        let conjunction = CONJUNCTIONS[rng.random_range(0..CONJUNCTIONS.len())];
        return Ok(format!(
            "{} {} {}",
            format_way(first),
            conjunction,
            format_way(second)
        ));
    }

    if contains_any(&lower, DISTRICT_KEYWORDS) {
        return Ok(gazetteer.sample_district(rng)?.to_string());
    }

    if contains_any(&lower, PARK_KEYWORDS) {
        return Ok(format_way(gazetteer.sample_park(rng)?));
    }

    Ok(format_way(gazetteer.sample_street(rng)?))
}

// TODO: drop the separating space when the particle ends with an
// apostrophe, so "carrer d'Aragó" does not render as "carrer d' Aragó"
fn format_way(record: &WayRecord) -> String {
    format!("{} {} {}", record.way_type, record.particle, record.name)
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}
