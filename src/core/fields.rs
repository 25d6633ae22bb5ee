//! Parsers that turn the free text of a listing card into typed values.

use crate::domain::model::Postcode;
use crate::utils::error::ExtractionError;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Bedroom count assumed for cards that only state a property type.
pub const DEFAULT_BEDROOM_COUNT: u32 = 1;

const SALE_DATE_FORMAT: &str = "%d %b %Y";
const NEW_BUILD_NOTE: &str = "(New Build)";

static POSTCODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([A-Z]{1,2}[0-9][A-Z0-9]? ?[0-9][A-Z]{2}|GIR ?0A{2})")
        .expect("postcode pattern is valid")
});

/// Finds the first UK postcode in `address`.
///
/// The inward part is always three characters, so a postcode written
/// without its space is split before the last three.
pub fn parse_postcode(address: &str) -> Postcode {
    let Some(found) = POSTCODE_RE.find(address) else {
        return Postcode::default();
    };

    let code = found.as_str();
    let (outward, inward) = code
        .split_once(' ')
        .unwrap_or_else(|| code.split_at(code.len() - 3));

    Postcode {
        outward: outward.trim().to_string(),
        inward: inward.trim().to_string(),
    }
}

/// Parses text such as `"3 bed, Flat"` into `(3, "Flat")`.
///
/// Only the segment after the first comma is the type; later segments are dropped.
pub fn parse_bedrooms_and_type(text: &str) -> Result<(u32, String), ExtractionError> {
    let mut parts = text.split(',');
    let count = parts.next().unwrap_or_default().replacen(" bed", "", 1);
    let property_type = parts.next().unwrap_or_default();

    let bedrooms = count
        .trim()
        .parse::<u32>()
        .map_err(|source| ExtractionError::InvalidBedroomCount {
            text: text.trim().to_string(),
            source,
        })?;

    Ok((bedrooms, property_type.trim().to_string()))
}

/// Cards without a bedroom count, e.g. studios, count as one bedroom.
pub fn parse_type_only(text: &str) -> (u32, String) {
    (DEFAULT_BEDROOM_COUNT, text.trim().to_string())
}

/// Parses a price such as `"£1,234,567"` into whole pounds.
pub fn parse_price(text: &str) -> Result<u64, ExtractionError> {
    // "Â£" is how a UTF-8 pound sign reads when a page was saved as Latin-1
    let digits = text.replace("Â£", "").replace('£', "").replace(',', "");

    digits
        .trim()
        .parse::<u64>()
        .map_err(|source| ExtractionError::InvalidPrice {
            text: text.trim().to_string(),
            source,
        })
}

/// Parses a sale date such as `"3 Jan 2020 (New Build)"`.
pub fn parse_sale_date(text: &str) -> Result<NaiveDate, ExtractionError> {
    let date = text.replacen(NEW_BUILD_NOTE, "", 1);

    NaiveDate::parse_from_str(date.trim(), SALE_DATE_FORMAT).map_err(|source| {
        ExtractionError::InvalidDate {
            text: text.trim().to_string(),
            source,
        }
    })
}
