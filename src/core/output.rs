//! Renders extracted listings into the files handed to downstream analysis.

use crate::core::encoding::EncodedTables;
use crate::domain::model::{Listing, ListingFailure, OutputArtifact};
use crate::utils::error::Result;
use serde::Serialize;

pub const CSV_HEADER: [&str; 7] = [
    "postcode_first_part",
    "num_bedrooms",
    "house_type",
    "num_sale_records",
    "sale_amount",
    "sale_year",
    "sale_tenure",
];

pub const ENCODED_POSTCODE_FILE: &str = "encodedPostcode.json";
pub const ENCODED_HOUSE_TYPE_FILE: &str = "encodedHouseType.json";
pub const ENCODED_TENURE_FILE: &str = "encodedTenure.json";
pub const DECODE_POSTCODE_FILE: &str = "decodePostcode.json";
pub const DECODE_HOUSE_TYPE_FILE: &str = "decodeHouseType.json";
pub const DECODE_TENURE_FILE: &str = "decodeTenure.json";

pub fn to_json(listings: &[Listing]) -> Result<String> {
    Ok(serde_json::to_string_pretty(listings)?)
}

/// One row per (listing × sale); listing columns repeat on every sale row.
pub fn to_csv(listings: &[Listing]) -> Result<String> {
    let rows = listings.iter().flat_map(|listing| {
        listing.sales.iter().map(move |sale| {
            [
                listing.postcode.outward.clone(),
                listing.bedroom_count.to_string(),
                listing.property_type.clone(),
                listing.sales.len().to_string(),
                sale.amount.to_string(),
                year_cell(sale.year()),
                sale.tenure.clone(),
            ]
        })
    });
    write_csv(rows)
}

/// Same layout as [`to_csv`] with postcode, type and tenure replaced by codes.
pub fn to_encoded_csv(listings: &[Listing]) -> Result<(String, EncodedTables)> {
    let (tables, encoded) = EncodedTables::encode(listings);

    let rows = listings
        .iter()
        .flat_map(|listing| listing.sales.iter().map(move |sale| (listing, sale)))
        .zip(encoded)
        .map(|((listing, sale), codes)| {
            [
                codes.postcode.to_string(),
                listing.bedroom_count.to_string(),
                codes.property_type.to_string(),
                listing.sales.len().to_string(),
                sale.amount.to_string(),
                year_cell(sale.year()),
                codes.tenure.to_string(),
            ]
        });

    Ok((write_csv(rows)?, tables))
}

/// The six lookup tables written next to the encoded CSV.
pub fn lookup_tables(tables: &EncodedTables) -> Result<Vec<OutputArtifact>> {
    Ok(vec![
        OutputArtifact::new(
            ENCODED_POSTCODE_FILE,
            serde_json::to_string_pretty(&tables.postcode.encode_table())?,
        ),
        OutputArtifact::new(
            ENCODED_HOUSE_TYPE_FILE,
            serde_json::to_string_pretty(&tables.property_type.encode_table())?,
        ),
        OutputArtifact::new(
            ENCODED_TENURE_FILE,
            serde_json::to_string_pretty(&tables.tenure.encode_table())?,
        ),
        OutputArtifact::new(
            DECODE_POSTCODE_FILE,
            serde_json::to_string_pretty(&tables.postcode.decode_table())?,
        ),
        OutputArtifact::new(
            DECODE_HOUSE_TYPE_FILE,
            serde_json::to_string_pretty(&tables.property_type.decode_table())?,
        ),
        OutputArtifact::new(
            DECODE_TENURE_FILE,
            serde_json::to_string_pretty(&tables.tenure.decode_table())?,
        ),
    ])
}

#[derive(Serialize)]
struct FailureEntry<'a> {
    page: &'a str,
    card_index: usize,
    address: Option<&'a str>,
    error: String,
}

pub fn failures_to_json(failures: &[ListingFailure]) -> Result<String> {
    let entries: Vec<FailureEntry<'_>> = failures
        .iter()
        .map(|f| FailureEntry {
            page: &f.page,
            card_index: f.card_index,
            address: f.address.as_deref(),
            error: f.error.to_string(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

fn year_cell(year: Option<i32>) -> String {
    year.map(|y| y.to_string()).unwrap_or_default()
}

fn write_csv<I>(rows: I) -> Result<String>
where
    I: IntoIterator<Item = [String; 7]>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for row in rows {
        writer.write_record(&row)?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    String::from_utf8(bytes).map_err(|e| crate::utils::error::EtlError::ProcessingError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Postcode, SaleRecord};
    use crate::utils::error::ExtractionError;
    use chrono::NaiveDate;

    fn sample() -> Vec<Listing> {
        vec![
            Listing {
                address: "Apartment 14, Forest Court, Chester CH1 1AB".to_string(),
                postcode: Postcode {
                    outward: "CH1".to_string(),
                    inward: "1AB".to_string(),
                },
                bedroom_count: 3,
                property_type: "Flat".to_string(),
                sales: vec![
                    SaleRecord {
                        amount: 300_000,
                        date: NaiveDate::from_ymd_opt(2021, 6, 1),
                        tenure: "Leasehold".to_string(),
                    },
                    SaleRecord {
                        amount: 180_000,
                        date: NaiveDate::from_ymd_opt(2009, 2, 20),
                        tenure: "Leasehold".to_string(),
                    },
                ],
            },
            Listing {
                address: "Studio 3, Chester".to_string(),
                bedroom_count: 1,
                property_type: "Studio".to_string(),
                ..Listing::default()
            },
            Listing {
                address: "8 Mill Lane, Chester CH4 7XY".to_string(),
                postcode: Postcode {
                    outward: "CH4".to_string(),
                    inward: "7XY".to_string(),
                },
                bedroom_count: 1,
                property_type: "Plot, Land".to_string(),
                sales: vec![SaleRecord {
                    amount: 95_000,
                    date: None,
                    tenure: "Freehold".to_string(),
                }],
            },
        ]
    }

    #[test]
    fn test_csv_one_row_per_sale() {
        let csv = to_csv(&sample()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "postcode_first_part,num_bedrooms,house_type,num_sale_records,sale_amount,sale_year,sale_tenure"
        );
        assert_eq!(lines[1], "CH1,3,Flat,2,300000,2021,Leasehold");
        assert_eq!(lines[2], "CH1,3,Flat,2,180000,2009,Leasehold");
        // type-only text is kept whole, so it is quoted; undated sale has an empty year
        assert_eq!(lines[3], "CH4,1,\"Plot, Land\",1,95000,,Freehold");
    }

    #[test]
    fn test_csv_header_only_without_sales() {
        let csv = to_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }

    #[test]
    fn test_encoded_csv_and_lookup_tables() {
        let (csv, tables) = to_encoded_csv(&sample()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[1], "0,3,0,2,300000,2021,0");
        assert_eq!(lines[2], "0,3,0,2,180000,2009,0");
        assert_eq!(lines[3], "1,1,1,1,95000,,1");

        let artifacts = lookup_tables(&tables).unwrap();
        assert_eq!(artifacts.len(), 6);

        let decode_tenure: std::collections::BTreeMap<String, String> =
            serde_json::from_str(&artifacts[5].contents).unwrap();
        assert_eq!(decode_tenure["0"], "Leasehold");
        assert_eq!(decode_tenure["1"], "Freehold");

        let encoded_type: std::collections::BTreeMap<String, usize> =
            serde_json::from_str(&artifacts[1].contents).unwrap();
        assert_eq!(encoded_type["Flat"], 0);
        assert!(!encoded_type.contains_key("Studio"));
    }

    #[test]
    fn test_json_is_pretty_with_two_space_indent() {
        let json = to_json(&sample()[1..2]).unwrap();
        assert!(json.starts_with("[\n  {\n    \"address\": \"Studio 3, Chester\""));
        assert!(json.contains("\"bedroom_count\": 1"));
        assert!(json.contains("\"sales\": []"));
    }

    #[test]
    fn test_failure_report() {
        let failure = ListingFailure {
            page: "rm-pg3.html".to_string(),
            card_index: 4,
            address: None,
            error: ExtractionError::InvalidPrice {
                text: "POA".to_string(),
                source: "POA".parse::<u64>().unwrap_err(),
            },
        };
        let report: serde_json::Value =
            serde_json::from_str(&failures_to_json(&[failure]).unwrap()).unwrap();

        assert_eq!(report[0]["page"], "rm-pg3.html");
        assert_eq!(report[0]["card_index"], 4);
        assert!(report[0]["address"].is_null());
        assert!(report[0]["error"].as_str().unwrap().contains("POA"));
    }
}
