use crate::domain::model::Listing;
use std::collections::{BTreeMap, HashMap};

/// Dense integer codes for one categorical column, assigned in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct CategoryCodes {
    codes: HashMap<String, usize>,
    values: Vec<String>,
}

impl CategoryCodes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the code for `value`, assigning the next free one if unseen.
    pub fn code_for(&mut self, value: &str) -> usize {
        if let Some(&code) = self.codes.get(value) {
            return code;
        }
        let code = self.values.len();
        self.codes.insert(value.to_string(), code);
        self.values.push(value.to_string());
        code
    }

    pub fn code(&self, value: &str) -> Option<usize> {
        self.codes.get(value).copied()
    }

    pub fn decode(&self, code: usize) -> Option<&str> {
        self.values.get(code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn encode_table(&self) -> BTreeMap<String, usize> {
        self.codes.iter().map(|(v, &c)| (v.clone(), c)).collect()
    }

    pub fn decode_table(&self) -> BTreeMap<usize, String> {
        self.values.iter().cloned().enumerate().collect()
    }
}

#[derive(Debug, Clone, Default)]
pub struct EncodedTables {
    pub postcode: CategoryCodes,
    pub property_type: CategoryCodes,
    pub tenure: CategoryCodes,
}

/// One encoded (listing × sale) row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedRow {
    pub postcode: usize,
    pub property_type: usize,
    pub tenure: usize,
}

impl EncodedTables {
    /// Walks every sale of every listing in order and encodes its categorical
    /// columns. Listings without sales contribute no codes.
    pub fn encode(listings: &[Listing]) -> (Self, Vec<EncodedRow>) {
        let mut tables = Self::default();
        let rows = listings
            .iter()
            .flat_map(|listing| listing.sales.iter().map(move |sale| (listing, sale)))
            .map(|(listing, sale)| EncodedRow {
                postcode: tables.postcode.code_for(&listing.postcode.outward),
                property_type: tables.property_type.code_for(&listing.property_type),
                tenure: tables.tenure.code_for(&sale.tenure),
            })
            .collect();
        (tables, rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Postcode, SaleRecord};

    fn listing(outward: &str, property_type: &str, tenures: &[&str]) -> Listing {
        Listing {
            postcode: Postcode {
                outward: outward.to_string(),
                inward: "1AB".to_string(),
            },
            property_type: property_type.to_string(),
            sales: tenures
                .iter()
                .map(|t| SaleRecord {
                    tenure: t.to_string(),
                    ..SaleRecord::default()
                })
                .collect(),
            ..Listing::default()
        }
    }

    #[test]
    fn test_codes_follow_first_appearance() {
        let mut codes = CategoryCodes::new();
        assert_eq!(codes.code_for("Flat"), 0);
        assert_eq!(codes.code_for("Terraced"), 1);
        assert_eq!(codes.code_for("Flat"), 0);
        assert_eq!(codes.code_for("Detached"), 2);
        assert_eq!(codes.len(), 3);
    }

    #[test]
    fn test_encode_and_decode_agree() {
        let listings = vec![
            listing("CH1", "Flat", &["Leasehold", "Freehold"]),
            listing("CH4", "Terraced", &["Freehold"]),
            listing("CH1", "Studio", &[]),
            listing("CH2", "Flat", &["Leasehold"]),
        ];
        let (tables, rows) = EncodedTables::encode(&listings);

        assert_eq!(rows.len(), 4);
        assert_eq!(
            rows[3],
            EncodedRow {
                postcode: 2,
                property_type: 0,
                tenure: 0
            }
        );

        // the sale-less studio never reaches the tables
        assert_eq!(tables.property_type.code("Studio"), None);

        for codes in [&tables.postcode, &tables.property_type, &tables.tenure] {
            for (value, code) in codes.encode_table() {
                assert_eq!(codes.decode(code), Some(value.as_str()));
                assert_eq!(codes.decode_table()[&code], value);
            }
        }
    }
}
