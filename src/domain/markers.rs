use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};

/// Direct children of a card's content block that carry listing fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMarker {
    Address,
    BedroomsAndType,
    TypeOnly,
    TransactionTable,
}

/// Cells of a transaction table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleMarker {
    Price,
    DateSold,
    Tenure,
}

/// Class attribute values that identify the parts of a saved listing page.
///
/// Except for `property_card`, which is matched as a single class token,
/// every marker is compared against the whole `class` attribute, so
/// `"subTitle "` with its trailing space is distinct from `"subTitle"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerSet {
    pub main_content: String,
    pub property_card: String,
    pub card_content: String,
    pub address: String,
    pub bedrooms_and_type: String,
    pub type_only: String,
    pub transaction_table: String,
    pub price: String,
    pub date_sold: String,
    pub tenure: String,
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self {
            main_content: "main-content".to_string(),
            property_card: "propertyCard".to_string(),
            card_content: "propertyCard-content".to_string(),
            address: "title clickable".to_string(),
            bedrooms_and_type: "subTitle bedrooms".to_string(),
            type_only: "subTitle ".to_string(),
            transaction_table: "transaction-table-container".to_string(),
            price: "price".to_string(),
            date_sold: "date-sold".to_string(),
            tenure: "table-extra tenure".to_string(),
        }
    }
}

impl MarkerSet {
    pub fn field_marker(&self, class: &str) -> Option<FieldMarker> {
        if class == self.address {
            Some(FieldMarker::Address)
        } else if class == self.bedrooms_and_type {
            Some(FieldMarker::BedroomsAndType)
        } else if class == self.type_only {
            Some(FieldMarker::TypeOnly)
        } else if class == self.transaction_table {
            Some(FieldMarker::TransactionTable)
        } else {
            None
        }
    }

    pub fn sale_marker(&self, class: &str) -> Option<SaleMarker> {
        if class == self.price {
            Some(SaleMarker::Price)
        } else if class == self.date_sold {
            Some(SaleMarker::DateSold)
        } else if class == self.tenure {
            Some(SaleMarker::Tenure)
        } else {
            None
        }
    }

    fn named(&self) -> [(&'static str, &str); 10] {
        [
            ("markers.main_content", &self.main_content),
            ("markers.property_card", &self.property_card),
            ("markers.card_content", &self.card_content),
            ("markers.address", &self.address),
            ("markers.bedrooms_and_type", &self.bedrooms_and_type),
            ("markers.type_only", &self.type_only),
            ("markers.transaction_table", &self.transaction_table),
            ("markers.price", &self.price),
            ("markers.date_sold", &self.date_sold),
            ("markers.tenure", &self.tenure),
        ]
    }
}

impl Validate for MarkerSet {
    fn validate(&self) -> Result<()> {
        for (field, value) in self.named() {
            validate_non_empty_string(field, value)?;
        }
        Ok(())
    }
}
