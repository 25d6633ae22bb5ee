use crate::core::fields::{
    parse_bedrooms_and_type, parse_postcode, parse_price, parse_sale_date, parse_type_only,
};
use crate::domain::markers::{FieldMarker, MarkerSet, SaleMarker};
use crate::domain::model::{Listing, ListingFailure, PageExtraction, SaleRecord};
use crate::utils::error::ExtractionError;
use scraper::{ElementRef, Html};

/// Pulls listing records out of a saved search-results page.
///
/// Cards are located purely by class markers: `div`s whose class is the
/// main-content marker, the property cards inside them, and each card's
/// content block. The content block's direct children hold the fields.
/// Children with unrecognised classes are ignored.
///
/// The extractor holds no per-document state, so one instance can serve
/// any number of documents, including from several threads.
#[derive(Debug, Clone, Default)]
pub struct ListingExtractor {
    markers: MarkerSet,
}

struct CardError {
    address: Option<String>,
    error: ExtractionError,
}

impl CardError {
    fn into_failure(self, page: &str, card_index: usize) -> ListingFailure {
        ListingFailure {
            page: page.to_string(),
            card_index,
            address: self.address,
            error: self.error,
        }
    }
}

impl ListingExtractor {
    pub fn new(markers: MarkerSet) -> Self {
        Self { markers }
    }

    pub fn extract_html(&self, html: &str, page: &str) -> PageExtraction {
        let document = Html::parse_document(html);
        self.extract(&document, page)
    }

    /// Extracts every card in document order. A card with a malformed field
    /// is reported in `failures` and the remaining cards are still read.
    pub fn extract(&self, document: &Html, page: &str) -> PageExtraction {
        let mut extraction = PageExtraction::new(page);

        for (card_index, content) in self.card_contents(document).enumerate() {
            match self.extract_listing(content) {
                Ok(listing) => extraction.listings.push(listing),
                Err(card_error) => {
                    let failure = card_error.into_failure(page, card_index);
                    tracing::warn!("⚠️ Skipping listing: {}", failure);
                    extraction.failures.push(failure);
                }
            }
        }

        tracing::debug!(
            "Extracted {} listings ({} sales, {} skipped) from {}",
            extraction.listings.len(),
            extraction.sale_count(),
            extraction.failures.len(),
            page
        );

        extraction
    }

    /// Like [`extract`](Self::extract), but stops at the first malformed card.
    pub fn extract_strict(
        &self,
        document: &Html,
        page: &str,
    ) -> Result<Vec<Listing>, ListingFailure> {
        self.card_contents(document)
            .enumerate()
            .map(|(card_index, content)| {
                self.extract_listing(content)
                    .map_err(|e| e.into_failure(page, card_index))
            })
            .collect()
    }

    fn card_contents<'a>(&'a self, document: &'a Html) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        let markers = &self.markers;

        document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(move |el| el.value().name() == "div" && class_is(el, &markers.main_content))
            .flat_map(move |main| {
                main.descendants()
                    .skip(1)
                    .filter_map(ElementRef::wrap)
                    .filter(move |el| has_class_token(el, &markers.property_card))
            })
            .flat_map(move |card| {
                child_elements(card).filter(move |el| class_is(el, &markers.card_content))
            })
    }

    fn extract_listing(&self, content: ElementRef<'_>) -> Result<Listing, CardError> {
        let mut listing = Listing::default();

        for field in child_elements(content) {
            let Some(marker) = field
                .value()
                .attr("class")
                .and_then(|class| self.markers.field_marker(class))
            else {
                continue;
            };

            self.apply_field(&mut listing, marker, field)
                .map_err(|error| CardError {
                    address: (!listing.address.is_empty()).then(|| listing.address.clone()),
                    error,
                })?;
        }

        Ok(listing)
    }

    fn apply_field(
        &self,
        listing: &mut Listing,
        marker: FieldMarker,
        field: ElementRef<'_>,
    ) -> Result<(), ExtractionError> {
        match marker {
            FieldMarker::Address => {
                let address = element_text(field);
                listing.postcode = parse_postcode(&address);
                listing.address = address.trim().to_string();
            }
            FieldMarker::BedroomsAndType => {
                let (bedrooms, property_type) = parse_bedrooms_and_type(&element_text(field))?;
                listing.bedroom_count = bedrooms;
                listing.property_type = property_type;
            }
            FieldMarker::TypeOnly => {
                let (bedrooms, property_type) = parse_type_only(&element_text(field));
                listing.bedroom_count = bedrooms;
                listing.property_type = property_type;
            }
            FieldMarker::TransactionTable => {
                let sales = self.extract_sales(field)?;
                listing.sales.extend(sales);
            }
        }
        Ok(())
    }

    /// One record per table row carrying at least one sale cell, in row order.
    fn extract_sales(&self, table: ElementRef<'_>) -> Result<Vec<SaleRecord>, ExtractionError> {
        table
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| el.value().name() == "tr")
            .filter_map(|row| self.extract_sale(row).transpose())
            .collect()
    }

    fn extract_sale(&self, row: ElementRef<'_>) -> Result<Option<SaleRecord>, ExtractionError> {
        child_elements(row)
            .filter_map(|cell| {
                cell.value()
                    .attr("class")
                    .and_then(|class| self.markers.sale_marker(class))
                    .map(|marker| (marker, cell))
            })
            .try_fold(None::<SaleRecord>, |record, (marker, cell)| {
                let mut record = record.unwrap_or_default();
                let text = element_text(cell);
                match marker {
                    SaleMarker::Price => record.amount = parse_price(&text)?,
                    SaleMarker::DateSold => record.date = Some(parse_sale_date(&text)?),
                    SaleMarker::Tenure => record.tenure = text,
                }
                Ok::<_, ExtractionError>(Some(record))
            })
    }
}

fn child_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    element.children().filter_map(ElementRef::wrap)
}

fn class_is(element: &ElementRef<'_>, marker: &str) -> bool {
    element.value().attr("class") == Some(marker)
}

fn has_class_token(element: &ElementRef<'_>, marker: &str) -> bool {
    element.value().classes().any(|class| class == marker)
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}
