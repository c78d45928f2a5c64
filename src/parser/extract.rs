use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

use super::coerce::{extract_owner, parse_mileage, parse_price, parse_year};
use super::ExtractError;
use crate::config::Category;
use crate::store::ListingRecord;

static TITLE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h2").unwrap());
static PRICE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h3").unwrap());
static ADDRESS_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.col-12.entry-zone-address").unwrap());
static LIST_ITEM_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").unwrap());
static OWNER_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("span.owner").unwrap());

/// Build one typed record from one listing fragment. Required fields are
/// brand, year and price, plus the category's positional mileage entry;
/// a failure on any of those rejects the whole record. Everything else
/// degrades to `None`.
pub fn extract_record(
    fragment: ElementRef,
    category: Category,
) -> Result<ListingRecord, ExtractError> {
    let title = text_of(&fragment, &TITLE_SEL).ok_or(ExtractError::MissingElement("title"))?;

    let brand = title
        .split_whitespace()
        .next()
        .ok_or_else(|| ExtractError::coercion("brand", &title))?
        .to_string();
    // The title's last token carries the year ("Toyota Corolla 2019").
    let year_raw = title.split_whitespace().last().unwrap_or_default();
    let year = parse_year(year_raw).ok_or_else(|| ExtractError::coercion("year", year_raw))?;

    let price_raw = text_of(&fragment, &PRICE_SEL).ok_or(ExtractError::MissingElement("price"))?;
    let price =
        parse_price(&price_raw).ok_or_else(|| ExtractError::coercion("price", &price_raw))?;

    // Same structural marker across all three categories; absence is not
    // an error.
    let address = text_of(&fragment, &ADDRESS_SEL);

    let (mileage, transmission, fuel_type) = match category {
        Category::Vehicle => {
            let items = list_items(&fragment);
            if items.len() < 4 {
                return Err(ExtractError::ListItemsOutOfRange {
                    needed: 4,
                    found: items.len(),
                });
            }
            let mileage = parse_mileage(&items[1])
                .ok_or_else(|| ExtractError::coercion("mileage", &items[1]))?;
            (Some(mileage), Some(items[2].clone()), Some(items[3].clone()))
        }
        Category::Motorcycle => {
            let items = list_items(&fragment);
            if items.len() < 2 {
                return Err(ExtractError::ListItemsOutOfRange {
                    needed: 2,
                    found: items.len(),
                });
            }
            let mileage = parse_mileage(&items[1])
                .ok_or_else(|| ExtractError::coercion("mileage", &items[1]))?;
            (Some(mileage), None, None)
        }
        Category::Rental => (None, None, None),
    };

    // Rentals label the owner explicitly; the other layouts bury it in the
    // ad text. The marker extractor is the fallback either way.
    let owner = match category {
        Category::Rental => {
            text_of(&fragment, &OWNER_SEL).unwrap_or_else(|| extract_owner(&full_text(&fragment)))
        }
        _ => extract_owner(&full_text(&fragment)),
    };

    Ok(ListingRecord {
        title,
        brand,
        year,
        price,
        mileage,
        transmission,
        fuel_type,
        owner,
        address,
    })
}

/// First match's text content, trimmed; `None` when the element is absent
/// or empty.
fn text_of(fragment: &ElementRef, selector: &Selector) -> Option<String> {
    fragment
        .select(selector)
        .next()
        .map(|e| e.text().collect::<String>().trim().to_string())
        .filter(|t| !t.is_empty())
}

fn list_items(fragment: &ElementRef) -> Vec<String> {
    fragment
        .select(&LIST_ITEM_SEL)
        .map(|e| e.text().collect::<String>().trim().to_string())
        .collect()
}

/// Whole fragment text with nodes joined on spaces, for marker searches.
fn full_text(fragment: &ElementRef) -> String {
    fragment
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
