use crate::parser::coerce::{parse_mileage, parse_price, parse_year, split_title, year_from_title};
use crate::store::{CleanedRecord, RawRow};

/// Re-derive normalized columns from a previously collected raw table.
///
/// Each row's brand/model/city come from splitting the composite title;
/// year, price and mileage from the same coercers the scraper uses, with
/// the title's second-to-last token as a year fallback. Numeric cells that
/// stay missing are filled with the column median, computed over usable
/// cells only and before any row is dropped. Rows without a brand or model
/// after the split are dropped.
///
/// The pass is idempotent: the output keeps the composite title, so
/// cleaning it again re-derives the same columns.
pub fn clean_table(rows: &[RawRow]) -> Vec<CleanedRecord> {
    struct Derived {
        title: String,
        brand: Option<String>,
        model: Option<String>,
        city: Option<String>,
        year: Option<i32>,
        price: Option<i64>,
        mileage: Option<i64>,
    }

    let derived: Vec<Derived> = rows
        .iter()
        .map(|row| {
            let title = row.title.clone().unwrap_or_default();
            let parts = split_title(&title);
            let year = row
                .year
                .as_deref()
                .and_then(parse_year)
                .or_else(|| year_from_title(&title));
            let price = row.price.as_deref().and_then(parse_price);
            let mileage = row.mileage.as_deref().and_then(parse_mileage);
            Derived {
                title,
                brand: parts.brand,
                model: parts.model,
                city: parts.city,
                year,
                price,
                mileage,
            }
        })
        .collect();

    // Medians over coerced cells only, before any drop.
    let year_fill = median(derived.iter().filter_map(|d| d.year.map(i64::from)));
    let price_fill = median(derived.iter().filter_map(|d| d.price));
    let mileage_fill = median(derived.iter().filter_map(|d| d.mileage));

    derived
        .into_iter()
        .filter_map(|d| {
            let brand = d.brand?;
            let model = d.model?;
            Some(CleanedRecord {
                title: d.title,
                brand,
                model,
                city: d.city,
                year: d.year.or(year_fill.map(|v| v as i32)),
                price: d.price.or(price_fill),
                mileage: d.mileage.or(mileage_fill),
            })
        })
        .collect()
}

/// Median of an integer column: middle value for odd counts, integer mean
/// of the two central values for even counts. `None` for an empty column.
fn median(values: impl Iterator<Item = i64>) -> Option<i64> {
    let mut sorted: Vec<i64> = values.collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_unstable();
    let mid = sorted.len() / 2;
    Some(if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2
    })
}
