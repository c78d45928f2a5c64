pub mod coerce;
pub mod extract;

use scraper::{Html, Selector};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Category;
use crate::store::ListingRecord;

/// Why one fragment failed to become a record. A missing locator and an
/// unparsable field are treated the same way: the fragment is dropped and
/// the scan moves on.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("missing {0} element")]
    MissingElement(&'static str),
    #[error("could not coerce {field} from {raw:?}")]
    Coercion { field: &'static str, raw: String },
    #[error("expected at least {needed} list entries, found {found}")]
    ListItemsOutOfRange { needed: usize, found: usize },
}

impl ExtractError {
    pub(crate) fn coercion(field: &'static str, raw: &str) -> Self {
        ExtractError::Coercion {
            field,
            raw: raw.to_string(),
        }
    }
}

/// Records of one page scan, in document order, plus the count of
/// fragments that were dropped.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    pub records: Vec<ListingRecord>,
    pub rejected: usize,
}

/// Extract every listing of one category from one page's markup. A
/// fragment that fails extraction is logged and counted, never fatal; an
/// empty page (e.g. a page number past the end) is a valid empty result.
pub fn scan_page(html: &str, category: Category) -> ScanOutcome {
    let document = Html::parse_document(html);
    // Selector strings are compile-time constants; parsing cannot fail.
    let selector = Selector::parse(category.fragment_selector()).unwrap();

    let mut outcome = ScanOutcome::default();
    for (index, fragment) in document.select(&selector).enumerate() {
        match extract::extract_record(fragment, category) {
            Ok(record) => outcome.records.push(record),
            Err(e) => {
                warn!("Rejected {} fragment #{}: {}", category.label(), index, e);
                outcome.rejected += 1;
            }
        }
    }
    debug!(
        "Scanned {} fragments: {} kept, {} rejected",
        category.label(),
        outcome.records.len(),
        outcome.rejected
    );
    outcome
}
