use std::path::PathBuf;

use clap::ValueEnum;

const VEHICLE_URL: &str = "https://dakar-auto.com/senegal/voitures-4";
const MOTORCYCLE_URL: &str = "https://dakar-auto.com/senegal/motos-and-scooters-3";
const RENTAL_URL: &str = "https://dakar-auto.com/senegal/location-de-voitures-19";

/// Listing category. Decides the URL to page through, the fragment
/// selector, and which positional fields the extractor reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Category {
    Vehicle,
    Motorcycle,
    Rental,
}

impl Category {
    pub fn all() -> [Category; 3] {
        [Category::Vehicle, Category::Motorcycle, Category::Rental]
    }

    pub fn page_url(self, page: usize) -> String {
        let base = match self {
            Category::Vehicle => VEHICLE_URL,
            Category::Motorcycle => MOTORCYCLE_URL,
            Category::Rental => RENTAL_URL,
        };
        format!("{}?page={}", base, page)
    }

    /// CSS selector matching one listing fragment on a category page.
    /// Vehicles use one container shape; motorcycles and rentals share
    /// another.
    pub fn fragment_selector(self) -> &'static str {
        match self {
            Category::Vehicle => "div.listings-cards__list-item.mb-md-3.mb-3",
            Category::Motorcycle | Category::Rental => "div.listing-card__content.p-2",
        }
    }

    pub fn csv_file_name(self) -> &'static str {
        match self {
            Category::Vehicle => "vehicles.csv",
            Category::Motorcycle => "motorcycles.csv",
            Category::Rental => "rentals.csv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::Vehicle => "vehicles",
            Category::Motorcycle => "motorcycles",
            Category::Rental => "rentals",
        }
    }
}

/// Everything a scrape run needs, passed explicitly to the driver.
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    /// Number of pages to walk per category, starting at 1.
    pub pages: usize,
    /// Non-empty subset of categories to scrape.
    pub categories: Vec<Category>,
    /// Directory receiving one CSV per category.
    pub out_dir: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_url_carries_page_number() {
        let url = Category::Vehicle.page_url(3);
        assert_eq!(url, "https://dakar-auto.com/senegal/voitures-4?page=3");
    }

    #[test]
    fn motorcycles_and_rentals_share_fragment_shape() {
        assert_eq!(
            Category::Motorcycle.fragment_selector(),
            Category::Rental.fragment_selector()
        );
        assert_ne!(
            Category::Vehicle.fragment_selector(),
            Category::Rental.fragment_selector()
        );
    }
}
