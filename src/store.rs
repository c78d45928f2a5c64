use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One extracted listing. A record only exists when brand, year and price
/// all coerced; everything else may be empty. `title` keeps the full
/// composite text so the cleaning pass can re-derive from it later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingRecord {
    pub title: String,
    pub brand: String,
    pub year: i32,
    pub price: i64,
    pub mileage: Option<i64>,
    pub transmission: Option<String>,
    pub fuel_type: Option<String>,
    pub owner: String,
    pub address: Option<String>,
}

/// A row of a previously collected raw table, as loose as they come:
/// every column optional, every value free text. Extra columns in the
/// file are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRow {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub mileage: Option<String>,
}

/// Output of the cleaning pass. The composite `title` column is carried
/// through so re-cleaning the output re-derives the same columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanedRecord {
    pub title: String,
    pub brand: String,
    pub model: String,
    pub city: Option<String>,
    pub year: Option<i32>,
    pub price: Option<i64>,
    pub mileage: Option<i64>,
}

pub fn write_records(path: &Path, records: &[ListingRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_raw_rows(path: &Path) -> Result<Vec<RawRow>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

pub fn write_cleaned(path: &Path, records: &[CleanedRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn read_cleaned(path: &Path) -> Result<Vec<CleanedRecord>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ListingRecord {
        ListingRecord {
            title: "Toyota Corolla 2019 Dakar".into(),
            brand: "Toyota".into(),
            year: 2019,
            price: 12_500_000,
            mileage: Some(45_000),
            transmission: Some("Automatique".into()),
            fuel_type: Some("Essence".into()),
            owner: "Jean Dupont".into(),
            address: Some("Dakar, Plateau".into()),
        }
    }

    #[test]
    fn headers_use_listing_field_names() {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(sample_record()).unwrap();
        let bytes = writer.into_inner().unwrap();
        let out = String::from_utf8(bytes).unwrap();
        let header = out.lines().next().unwrap();
        assert_eq!(
            header,
            "title,brand,year,price,mileage,transmission,fuelType,owner,address"
        );
    }

    #[test]
    fn listing_csv_loads_as_raw_rows() {
        let dir = std::env::temp_dir().join("dakar_scraper_store_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("vehicles.csv");
        write_records(&path, &[sample_record()]).unwrap();

        let rows = read_raw_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title.as_deref(), Some("Toyota Corolla 2019 Dakar"));
        assert_eq!(rows[0].price.as_deref(), Some("12500000"));
    }
}
