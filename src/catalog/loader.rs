// Catalog ingestion from a delimited text file
use crate::catalog::index::CatalogIndex;
use crate::catalog::record::RawRecipe;
use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

const REQUIRED_COLUMNS: &[&str] = &["name", "ingredients"];

/// Read catalog rows from a CSV file with a header row
pub fn load_catalog<P: AsRef<Path>>(path: P) -> Result<Vec<RawRecipe>> {
    let path = path.as_ref();
    debug!("Opening catalog {}", path.display());
    let file = File::open(path)?;

    let records = read_catalog(file)?;
    info!("Loaded {} catalog rows from {}", records.len(), path.display());
    Ok(records)
}

/// Read catalog rows from any CSV source
pub fn read_catalog<R: Read>(reader: R) -> Result<Vec<RawRecipe>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    debug!("Catalog columns: {:?}", headers);

    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            return Err(Error::Catalog(format!(
                "Catalog is missing required column '{column}'"
            )));
        }
    }

    let mut records = Vec::new();
    for row in reader.deserialize() {
        let record: RawRecipe = row?;
        records.push(record);
    }

    Ok(records)
}

/// Load a CSV catalog and build its index
pub fn load_index<P: AsRef<Path>>(path: P) -> Result<CatalogIndex> {
    CatalogIndex::build(load_catalog(path)?)
}
