//! Reads the dinner catalog, a JSON document of the form
//! `{"dinners": {"<category>": [{"name", "category", "ingredients"}]}}`.

use std::path::Path;

use dinnerplan_shared::{Catalog, Error, Result};

pub fn load(path: &Path) -> Result<Catalog> {
    let json = std::fs::read_to_string(path).map_err(|err| Error::catalog(path.display(), err))?;
    let catalog = parse(&json).map_err(|err| match err {
        Error::CatalogLoad { reason, .. } => Error::catalog(path.display(), reason),
        other => other,
    })?;

    tracing::info!(
        path = %path.display(),
        categories = catalog.dinners.len(),
        dinners = catalog.len(),
        "catalog loaded"
    );

    Ok(catalog)
}

/// Parse a catalog document.
///
/// Dinners are looked up by the category they are filed under; a dinner whose
/// own `category` field disagrees is kept where it is filed and logged.
pub fn parse(json: &str) -> Result<Catalog> {
    let catalog: Catalog = serde_json::from_str(json).map_err(|err| Error::catalog("input", err))?;

    for (category, dinners) in &catalog.dinners {
        for dinner in dinners.iter().filter(|d| &d.category != category) {
            tracing::warn!(
                dinner = %dinner.name,
                filed_under = %category,
                category = %dinner.category,
                "dinner category does not match its catalog group"
            );
        }
    }

    Ok(catalog)
}
