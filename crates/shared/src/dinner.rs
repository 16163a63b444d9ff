use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Dinner {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
}

impl Dinner {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            ingredients: vec![],
        }
    }

    pub fn with_ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients = ingredients.into_iter().map(Into::into).collect();
        self
    }
}

/// Dinners grouped by category name, read-only for the duration of a run.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    pub dinners: BTreeMap<String, Vec<Dinner>>,
}

impl Catalog {
    /// Dinners filed under `category`; empty when the category is unknown.
    pub fn category(&self, category: &str) -> &[Dinner] {
        self.dinners
            .get(category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Files the dinner under its own `category` field.
    pub fn insert(&mut self, dinner: Dinner) {
        self.dinners
            .entry(dinner.category.to_owned())
            .or_default()
            .push(dinner);
    }

    pub fn len(&self) -> usize {
        self.dinners.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<Dinner> for Catalog {
    fn from_iter<T: IntoIterator<Item = Dinner>>(iter: T) -> Self {
        let mut catalog = Catalog::default();
        for dinner in iter {
            catalog.insert(dinner);
        }
        catalog
    }
}
