use std::fs;

use serde::{Deserialize, Serialize};

use crate::deck::WordEntry;
use crate::error::Error;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub words: Vec<WordEntry>,
}

/// The built-in categories, loaded once at startup and read-only afterwards.
#[derive(Clone, Debug, Default)]
pub struct CategorySource {
    categories: Vec<Category>,
}

impl CategorySource {
    pub fn new(categories: Vec<Category>) -> Self {
        CategorySource { categories }
    }

    pub fn from_file(file_path: &str) -> Result<Self, Error> {
        let content = fs::read_to_string(file_path).map_err(|error| {
            Error::log_and_create_internal(&format!(
                "Could not load categories file. File: '{file_path}', Error: '{error}'."
            ))
        })?;
        let categories: Vec<Category> = serde_json::from_str(&content).map_err(|error| {
            Error::log_and_create_internal(&format!(
                "Could not parse categories file. File: '{file_path}', Error: '{error}'."
            ))
        })?;
        log::info!(
            "Categories loaded. File: '{}', Categories: '{}'.",
            file_path,
            categories
                .iter()
                .map(|category| format!("{}({})", category.name, category.words.len()))
                .collect::<Vec<String>>()
                .join(",")
        );
        Ok(CategorySource { categories })
    }

    pub fn get(&self, name: &str) -> Option<&[WordEntry]> {
        self.categories
            .iter()
            .find(|category| category.name == name)
            .map(|category| category.words.as_slice())
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }
}
