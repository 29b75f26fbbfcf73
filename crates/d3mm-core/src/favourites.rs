//! The user's favourite mod selections.

use crate::error::CatalogError;
use crate::mod_collection::ModCollection;
use crate::mod_identifier::ModIdentifier;
use crate::signal::Signal;
use std::path::Path;

/// Ordered list of favourite selections, unique by their
/// (name, version, version type) triple.
#[derive(Debug, Default)]
pub struct FavouriteModCollection {
    favourites: Vec<ModIdentifier>,

    /// Fires after any change has committed.
    pub updated: Signal,
}

impl FavouriteModCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.favourites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favourites.is_empty()
    }

    pub fn favourites(&self) -> &[ModIdentifier] {
        &self.favourites
    }

    pub fn has_favourite(&self, favourite: &ModIdentifier) -> bool {
        self.index_of_favourite(favourite).is_some()
    }

    pub fn index_of_favourite(&self, favourite: &ModIdentifier) -> Option<usize> {
        if !favourite.is_valid() {
            return None;
        }

        self.favourites.iter().position(|entry| entry == favourite)
    }

    pub fn get_favourite(&self, index: usize) -> Option<&ModIdentifier> {
        self.favourites.get(index)
    }

    pub fn add_favourite(&mut self, favourite: ModIdentifier) -> bool {
        if !favourite.is_valid() || self.has_favourite(&favourite) {
            return false;
        }

        self.favourites.push(favourite);
        self.updated.emit();

        true
    }

    /// Remove by index.
    pub fn remove_favourite_at(&mut self, index: usize) -> bool {
        if index >= self.favourites.len() {
            return false;
        }

        self.favourites.remove(index);
        self.updated.emit();

        true
    }

    /// Remove by triple. Returns `false` when the triple is not present.
    pub fn remove_favourite(&mut self, favourite: &ModIdentifier) -> bool {
        match self.index_of_favourite(favourite) {
            Some(index) => self.remove_favourite_at(index),
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.favourites.clear();
        self.updated.emit();
    }

    /// Walk every favourite and warn on entries whose triple no longer
    /// resolves in `catalog`. Returns the number of missing favourites.
    /// The collection itself is never modified.
    pub fn check_for_missing_favourites(&self, catalog: &ModCollection) -> usize {
        let mut missing = 0;

        for favourite in &self.favourites {
            if !Self::resolves(favourite, catalog) {
                tracing::warn!("favourite mod '{}' no longer exists", favourite.full_name());
                missing += 1;
            }
        }

        missing
    }

    fn resolves(favourite: &ModIdentifier, catalog: &ModCollection) -> bool {
        let Some(entry) = catalog.get_mod_with_name(&favourite.name) else {
            return false;
        };

        let version = match &favourite.version {
            Some(version) => match entry.version_with_name(version) {
                Some(version) => version,
                None => return false,
            },
            None => return true,
        };

        match &favourite.version_type {
            Some(version_type) => version.index_of_type(version_type).is_some(),
            None => true,
        }
    }

    // ------------------------------------------------------------------
    // Persistence (JSON array of identifiers)
    // ------------------------------------------------------------------

    pub fn load_from(&mut self, path: &Path) -> Result<(), CatalogError> {
        let data = std::fs::read_to_string(path)?;

        let favourites: Vec<ModIdentifier> = serde_json::from_str(&data).map_err(|error| {
            CatalogError::schema(path.display().to_string(), format!("malformed JSON: {error}"))
        })?;

        for (index, favourite) in favourites.iter().enumerate() {
            if !favourite.is_valid() {
                return Err(CatalogError::schema(
                    format!("favourites[{index}]"),
                    "favourite mod name must not be empty",
                ));
            }
        }

        self.favourites = favourites;
        self.updated.emit();

        Ok(())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), CatalogError> {
        let data = serde_json::to_string_pretty(&self.favourites)
            .map_err(|error| CatalogError::Integrity(format!("serialization failed: {error}")))?;

        std::fs::write(path, data)?;

        Ok(())
    }
}
