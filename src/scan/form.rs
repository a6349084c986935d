//! Scan form values

use std::collections::BTreeSet;

use nutriscan_types::{MealType, Tag};

use crate::validation::{validate_scan, Validation};

/// The one tag collection for a scan. Mutated only through [`TagSet::toggle`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet(BTreeSet<Tag>);

impl TagSet {
    /// Flip membership; returns whether the tag is now selected.
    pub fn toggle(&mut self, tag: Tag) -> bool {
        if self.0.remove(&tag) {
            false
        } else {
            self.0.insert(tag);
            true
        }
    }

    pub fn contains(&self, tag: Tag) -> bool {
        self.0.contains(&tag)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Tag> + '_ {
        self.0.iter().copied()
    }

    /// Wire order is the enum order, not selection order
    pub fn to_vec(&self) -> Vec<Tag> {
        self.iter().collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanForm {
    pub food_name: String,
    pub meal_type: MealType,
    pub tags: TagSet,
}

impl ScanForm {
    pub fn validate(&self) -> Validation {
        validate_scan(&self.food_name, &self.tags)
    }
}
