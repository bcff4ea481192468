//! Catalog item types.

use crate::ids::ItemId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Kind of event a decoration service is sold for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ServiceCategory {
    Wedding,
    Birthday,
    Corporate,
    Festival,
    #[default]
    Other,
}

impl ServiceCategory {
    /// All categories, in display order.
    pub const ALL: [ServiceCategory; 5] = [
        ServiceCategory::Wedding,
        ServiceCategory::Birthday,
        ServiceCategory::Corporate,
        ServiceCategory::Festival,
        ServiceCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCategory::Wedding => "wedding",
            ServiceCategory::Birthday => "birthday",
            ServiceCategory::Corporate => "corporate",
            ServiceCategory::Festival => "festival",
            ServiceCategory::Other => "other",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ServiceCategory::Wedding => "Wedding",
            ServiceCategory::Birthday => "Birthday",
            ServiceCategory::Corporate => "Corporate",
            ServiceCategory::Festival => "Festival",
            ServiceCategory::Other => "Other",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "wedding" => Some(ServiceCategory::Wedding),
            "birthday" => Some(ServiceCategory::Birthday),
            "corporate" => Some(ServiceCategory::Corporate),
            "festival" => Some(ServiceCategory::Festival),
            "other" => Some(ServiceCategory::Other),
            _ => None,
        }
    }
}

/// A sellable decoration service.
///
/// Owned by the catalog; the cart only ever holds its id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Unique item identifier.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Full description.
    pub description: String,
    /// Price per unit. Never negative.
    pub unit_price: Money,
    /// Event category.
    pub category: ServiceCategory,
    /// Image URIs, first one is the thumbnail.
    #[serde(default)]
    pub images: Vec<String>,
    /// Shown on the home page.
    #[serde(default)]
    pub featured: bool,
}

impl CatalogItem {
    /// Create an item with no images.
    pub fn new(
        id: impl Into<ItemId>,
        name: impl Into<String>,
        unit_price: Money,
        category: ServiceCategory,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            unit_price,
            category,
            images: Vec::new(),
            featured: false,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append an image URI.
    pub fn with_image(mut self, uri: impl Into<String>) -> Self {
        self.images.push(uri.into());
        self
    }

    /// Mark as featured.
    pub fn featured(mut self) -> Self {
        self.featured = true;
        self
    }

    /// First image, used as the cart thumbnail.
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}
