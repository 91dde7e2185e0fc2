use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::FieldChecks;
use crate::{errors::ValidationResult, types::DocumentModel};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentType {
    Racket,
    Shuttlecock,
    Shoes,
    Bag,
    Grip,
    #[serde(rename = "string")]
    Strings,
    Accessories,
}

impl EquipmentType {
    pub const ALL: [EquipmentType; 7] = [
        EquipmentType::Racket,
        EquipmentType::Shuttlecock,
        EquipmentType::Shoes,
        EquipmentType::Bag,
        EquipmentType::Grip,
        EquipmentType::Strings,
        EquipmentType::Accessories,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentType::Racket => "racket",
            EquipmentType::Shuttlecock => "shuttlecock",
            EquipmentType::Shoes => "shoes",
            EquipmentType::Bag => "bag",
            EquipmentType::Grip => "grip",
            EquipmentType::Strings => "string",
            EquipmentType::Accessories => "accessories",
        }
    }
}

impl fmt::Display for EquipmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EquipmentType {
    type Err = String;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| format!("`{}` is not a valid equipment type", value.trim()))
    }
}

/// A catalogue item. `average_rating` and `total_reviews` are derived from
/// the item's reviews and only ever written by the rating aggregator.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EquipmentType,
    pub price: f64,
    pub brand: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub average_rating: f64,
    #[serde(default)]
    pub total_reviews: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentModel for Equipment {
    const COLLECTION: &'static str = "equipment";
    const DERIVED_FIELDS: &'static [&'static str] = &["averageRating", "totalReviews"];

    fn id(&self) -> &str {
        &self.id
    }
}

impl Equipment {
    pub fn summary(&self, with_price: bool) -> EquipmentSummary {
        EquipmentSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: self.kind,
            price: with_price.then_some(self.price),
        }
    }

    /// Applies a validated patch. Derived rating fields are untouched.
    pub fn apply(&mut self, patch: ValidEquipmentPatch, now: DateTime<Utc>) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(brand) = patch.brand {
            self.brand = brand;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(image) = patch.image {
            self.image = image;
        }
        self.updated_at = now;
    }
}

/// Equipment details embedded in posts.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EquipmentSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EquipmentType,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub price: Option<f64>,
}

/// Creation payload for a catalogue item.
#[derive(Deserialize, Debug, Default)]
pub struct NewEquipment {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub price: Option<f64>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
}

impl NewEquipment {
    /// Builds the record with zeroed rating aggregates.
    pub fn into_record(self, id: String, now: DateTime<Utc>) -> ValidationResult<Equipment> {
        let mut checks = FieldChecks::default();
        let name = checks.required_text("name", self.name, "Equipment name is required");
        let kind = match self.kind {
            Some(raw) if !raw.trim().is_empty() => parse_kind(&mut checks, &raw),
            _ => {
                checks.push("type", "validation.required", "Equipment type is required");
                None
            }
        };
        let price = match self.price {
            Some(price) => check_price(&mut checks, price),
            None => {
                checks.push("price", "validation.required", "Price is required");
                None
            }
        };
        let brand = checks.optional_text(self.brand);
        let description = checks.optional_text(self.description);
        let image = self.image.map(|image| image.trim().to_string()).unwrap_or_default();
        checks.finish()?;

        Ok(Equipment {
            id,
            name: name.unwrap_or_default(),
            kind: kind.unwrap_or(EquipmentType::Accessories),
            price: price.unwrap_or_default(),
            brand,
            description,
            image,
            average_rating: 0.0,
            total_reviews: 0,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update of a catalogue item. Rating aggregates are not part of
/// the payload, so clients cannot set them.
#[derive(Deserialize, Debug, Default)]
pub struct EquipmentPatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "super::deserialize_some")]
    pub brand: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::deserialize_some")]
    pub description: Option<Option<String>>,
    pub image: Option<String>,
}

#[derive(Debug, Default, PartialEq)]
pub struct ValidEquipmentPatch {
    pub name: Option<String>,
    pub kind: Option<EquipmentType>,
    pub price: Option<f64>,
    pub brand: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub image: Option<String>,
}

impl EquipmentPatch {
    pub fn validate(self) -> ValidationResult<ValidEquipmentPatch> {
        let mut checks = FieldChecks::default();
        let name = match self.name {
            Some(raw) => checks.required_text("name", Some(raw), "Equipment name is required"),
            None => None,
        };
        let kind = match self.kind {
            Some(raw) => parse_kind(&mut checks, &raw),
            None => None,
        };
        let price = self.price.and_then(|price| check_price(&mut checks, price));
        let brand = self.brand.map(|brand| checks.optional_text(brand));
        let description = self.description.map(|description| checks.optional_text(description));
        let image = self.image.map(|image| image.trim().to_string());
        checks.finish()?;

        Ok(ValidEquipmentPatch {
            name,
            kind,
            price,
            brand,
            description,
            image,
        })
    }
}

fn parse_kind(checks: &mut FieldChecks, raw: &str) -> Option<EquipmentType> {
    match raw.parse::<EquipmentType>() {
        Ok(kind) => Some(kind),
        Err(message) => {
            checks.push("type", "validation.enum", message);
            None
        }
    }
}

fn check_price(checks: &mut FieldChecks, price: f64) -> Option<f64> {
    if !price.is_finite() {
        checks.push("price", "validation.range", "Price must be a number");
        None
    } else if price < 0.0 {
        checks.push("price", "validation.range", "Price cannot be negative");
        None
    } else {
        Some(price)
    }
}
