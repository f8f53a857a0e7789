//! Food listing models

use common::{Document, StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::{validate_email, validate_price, validate_quantity, validate_required};

pub const FOOD_NAME: &str = "foodName";
pub const QUANTITY: &str = "quantity";
pub const ORDERS: &str = "orders";
pub const OWNER_EMAIL: &str = "userEmail";

/// Fields shown on catalog cards
pub const CARD_FIELDS: &[&str] = &[
    "foodName",
    "foodImageUrl",
    "foodCategory",
    "price",
    "quantity",
    "orders",
    "description",
];

/// Fields shown in a user's own listing table
pub const OWNER_LISTING_FIELDS: &[&str] = &["foodName", "foodImageUrl", "price", "quantity"];

/// Food listing submitted or edited by its owner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodListing {
    pub food_name: String,
    pub food_image_url: String,
    pub food_category: String,
    #[serde(default)]
    pub food_origin: String,
    pub price: f64,
    pub quantity: i64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub user_name: String,
    pub user_email: String,
}

impl FoodListing {
    pub fn validate(&self) -> Result<(), String> {
        validate_required("foodName", &self.food_name)?;
        validate_required("foodImageUrl", &self.food_image_url)?;
        validate_required("foodCategory", &self.food_category)?;
        validate_price(self.price)?;
        validate_quantity(self.quantity, true)?;
        validate_email(&self.user_email)
    }

    /// Listing fields as a store document
    pub fn to_document(&self) -> StoreResult<Document> {
        match serde_json::to_value(self) {
            Ok(Value::Object(document)) => Ok(document),
            Ok(_) => Err(StoreError::Conversion(
                "Food listing did not serialize to an object".to_string(),
            )),
            Err(e) => Err(StoreError::Conversion(e.to_string())),
        }
    }
}

/// Body of `PATCH /foods/:id`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct QuantityUpdate {
    pub quantity: i64,
}

impl QuantityUpdate {
    pub fn validate(&self) -> Result<(), String> {
        validate_quantity(self.quantity, true)
    }
}
