//! Order models

use chrono::{DateTime, Utc};
use common::{Document, DocumentId, StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validation::{validate_email, validate_price, validate_quantity, validate_required};

/// Purchase snapshot submitted by the buyer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    /// Id of the purchased food item
    pub food_id: String,
    pub food_name: String,
    #[serde(default)]
    pub food_image_url: String,
    /// Unit price at purchase time
    pub price: f64,
    pub quantity: i64,
    #[serde(default)]
    pub user_name: String,
    pub user_email: String,
    /// Stamped by the server when absent
    #[serde(default)]
    pub ordered_at: Option<DateTime<Utc>>,
}

impl NewOrder {
    pub fn validate(&self) -> Result<(), String> {
        self.food_id
            .parse::<DocumentId>()
            .map_err(|_| format!("Invalid foodId: {}", self.food_id))?;
        validate_required("foodName", &self.food_name)?;
        validate_price(self.price)?;
        validate_quantity(self.quantity, false)?;
        validate_email(&self.user_email)
    }

    /// Order as a store document, with `orderedAt` filled in
    pub fn to_document(&self) -> StoreResult<Document> {
        let mut order = self.clone();
        order.ordered_at.get_or_insert_with(Utc::now);

        match serde_json::to_value(&order) {
            Ok(Value::Object(document)) => Ok(document),
            Ok(_) => Err(StoreError::Conversion(
                "Order did not serialize to an object".to_string(),
            )),
            Err(e) => Err(StoreError::Conversion(e.to_string())),
        }
    }
}
