//! Scenario files: a menu, a cart and a promotion catalog in one JSON
//! document.
//!
//! ```json
//! {
//!   "menu": { "products": { "latte": "4.50" }, "sizes": { "large": "0.75" } },
//!   "items": [ { "cartItemId": "a", "productId": "latte", "quantity": 2, "size": "large" } ],
//!   "promotions": [ { "id": "p1", "name": "Latte Day", "type": "PERCENT_DISCOUNT", ... } ]
//! }
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use brewline_core::validation::validate_promotion;
use brewline_core::{Cart, CartLineItem, MenuPricing, Promotion};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[serde(default)]
    pub menu: MenuPricing,

    #[serde(default)]
    pub items: Vec<CartLineItem>,

    /// Absent and empty both mean "no promotions".
    #[serde(default)]
    pub promotions: Option<Vec<Promotion>>,
}

impl Scenario {
    /// Reads and parses a scenario file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        let scenario = Self::from_json(&raw)
            .with_context(|| format!("failed to parse scenario {}", path.display()))?;

        debug!(
            path = %path.display(),
            items = scenario.items.len(),
            promotions = scenario.promotions.as_ref().map_or(0, Vec::len),
            products = scenario.menu.product_count(),
            "Scenario loaded"
        );
        Ok(scenario)
    }

    /// Parses a scenario and rejects menus with negative base prices.
    pub fn from_json(raw: &str) -> Result<Self> {
        let scenario: Scenario = serde_json::from_str(raw)?;
        scenario
            .menu
            .validate()
            .context("scenario menu is invalid")?;
        Ok(scenario)
    }

    /// Builds the cart, enforcing cart invariants (unique ids, quantity
    /// limits).
    pub fn cart(&self) -> Result<Cart> {
        Cart::from_items(self.items.clone()).context("scenario cart is invalid")
    }

    /// Logs catalog entries the admin dashboard would have rejected.
    ///
    /// They are still handed to the engine, which skips what it cannot use.
    /// Returns the ids of the offending promotions.
    pub fn check_promotions(&self) -> Vec<String> {
        let mut invalid = Vec::new();
        for promotion in self.promotions.iter().flatten() {
            if let Err(err) = validate_promotion(promotion) {
                warn!(promotion_id = %promotion.id, error = %err, "Invalid promotion in catalog");
                invalid.push(promotion.id.clone());
            }
        }
        invalid
    }

    pub fn promotions(&self) -> Option<&[Promotion]> {
        self.promotions.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brewline_core::PromotionType;
    use rust_decimal_macros::dec;
    use std::io::Write;

    const SAMPLE: &str = r#"{
        "menu": {
            "products": { "latte": "4.50", "cookie": 1.25 },
            "sizes": { "large": "0.75" }
        },
        "items": [
            { "cartItemId": "a", "productId": "latte", "quantity": 2, "size": "large" },
            { "cartItemId": "b", "productId": "cookie", "quantity": 1 }
        ],
        "promotions": [
            {
                "id": "p1",
                "name": "Latte Day",
                "type": "PERCENT_DISCOUNT",
                "discount": "10",
                "startDate": "2026-10-01T00:00:00Z",
                "endDate": "2026-10-31T23:59:59Z",
                "isActive": true
            }
        ]
    }"#;

    #[test]
    fn test_parse_sample() {
        let scenario = Scenario::from_json(SAMPLE).unwrap();

        assert_eq!(scenario.menu.base_price("latte"), Some(dec!(4.50)));
        assert_eq!(scenario.menu.base_price("cookie"), Some(dec!(1.25)));
        assert_eq!(scenario.menu.size_modifier("large"), Some(dec!(0.75)));
        assert_eq!(scenario.items.len(), 2);
        assert_eq!(scenario.items[0].size.as_deref(), Some("large"));

        let promotions = scenario.promotions().unwrap();
        assert_eq!(promotions[0].promotion_type, PromotionType::PercentDiscount);
        assert_eq!(promotions[0].discount, Some(dec!(10)));
    }

    #[test]
    fn test_missing_sections_default() {
        let scenario = Scenario::from_json("{}").unwrap();

        assert!(scenario.items.is_empty());
        assert!(scenario.promotions().is_none());
        assert_eq!(scenario.menu.product_count(), 0);
    }

    #[test]
    fn test_negative_menu_price_rejected() {
        let err = Scenario::from_json(
            r#"{ "menu": { "products": { "latte": "4.50", "comp-drink": "-1.00" } } }"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains("menu is invalid"));
        assert!(format!("{:#}", err).contains("products.comp-drink"));
    }

    #[test]
    fn test_negative_size_modifier_allowed() {
        let scenario = Scenario::from_json(
            r#"{ "menu": { "products": { "latte": "4.50" }, "sizes": { "kids": "-1.00" } } }"#,
        )
        .unwrap();

        assert_eq!(scenario.menu.size_modifier("kids"), Some(dec!(-1.00)));
    }

    #[test]
    fn test_cart_rejects_duplicate_ids() {
        let scenario = Scenario::from_json(
            r#"{ "items": [
                { "cartItemId": "a", "productId": "latte", "quantity": 1 },
                { "cartItemId": "a", "productId": "mocha", "quantity": 1 }
            ] }"#,
        )
        .unwrap();

        assert!(scenario.cart().is_err());
    }

    #[test]
    fn test_check_promotions_reports_invalid_entries() {
        let scenario = Scenario::from_json(
            r#"{ "promotions": [
                { "id": "ok", "name": "Ten Off", "type": "PERCENT_DISCOUNT", "discount": "10",
                  "startDate": "2026-10-01T00:00:00Z", "endDate": "2026-10-31T00:00:00Z",
                  "isActive": true },
                { "id": "bad", "name": "Free Stuff", "type": "BUY_X_GET_Y",
                  "startDate": "2026-10-01T00:00:00Z", "endDate": "2026-10-31T00:00:00Z",
                  "isActive": true }
            ] }"#,
        )
        .unwrap();

        assert_eq!(scenario.check_promotions(), vec!["bad".to_string()]);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let scenario = Scenario::load(file.path()).unwrap();
        assert_eq!(scenario.cart().unwrap().total_quantity(), 3);
    }

    #[test]
    fn test_load_reports_path_on_error() {
        let err = Scenario::load(Path::new("/no/such/scenario.json")).unwrap_err();
        assert!(err.to_string().contains("/no/such/scenario.json"));
    }
}
