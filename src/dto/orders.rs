use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{Order, OrderStatus},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderItemRequest {
    pub product_name: String,
    pub product_description: Option<String>,
    pub quantity: i32,
    pub price: f64,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OrderRequest {
    pub customer_id: String,
    pub customer_name: String,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub delivery_address: Option<String>,
    pub order_notes: Option<String>,
    pub items: Vec<OrderItemRequest>,
}

impl OrderRequest {
    /// Input checks run before any persistence attempt.
    pub fn validate(&self) -> AppResult<()> {
        if self.customer_id.trim().is_empty() {
            return Err(AppError::Validation("Customer ID is required".into()));
        }
        if self.customer_name.trim().is_empty() {
            return Err(AppError::Validation("Customer name is required".into()));
        }
        if let Some(email) = self.customer_email.as_deref()
            && !email.contains('@')
        {
            return Err(AppError::Validation("Valid email is required".into()));
        }
        if self.items.is_empty() {
            return Err(AppError::Validation("Order items are required".into()));
        }
        for item in &self.items {
            if item.product_name.trim().is_empty() {
                return Err(AppError::Validation("Product name is required".into()));
            }
            if item.quantity <= 0 {
                return Err(AppError::Validation("Quantity must be positive".into()));
            }
            if item.price <= 0.0 {
                return Err(AppError::Validation("Price must be positive".into()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchQuery {
    pub q: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<Order>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderCount {
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderStats {
    pub total_orders: i64,
    pub status_counts: std::collections::BTreeMap<String, i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> OrderRequest {
        OrderRequest {
            customer_id: "C1".into(),
            customer_name: "Alice Smith".into(),
            customer_email: Some("alice@example.com".into()),
            customer_phone: None,
            delivery_address: Some("1 Main St".into()),
            order_notes: None,
            items: vec![OrderItemRequest {
                product_name: "Widget".into(),
                product_description: None,
                quantity: 3,
                price: 2.5,
                category: None,
            }],
        }
    }

    #[test]
    fn accepts_valid_request() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn rejects_blank_customer_id() {
        let mut req = valid_request();
        req.customer_id = "  ".into();
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn rejects_malformed_email() {
        let mut req = valid_request();
        req.customer_email = Some("not-an-email".into());
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn rejects_empty_item_list() {
        let mut req = valid_request();
        req.items.clear();
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn rejects_non_positive_quantity_and_price() {
        let mut req = valid_request();
        req.items[0].quantity = 0;
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));

        let mut req = valid_request();
        req.items[0].price = -1.0;
        assert!(matches!(req.validate(), Err(AppError::Validation(_))));
    }
}
