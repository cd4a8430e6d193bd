use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle status of an order. Any status may follow any other; there is no
/// enforced transition graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Placed,
    Processing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Placed,
        OrderStatus::Processing,
        OrderStatus::Ready,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Stable wire/database token.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "PLACED",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Ready => "READY",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    /// Human-readable label used in notification text.
    pub fn display_label(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "Order Placed",
            OrderStatus::Processing => "Processing",
            OrderStatus::Ready => "Ready for Delivery",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLACED" => Ok(OrderStatus::Placed),
            "PROCESSING" => Ok(OrderStatus::Processing),
            "READY" => Ok(OrderStatus::Ready),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(anyhow::anyhow!("unknown order status: {other}")),
        }
    }
}

/// One product line within an order. Items are owned by their order and have
/// no meaning outside it; `order_id` exists only for persistence mapping.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Option<Uuid>,
    pub order_id: Option<Uuid>,
    pub product_name: String,
    pub product_description: Option<String>,
    pub quantity: i32,
    pub price: f64,
    pub category: Option<String>,
}

impl OrderItem {
    pub fn new(product_name: impl Into<String>, quantity: i32, price: f64) -> Self {
        Self {
            id: None,
            order_id: None,
            product_name: product_name.into(),
            product_description: None,
            quantity,
            price,
            category: None,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// Order aggregate: customer-facing fields, lifecycle status, and the owned
/// line items from which `total_amount` is derived.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Option<Uuid>,
    pub customer_id: String,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub customer_phone: Option<String>,
    pub delivery_address: Option<String>,
    pub order_notes: Option<String>,
    pub status: OrderStatus,
    pub total_amount: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

impl Order {
    pub fn new(customer_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            customer_id: customer_id.into(),
            customer_name: None,
            customer_email: None,
            customer_phone: None,
            delivery_address: None,
            order_notes: None,
            status: OrderStatus::Placed,
            total_amount: 0.0,
            created_at: now,
            updated_at: now,
            items: Vec::new(),
        }
    }

    /// total = Σ quantity × price over current items.
    pub fn recompute_total(&mut self) {
        self.total_amount = self.items.iter().map(OrderItem::line_total).sum();
    }

    pub fn add_item(&mut self, mut item: OrderItem) {
        item.order_id = self.id;
        self.items.push(item);
        self.recompute_total();
    }

    /// Discards all current items and attaches the replacements.
    pub fn replace_items(&mut self, new_items: Vec<OrderItem>) {
        self.items.clear();
        for item in new_items {
            self.add_item(item);
        }
        self.recompute_total();
    }

    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
