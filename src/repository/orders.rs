use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, LoaderTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    sea_query::{Expr, extension::postgres::PgExpr},
};
use uuid::Uuid;

use crate::{
    db::OrmConn,
    entity::{
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{
            ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel,
        },
    },
    error::{AppError, AppResult},
    models::{Order, OrderItem, OrderStatus},
    routes::params::{OrderSortBy, SortOrder},
};

/// One page of orders plus the paging totals.
#[derive(Debug)]
pub struct OrderPage {
    pub items: Vec<Order>,
    pub page: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

/// Persistence facade for the order aggregate. An order row and its item rows
/// are always written and removed together.
pub struct OrderRepository<'a> {
    conn: &'a OrmConn,
}

impl<'a> OrderRepository<'a> {
    pub fn new(conn: &'a OrmConn) -> Self {
        Self { conn }
    }

    /// Insert when the order has no identity yet, update otherwise. Updates
    /// rewrite the item set: existing item rows are dropped and the current
    /// collection is inserted in their place, all in one transaction.
    pub async fn save(&self, order: &Order) -> AppResult<Order> {
        let txn = self.conn.begin().await?;

        let order_id = match order.id {
            Some(id) => {
                order_to_active(order, id).update(&txn).await?;
                OrderItems::delete_many()
                    .filter(OrderItemCol::OrderId.eq(id))
                    .exec(&txn)
                    .await?;
                id
            }
            None => {
                let id = Uuid::new_v4();
                order_to_active(order, id).insert(&txn).await?;
                id
            }
        };

        for item in &order.items {
            OrderItemActive {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                product_name: Set(item.product_name.clone()),
                product_description: Set(item.product_description.clone()),
                quantity: Set(item.quantity),
                price: Set(item.price),
                category: Set(item.category.clone()),
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        self.find_by_id(order_id).await?.ok_or(AppError::NotFound)
    }

    pub async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Order>> {
        let Some(model) = Orders::find_by_id(id).one(self.conn).await? else {
            return Ok(None);
        };
        let items = OrderItems::find()
            .filter(OrderItemCol::OrderId.eq(id))
            .all(self.conn)
            .await?;
        Ok(Some(order_from_parts(model, items)?))
    }

    pub async fn find_all(&self) -> AppResult<Vec<Order>> {
        let finder = Orders::find().order_by_desc(OrderCol::CreatedAt);
        self.load_aggregates(finder).await
    }

    pub async fn find_by_customer_id(&self, customer_id: &str) -> AppResult<Vec<Order>> {
        let finder = Orders::find()
            .filter(OrderCol::CustomerId.eq(customer_id))
            .order_by_desc(OrderCol::CreatedAt);
        self.load_aggregates(finder).await
    }

    pub async fn find_by_status(&self, status: OrderStatus) -> AppResult<Vec<Order>> {
        let finder = Orders::find()
            .filter(OrderCol::Status.eq(status.as_str()))
            .order_by_desc(OrderCol::CreatedAt);
        self.load_aggregates(finder).await
    }

    pub async fn find_by_customer_id_and_status(
        &self,
        customer_id: &str,
        status: OrderStatus,
    ) -> AppResult<Vec<Order>> {
        let finder = Orders::find()
            .filter(
                Condition::all()
                    .add(OrderCol::CustomerId.eq(customer_id))
                    .add(OrderCol::Status.eq(status.as_str())),
            )
            .order_by_desc(OrderCol::CreatedAt);
        self.load_aggregates(finder).await
    }

    pub async fn find_created_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<Order>> {
        let finder = Orders::find()
            .filter(OrderCol::CreatedAt.between(from, to))
            .order_by_desc(OrderCol::CreatedAt);
        self.load_aggregates(finder).await
    }

    pub async fn find_total_greater_than(&self, amount: f64) -> AppResult<Vec<Order>> {
        let finder = Orders::find()
            .filter(OrderCol::TotalAmount.gt(amount))
            .order_by_desc(OrderCol::CreatedAt);
        self.load_aggregates(finder).await
    }

    /// Case-insensitive substring match over customer name or customer email.
    pub async fn search(&self, term: &str) -> AppResult<Vec<Order>> {
        let pattern = format!("%{term}%");
        let finder = Orders::find()
            .filter(
                Condition::any()
                    .add(Expr::col(OrderCol::CustomerName).ilike(pattern.clone()))
                    .add(Expr::col(OrderCol::CustomerEmail).ilike(pattern)),
            )
            .order_by_desc(OrderCol::CreatedAt);
        self.load_aggregates(finder).await
    }

    /// Zero-based page over all orders. Unknown sort fields are rejected at
    /// the API boundary before this is reached.
    pub async fn list_page(
        &self,
        page: i64,
        per_page: i64,
        sort_by: OrderSortBy,
        sort_order: SortOrder,
    ) -> AppResult<OrderPage> {
        let column = sort_column(sort_by);
        let mut finder = Orders::find();
        finder = match sort_order {
            SortOrder::Asc => finder.order_by_asc(column),
            SortOrder::Desc => finder.order_by_desc(column),
        };

        let total_items = finder.clone().count(self.conn).await? as i64;
        let total_pages = if total_items == 0 {
            0
        } else {
            (total_items + per_page - 1) / per_page
        };

        let finder = finder
            .limit(per_page as u64)
            .offset((page * per_page) as u64);
        let items = self.load_aggregates(finder).await?;

        Ok(OrderPage {
            items,
            page,
            total_items,
            total_pages,
        })
    }

    /// Fails with `NotFound` when no such order exists. Item rows go with the
    /// order via the FK cascade.
    pub async fn delete_by_id(&self, id: Uuid) -> AppResult<()> {
        let result = Orders::delete_by_id(id).exec(self.conn).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }
        Ok(())
    }

    pub async fn exists_by_id(&self, id: Uuid) -> AppResult<bool> {
        let count = Orders::find_by_id(id).count(self.conn).await?;
        Ok(count > 0)
    }

    pub async fn count(&self) -> AppResult<i64> {
        Ok(Orders::find().count(self.conn).await? as i64)
    }

    pub async fn count_by_status(&self, status: OrderStatus) -> AppResult<i64> {
        let count = Orders::find()
            .filter(OrderCol::Status.eq(status.as_str()))
            .count(self.conn)
            .await?;
        Ok(count as i64)
    }

    async fn load_aggregates(
        &self,
        finder: sea_orm::Select<Orders>,
    ) -> AppResult<Vec<Order>> {
        let models = finder.all(self.conn).await?;
        let item_sets = models.load_many(OrderItems, self.conn).await?;
        models
            .into_iter()
            .zip(item_sets)
            .map(|(model, items)| order_from_parts(model, items))
            .collect()
    }
}

fn sort_column(sort_by: OrderSortBy) -> OrderCol {
    match sort_by {
        OrderSortBy::CreatedAt => OrderCol::CreatedAt,
        OrderSortBy::UpdatedAt => OrderCol::UpdatedAt,
        OrderSortBy::TotalAmount => OrderCol::TotalAmount,
        OrderSortBy::Status => OrderCol::Status,
        OrderSortBy::CustomerName => OrderCol::CustomerName,
    }
}

fn order_to_active(order: &Order, id: Uuid) -> OrderActive {
    OrderActive {
        id: Set(id),
        customer_id: Set(order.customer_id.clone()),
        customer_name: Set(order.customer_name.clone()),
        customer_email: Set(order.customer_email.clone()),
        customer_phone: Set(order.customer_phone.clone()),
        delivery_address: Set(order.delivery_address.clone()),
        order_notes: Set(order.order_notes.clone()),
        status: Set(order.status.as_str().to_string()),
        total_amount: Set(order.total_amount),
        created_at: Set(order.created_at.into()),
        updated_at: Set(order.updated_at.into()),
    }
}

fn order_from_parts(model: OrderModel, items: Vec<OrderItemModel>) -> AppResult<Order> {
    let status: OrderStatus = model.status.parse().map_err(AppError::Internal)?;
    Ok(Order {
        id: Some(model.id),
        customer_id: model.customer_id,
        customer_name: model.customer_name,
        customer_email: model.customer_email,
        customer_phone: model.customer_phone,
        delivery_address: model.delivery_address,
        order_notes: model.order_notes,
        status,
        total_amount: model.total_amount,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
        items: items.into_iter().map(item_from_entity).collect(),
    })
}

fn item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: Some(model.id),
        order_id: Some(model.order_id),
        product_name: model.product_name,
        product_description: model.product_description,
        quantity: model.quantity,
        price: model.price,
        category: model.category,
    }
}
