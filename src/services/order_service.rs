use uuid::Uuid;

use crate::{
    dto::orders::{OrderCount, OrderList, OrderRequest, OrderStats, UpdateOrderStatusRequest},
    error::{AppError, AppResult},
    models::{Order, OrderItem, OrderStatus},
    repository::OrderRepository,
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    state::AppState,
};

/// Create an order from the request, persist it, then schedule a placement
/// notification. The notification never affects the returned result.
pub async fn create_order(
    state: &AppState,
    payload: OrderRequest,
) -> AppResult<ApiResponse<Order>> {
    payload.validate()?;

    let mut order = Order::new(payload.customer_id.clone());
    apply_customer_fields(&mut order, &payload);
    for item in items_from_request(&payload) {
        order.add_item(item);
    }

    let saved = OrderRepository::new(&state.orm).save(&order).await?;
    state.notifier.notify(&saved, "New order placed successfully!");

    Ok(ApiResponse::success(
        "Order created",
        saved,
        Some(Meta::empty()),
    ))
}

pub async fn list_orders(
    state: &AppState,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, per_page, _) = query.pagination.normalize();
    let page_result = OrderRepository::new(&state.orm)
        .list_page(
            page,
            per_page,
            query.sort_by.unwrap_or_default(),
            query.sort_order.unwrap_or_default(),
        )
        .await?;

    let meta = Meta::paged(
        page_result.page,
        per_page,
        page_result.total_items,
        page_result.total_pages,
    );
    Ok(ApiResponse::success(
        "Ok",
        OrderList {
            items: page_result.items,
        },
        Some(meta),
    ))
}

pub async fn get_all_orders(state: &AppState) -> AppResult<ApiResponse<OrderList>> {
    let items = OrderRepository::new(&state.orm).find_all().await?;
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_order(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Order>> {
    let order = OrderRepository::new(&state.orm)
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Ok", order, Some(Meta::empty())))
}

pub async fn get_orders_by_customer(
    state: &AppState,
    customer_id: &str,
) -> AppResult<ApiResponse<OrderList>> {
    let items = OrderRepository::new(&state.orm)
        .find_by_customer_id(customer_id)
        .await?;
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items },
        Some(Meta::empty()),
    ))
}

pub async fn get_orders_by_status(
    state: &AppState,
    status: OrderStatus,
) -> AppResult<ApiResponse<OrderList>> {
    let items = OrderRepository::new(&state.orm)
        .find_by_status(status)
        .await?;
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items },
        Some(Meta::empty()),
    ))
}

pub async fn search_orders(state: &AppState, term: &str) -> AppResult<ApiResponse<OrderList>> {
    let items = OrderRepository::new(&state.orm).search(term).await?;
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items },
        Some(Meta::empty()),
    ))
}

/// Set a new status on an existing order. No transition graph: any status may
/// follow any other.
pub async fn update_order_status(
    state: &AppState,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    let repo = OrderRepository::new(&state.orm);
    let mut order = repo.find_by_id(id).await?.ok_or(AppError::NotFound)?;

    let old_status = order.status;
    order.set_status(payload.status);
    let saved = repo.save(&order).await?;

    let message = format!(
        "Order status updated from {} to {}",
        old_status.display_label(),
        payload.status.display_label()
    );
    state.notifier.notify(&saved, &message);

    Ok(ApiResponse::success("Status updated", saved, Some(Meta::empty())))
}

/// Overwrite the customer-facing fields and replace the whole item collection.
pub async fn update_order(
    state: &AppState,
    id: Uuid,
    payload: OrderRequest,
) -> AppResult<ApiResponse<Order>> {
    payload.validate()?;

    let repo = OrderRepository::new(&state.orm);
    let mut order = repo.find_by_id(id).await?.ok_or(AppError::NotFound)?;

    apply_customer_fields(&mut order, &payload);
    order.replace_items(items_from_request(&payload));
    order.touch();

    let saved = repo.save(&order).await?;
    state.notifier.notify(&saved, "Order updated successfully!");

    Ok(ApiResponse::success("Order updated", saved, Some(Meta::empty())))
}

pub async fn delete_order(state: &AppState, id: Uuid) -> AppResult<ApiResponse<()>> {
    OrderRepository::new(&state.orm).delete_by_id(id).await?;
    Ok(ApiResponse::success("Order deleted", (), Some(Meta::empty())))
}

pub async fn count_orders(state: &AppState) -> AppResult<ApiResponse<OrderCount>> {
    let count = OrderRepository::new(&state.orm).count().await?;
    Ok(ApiResponse::success(
        "Ok",
        OrderCount { count },
        Some(Meta::empty()),
    ))
}

pub async fn count_by_status(
    state: &AppState,
    status: OrderStatus,
) -> AppResult<ApiResponse<OrderCount>> {
    let count = OrderRepository::new(&state.orm)
        .count_by_status(status)
        .await?;
    Ok(ApiResponse::success(
        "Ok",
        OrderCount { count },
        Some(Meta::empty()),
    ))
}

/// Total order count plus a per-status breakdown.
pub async fn get_order_stats(state: &AppState) -> AppResult<ApiResponse<OrderStats>> {
    let repo = OrderRepository::new(&state.orm);
    let total_orders = repo.count().await?;
    let mut status_counts = std::collections::BTreeMap::new();
    for status in OrderStatus::ALL {
        status_counts.insert(
            status.as_str().to_string(),
            repo.count_by_status(status).await?,
        );
    }
    Ok(ApiResponse::success(
        "Ok",
        OrderStats {
            total_orders,
            status_counts,
        },
        Some(Meta::empty()),
    ))
}

fn apply_customer_fields(order: &mut Order, payload: &OrderRequest) {
    order.customer_name = Some(payload.customer_name.clone());
    order.customer_email = payload.customer_email.clone();
    order.customer_phone = payload.customer_phone.clone();
    order.delivery_address = payload.delivery_address.clone();
    order.order_notes = payload.order_notes.clone();
}

fn items_from_request(payload: &OrderRequest) -> Vec<OrderItem> {
    payload
        .items
        .iter()
        .map(|req| OrderItem {
            id: None,
            order_id: None,
            product_name: req.product_name.clone(),
            product_description: req.product_description.clone(),
            quantity: req.quantity,
            price: req.price,
            category: req.category.clone(),
        })
        .collect()
}
