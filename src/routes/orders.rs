use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::orders::{
        OrderList, OrderRequest, OrderStats, SearchQuery, UpdateOrderStatusRequest,
    },
    error::AppResult,
    models::{Order, OrderStatus},
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders).post(create_order))
        .route("/all", get(get_all_orders))
        .route("/search", get(search_orders))
        .route("/customer/{customer_id}", get(get_orders_by_customer))
        .route("/status/{status}", get(get_orders_by_status))
        .route("/stats", get(get_order_stats))
        .route(
            "/{id}",
            get(get_order).put(update_order).delete(delete_order),
        )
        .route("/{id}/status", patch(update_order_status))
}

#[utoipa::path(
    post,
    path = "/orders",
    request_body = OrderRequest,
    responses(
        (status = 200, description = "Order created", body = ApiResponse<Order>),
        (status = 400, description = "Validation failed"),
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<OrderRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::create_order(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/orders",
    params(
        ("page" = Option<i64>, Query, description = "Zero-based page index, default 0"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("sort_by" = Option<String>, Query, description = "Sort field: created_at, updated_at, total_amount, status, customer_name"),
        ("sort_order" = Option<String>, Query, description = "Ascending unless \"desc\" (case-insensitive)")
    ),
    responses(
        (status = 200, description = "Paged order listing", body = ApiResponse<OrderList>),
    ),
    tag = "Orders"
)]
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order with items", body = ApiResponse<Order>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::get_order(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/orders/customer/{customer_id}",
    params(("customer_id" = String, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Orders for a customer", body = ApiResponse<OrderList>),
    ),
    tag = "Orders"
)]
pub async fn get_orders_by_customer(
    State(state): State<AppState>,
    Path(customer_id): Path<String>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::get_orders_by_customer(&state, &customer_id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/orders/status/{status}",
    params(("status" = OrderStatus, Path, description = "Order status")),
    responses(
        (status = 200, description = "Orders in a status", body = ApiResponse<OrderList>),
        (status = 400, description = "Unknown status"),
    ),
    tag = "Orders"
)]
pub async fn get_orders_by_status(
    State(state): State<AppState>,
    Path(status): Path<OrderStatus>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::get_orders_by_status(&state, status).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/orders/search",
    params(("q" = String, Query, description = "Matched case-insensitively against customer name or email")),
    responses(
        (status = 200, description = "Matching orders", body = ApiResponse<OrderList>),
    ),
    tag = "Orders"
)]
pub async fn search_orders(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::search_orders(&state, &query.q).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = OrderRequest,
    responses(
        (status = 200, description = "Order updated", body = ApiResponse<Order>),
        (status = 400, description = "Validation failed"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Orders"
)]
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<OrderRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::update_order(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = ApiResponse<Order>),
        (status = 404, description = "Not Found"),
    ),
    tag = "Orders"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::update_order_status(&state, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/orders/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order deleted"),
        (status = 404, description = "Not Found"),
    ),
    tag = "Orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    let resp = order_service::delete_order(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/orders/all",
    responses(
        (status = 200, description = "All orders, unpaged", body = ApiResponse<OrderList>),
    ),
    tag = "Orders"
)]
pub async fn get_all_orders(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::get_all_orders(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/orders/stats",
    responses(
        (status = 200, description = "Order totals per status", body = ApiResponse<OrderStats>),
    ),
    tag = "Orders"
)]
pub async fn get_order_stats(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<OrderStats>>> {
    let resp = order_service::get_order_stats(&state).await?;
    Ok(Json(resp))
}
