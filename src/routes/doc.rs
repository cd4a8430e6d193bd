use utoipa::OpenApi;
use utoipa::openapi::OpenApi as OpenApiSpec;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::orders::{
        OrderCount, OrderList, OrderRequest, OrderItemRequest, OrderStats,
        UpdateOrderStatusRequest,
    },
    models::{Order, OrderItem, OrderStatus},
    response::{ApiResponse, Meta},
    routes::{health, orders, params},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        orders::create_order,
        orders::list_orders,
        orders::get_all_orders,
        orders::get_order,
        orders::get_orders_by_customer,
        orders::get_orders_by_status,
        orders::search_orders,
        orders::update_order,
        orders::update_order_status,
        orders::delete_order,
        orders::get_order_stats
    ),
    components(
        schemas(
            Order,
            OrderItem,
            OrderStatus,
            OrderRequest,
            OrderItemRequest,
            UpdateOrderStatusRequest,
            OrderList,
            OrderCount,
            OrderStats,
            params::Pagination,
            params::SortOrder,
            params::OrderSortBy,
            params::OrderListQuery,
            Meta,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<OrderCount>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Orders", description = "Order management endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
