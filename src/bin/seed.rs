use order_management_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool},
    models::{Order, OrderItem, OrderStatus},
    repository::OrderRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let orm = create_orm_conn(&config.database_url).await?;
    let repo = OrderRepository::new(&orm);

    if repo.count().await? > 0 {
        println!("Orders already present, skipping seed");
        return Ok(());
    }

    let samples = [
        (
            "C1",
            "Alice Smith",
            "alice@example.com",
            OrderStatus::Placed,
            vec![("Axum Hoodie", 1, 55.0), ("Ferris Mug", 2, 12.0)],
        ),
        (
            "C2",
            "Bob Jones",
            "bob@example.com",
            OrderStatus::Processing,
            vec![("Rust Sticker Pack", 3, 5.0)],
        ),
        (
            "C3",
            "Carol White",
            "carol@example.com",
            OrderStatus::Delivered,
            vec![("E-book: Async Rust", 1, 25.0)],
        ),
    ];

    for (customer_id, name, email, status, items) in samples {
        let mut order = Order::new(customer_id);
        order.customer_name = Some(name.into());
        order.customer_email = Some(email.into());
        order.delivery_address = Some("1 Main St".into());
        for (product, quantity, price) in items {
            order.add_item(OrderItem::new(product, quantity, price));
        }
        order.set_status(status);
        let saved = repo.save(&order).await?;
        println!(
            "Seeded order {} for {} (total {:.2})",
            saved.id.expect("persisted order has id"),
            name,
            saved.total_amount
        );
    }

    println!("Seed completed");
    Ok(())
}
