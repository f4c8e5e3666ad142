use inventory_reservation_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, config.max_connections).await?;
    // Ensure migrations are applied.
    run_migrations(&pool).await?;

    seed_products(&pool).await?;

    println!("Seed completed");
    Ok(())
}

async fn seed_products(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let products = vec![
        ("Axum Hoodie", "Warm hoodie for Rustaceans", 550000, 50),
        ("Ferris Mug", "Coffee tastes better with Ferris", 120000, 100),
        ("Rust Sticker Pack", "Decorate your laptop", 50000, 200),
        ("E-book: Async Rust", "Learn async Rust patterns", 250000, 75),
    ];

    for (name, desc, price, stock) in products {
        let inserted = sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, stock)
            SELECT $1, $2, $3, $4, $5
            WHERE NOT EXISTS (SELECT 1 FROM products WHERE name = $2)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(desc)
        .bind(price as i64)
        .bind(stock as i32)
        .execute(pool)
        .await?;

        if inserted.rows_affected() == 0 {
            println!("Skipped existing product {name}");
        } else {
            println!("Seeded product {name} (stock={stock})");
        }
    }

    Ok(())
}
