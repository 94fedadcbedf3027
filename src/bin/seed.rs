use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use storefront_api::{config::AppConfig, db::create_pool};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(&pool, "admin", "admin123", "admin").await?;
    let user_id = ensure_user(&pool, "testuser", "user123", "user").await?;
    seed_catalog(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    username: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<i64> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let (user_id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO users (username, password_hash, role)
        VALUES ($1, $2, $3)
        ON CONFLICT (username) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {username} (role={role})");
    Ok(user_id)
}

async fn seed_catalog(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let categories = ["Shirts", "Pants", "Shoes", "Bags"];
    let mut category_ids = Vec::new();
    for name in categories {
        let existing: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM categories WHERE name = $1")
                .bind(name)
                .fetch_optional(pool)
                .await?;
        let id = match existing {
            Some((id,)) => id,
            None => {
                let (id,): (i64,) =
                    sqlx::query_as("INSERT INTO categories (name) VALUES ($1) RETURNING id")
                        .bind(name)
                        .fetch_one(pool)
                        .await?;
                id
            }
        };
        category_ids.push(id);
    }
    println!("Seeded categories");

    let products = [
        ("Short sleeve tee", 100_000_i64, "https://images.example.com/tee.jpg", category_ids[0]),
        ("Black dress pants", 200_000, "https://images.example.com/pants.jpg", category_ids[1]),
        ("Canvas sneakers", 150_000, "https://images.example.com/sneakers.jpg", category_ids[2]),
        ("Leather tote bag", 500_000, "https://images.example.com/tote.jpg", category_ids[3]),
    ];

    for (name, price, image, category_id) in products {
        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM products WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await?;
        if existing.is_none() {
            sqlx::query(
                "INSERT INTO products (name, price, image, category_id) VALUES ($1, $2, $3, $4)",
            )
            .bind(name)
            .bind(price)
            .bind(image)
            .bind(category_id)
            .execute(pool)
            .await?;
        }
    }

    println!("Seeded products");
    Ok(())
}
