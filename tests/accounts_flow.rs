use storefront_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    dto::auth::{LoginRequest, RegisterRequest},
    dto::users::UpdateRoleRequest,
    error::AppError,
    middleware::auth::AuthUser,
    routes::params::Pagination,
    services::{admin_service, auth_service},
    state::AppState,
};

// Signup, credential verification, and admin user management.
#[tokio::test]
async fn register_login_and_user_administration() -> anyhow::Result<()> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let registered = auth_service::register_user(
        &state,
        RegisterRequest {
            username: "carol".into(),
            password: "opensesame".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(registered.role, "user");

    // Usernames are unique.
    let taken = auth_service::register_user(
        &state,
        RegisterRequest {
            username: "carol".into(),
            password: "different".into(),
        },
    )
    .await;
    assert!(matches!(taken, Err(AppError::BadRequest(_))));

    // The stored credential is a hash, never the password itself.
    let (stored_hash,): (String,) =
        sqlx::query_as("SELECT password_hash FROM users WHERE id = $1")
            .bind(registered.id)
            .fetch_one(&state.pool)
            .await?;
    assert_ne!(stored_hash, "opensesame");
    assert!(stored_hash.starts_with("$argon2"));

    // Wrong password and unknown username both fail the same way.
    let wrong = auth_service::login_user(
        &state,
        LoginRequest {
            username: "carol".into(),
            password: "wrong".into(),
        },
    )
    .await;
    assert!(matches!(wrong, Err(AppError::BadRequest(_))));
    let nobody = auth_service::login_user(
        &state,
        LoginRequest {
            username: "mallory".into(),
            password: "opensesame".into(),
        },
    )
    .await;
    assert!(matches!(nobody, Err(AppError::BadRequest(_))));

    let login = auth_service::login_user(
        &state,
        LoginRequest {
            username: "carol".into(),
            password: "opensesame".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert!(login.token.starts_with("Bearer "));

    // `me` resolves the identity behind the token's claims.
    let auth_carol = AuthUser {
        user_id: registered.id,
        role: registered.role.clone(),
    };
    let me = auth_service::current_user(&state, &auth_carol)
        .await?
        .data
        .unwrap();
    assert_eq!(me.username, "carol");

    // User administration requires the admin role.
    let admin = auth_service::register_user(
        &state,
        RegisterRequest {
            username: "root".into(),
            password: "hunter22".into(),
        },
    )
    .await?
    .data
    .unwrap();
    let auth_admin = AuthUser {
        user_id: admin.id,
        role: "admin".into(),
    };

    let forbidden = admin_service::list_users(
        &state,
        &auth_carol,
        Pagination {
            page: None,
            per_page: None,
        },
    )
    .await;
    assert!(matches!(forbidden, Err(AppError::Forbidden)));

    let users = admin_service::list_users(
        &state,
        &auth_admin,
        Pagination {
            page: None,
            per_page: None,
        },
    )
    .await?
    .data
    .unwrap()
    .items;
    assert_eq!(users.len(), 2);

    // Role flips are constrained to the two known roles.
    let promoted = admin_service::update_user_role(
        &state,
        &auth_admin,
        registered.id,
        UpdateRoleRequest {
            role: "admin".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(promoted.role, "admin");

    let bogus = admin_service::update_user_role(
        &state,
        &auth_admin,
        registered.id,
        UpdateRoleRequest {
            role: "owner".into(),
        },
    )
    .await;
    assert!(matches!(bogus, Err(AppError::BadRequest(_))));

    // Admins cannot delete themselves; deleting others works.
    let own = admin_service::delete_user(&state, &auth_admin, admin.id).await;
    assert!(matches!(own, Err(AppError::BadRequest(_))));

    admin_service::delete_user(&state, &auth_admin, registered.id).await?;
    let gone = auth_service::current_user(&state, &auth_carol).await;
    assert!(matches!(gone, Err(AppError::NotFound)));

    Ok(())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    sqlx::query("TRUNCATE TABLE orders, audit_logs, products, categories, users RESTART IDENTITY CASCADE")
        .execute(&pool)
        .await?;

    let config = AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".into(),
        port: 0,
        jwt_secret: "integration-test-secret".into(),
    };
    Ok(AppState::new(pool, orm, config))
}
