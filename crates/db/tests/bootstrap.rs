use sqlx::PgPool;

/// Connect, migrate, verify the schema answers.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    campus_db::health_check(&pool).await.unwrap();

    let tables = [
        "roles",
        "users",
        "user_sessions",
        "user_tokens",
        "mfa_factors",
        "pending_testimonials",
        "testimonials",
        "courses",
        "financing_options",
        "professionals",
        "library_files",
    ];

    for table in tables {
        sqlx::query(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
    }
}

/// Role ids are relied upon by the API when creating accounts.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_roles_are_seeded(pool: PgPool) {
    use campus_core::roles::{ROLE_ADMIN, ROLE_USER};
    use campus_db::repositories::RoleRepo;

    assert_eq!(RoleRepo::resolve_name(&pool, 1).await.unwrap(), ROLE_ADMIN);
    assert_eq!(RoleRepo::resolve_name(&pool, 2).await.unwrap(), ROLE_USER);
    assert_eq!(RoleRepo::resolve_name(&pool, 99).await.unwrap(), "unknown");
}

/// `updated_at` moves forward on every UPDATE through the shared trigger.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_updated_at_trigger(pool: PgPool) {
    let (created, updated): (chrono::DateTime<chrono::Utc>, chrono::DateTime<chrono::Utc>) =
        sqlx::query_as(
            "INSERT INTO courses (slug, title, price) VALUES ('c', 'C', 100)
             RETURNING created_at, updated_at",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(created, updated);

    let (after,): (chrono::DateTime<chrono::Utc>,) =
        sqlx::query_as("UPDATE courses SET title = 'D' WHERE slug = 'c' RETURNING updated_at")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(after >= updated);
}
