//! Integration tests for the repository layer
//!
//! These tests verify that the PostgreSQL repository correctly persists
//! metals, applies filters, and handles soft/hard deletion with dependent
//! records. They all need a database reachable through `DATABASE_URL` and
//! are therefore marked `ignore`.

use metals_api::domain::metal::{ListOptions, Metal, MetalFilter, MetalPatch, SortField, SortOrder};
use metals_api::domain::repositories::{MetalRepository, RepositoryError};
use metals_api::infrastructure::repositories::PostgresMetalRepository;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

/// Set up test database connection pool
async fn setup_test_db() -> PgPool {
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// Create a metal with a unique grade so tests stay isolated
fn test_metal(name: &str, grade: &str, added_by: Uuid) -> Metal {
    Metal::new(
        name.to_string(),
        Some(grade.to_string()),
        None,
        json!({}),
        added_by,
    )
    .expect("valid metal")
}

/// Attach a dependent lot to a metal
async fn create_test_lot(pool: &PgPool, metal_id: Uuid) {
    sqlx::query("INSERT INTO metal_lots (id, metal_id, quantity) VALUES ($1, $2, $3)")
        .bind(Uuid::new_v4())
        .bind(metal_id)
        .bind(100i64)
        .execute(pool)
        .await
        .expect("Failed to create test lot");
}

/// Remove everything a test created under its unique grade
async fn cleanup_grade(pool: &PgPool, grade: &str) {
    sqlx::query(
        "DELETE FROM metal_lots WHERE metal_id IN (SELECT id FROM metals WHERE grade = $1)",
    )
    .bind(grade)
    .execute(pool)
    .await
    .expect("Failed to cleanup lots");

    sqlx::query("DELETE FROM metals WHERE grade = $1")
        .bind(grade)
        .execute(pool)
        .await
        .expect("Failed to cleanup metals");
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn test_save_and_find_by_id() {
    let pool = setup_test_db().await;
    let repo = PostgresMetalRepository::new(pool.clone());
    let grade = format!("repo-{}", Uuid::new_v4());
    let added_by = Uuid::new_v4();

    let metal = test_metal("Copper", &grade, added_by);
    repo.save(&metal).await.expect("save");

    let found = repo
        .find_by_id(metal.id())
        .await
        .expect("find")
        .expect("record exists");

    assert_eq!(found.id(), metal.id());
    assert_eq!(found.name(), "Copper");
    assert_eq!(found.added_by(), added_by);
    assert!(!found.is_deleted());

    cleanup_grade(&pool, &grade).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn test_save_is_upsert() {
    let pool = setup_test_db().await;
    let repo = PostgresMetalRepository::new(pool.clone());
    let grade = format!("repo-{}", Uuid::new_v4());

    let mut metal = test_metal("Tin", &grade, Uuid::new_v4());
    repo.save(&metal).await.expect("insert");

    let editor = Uuid::new_v4();
    metal
        .apply_patch(
            MetalPatch {
                name: Some("Pewter".to_string()),
                ..Default::default()
            },
            editor,
        )
        .expect("patch");
    repo.save(&metal).await.expect("update");

    let found = repo.find_by_id(metal.id()).await.expect("find").unwrap();
    assert_eq!(found.name(), "Pewter");
    assert_eq!(found.updated_by(), Some(editor));

    cleanup_grade(&pool, &grade).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn test_find_filters_and_paginates() {
    let pool = setup_test_db().await;
    let repo = PostgresMetalRepository::new(pool.clone());
    let grade = format!("repo-{}", Uuid::new_v4());
    let added_by = Uuid::new_v4();

    let metals = vec![
        test_metal("Iron", &grade, added_by),
        test_metal("Nickel", &grade, added_by),
        test_metal("Cobalt", &grade, added_by),
    ];
    let inserted = repo.insert_many(&metals).await.expect("bulk insert");
    assert_eq!(inserted, 3);

    let filter = MetalFilter {
        grade: Some(grade.clone()),
        ..Default::default()
    };
    let options = ListOptions {
        page: 1,
        limit: 2,
        sort_by: SortField::Name,
        order: SortOrder::Asc,
    };

    let page = repo.find(&filter, &options).await.expect("find");
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].name(), "Cobalt");
    assert_eq!(page.total_pages(), 2);

    // Substring filter narrows further
    let filter = MetalFilter {
        grade: Some(grade.clone()),
        name_contains: Some("nick".to_string()),
        ..Default::default()
    };
    assert_eq!(repo.count(&filter).await.expect("count"), 1);

    cleanup_grade(&pool, &grade).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn test_update_many_by_filter() {
    let pool = setup_test_db().await;
    let repo = PostgresMetalRepository::new(pool.clone());
    let grade = format!("repo-{}", Uuid::new_v4());

    let metals = vec![
        test_metal("Iron", &grade, Uuid::new_v4()),
        test_metal("Nickel", &grade, Uuid::new_v4()),
    ];
    repo.insert_many(&metals).await.expect("bulk insert");

    let filter = MetalFilter {
        grade: Some(grade.clone()),
        ..Default::default()
    };
    let patch = MetalPatch {
        attributes: Some(json!({"magnetic": true})),
        ..Default::default()
    };
    let editor = Uuid::new_v4();

    let changed = repo
        .update_many(&filter, &patch, editor)
        .await
        .expect("bulk update");
    assert_eq!(changed, 2);

    let found = repo.find_by_id(metals[0].id()).await.expect("find").unwrap();
    assert_eq!(found.attributes()["magnetic"], true);
    assert_eq!(found.updated_by(), Some(editor));

    cleanup_grade(&pool, &grade).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn test_soft_delete_many_skips_already_deleted() {
    let pool = setup_test_db().await;
    let repo = PostgresMetalRepository::new(pool.clone());
    let grade = format!("repo-{}", Uuid::new_v4());

    let mut first = test_metal("Iron", &grade, Uuid::new_v4());
    let second = test_metal("Nickel", &grade, Uuid::new_v4());
    first.mark_deleted(Uuid::new_v4()).expect("mark deleted");
    repo.save(&first).await.expect("save first");
    repo.save(&second).await.expect("save second");

    let ids = [first.id(), second.id()];
    let marked = repo
        .soft_delete_many(&ids, Uuid::new_v4())
        .await
        .expect("soft delete many");

    // Only the live record counts as newly marked
    assert_eq!(marked, 1);

    cleanup_grade(&pool, &grade).await;
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn test_delete_removes_dependents() {
    let pool = setup_test_db().await;
    let repo = PostgresMetalRepository::new(pool.clone());
    let grade = format!("repo-{}", Uuid::new_v4());

    let metal = test_metal("Zinc", &grade, Uuid::new_v4());
    repo.save(&metal).await.expect("save");
    create_test_lot(&pool, metal.id()).await;
    create_test_lot(&pool, metal.id()).await;

    let dependents = repo
        .count_dependents(&[metal.id()])
        .await
        .expect("count dependents");
    assert_eq!(dependents, 2);

    repo.delete(metal.id()).await.expect("delete");

    assert!(repo.find_by_id(metal.id()).await.expect("find").is_none());
    let remaining = repo
        .count_dependents(&[metal.id()])
        .await
        .expect("count dependents");
    assert_eq!(remaining, 0);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn test_delete_unknown_id_is_not_found() {
    let pool = setup_test_db().await;
    let repo = PostgresMetalRepository::new(pool);

    let result = repo.delete(Uuid::new_v4()).await;

    assert!(matches!(result, Err(RepositoryError::NotFound(_))));
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance via DATABASE_URL"]
async fn test_delete_many_reports_removed_count() {
    let pool = setup_test_db().await;
    let repo = PostgresMetalRepository::new(pool.clone());
    let grade = format!("repo-{}", Uuid::new_v4());

    let metals = vec![
        test_metal("Iron", &grade, Uuid::new_v4()),
        test_metal("Nickel", &grade, Uuid::new_v4()),
    ];
    repo.insert_many(&metals).await.expect("bulk insert");
    create_test_lot(&pool, metals[0].id()).await;

    let ids: Vec<Uuid> = metals.iter().map(Metal::id).collect();
    let removed = repo.delete_many(&ids).await.expect("delete many");

    assert_eq!(removed, 2);
    assert_eq!(
        repo.count_dependents(&ids).await.expect("count dependents"),
        0
    );
}
