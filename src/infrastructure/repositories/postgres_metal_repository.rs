use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::metal::{ListOptions, Metal, MetalFilter, MetalPage, MetalPatch};
use crate::domain::repositories::{MetalRepository, RepositoryError};

/// Column list for `metals` SELECT queries.
const COLUMNS: &str = "\
    id, name, grade, density, attributes, \
    added_by, updated_by, is_deleted, created_at, updated_at";

/// Row shape for `metals` queries, mapped back into the domain entity.
#[derive(Debug, sqlx::FromRow)]
struct MetalRow {
    id: Uuid,
    name: String,
    grade: Option<String>,
    density: Option<Decimal>,
    attributes: serde_json::Value,
    added_by: Uuid,
    updated_by: Option<Uuid>,
    is_deleted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<MetalRow> for Metal {
    fn from(row: MetalRow) -> Self {
        Metal::from_persistence(
            row.id,
            row.name,
            row.grade,
            row.density,
            row.attributes,
            row.added_by,
            row.updated_by,
            row.is_deleted,
            row.created_at,
            row.updated_at,
        )
    }
}

/// PostgreSQL implementation of MetalRepository
///
/// Persists the typed columns directly and the free-form attributes as
/// JSONB. Queries are assembled at runtime so the filter can stay dynamic.
pub struct PostgresMetalRepository {
    pool: PgPool,
}

impl PostgresMetalRepository {
    /// Creates a new PostgresMetalRepository
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Appends the filter's conjunctive clauses to a builder whose statement
/// already ends in `WHERE 1=1`.
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &MetalFilter) {
    if let Some(name) = &filter.name_contains {
        builder.push(" AND name ILIKE ");
        builder.push_bind(format!("%{}%", name));
    }
    if let Some(grade) = &filter.grade {
        builder.push(" AND grade = ");
        builder.push_bind(grade.clone());
    }
    if let Some(added_by) = filter.added_by {
        builder.push(" AND added_by = ");
        builder.push_bind(added_by);
    }
    if let Some(ids) = &filter.ids {
        builder.push(" AND id = ANY(");
        builder.push_bind(ids.clone());
        builder.push(")");
    }
    if !filter.include_deleted {
        builder.push(" AND is_deleted = FALSE");
    }
}

#[async_trait]
impl MetalRepository for PostgresMetalRepository {
    async fn save(&self, metal: &Metal) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO metals (
                id, name, grade, density, attributes,
                added_by, updated_by, is_deleted, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                grade = EXCLUDED.grade,
                density = EXCLUDED.density,
                attributes = EXCLUDED.attributes,
                updated_by = EXCLUDED.updated_by,
                is_deleted = EXCLUDED.is_deleted,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(metal.id())
        .bind(metal.name())
        .bind(metal.grade())
        .bind(metal.density())
        .bind(metal.attributes())
        .bind(metal.added_by())
        .bind(metal.updated_by())
        .bind(metal.is_deleted())
        .bind(metal.created_at())
        .bind(metal.updated_at())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn insert_many(&self, metals: &[Metal]) -> Result<u64, RepositoryError> {
        if metals.is_empty() {
            return Ok(0);
        }

        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO metals (id, name, grade, density, attributes, \
             added_by, updated_by, is_deleted, created_at, updated_at) ",
        );
        builder.push_values(metals, |mut row, metal| {
            row.push_bind(metal.id())
                .push_bind(metal.name().to_string())
                .push_bind(metal.grade().map(str::to_string))
                .push_bind(metal.density())
                .push_bind(metal.attributes().clone())
                .push_bind(metal.added_by())
                .push_bind(metal.updated_by())
                .push_bind(metal.is_deleted())
                .push_bind(metal.created_at())
                .push_bind(metal.updated_at());
        });

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn find(
        &self,
        filter: &MetalFilter,
        options: &ListOptions,
    ) -> Result<MetalPage, RepositoryError> {
        let total = self.count(filter).await?;

        let mut builder =
            QueryBuilder::<Postgres>::new(format!("SELECT {COLUMNS} FROM metals WHERE 1=1"));
        push_filter(&mut builder, filter);
        builder.push(format!(
            " ORDER BY {} {}",
            options.sort_by.column(),
            options.order.keyword()
        ));
        builder.push(" LIMIT ");
        builder.push_bind(options.limit());
        builder.push(" OFFSET ");
        builder.push_bind(options.offset());

        let rows: Vec<MetalRow> = builder
            .build_query_as::<MetalRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(MetalPage {
            items: rows.into_iter().map(Metal::from).collect(),
            total,
            page: options.page(),
            limit: options.limit(),
        })
    }

    async fn count(&self, filter: &MetalFilter) -> Result<i64, RepositoryError> {
        let mut builder =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM metals WHERE 1=1");
        push_filter(&mut builder, filter);

        let total: i64 = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Metal>, RepositoryError> {
        let query = format!("SELECT {COLUMNS} FROM metals WHERE id = $1");
        let row = sqlx::query_as::<_, MetalRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Metal::from))
    }

    async fn update_many(
        &self,
        filter: &MetalFilter,
        patch: &MetalPatch,
        updated_by: Uuid,
    ) -> Result<u64, RepositoryError> {
        let mut builder =
            QueryBuilder::<Postgres>::new("UPDATE metals SET updated_at = NOW(), updated_by = ");
        builder.push_bind(updated_by);

        if let Some(name) = &patch.name {
            builder.push(", name = ");
            builder.push_bind(name.clone());
        }
        if let Some(grade) = &patch.grade {
            builder.push(", grade = ");
            builder.push_bind(grade.clone());
        }
        if let Some(density) = patch.density {
            builder.push(", density = ");
            builder.push_bind(density);
        }
        if let Some(attributes) = &patch.attributes {
            builder.push(", attributes = ");
            builder.push_bind(attributes.clone());
        }

        builder.push(" WHERE 1=1");
        push_filter(&mut builder, filter);

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn soft_delete_many(
        &self,
        ids: &[Uuid],
        updated_by: Uuid,
    ) -> Result<u64, RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE metals
            SET is_deleted = TRUE, updated_by = $1, updated_at = NOW()
            WHERE id = ANY($2) AND is_deleted = FALSE
            "#,
        )
        .bind(updated_by)
        .bind(ids.to_vec())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn count_dependents(&self, ids: &[Uuid]) -> Result<i64, RepositoryError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM metal_lots WHERE metal_id = ANY($1)")
                .bind(ids.to_vec())
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM metal_lots WHERE metal_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM metals WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM metal_lots WHERE metal_id = ANY($1)")
            .bind(ids.to_vec())
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM metals WHERE id = ANY($1)")
            .bind(ids.to_vec())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected())
    }
}
