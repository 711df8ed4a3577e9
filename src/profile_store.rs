use std::collections::HashMap;

use anyhow::Context;
use sqlx::PgPool;
use tokio::sync::RwLock;

use crate::domain::UserId;

/// Scalar fields attached to a user; writes replace the previous value.
#[async_trait::async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_field(&self, user_id: UserId, key: &str) -> Result<Option<String>, anyhow::Error>;

    async fn set_field(&self, user_id: UserId, key: &str, value: &str) -> Result<(), anyhow::Error>;
}

pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ProfileStore for PgProfileStore {
    #[tracing::instrument(name = "Reading a user profile field", skip(self))]
    async fn get_field(&self, user_id: UserId, key: &str) -> Result<Option<String>, anyhow::Error> {
        let row: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT field_value
            FROM user_profile_fields
            WHERE user_id = $1 AND field_key = $2
            "#,
        )
        .bind(user_id.as_i64())
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to read a user profile field")?;
        Ok(row.map(|(value,)| value))
    }

    #[tracing::instrument(name = "Saving a user profile field", skip(self, value))]
    async fn set_field(&self, user_id: UserId, key: &str, value: &str) -> Result<(), anyhow::Error> {
        sqlx::query(
            r#"
            INSERT INTO user_profile_fields (user_id, field_key, field_value, updated_at)
            VALUES ($1, $2, $3, now())
            ON CONFLICT (user_id, field_key)
            DO UPDATE SET field_value = EXCLUDED.field_value, updated_at = now()
            "#,
        )
        .bind(user_id.as_i64())
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .context("Failed to save a user profile field")?;
        Ok(())
    }
}

/// Process-local store, used when no database is configured.
#[derive(Default)]
pub struct InMemoryProfileStore {
    fields: RwLock<HashMap<(UserId, String), String>>,
}

#[async_trait::async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get_field(&self, user_id: UserId, key: &str) -> Result<Option<String>, anyhow::Error> {
        let fields = self.fields.read().await;
        Ok(fields.get(&(user_id, key.to_string())).cloned())
    }

    async fn set_field(&self, user_id: UserId, key: &str, value: &str) -> Result<(), anyhow::Error> {
        let mut fields = self.fields.write().await;
        fields.insert((user_id, key.to_string()), value.to_string());
        Ok(())
    }
}
