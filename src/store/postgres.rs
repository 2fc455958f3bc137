//! Postgres record store.

use async_trait::async_trait;
use sqlx::PgPool;

use super::parse_issued_date;
use crate::certificate::recorder::{
    CertificatePayload, CertificateStore, StoreError, StoredCertificate,
};

#[derive(Clone)]
pub struct PgCertificateStore {
    pool: PgPool,
}

impl PgCertificateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CertificateStore for PgCertificateStore {
    async fn insert_certificate(&self, payload: &CertificatePayload) -> Result<i64, StoreError> {
        let issued_date = parse_issued_date(&payload.issued_date)?;
        let age = payload.age.and_then(|a| i32::try_from(a).ok());

        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO certificates
                (resident_name, type_, issued_date, age, civil_status, ownership_text, purpose, amount)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&payload.resident_name)
        .bind(&payload.type_)
        .bind(issued_date)
        .bind(age)
        .bind(payload.civil_status.as_deref())
        .bind(payload.ownership_text.as_deref())
        .bind(payload.purpose.as_deref())
        .bind(&payload.amount)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_certificates(&self, limit: i64) -> Result<Vec<StoredCertificate>, StoreError> {
        let rows = sqlx::query_as::<_, StoredCertificate>(
            r#"
            SELECT id, resident_name, type_, issued_date, age, civil_status,
                   ownership_text, purpose, amount
            FROM certificates
            ORDER BY issued_date DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
