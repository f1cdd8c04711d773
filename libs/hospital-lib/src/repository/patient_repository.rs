use async_trait::async_trait;
use sqlx::{query, query_as, query_scalar, MySqlPool};

use crate::entities::{Patient, PaginationParams};
use crate::repository::errors::{map_sqlx_error, RepositoryError};
use crate::repository::models::PatientRow;
use crate::repository::traits::PatientRepositoryTrait;

#[derive(Debug, Clone)]
pub struct PatientRepository {
    pub pool: MySqlPool,
}

impl PatientRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn count_to_u64(count: i64) -> Result<u64, RepositoryError> {
    u64::try_from(count).map_err(|_| RepositoryError::Inconsistent(format!("negative count {count}")))
}

#[async_trait]
impl PatientRepositoryTrait for PatientRepository {
    async fn find_by_keyword(
        &self,
        keyword: &str,
        pagination: PaginationParams,
    ) -> Result<(Vec<PatientRow>, u64), RepositoryError> {
        // Binary comparison keeps the match case-sensitive whatever the column collation.
        let patients = query_as::<_, PatientRow>(
            r#"
            SELECT id, name, birth_date, sick, score
            FROM patients
            WHERE LOCATE(CAST(? AS BINARY), CAST(name AS BINARY)) > 0
            ORDER BY id
            LIMIT ? OFFSET ?
            "#,
        )
        .bind(keyword)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let total: i64 = query_scalar(
            r#"
            SELECT COUNT(*)
            FROM patients
            WHERE LOCATE(CAST(? AS BINARY), CAST(name AS BINARY)) > 0
            "#,
        )
        .bind(keyword)
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok((patients, count_to_u64(total)?))
    }

    async fn find_all(&self) -> Result<Vec<PatientRow>, RepositoryError> {
        let patients = query_as::<_, PatientRow>(
            r#"SELECT id, name, birth_date, sick, score FROM patients ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(patients)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<PatientRow>, RepositoryError> {
        let patient = query_as::<_, PatientRow>(
            r#"SELECT id, name, birth_date, sick, score FROM patients WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;
        Ok(patient)
    }

    async fn insert(&self, patient: &Patient) -> Result<PatientRow, RepositoryError> {
        let result = query(
            r#"
            INSERT INTO patients (name, birth_date, sick, score)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&patient.name)
        .bind(patient.birth_date)
        .bind(patient.sick)
        .bind(patient.score)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let id = i64::try_from(result.last_insert_id()).map_err(|_| {
            RepositoryError::Inconsistent(format!(
                "generated id {} out of range",
                result.last_insert_id()
            ))
        })?;

        Ok(PatientRow {
            id,
            name: patient.name.clone(),
            birth_date: patient.birth_date,
            sick: patient.sick,
            score: patient.score,
        })
    }

    async fn update(&self, id: i64, patient: &Patient) -> Result<Option<PatientRow>, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        // MySQL reports changed rows rather than matched rows, so existence is
        // checked under a row lock first.
        let existing: Option<i64> = query_scalar(r#"SELECT id FROM patients WHERE id = ? FOR UPDATE"#)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        if existing.is_none() {
            return Ok(None);
        }

        query(
            r#"
            UPDATE patients
            SET name = ?, birth_date = ?, sick = ?, score = ?
            WHERE id = ?
            "#,
        )
        .bind(&patient.name)
        .bind(patient.birth_date)
        .bind(patient.sick)
        .bind(patient.score)
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(Some(PatientRow {
            id,
            name: patient.name.clone(),
            birth_date: patient.birth_date,
            sick: patient.sick,
            score: patient.score,
        }))
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, RepositoryError> {
        let result = query(r#"DELETE FROM patients WHERE id = ?"#)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let total: i64 = query_scalar(r#"SELECT COUNT(*) FROM patients"#)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        count_to_u64(total)
    }
}
