use std::fmt;
use std::sync::Arc;

use validator::Validate;

use crate::entities::{Patient, PaginatedResult, PaginationParams};
use crate::errors_service::PatientServiceError;
use crate::repository::models::PatientRow;
use crate::repository::traits::PatientRepositoryTrait;

fn patient_from_row(row: PatientRow) -> Patient {
    Patient {
        id: Some(row.id),
        name: row.name,
        birth_date: row.birth_date,
        sick: row.sick,
        score: row.score,
    }
}

#[derive(Clone)]
pub struct PatientService {
    repo: Arc<dyn PatientRepositoryTrait>,
}

impl fmt::Debug for PatientService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatientService").finish_non_exhaustive()
    }
}

impl PatientService {
    pub fn new<P: PatientRepositoryTrait + 'static>(repo: P) -> Self {
        Self {
            repo: Arc::new(repo),
        }
    }

    pub fn with_repo(repo: Arc<dyn PatientRepositoryTrait>) -> Self {
        Self { repo }
    }

    #[tracing::instrument(skip(self))]
    pub async fn find_by_keyword(
        &self,
        keyword: &str,
        pagination: PaginationParams,
    ) -> Result<PaginatedResult<Patient>, PatientServiceError> {
        let (rows, total) = self.repo.find_by_keyword(keyword, pagination).await?;
        let patients = rows.into_iter().map(patient_from_row).collect();
        Ok(PaginatedResult::new(patients, total, pagination))
    }

    pub async fn find_all(&self) -> Result<Vec<Patient>, PatientServiceError> {
        let rows = self.repo.find_all().await?;
        Ok(rows.into_iter().map(patient_from_row).collect())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Patient>, PatientServiceError> {
        Ok(self.repo.find_by_id(id).await?.map(patient_from_row))
    }

    /// Inserts when `patient.id` is unset, otherwise updates the stored record.
    #[tracing::instrument(skip(self, patient), fields(id = ?patient.id))]
    pub async fn save(&self, patient: &Patient) -> Result<Patient, PatientServiceError> {
        patient.validate()?;

        match patient.id {
            None => {
                let row = self.repo.insert(patient).await?;
                tracing::info!(id = row.id, "patient created");
                Ok(patient_from_row(row))
            }
            Some(id) => {
                let row = self
                    .repo
                    .update(id, patient)
                    .await?
                    .ok_or(PatientServiceError::NotFound(id))?;
                tracing::info!(id, "patient updated");
                Ok(patient_from_row(row))
            }
        }
    }

    /// Deleting an unknown id succeeds without doing anything.
    #[tracing::instrument(skip(self))]
    pub async fn delete_by_id(&self, id: i64) -> Result<(), PatientServiceError> {
        if self.repo.delete_by_id(id).await? {
            tracing::info!(id, "patient deleted");
        } else {
            tracing::debug!(id, "no patient to delete");
        }
        Ok(())
    }

    pub async fn count(&self) -> Result<u64, PatientServiceError> {
        Ok(self.repo.count().await?)
    }
}
