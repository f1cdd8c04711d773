use axum::{http::StatusCode, Json};

use crate::error::{handle_patient_error, ApiError, ErrorResponse};
use crate::methods::entities::{PatientRequest, PatientResponse};
use crate::methods::routes::PATIENTS_PATH;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = PATIENTS_PATH,
    tag = "patients",
    request_body = PatientRequest,
    security(("basic_auth" = [])),
    responses(
        (status = 201, description = "Patient created", body = PatientResponse),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Missing or bad credentials", body = ErrorResponse),
        (status = 403, description = "ADMIN role required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
pub async fn create_patient(
    axum::extract::State(state): axum::extract::State<AppState>,
    Json(payload): Json<PatientRequest>,
) -> Result<(StatusCode, Json<PatientResponse>), ApiError> {
    let patient = payload.into_patient(None);

    state
        .patients
        .save(&patient)
        .await
        .map(|saved| (StatusCode::CREATED, Json(PatientResponse::from(saved))))
        .map_err(|e| handle_patient_error(e, &state.env, "create_patient"))
}
