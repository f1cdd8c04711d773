use axum::{extract::Query, Json};

use crate::error::{handle_patient_error, ApiError, ErrorResponse};
use crate::methods::entities::{PaginatedResponse, PatientResponse, PatientSearchQuery};
use crate::methods::routes::PATIENTS_PATH;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = PATIENTS_PATH,
    tag = "patients",
    params(PatientSearchQuery),
    security(("basic_auth" = [])),
    responses(
        (status = 200, description = "One page of matching patients", body = PaginatedResponse<PatientResponse>),
        (status = 401, description = "Missing or bad credentials", body = ErrorResponse),
        (status = 403, description = "USER or ADMIN role required", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse),
    )
)]
pub async fn search_patients(
    axum::extract::State(state): axum::extract::State<AppState>,
    Query(query): Query<PatientSearchQuery>,
) -> Result<Json<PaginatedResponse<PatientResponse>>, ApiError> {
    state
        .patients
        .find_by_keyword(query.keyword(), query.pagination())
        .await
        .map(|result| Json(PaginatedResponse::from(result)))
        .map_err(|e| handle_patient_error(e, &state.env, "search_patients"))
}
