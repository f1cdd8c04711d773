use axum::{Extension, Json};

use hospital_lib::Principal;

use crate::error::ErrorResponse;
use crate::methods::entities::PrincipalResponse;
use crate::methods::routes::ME_PATH;

#[utoipa::path(
    get,
    path = ME_PATH,
    tag = "users",
    security(("basic_auth" = [])),
    responses(
        (status = 200, description = "The authenticated caller", body = PrincipalResponse),
        (status = 401, description = "Missing or bad credentials", body = ErrorResponse),
    )
)]
pub async fn me(Extension(principal): Extension<Principal>) -> Json<PrincipalResponse> {
    Json(PrincipalResponse::from(principal))
}
