pub mod config;
pub mod constants;
pub mod error;
pub mod methods;
pub mod middleware;
pub mod shutdown;
pub mod state;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::MiddlewareConfig;
use crate::error::ErrorResponse;
use crate::methods::create_patient::{__path_create_patient, create_patient};
use crate::methods::create_role::{__path_create_role, create_role};
use crate::methods::create_user::{__path_create_user, create_user};
use crate::methods::delete_patient::{__path_delete_patient, delete_patient};
use crate::methods::entities::{
    CreateRoleRequest, CreateUserRequest, PaginatedResponse, PatientRequest, PatientResponse,
    PrincipalResponse, RoleResponse, UserResponse,
};
use crate::methods::get_patient::{__path_get_patient, get_patient};
use crate::methods::get_roles::{__path_get_roles, get_roles};
use crate::methods::get_user::{__path_get_user, get_user};
use crate::methods::health_check::{__path_health_check, health_check};
use crate::methods::me::{__path_me, me};
use crate::methods::routes::{
    API_V1_PREFIX, ME_PATH, OPENAPI_JSON_PATH, PATIENTS_PATH, PATIENT_BY_ID_PATH, ROLES_PATH,
    SERVICE_DOCS_PATH, SERVICE_HEALTH_PATH, USERS_PATH, USER_BY_USERNAME_PATH, USER_ROLE_PATH,
};
use crate::methods::search_patients::{__path_search_patients, search_patients};
use crate::methods::update_patient::{__path_update_patient, update_patient};
use crate::methods::user_roles::{
    __path_add_role_to_user, __path_remove_role_from_user, add_role_to_user, remove_role_from_user,
};
use crate::middleware::auth::{authenticate, require_admin, require_user};
use crate::state::AppState;

struct BasicAuthScheme;

impl Modify for BasicAuthScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "basic_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        search_patients, get_patient, create_patient, update_patient, delete_patient,
        create_role, get_roles,
        create_user, get_user, add_role_to_user, remove_role_from_user, me
    ),
    components(schemas(
        PatientRequest, PatientResponse, PaginatedResponse<PatientResponse>,
        CreateRoleRequest, RoleResponse,
        CreateUserRequest, UserResponse, PrincipalResponse,
        ErrorResponse
    )),
    modifiers(&BasicAuthScheme),
    tags(
        (name = "patients", description = "Patient records"),
        (name = "roles", description = "Role management endpoints"),
        (name = "users", description = "User accounts and role grants")
    )
)]
pub struct ApiDoc;

/// Routes of the service with authentication and role guards, without the
/// transport middleware.
pub fn router(state: AppState) -> Router {
    // Readable by USER and ADMIN
    let read_routes = Router::new()
        .route(PATIENTS_PATH, get(search_patients))
        .route(PATIENT_BY_ID_PATH, get(get_patient))
        .route_layer(from_fn(require_user));

    // ADMIN only
    let admin_routes = Router::new()
        .route(PATIENTS_PATH, post(create_patient))
        .route(
            PATIENT_BY_ID_PATH,
            axum::routing::put(update_patient).delete(delete_patient),
        )
        .route(ROLES_PATH, get(get_roles).post(create_role))
        .route(USERS_PATH, post(create_user))
        .route(USER_BY_USERNAME_PATH, get(get_user))
        .route(
            USER_ROLE_PATH,
            post(add_role_to_user).delete(remove_role_from_user),
        )
        .route_layer(from_fn(require_admin));

    // Every v1 route needs credentials; role guards run after authentication.
    let v1_routes = Router::new()
        .route(ME_PATH, get(me))
        .merge(read_routes)
        .merge(admin_routes)
        .route_layer(from_fn_with_state(state.clone(), authenticate));

    let root_routes = Router::new()
        .route(SERVICE_HEALTH_PATH, get(health_check))
        .merge(SwaggerUi::new(SERVICE_DOCS_PATH).url(OPENAPI_JSON_PATH, ApiDoc::openapi()));

    Router::new()
        .nest(API_V1_PREFIX, v1_routes)
        .merge(root_routes)
        .with_state(state)
}

fn cors_layer(config: &MiddlewareConfig) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let headers = [
        header::CONTENT_TYPE,
        header::AUTHORIZATION,
        HeaderName::from_static("x-request-id"),
    ];

    if config.allows_any_origin() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(headers)
    } else {
        let origins: Vec<_> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(headers)
    }
}

// ============================================
// Middleware stack (applied inner to outer)
// Order: Request → Timeout → CORS → Body Limit → Request ID → Trace → Handler
// Rate limiting sits outside and is added by the binary, it needs peer addresses.
// ============================================
pub fn apply_middleware(app: Router, config: &MiddlewareConfig) -> Router {
    let x_request_id = HeaderName::from_static("x-request-id");

    app.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(tracing::Level::DEBUG))
            .on_response(DefaultOnResponse::new().level(tracing::Level::DEBUG)),
    )
    .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
    .layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid))
    .layer(RequestBodyLimitLayer::new(config.max_body_size))
    .layer(cors_layer(config))
    // Returns 408 Request Timeout
    .layer(TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        config.request_timeout,
    ))
}
