// API v1 routes (nested under /v1)
pub const PATIENTS_PATH: &str = "/patients";
pub const PATIENT_BY_ID_PATH: &str = "/patients/{id}";
pub const ROLES_PATH: &str = "/roles";
pub const USERS_PATH: &str = "/users";
pub const USER_BY_USERNAME_PATH: &str = "/users/{username}";
pub const USER_ROLE_PATH: &str = "/users/{username}/roles/{role}";
pub const ME_PATH: &str = "/me";

// Root-level service routes (not versioned)
pub const SERVICE_HEALTH_PATH: &str = "/health";
pub const SERVICE_DOCS_PATH: &str = "/docs";
pub const OPENAPI_JSON_PATH: &str = "/api-doc/openapi.json";

// API version prefix
pub const API_V1_PREFIX: &str = "/v1";
