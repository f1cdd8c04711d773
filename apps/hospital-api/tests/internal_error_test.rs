use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use http_body_util::BodyExt;
use mockall::mock;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use hospital_api::router;
use hospital_api::state::AppState;
use hospital_lib::password::{BcryptPasswordHasher, MIN_BCRYPT_COST};
use hospital_lib::repository::errors::RepositoryError;
use hospital_lib::repository::models::PatientRow;
use hospital_lib::repository::traits::PatientRepositoryTrait;
use hospital_lib::repository::InMemoryAccountStore;
use hospital_lib::{AccountService, PaginationParams, Patient, PatientService, ADMIN_ROLE, USER_ROLE};

mock! {
    pub PatientRepo {}

    #[async_trait]
    impl PatientRepositoryTrait for PatientRepo {
        async fn find_by_keyword(&self, keyword: &str, pagination: PaginationParams) -> Result<(Vec<PatientRow>, u64), RepositoryError>;
        async fn find_all(&self) -> Result<Vec<PatientRow>, RepositoryError>;
        async fn find_by_id(&self, id: i64) -> Result<Option<PatientRow>, RepositoryError>;
        async fn insert(&self, patient: &Patient) -> Result<PatientRow, RepositoryError>;
        async fn update(&self, id: i64, patient: &Patient) -> Result<Option<PatientRow>, RepositoryError>;
        async fn delete_by_id(&self, id: i64) -> Result<bool, RepositoryError>;
        async fn count(&self) -> Result<u64, RepositoryError>;
    }
}

fn failing_repo() -> MockPatientRepo {
    let mut repo = MockPatientRepo::new();
    repo.expect_find_by_keyword()
        .returning(|_, _| Err(RepositoryError::Inconsistent("disk on fire".to_string())));
    repo
}

async fn app_with(env: &str, repo: MockPatientRepo) -> axum::Router {
    let accounts = AccountService::new(
        InMemoryAccountStore::new(),
        BcryptPasswordHasher::new(MIN_BCRYPT_COST),
    );
    let password = SecretString::new("1234".to_string());
    accounts.add_new_role(USER_ROLE).await.unwrap();
    accounts.add_new_role(ADMIN_ROLE).await.unwrap();
    accounts
        .add_new_user("admin", &password, "admin@gmail.com", &password)
        .await
        .unwrap();
    accounts.add_role_to_user("admin", ADMIN_ROLE).await.unwrap();

    let patients = PatientService::with_repo(Arc::new(repo));
    router(AppState::new(accounts, patients, env))
}

async fn list_patients(app: axum::Router) -> (StatusCode, Value) {
    let request = Request::builder()
        .uri("/v1/patients")
        .header(
            header::AUTHORIZATION,
            format!("Basic {}", STANDARD.encode("admin:1234")),
        )
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_internal_error_details_hidden_in_prod() {
    let (status, body) = list_patients(app_with("prod01", failing_repo()).await).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal_error");
    assert_eq!(body["message"], "internal server error");
}

#[tokio::test]
async fn test_internal_error_details_shown_outside_prod() {
    let (status, body) = list_patients(app_with("local", failing_repo()).await).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"].as_str().unwrap().contains("disk on fire"));
}

#[tokio::test]
async fn test_forbidden_request_never_reaches_repository() {
    let mut repo = MockPatientRepo::new();
    repo.expect_insert().never();

    let accounts = AccountService::new(
        InMemoryAccountStore::new(),
        BcryptPasswordHasher::new(MIN_BCRYPT_COST),
    );
    let password = SecretString::new("1234".to_string());
    accounts.add_new_role(USER_ROLE).await.unwrap();
    accounts
        .add_new_user("user1", &password, "user1@gmail.com", &password)
        .await
        .unwrap();
    accounts.add_role_to_user("user1", USER_ROLE).await.unwrap();
    let app = router(AppState::new(
        accounts,
        PatientService::with_repo(Arc::new(repo)),
        "local",
    ));

    let request = Request::builder()
        .method("POST")
        .uri("/v1/patients")
        .header(
            header::AUTHORIZATION,
            format!("Basic {}", STANDARD.encode("user1:1234")),
        )
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            r#"{"name":"hassan","birth_date":"2000-11-10","sick":false,"score":5}"#,
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
