use cucumber::then;

use hospital_lib::password::{BcryptPasswordHasher, PasswordHasher, MIN_BCRYPT_COST};
use hospital_lib::{AccountServiceError, AuthenticationError};

use crate::support::world::TestWorld;

#[then("the registration should succeed")]
pub async fn registration_succeeded(world: &mut TestWorld) {
    let result = world.user_result.as_ref().expect("registration attempted");
    assert!(result.is_ok(), "registration failed: {result:?}");
}

#[then(expr = "the password {string} should verify against the stored hash")]
pub async fn password_verifies(world: &mut TestWorld, password: String) {
    let user = world
        .user_result
        .as_ref()
        .and_then(|r| r.as_ref().ok())
        .expect("registered user");
    let stored = world
        .accounts
        .load_user_by_username(&user.username)
        .await
        .unwrap()
        .expect("stored user");
    let hasher = BcryptPasswordHasher::new(MIN_BCRYPT_COST);
    assert!(hasher.verify(&password, &stored.password_hash).unwrap());
}

#[then("the registration should fail with a duplicate error")]
pub async fn registration_duplicate(world: &mut TestWorld) {
    assert!(matches!(
        world.user_result,
        Some(Err(AccountServiceError::DuplicateEntity(_)))
    ));
}

#[then("the registration should fail with a validation error")]
pub async fn registration_invalid(world: &mut TestWorld) {
    assert!(matches!(
        world.user_result,
        Some(Err(AccountServiceError::Validation(_)))
    ));
}

#[then(expr = "user {string} should have roles {string}")]
pub async fn user_has_roles(world: &mut TestWorld, username: String, roles: String) {
    let user = world
        .accounts
        .load_user_by_username(&username)
        .await
        .unwrap()
        .expect("user exists");
    let actual: Vec<&str> = user.roles.iter().map(|r| r.name.as_str()).collect();
    let expected: Vec<&str> = roles.split(',').map(str::trim).collect();
    assert_eq!(actual, expected);
}

#[then(expr = "user {string} should have no roles")]
pub async fn user_has_no_roles(world: &mut TestWorld, username: String) {
    let user = world
        .accounts
        .load_user_by_username(&username)
        .await
        .unwrap()
        .expect("user exists");
    assert!(user.roles.is_empty());
}

#[then("the role operation should fail with not found")]
pub async fn role_op_not_found(world: &mut TestWorld) {
    assert!(matches!(
        world.role_op_result,
        Some(Err(AccountServiceError::NotFound(_)))
    ));
}

#[then("authentication should succeed")]
pub async fn authentication_succeeded(world: &mut TestWorld) {
    assert!(matches!(world.auth_result, Some(Ok(_))));
}

#[then("authentication should fail with bad credentials")]
pub async fn authentication_bad_credentials(world: &mut TestWorld) {
    assert!(matches!(
        world.auth_result,
        Some(Err(AuthenticationError::BadCredentials))
    ));
}
