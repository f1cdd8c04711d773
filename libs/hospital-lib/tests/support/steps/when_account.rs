use cucumber::when;
use secrecy::SecretString;

use crate::support::world::TestWorld;

#[when(expr = "I register user {string} with password {string} and confirmation {string}")]
pub async fn register_user(
    world: &mut TestWorld,
    username: String,
    password: String,
    confirmation: String,
) {
    let result = world
        .accounts
        .add_new_user(
            &username,
            &SecretString::new(password),
            &format!("{username}@gmail.com"),
            &SecretString::new(confirmation),
        )
        .await;
    world.user_result = Some(result);
}

#[when(expr = "I grant role {string} to {string}")]
pub async fn grant_role(world: &mut TestWorld, role: String, username: String) {
    world.role_op_result = Some(world.accounts.add_role_to_user(&username, &role).await);
}

#[when(expr = "I revoke role {string} from {string}")]
pub async fn revoke_role(world: &mut TestWorld, role: String, username: String) {
    world.role_op_result = Some(world.accounts.remove_role_from_user(&username, &role).await);
}

#[when(expr = "{string} signs in with password {string}")]
pub async fn sign_in(world: &mut TestWorld, username: String, password: String) {
    let result = world
        .authenticator
        .authenticate(&username, &SecretString::new(password))
        .await;
    world.auth_result = Some(result);
}
