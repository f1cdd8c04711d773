use chrono::NaiveDate;
use cucumber::gherkin::Step;
use cucumber::given;
use secrecy::SecretString;

use hospital_lib::repository::traits::PatientRepositoryTrait;
use hospital_lib::Patient;

use crate::support::world::TestWorld;

pub fn birth_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2000, 11, 10).unwrap()
}

#[given("an empty account store")]
pub async fn empty_account_store(world: &mut TestWorld) {
    *world = TestWorld::new();
}

#[given(expr = "a role {string} exists")]
pub async fn role_exists(world: &mut TestWorld, name: String) {
    world.accounts.add_new_role(&name).await.unwrap();
}

#[given(expr = "a user {string} registered with password {string}")]
pub async fn user_registered(world: &mut TestWorld, username: String, password: String) {
    let password = SecretString::new(password);
    world
        .accounts
        .add_new_user(&username, &password, &format!("{username}@gmail.com"), &password)
        .await
        .unwrap();
}

#[given(expr = "user {string} has role {string}")]
pub async fn user_has_role(world: &mut TestWorld, username: String, role: String) {
    world.accounts.add_role_to_user(&username, &role).await.unwrap();
}

// Stored through the repository so short fixture names skip validation.
#[given(expr = "a stored patient {string}")]
pub async fn stored_patient(world: &mut TestWorld, name: String) {
    world
        .patient_repo
        .insert(&Patient::new(name, birth_date(), true, 80))
        .await
        .unwrap();
}

#[given("the following patients are stored:")]
pub async fn patients_stored(world: &mut TestWorld, step: &Step) {
    let table = step.table.as_ref().expect("table expected");
    for row in table.rows.iter().skip(1) {
        let name = row[0].clone();
        let score: i32 = row[1].parse().expect("numeric score");
        world
            .patient_repo
            .insert(&Patient::new(name, birth_date(), false, score))
            .await
            .unwrap();
    }
}
