use cucumber::when;

use hospital_lib::{PaginationParams, Patient};

use crate::support::steps::given::birth_date;
use crate::support::world::TestWorld;

#[when(expr = "I search for {string} on page {int} with size {int}")]
pub async fn search(world: &mut TestWorld, keyword: String, page: u32, size: u32) {
    let result = world
        .patients
        .find_by_keyword(&keyword, PaginationParams::new(Some(page), Some(size)))
        .await;
    world.page_result = Some(result);
}

#[when(expr = "I save a patient named {string} with score {int}")]
pub async fn save_patient(world: &mut TestWorld, name: String, score: i32) {
    let patient = Patient::new(name, birth_date(), true, score);
    world.save_result = Some(world.patients.save(&patient).await);
}

#[when(expr = "I update patient {int} named {string}")]
pub async fn update_patient(world: &mut TestWorld, id: i64, name: String) {
    let mut patient = Patient::new(name, birth_date(), false, 50);
    patient.id = Some(id);
    world.save_result = Some(world.patients.save(&patient).await);
}

#[when(expr = "I delete patient {int}")]
pub async fn delete_patient(world: &mut TestWorld, id: i64) {
    world.delete_result = Some(world.patients.delete_by_id(id).await);
}
