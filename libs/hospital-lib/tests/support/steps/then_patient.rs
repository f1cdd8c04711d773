use cucumber::then;

use hospital_lib::PatientServiceError;

use crate::support::world::TestWorld;

#[then(expr = "I should get {int} patient(s)")]
pub async fn patient_count_on_page(world: &mut TestWorld, expected: usize) {
    let page = world
        .page_result
        .as_ref()
        .and_then(|r| r.as_ref().ok())
        .expect("search succeeded");
    assert_eq!(page.items.len(), expected);
}

#[then(expr = "there should be {int} page(s) in total")]
pub async fn total_pages(world: &mut TestWorld, expected: u32) {
    let page = world
        .page_result
        .as_ref()
        .and_then(|r| r.as_ref().ok())
        .expect("search succeeded");
    assert_eq!(page.total_pages, expected);
}

#[then(expr = "the first patient should be {string}")]
pub async fn first_patient(world: &mut TestWorld, name: String) {
    let page = world
        .page_result
        .as_ref()
        .and_then(|r| r.as_ref().ok())
        .expect("search succeeded");
    assert_eq!(page.items.first().map(|p| p.name.as_str()), Some(name.as_str()));
}

#[then("saving should succeed")]
pub async fn saving_succeeded(world: &mut TestWorld) {
    let saved = world
        .save_result
        .as_ref()
        .and_then(|r| r.as_ref().ok())
        .expect("save succeeded");
    assert!(saved.id.is_some());
}

#[then("saving should fail with a validation error")]
pub async fn saving_invalid(world: &mut TestWorld) {
    assert!(matches!(
        world.save_result,
        Some(Err(PatientServiceError::Validation(_)))
    ));
}

#[then("saving should fail with not found")]
pub async fn saving_not_found(world: &mut TestWorld) {
    assert!(matches!(
        world.save_result,
        Some(Err(PatientServiceError::NotFound(_)))
    ));
}

#[then("the delete should succeed")]
pub async fn delete_succeeded(world: &mut TestWorld) {
    assert!(matches!(world.delete_result, Some(Ok(()))));
}

#[then(expr = "there should be {int} stored patient(s)")]
pub async fn stored_count(world: &mut TestWorld, expected: u64) {
    assert_eq!(world.patients.count().await.unwrap(), expected);
}
