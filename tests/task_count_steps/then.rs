//! Then steps for task count BDD scenarios.

use super::world::TaskCountWorld;
use rstest_bdd_macros::then;
use serde_json::Value;
use trackboard::preferences::{PreferenceStore, keys};
use trackboard::remote::Resource;
use trackboard::remote::record::field_identifier;

fn local_count(world: &TaskCountWorld) -> Result<u32, eyre::Report> {
    let project_id = world.project()?;
    world
        .projects
        .get(&project_id)?
        .map(|project| project.task_count())
        .ok_or_else(|| eyre::eyre!("project {project_id} not loaded"))
}

#[then("the project task count is {count:u32}")]
fn project_task_count_is(world: &TaskCountWorld, count: u32) -> Result<(), eyre::Report> {
    let found = local_count(world)?;
    eyre::ensure!(found == count, "expected task count {count}, found {found}");
    Ok(())
}

#[then("the server agrees on the task count")]
fn server_agrees(world: &TaskCountWorld) -> Result<(), eyre::Report> {
    let project_id = world.project()?;
    let stored = world
        .remote
        .records(Resource::Projects)?
        .into_iter()
        .find(|record| field_identifier(record, "id").as_deref() == Some(project_id.as_str()))
        .and_then(|record| record.get("taskCount").and_then(Value::as_u64))
        .ok_or_else(|| eyre::eyre!("project {project_id} not stored"))?;
    let local = u64::from(local_count(world)?);
    eyre::ensure!(stored == local, "server holds {stored}, client holds {local}");
    Ok(())
}

#[then("the deletion is reported as failed")]
fn deletion_failed(world: &TaskCountWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_delete_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing delete result in scenario world"))?;
    eyre::ensure!(result.is_err(), "expected the deletion to fail");
    eyre::ensure!(
        world.tasks.tasks()?.len() == 2,
        "the failed deletion should leave both tasks"
    );
    Ok(())
}

#[then(r#"the project tasks are ordered "{names}""#)]
fn tasks_are_ordered(world: &TaskCountWorld, names: String) -> Result<(), eyre::Report> {
    let expected: Vec<String> = names.split_whitespace().map(str::to_owned).collect();
    let found: Vec<String> = world
        .tasks
        .tasks()?
        .iter()
        .map(|task| task.name().to_owned())
        .collect();
    eyre::ensure!(found == expected, "expected order {expected:?}, found {found:?}");
    Ok(())
}

#[then("the manual order is persisted")]
fn manual_order_persisted(world: &TaskCountWorld) -> Result<(), eyre::Report> {
    let project_id = world.project()?;
    let stored = world
        .preferences
        .get(&keys::task_order(project_id.as_str()))
        .ok_or_else(|| eyre::eyre!("no manual order stored for {project_id}"))?;
    let shown: Vec<String> = world
        .tasks
        .tasks()?
        .iter()
        .map(|task| task.id().to_string())
        .collect();
    let persisted: Vec<String> = serde_json::from_str(&stored)?;
    eyre::ensure!(persisted == shown, "persisted {persisted:?}, shown {shown:?}");
    Ok(())
}
