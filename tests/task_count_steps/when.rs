//! When steps for task count BDD scenarios.

use super::world::{TaskCountWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use trackboard::remote::RemoteMethod;
use trackboard::task::domain::NewTask;

#[when("{count:usize} tasks are added to the project")]
fn tasks_are_added(world: &mut TaskCountWorld, count: usize) -> Result<(), eyre::Report> {
    let project_id = world.project()?;
    for index in 0..count {
        run_async(
            world
                .tasks
                .add(NewTask::new(project_id.clone(), format!("Task {index}"))),
        )
        .wrap_err("add scenario task")?;
    }
    Ok(())
}

#[when("one task of the project is deleted")]
fn one_task_is_deleted(world: &mut TaskCountWorld) -> Result<(), eyre::Report> {
    let victim = world
        .tasks
        .tasks()?
        .into_iter()
        .next()
        .ok_or_else(|| eyre::eyre!("no task to delete"))?;
    run_async(world.tasks.remove(victim.id())).wrap_err("delete scenario task")?;
    Ok(())
}

#[when("deleting a task of the project fails")]
fn deleting_a_task_fails(world: &mut TaskCountWorld) -> Result<(), eyre::Report> {
    let victim = world
        .tasks
        .tasks()?
        .into_iter()
        .next()
        .ok_or_else(|| eyre::eyre!("no task to delete"))?;
    world.remote.fail_next(RemoteMethod::Delete, 1)?;
    world.last_delete_result = Some(run_async(world.tasks.remove(victim.id())));
    Ok(())
}

#[when(r#"task "{dragged}" is dropped onto task "{target}""#)]
fn task_is_dropped(
    world: &mut TaskCountWorld,
    dragged: String,
    target: String,
) -> Result<(), eyre::Report> {
    let project_id = world.project()?;
    let committed = world.tasks.drop_onto(
        &project_id,
        &world.task_named(&dragged)?,
        &world.task_named(&target)?,
    )?;
    eyre::ensure!(committed, "drop of {dragged} onto {target} was rejected");
    Ok(())
}
