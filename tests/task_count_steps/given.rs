//! Given steps for task count BDD scenarios.

use super::world::{TaskCountWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use trackboard::project::domain::NewProject;
use trackboard::task::domain::NewTask;

#[given(r#"a project named "{name}" with no tasks"#)]
fn project_with_no_tasks(world: &mut TaskCountWorld, name: String) -> Result<(), eyre::Report> {
    let created = run_async(world.projects.add(NewProject::new(name)))
        .wrap_err("create scenario project")?;
    run_async(world.tasks.fetch_by_project(created.id())).wrap_err("load project tasks")?;
    world.project_id = Some(created.id().clone());
    Ok(())
}

#[given(r#"the project has tasks "{names}""#)]
fn project_has_tasks(world: &mut TaskCountWorld, names: String) -> Result<(), eyre::Report> {
    let project_id = world.project()?;
    for name in names.split_whitespace() {
        let created = run_async(world.tasks.add(NewTask::new(project_id.clone(), name)))
            .wrap_err_with(|| format!("create task {name}"))?;
        world.task_names.insert(name.to_owned(), created.id().clone());
    }
    Ok(())
}
