//! End-to-end flows across the project and task registries.

use super::helpers::{Board, board};
use rstest::rstest;
use std::time::Duration;
use trackboard::notification::{NotificationKind, Notifier};
use trackboard::project::domain::{NewProject, ProjectId, ProjectStatus};
use trackboard::remote::RemoteMethod;
use trackboard::task::domain::{NewTask, TaskId, TaskStatus};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_count_follows_creates_and_deletes(board: Board) -> Result<(), eyre::Report> {
    board.projects.fetch_all().await?;
    let beta = ProjectId::new("2");
    board.tasks.fetch_by_project(&beta).await?;

    let mut created = Vec::new();
    for name in ["One", "Two", "Three"] {
        created.push(board.tasks.add(NewTask::new(beta.clone(), name)).await?);
    }
    eyre::ensure!(board.local_count("2")? == 3, "three creates should count three");

    let first = created
        .first()
        .ok_or_else(|| eyre::eyre!("no task created"))?;
    board.tasks.remove(first.id()).await?;

    eyre::ensure!(board.local_count("2")? == 2, "delete should decrement");
    eyre::ensure!(board.stored_count("2")? == 2, "server count should match");
    eyre::ensure!(board.task_ids()?.len() == 2, "two tasks should remain");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_delete_keeps_task_and_count(board: Board) -> Result<(), eyre::Report> {
    board.projects.fetch_all().await?;
    board.tasks.fetch_by_project(&ProjectId::new("1")).await?;
    board.remote.fail_next(RemoteMethod::Delete, 1)?;

    let result = board.tasks.remove(&TaskId::new("12")).await;

    eyre::ensure!(result.is_err(), "delete should fail");
    eyre::ensure!(board.task_ids()? == ["11", "12", "13"], "task should be back in place");
    eyre::ensure!(board.local_count("1")? == 3, "count must not move");
    eyre::ensure!(board.stored_count("1")? == 3, "server count must not move");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_count_persist_rolls_back_only_the_count(board: Board) -> Result<(), eyre::Report> {
    board.projects.fetch_all().await?;
    board.tasks.fetch_by_project(&ProjectId::new("1")).await?;
    board.remote.fail_next(RemoteMethod::Put, 1)?;

    let created = board.tasks.add(NewTask::new(ProjectId::new("1"), "Ship")).await?;

    eyre::ensure!(
        board.tasks.get(created.id())?.is_some(),
        "confirmed task should stay"
    );
    eyre::ensure!(board.local_count("1")? == 3, "count change should be compensated");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn drag_reorder_is_restored_on_next_fetch(board: Board) -> Result<(), eyre::Report> {
    let alpha = ProjectId::new("1");
    board.tasks.fetch_by_project(&alpha).await?;

    let committed = board
        .tasks
        .drop_onto(&alpha, &TaskId::new("13"), &TaskId::new("11"))?;
    eyre::ensure!(committed, "drop should commit");

    board.tasks.fetch_all().await?;
    board.tasks.fetch_by_project(&alpha).await?;

    eyre::ensure!(
        board.task_ids()? == ["13", "11", "12"],
        "manual order should survive a refetch, got {:?}",
        board.task_ids()?
    );
    Ok(())
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn failures_surface_as_error_notifications(board: Board) -> Result<(), eyre::Report> {
    let notifier = Notifier::default();
    board.tasks.fetch_by_project(&ProjectId::new("1")).await?;
    board.remote.fail_next(RemoteMethod::Patch, 1)?;

    match board
        .tasks
        .set_status(&TaskId::new("11"), TaskStatus::Done)
        .await
    {
        Ok(()) => notifier.notify("Status updated", NotificationKind::Success),
        Err(err) => notifier.notify(
            format!("Could not update status: {err}"),
            NotificationKind::Error,
        ),
    }

    let shown = notifier
        .current()
        .ok_or_else(|| eyre::eyre!("a notification should be shown"))?;
    eyre::ensure!(shown.kind() == NotificationKind::Error, "failure should notify an error");

    tokio::time::sleep(notifier.ttl() + Duration::from_millis(1)).await;
    eyre::ensure!(notifier.current().is_none(), "notification should auto-clear");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_delete_never_drives_count_negative(board: Board) -> Result<(), eyre::Report> {
    let project = board.projects.add(NewProject::new("Launch")).await?;
    eyre::ensure!(
        project.status() == &ProjectStatus::Active,
        "new projects start active"
    );
    board.tasks.fetch_by_project(project.id()).await?;

    let task = board
        .tasks
        .add(NewTask::new(project.id().clone(), "Announce"))
        .await?;
    eyre::ensure!(board.local_count(project.id().as_str())? == 1, "one task");

    board.tasks.remove(task.id()).await?;
    board.tasks.remove(task.id()).await?;

    eyre::ensure!(board.local_count(project.id().as_str())? == 0, "back to zero");
    eyre::ensure!(board.stored_count(project.id().as_str())? == 0, "server at zero");
    Ok(())
}
