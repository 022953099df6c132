//! Concurrent task mutations against shared project counts.

use std::sync::Arc;
use std::time::Duration;

use super::helpers::{Board, board};
use rstest::rstest;
use trackboard::project::domain::ProjectId;
use trackboard::task::domain::NewTask;

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_count_every_task(board: Board) -> Result<(), eyre::Report> {
    board.projects.fetch_all().await?;
    board.remote.set_latency(Duration::from_millis(2))?;

    let handles: Vec<_> = (0..12)
        .map(|index| {
            let tasks = Arc::clone(&board.tasks);
            let project = if index < 6 { "1" } else { "2" };
            tokio::spawn(async move {
                tasks
                    .add(NewTask::new(ProjectId::new(project), format!("task {index}")))
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await??;
    }

    eyre::ensure!(board.local_count("1")? == 9, "project 1 gains six");
    eyre::ensure!(board.local_count("2")? == 6, "project 2 gains six");
    eyre::ensure!(board.stored_count("1")? == 9, "server agrees for project 1");
    eyre::ensure!(board.stored_count("2")? == 6, "server agrees for project 2");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_deletes_never_drive_count_negative(board: Board) -> Result<(), eyre::Report> {
    board.projects.fetch_all().await?;
    let alpha = ProjectId::new("1");
    board.tasks.fetch_by_project(&alpha).await?;
    let loaded = board.tasks.tasks()?;

    let handles: Vec<_> = loaded
        .into_iter()
        .map(|task| {
            let tasks = Arc::clone(&board.tasks);
            tokio::spawn(async move { tasks.remove(task.id()).await })
        })
        .collect();
    for handle in handles {
        handle.await??;
    }

    eyre::ensure!(board.task_ids()?.is_empty(), "all tasks removed");
    eyre::ensure!(board.local_count("1")? == 0, "count reaches zero");
    Ok(())
}
