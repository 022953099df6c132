//! Preferences and configuration surviving a restart.

use std::sync::Arc;
use std::time::Duration;

use super::helpers::{Board, seeded_remote};
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;
use trackboard::config::TrackerConfig;
use trackboard::notification::Notifier;
use trackboard::ordering::SortDirection;
use trackboard::preferences::adapters::JsonFilePreferenceStore;
use trackboard::project::domain::{ProjectId, ProjectSortKey};
use trackboard::remote::adapters::http::HttpRemoteCollection;
use trackboard::remote::adapters::memory::InMemoryRemoteCollection;
use trackboard::remote::{Resource, ResourcePath};
use trackboard::task::domain::TaskId;

fn utf8(dir: &TempDir, name: &str) -> Result<Utf8PathBuf, eyre::Report> {
    Utf8PathBuf::from_path_buf(dir.path().join(name))
        .map_err(|path| eyre::eyre!("non UTF-8 temp path: {}", path.display()))
}

fn open_board(remote: &InMemoryRemoteCollection, path: &Utf8Path) -> Result<Board, eyre::Report> {
    let store = JsonFilePreferenceStore::open(path)?;
    Ok(Board::new(remote.clone(), Arc::new(store)))
}

#[tokio::test(flavor = "multi_thread")]
async fn sort_and_manual_order_survive_restart() -> Result<(), eyre::Report> {
    let dir = TempDir::new()?;
    let path = utf8(&dir, "prefs.json")?;
    let remote = seeded_remote()?;
    let alpha = ProjectId::new("1");

    let first = open_board(&remote, &path)?;
    first.projects.sort(ProjectSortKey::Name, false)?;
    first.projects.sort(ProjectSortKey::Name, false)?;
    first.tasks.fetch_by_project(&alpha).await?;
    eyre::ensure!(
        first
            .tasks
            .drop_onto(&alpha, &TaskId::new("12"), &TaskId::new("11"))?,
        "drop should commit"
    );
    drop(first);

    let second = open_board(&remote, &path)?;
    let preference = second.projects.sort_preference()?;
    eyre::ensure!(preference.key() == ProjectSortKey::Name, "sort key restored");
    eyre::ensure!(
        preference.direction() == SortDirection::Descending,
        "sort direction restored"
    );

    second.projects.fetch_all().await?;
    let names: Vec<String> = second
        .projects
        .projects()?
        .iter()
        .map(|project| project.name().to_owned())
        .collect();
    eyre::ensure!(names == ["Beta", "Alpha"], "fetch should apply restored sort");

    second.tasks.fetch_by_project(&alpha).await?;
    eyre::ensure!(
        second.task_ids()? == ["12", "11", "13"],
        "manual order restored, got {:?}",
        second.task_ids()?
    );
    Ok(())
}

#[test]
fn configuration_drives_adapters() -> Result<(), eyre::Report> {
    let dir = TempDir::new()?;
    let path = utf8(&dir, "trackboard.json")?;
    std::fs::write(
        &path,
        r#"{"api_base_url": "https://tracker.example/api/", "notification_ttl_ms": 1500}"#,
    )?;

    let config = TrackerConfig::load(&path)?;
    let remote = HttpRemoteCollection::from_config(&config);
    let notifier = Notifier::from_config(&config);

    eyre::ensure!(
        remote.url(&ResourcePath::item(Resource::Tasks, "7"))
            == "https://tracker.example/api/tasks/7",
        "base URL should be joined without a double slash"
    );
    eyre::ensure!(
        notifier.ttl() == Duration::from_millis(1500),
        "ttl should come from configuration"
    );
    eyre::ensure!(config.retry().max_attempts() == 1, "retry should default");
    Ok(())
}

#[test]
fn missing_configuration_file_yields_defaults() -> Result<(), eyre::Report> {
    let dir = TempDir::new()?;
    let config = TrackerConfig::load(&utf8(&dir, "absent.json")?)?;

    eyre::ensure!(config == TrackerConfig::default(), "defaults expected");
    eyre::ensure!(
        Notifier::from_config(&config).ttl() == Duration::from_secs(3),
        "default window is three seconds"
    );
    Ok(())
}
