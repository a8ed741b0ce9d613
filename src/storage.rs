use crate::errors::{AppError, LedgerError};
use crate::ledger::SnapshotSink;
use crate::models::LedgerSnapshot;
use crate::profile::AthleteProfile;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

pub fn resolve_data_path() -> PathBuf {
    env_path("LEDGER_DATA_PATH", "data/ledger.json")
}

pub fn resolve_profile_path() -> PathBuf {
    env_path("PROFILE_DATA_PATH", "data/profile.json")
}

fn env_path(var: &str, default: &str) -> PathBuf {
    match env::var(var) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => PathBuf::from(default),
    }
}

pub fn parse_snapshot(bytes: &[u8]) -> Result<LedgerSnapshot, LedgerError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Loads the ledger. A missing file is an empty ledger; an unreadable or
/// malformed one is logged and discarded.
pub async fn load_snapshot(path: &Path) -> LedgerSnapshot {
    match read_json(path, parse_snapshot).await {
        Some(snapshot) => {
            info!(weeks = snapshot.len(), "loaded ledger from {}", path.display());
            snapshot
        }
        None => LedgerSnapshot::default(),
    }
}

pub async fn persist_snapshot(path: &Path, snapshot: &LedgerSnapshot) -> Result<(), AppError> {
    write_json(path, snapshot).await
}

pub async fn load_profile(path: &Path) -> AthleteProfile {
    read_json(path, |bytes| serde_json::from_slice(bytes).map_err(LedgerError::from))
        .await
        .unwrap_or_default()
}

pub async fn persist_profile(path: &Path, profile: &AthleteProfile) -> Result<(), AppError> {
    write_json(path, profile).await
}

async fn read_json<T>(
    path: &Path,
    parse: impl FnOnce(&[u8]) -> Result<T, LedgerError>,
) -> Option<T> {
    match fs::read(path).await {
        Ok(bytes) => match parse(&bytes) {
            Ok(data) => Some(data),
            Err(err) => {
                error!("failed to parse {}: {err}", path.display());
                None
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => {
            error!("failed to read {}: {err}", path.display());
            None
        }
    }
}

/// Writes to a sibling staging file, syncs it, then renames it over `path`.
/// A crash mid-write leaves the previous file intact.
async fn write_json<T: serde::Serialize>(path: &Path, data: &T) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    let staging = staging_path(path);
    let mut file = fs::File::create(&staging).await?;
    file.write_all(&payload).await?;
    file.sync_all().await?;
    drop(file);
    fs::rename(&staging, path).await?;
    Ok(())
}

pub fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

enum WriterMessage {
    Save(LedgerSnapshot),
    Close,
}

/// Writes ledger snapshots to a JSON file from a background task.
///
/// `save` only queues the snapshot. The writer drains the queue and writes
/// the newest snapshot it has seen, so a burst of edits costs one write.
#[derive(Clone)]
pub struct FileSink {
    tx: mpsc::UnboundedSender<WriterMessage>,
}

/// Handle on the writer task behind a [`FileSink`].
pub struct SinkWriter {
    tx: mpsc::UnboundedSender<WriterMessage>,
    task: JoinHandle<()>,
}

impl FileSink {
    /// Starts the writer task. Must be called inside a tokio runtime.
    pub fn spawn(path: PathBuf) -> (Self, SinkWriter) {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_writer(path, rx));
        (Self { tx: tx.clone() }, SinkWriter { tx, task })
    }
}

impl SnapshotSink for FileSink {
    fn save(&self, snapshot: &LedgerSnapshot) {
        if self.tx.send(WriterMessage::Save(snapshot.clone())).is_err() {
            warn!("ledger writer has stopped; snapshot dropped");
        }
    }
}

impl SinkWriter {
    /// Writes every snapshot queued so far, then stops the writer. Snapshots
    /// saved afterwards are dropped.
    pub async fn shutdown(self) {
        if self.tx.send(WriterMessage::Close).is_err() {
            warn!("ledger writer already stopped");
        }
        if let Err(err) = self.task.await {
            error!("ledger writer task failed: {err}");
        }
    }
}

async fn run_writer(path: PathBuf, mut rx: mpsc::UnboundedReceiver<WriterMessage>) {
    while let Some(WriterMessage::Save(mut snapshot)) = rx.recv().await {
        let mut closing = false;
        while let Ok(message) = rx.try_recv() {
            match message {
                WriterMessage::Save(newer) => snapshot = newer,
                WriterMessage::Close => {
                    closing = true;
                    break;
                }
            }
        }
        if let Err(err) = persist_snapshot(&path, &snapshot).await {
            error!("failed to persist ledger: {}", err.message);
        }
        if closing {
            break;
        }
    }
    debug!("ledger writer stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Ledger;
    use crate::models::{Category, Day, FactorValue};
    use crate::week::WeekKey;
    use std::time::Duration;

    const SNAPSHOT: &str = r#"{
        "2024-05-06": {
            "Monday": { "positives": { "mobility20": true }, "negatives": {} },
            "Tuesday": { "positives": { "shake30": true }, "negatives": { "practiceHours": 3 } }
        }
    }"#;

    #[test]
    fn parses_the_persisted_shape() {
        let snapshot = parse_snapshot(SNAPSHOT.as_bytes()).unwrap();
        let key = WeekKey::parse("2024-05-06").unwrap();
        let ledger = Ledger::with_snapshot(snapshot, |_: &LedgerSnapshot| {});
        assert_eq!(ledger.day_score(key, Day::Monday), 1);
        assert_eq!(ledger.day_score(key, Day::Tuesday), -2);
        assert_eq!(
            ledger.get_value(key, Day::Tuesday, Category::Negative, "practiceHours"),
            FactorValue::Count(3)
        );
    }

    #[test]
    fn rejects_unknown_day_names_and_non_monday_keys() {
        let bad_day = r#"{ "2024-05-06": { "Funday": { "positives": {}, "negatives": {} } } }"#;
        assert!(matches!(
            parse_snapshot(bad_day.as_bytes()),
            Err(LedgerError::MalformedSnapshot(_))
        ));
        let bad_key = r#"{ "2024-05-07": {} }"#;
        assert!(parse_snapshot(bad_key.as_bytes()).is_err());
    }

    #[tokio::test]
    async fn missing_or_malformed_files_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(load_snapshot(&missing).await.is_empty());

        let garbage = dir.path().join("garbage.json");
        tokio::fs::write(&garbage, b"{ not json").await.unwrap();
        assert!(load_snapshot(&garbage).await.is_empty());
        assert!(load_profile(&garbage).await.needs_name());
    }

    #[tokio::test]
    async fn snapshot_and_profile_survive_a_round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let ledger_path = dir.path().join("nested/ledger.json");
        let snapshot = parse_snapshot(SNAPSHOT.as_bytes()).unwrap();
        persist_snapshot(&ledger_path, &snapshot).await.unwrap();
        assert_eq!(load_snapshot(&ledger_path).await, snapshot);

        let profile_path = dir.path().join("profile.json");
        let mut profile = AthleteProfile::default();
        profile.set_name("Alex").unwrap();
        persist_profile(&profile_path, &profile).await.unwrap();
        assert_eq!(load_profile(&profile_path).await.name(), Some("Alex"));
    }

    #[tokio::test]
    async fn file_sink_writes_in_the_background() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let (sink, _writer) = FileSink::spawn(path.clone());
        let mut ledger = Ledger::new(sink);
        let key = WeekKey::parse("2024-05-06").unwrap();
        ledger
            .set_value(key, Day::Monday, Category::Positive, "mobility20", true)
            .unwrap();

        let mut loaded = load_snapshot(&path).await;
        for _ in 0..50 {
            if loaded == *ledger.snapshot() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
            loaded = load_snapshot(&path).await;
        }
        assert_eq!(loaded, *ledger.snapshot());
    }

    #[tokio::test]
    async fn shutdown_flushes_the_last_queued_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let (sink, writer) = FileSink::spawn(path.clone());
        let mut ledger = Ledger::new(sink);
        let key = WeekKey::parse("2024-05-06").unwrap();
        ledger
            .set_value(key, Day::Monday, Category::Positive, "shake30", true)
            .unwrap();
        ledger
            .set_value(key, Day::Tuesday, Category::Negative, "practiceHours", 3u32)
            .unwrap();

        writer.shutdown().await;
        let loaded = load_snapshot(&path).await;
        assert_eq!(loaded, *ledger.snapshot());
        assert_eq!(loaded.len(), 1);

        // Saving after shutdown is dropped, not a panic.
        ledger.reset_week(key);
        assert_eq!(load_snapshot(&path).await.len(), 1);
    }

    #[tokio::test]
    async fn writes_replace_the_file_through_a_staging_copy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let staging = staging_path(&path);
        assert_eq!(staging, dir.path().join("ledger.json.tmp"));

        let first = parse_snapshot(SNAPSHOT.as_bytes()).unwrap();
        persist_snapshot(&path, &first).await.unwrap();
        assert!(!staging.exists());

        // A torn staging file left by an interrupted write neither hides the
        // committed ledger nor blocks the next write.
        tokio::fs::write(&staging, br#"{"2024-05-06": {"#).await.unwrap();
        assert_eq!(load_snapshot(&path).await, first);

        let mut second = first.clone();
        second.clear();
        persist_snapshot(&path, &second).await.unwrap();
        assert!(!staging.exists());
        let bytes = tokio::fs::read(&path).await.unwrap();
        assert_eq!(parse_snapshot(&bytes).unwrap(), second);
    }
}
