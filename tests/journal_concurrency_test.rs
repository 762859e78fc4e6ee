use std::sync::Arc;
use std::thread;

use tempfile::TempDir;
use uuid::Uuid;
use web_watchdog::journal::{JournalEntry, JournalStorage};
use web_watchdog::probe::ProbeResult;
use web_watchdog::runner::TestOutcome;

fn create_dummy_entry(run_id: Uuid, title: String) -> JournalEntry {
    let outcome = TestOutcome::probed(
        1,
        title,
        ProbeResult {
            elapsed_millis: Some(100.0),
            http_status: Some(200),
            measured_size: Some(2048),
            errors: Vec::new(),
        },
    );
    JournalEntry::from_outcome(run_id, &outcome)
}

/// 多个运行同时写同一个日志文件（模拟重叠的 cron 任务）
#[test]
fn test_concurrent_writes() {
    let temp_dir = TempDir::new().unwrap();
    let journal_file = Arc::new(temp_dir.path().join("watchdog.log"));

    let thread_count = 10;
    let entries_per_thread = 50;

    let handles: Vec<_> = (0..thread_count)
        .map(|i| {
            let path = Arc::clone(&journal_file);
            thread::spawn(move || {
                let storage = JournalStorage::new((*path).clone());
                let run_id = Uuid::new_v4();
                for j in 0..entries_per_thread {
                    let entry = create_dummy_entry(run_id, format!("{}-{}", i, j));
                    storage.append(&entry).unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let storage = JournalStorage::new((*journal_file).clone());
    let entries = storage.list().unwrap();
    assert_eq!(
        entries.len(),
        thread_count * entries_per_thread,
        "Total entries count mismatch"
    );
}

/// 并发写入触发轮转时，不丢失也不重复任何条目
#[test]
fn test_concurrent_rotation_keeps_every_entry() {
    let temp_dir = TempDir::new().unwrap();
    let journal_file = temp_dir.path().join("watchdog.log");

    let thread_count = 8;
    let entries_per_thread = 100;

    let handles: Vec<_> = (0..thread_count)
        .map(|i| {
            let path = journal_file.clone();
            thread::spawn(move || {
                let storage = JournalStorage::new(path).with_rotation(2000, 1000);
                let run_id = Uuid::new_v4();
                for j in 0..entries_per_thread {
                    storage
                        .append(&create_dummy_entry(run_id, format!("{}-{}", i, j)))
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let storage = JournalStorage::new(journal_file);
    assert!(storage.backup_path(1).exists(), "rotation never happened");

    let mut titles: Vec<String> = storage
        .list()
        .unwrap()
        .into_iter()
        .map(|e| e.title)
        .collect();
    let mut n = 1;
    while storage.backup_path(n).exists() {
        let backup = JournalStorage::new(storage.backup_path(n)).list().unwrap();
        titles.extend(backup.into_iter().map(|e| e.title));
        n += 1;
    }

    assert_eq!(titles.len(), thread_count * entries_per_thread);
    titles.sort();
    titles.dedup();
    assert_eq!(titles.len(), thread_count * entries_per_thread);
}
