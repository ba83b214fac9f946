//! End-to-end runs against a scripted fetcher and an in-memory store.

use std::io;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};

use followscope_core::{
    Fetcher, FollowerPayload, FollowerRecord, ProfilePayload, RepositorySummary, Snapshot, Stats,
    TrafficCounts, TrafficOutcome, TrafficSummary,
};
use followscope_pipeline::{recompute_stats, run_once, PipelineError, RunOptions, Stage, StatsError};
use followscope_store::{BlobKey, BlobStore, FileStore, MemoryStore};

/// Serves canned responses. Follower rosters are consumed one per run.
struct ScriptedFetcher {
    profile: Result<Value, String>,
    rosters: Mutex<Vec<Result<Vec<u64>, String>>>,
    traffic: TrafficOutcome,
}

impl ScriptedFetcher {
    fn new(rosters: Vec<Vec<u64>>) -> Self {
        Self {
            profile: Ok(profile_json()),
            rosters: Mutex::new(rosters.into_iter().map(Ok).rev().collect()),
            traffic: TrafficOutcome::Unavailable {
                reason: "no traffic repository configured".to_owned(),
            },
        }
    }

    fn with_traffic(mut self, traffic: TrafficOutcome) -> Self {
        self.traffic = traffic;
        self
    }

    fn failing_profile(mut self) -> Self {
        self.profile = Err("HTTP 502 from /users/octocat".to_owned());
        self
    }

    fn failing_followers(self) -> Self {
        self.rosters
            .lock()
            .unwrap()
            .push(Err("HTTP 500 from /users/octocat/followers?page=2".to_owned()));
        self
    }
}

impl Fetcher for ScriptedFetcher {
    type Error = io::Error;

    async fn fetch_profile(&self) -> Result<ProfilePayload, io::Error> {
        match &self.profile {
            Ok(value) => Ok(serde_json::from_value(value.clone()).unwrap()),
            Err(msg) => Err(io::Error::other(msg.clone())),
        }
    }

    async fn fetch_followers(&self) -> Result<Vec<FollowerPayload>, io::Error> {
        let next = self.rosters.lock().unwrap().pop().expect("no roster scripted");
        next.map(|roster| roster.into_iter().map(payload).collect())
            .map_err(io::Error::other)
    }

    async fn fetch_traffic(&self) -> TrafficOutcome {
        self.traffic.clone()
    }
}

fn profile_json() -> Value {
    json!({
        "login": "octocat",
        "id": 583_231,
        "name": "The Octocat",
        "bio": null,
        "public_repos": 8,
        "followers": 2,
        "following": 9,
        "created_at": "2011-01-25T18:44:36Z",
        "avatar_url": "https://avatars.example/583231",
        "plan": {"name": "pro"}
    })
}

fn payload(id: u64) -> FollowerPayload {
    serde_json::from_value(json!({
        "id": id,
        "login": format!("user{id}"),
        "avatar_url": format!("https://avatars.example/{id}"),
        "html_url": format!("https://github.com/user{id}"),
        "type": "User"
    }))
    .unwrap()
}

fn t0() -> DateTime<Utc> {
    "2026-03-01T06:00:00Z".parse().unwrap()
}

fn read<T: serde::de::DeserializeOwned>(store: &MemoryStore, key: BlobKey) -> T {
    let bytes = store.get(key).unwrap().expect("blob should exist");
    serde_json::from_slice(&bytes).unwrap()
}

fn ids(records: &[FollowerRecord]) -> Vec<u64> {
    records.iter().map(|f| f.id).collect()
}

#[tokio::test]
async fn bootstrap_run_classifies_everyone_as_new() {
    let store = MemoryStore::new();
    let fetcher = ScriptedFetcher::new(vec![vec![1, 2]]);

    let report = run_once(&fetcher, &store, &RunOptions::default(), t0())
        .await
        .unwrap();

    assert_eq!(report.follower_count, 2);
    assert_eq!(report.new_followers, 2);
    assert_eq!(report.unfollowers, 0);
    assert!(!report.traffic_available);

    let latest: Snapshot = read(&store, BlobKey::Latest);
    assert_eq!(ids(&latest.changes.new_followers), vec![1, 2]);
    assert!(latest.changes.unfollowers.is_empty());
    assert_eq!(latest.followers.count, 2);
    assert!(latest.traffic.is_none());

    let roster: Vec<FollowerRecord> = read(&store, BlobKey::Followers);
    assert_eq!(ids(&roster), vec![1, 2]);

    let history: Vec<Snapshot> = read(&store, BlobKey::History);
    assert_eq!(history, vec![latest]);

    let stats: Stats = read(&store, BlobKey::Stats);
    assert_eq!(stats, report.stats);
    assert_eq!(stats.current_followers, 2);
    assert_eq!(stats.monitoring_since, t0());
}

#[tokio::test]
async fn repeated_follower_is_counted_once() {
    let store = MemoryStore::new();
    let fetcher = ScriptedFetcher::new(vec![vec![1, 2, 2, 3], vec![1, 2, 3]]);

    let report = run_once(&fetcher, &store, &RunOptions::default(), t0())
        .await
        .unwrap();

    assert_eq!(report.follower_count, 3);
    assert_eq!(report.new_followers, 3);

    let latest: Snapshot = read(&store, BlobKey::Latest);
    assert_eq!(latest.followers.count, 3);
    assert_eq!(ids(&latest.changes.new_followers), vec![1, 2, 3]);
    let roster: Vec<FollowerRecord> = read(&store, BlobKey::Followers);
    assert_eq!(ids(&roster), vec![1, 2, 3]);

    let report = run_once(
        &fetcher,
        &store,
        &RunOptions::default(),
        t0() + Duration::hours(6),
    )
    .await
    .unwrap();
    assert_eq!(report.new_followers, 0);
    assert_eq!(report.unfollowers, 0);
}

#[tokio::test]
async fn second_run_detects_joins_and_leaves() {
    let store = MemoryStore::new();
    let fetcher = ScriptedFetcher::new(vec![vec![1, 2, 3], vec![4, 2, 5]]);

    run_once(&fetcher, &store, &RunOptions::default(), t0())
        .await
        .unwrap();
    let later = t0() + Duration::hours(6);
    let report = run_once(&fetcher, &store, &RunOptions::default(), later)
        .await
        .unwrap();

    assert_eq!(report.new_followers, 2);
    assert_eq!(report.unfollowers, 2);

    let latest: Snapshot = read(&store, BlobKey::Latest);
    assert_eq!(latest.timestamp, later);
    assert_eq!(ids(&latest.changes.new_followers), vec![4, 5]);
    assert_eq!(ids(&latest.changes.unfollowers), vec![1, 3]);

    let history: Vec<Snapshot> = read(&store, BlobKey::History);
    let stamps: Vec<DateTime<Utc>> = history.iter().map(|s| s.timestamp).collect();
    assert_eq!(stamps, vec![later, t0()]);

    let stats: Stats = read(&store, BlobKey::Stats);
    assert_eq!(stats.total_new_followers, 5);
    assert_eq!(stats.total_unfollowers, 2);
    assert_eq!(stats.growth_7d, 0);
    assert_eq!(stats.last_updated, later);
    assert_eq!(stats.monitoring_since, t0());
}

#[tokio::test]
async fn history_is_bounded_by_run_options() {
    let store = MemoryStore::new();
    let fetcher = ScriptedFetcher::new(vec![vec![1]; 5]);
    let options = RunOptions {
        history_limit: 3,
        dry_run: false,
    };

    for hour in 0..5 {
        run_once(&fetcher, &store, &options, t0() + Duration::hours(hour))
            .await
            .unwrap();
    }

    let history: Vec<Snapshot> = read(&store, BlobKey::History);
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].timestamp, t0() + Duration::hours(4));
    assert_eq!(history[2].timestamp, t0() + Duration::hours(2));
}

#[tokio::test]
async fn profile_failure_writes_nothing() {
    let store = MemoryStore::new();
    let fetcher = ScriptedFetcher::new(vec![vec![1, 2]]).failing_profile();

    let err = run_once(&fetcher, &store, &RunOptions::default(), t0())
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Profile));
    assert!(err.to_string().contains("profile"), "message: {err}");
    assert!(store.is_empty());
}

#[tokio::test]
async fn follower_failure_leaves_previous_state_untouched() {
    let store = MemoryStore::new();
    let fetcher = ScriptedFetcher::new(vec![vec![1, 2]]);
    run_once(&fetcher, &store, &RunOptions::default(), t0())
        .await
        .unwrap();
    let before: Vec<Option<Vec<u8>>> = BlobKey::ALL
        .iter()
        .map(|k| store.get(*k).unwrap())
        .collect();

    let fetcher = fetcher.failing_followers();
    let err = run_once(
        &fetcher,
        &store,
        &RunOptions::default(),
        t0() + Duration::hours(1),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Fetch {
            stage: Stage::Followers,
            ..
        }
    ));
    let after: Vec<Option<Vec<u8>>> = BlobKey::ALL
        .iter()
        .map(|k| store.get(*k).unwrap())
        .collect();
    assert_eq!(before, after);
}

#[tokio::test]
async fn traffic_is_recorded_when_available() {
    let store = MemoryStore::new();
    let summary = TrafficSummary {
        repository: RepositorySummary {
            name: "followers".to_owned(),
            stars: 12,
            forks: 3,
            watchers: 4,
        },
        views: TrafficCounts {
            count: 40,
            uniques: 9,
        },
        clones: TrafficCounts {
            count: 6,
            uniques: 2,
        },
    };
    let fetcher = ScriptedFetcher::new(vec![vec![1]])
        .with_traffic(TrafficOutcome::Available(summary.clone()));

    let report = run_once(&fetcher, &store, &RunOptions::default(), t0())
        .await
        .unwrap();

    assert!(report.traffic_available);
    let latest: Value = read(&store, BlobKey::Latest);
    assert_eq!(latest["traffic"]["repository"]["stars"], 12);
    assert_eq!(latest["traffic"]["views"]["uniques"], 9);
}

#[tokio::test]
async fn malformed_stored_roster_triggers_bootstrap() {
    let store = MemoryStore::new();
    store.put(BlobKey::Followers, b"not json at all").unwrap();
    store.put(BlobKey::History, b"[{\"oops\": true}]").unwrap();
    let fetcher = ScriptedFetcher::new(vec![vec![7, 8]]);

    let report = run_once(&fetcher, &store, &RunOptions::default(), t0())
        .await
        .unwrap();

    assert_eq!(report.new_followers, 2);
    let history: Vec<Snapshot> = read(&store, BlobKey::History);
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn dry_run_writes_nothing() {
    let store = MemoryStore::new();
    let fetcher = ScriptedFetcher::new(vec![vec![1, 2, 3]]);
    let options = RunOptions {
        dry_run: true,
        ..RunOptions::default()
    };

    let report = run_once(&fetcher, &store, &options, t0()).await.unwrap();

    assert_eq!(report.follower_count, 3);
    assert_eq!(report.stats.current_followers, 3);
    assert!(store.is_empty());
}

#[tokio::test]
async fn dry_run_leaves_existing_files_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::new(dir.path());
    let fetcher = ScriptedFetcher::new(vec![vec![1, 2], vec![2, 3, 4]]);
    run_once(&fetcher, &store, &RunOptions::default(), t0())
        .await
        .unwrap();

    let snapshot_files = || -> Vec<Option<Vec<u8>>> {
        BlobKey::ALL.iter().map(|k| store.get(*k).unwrap()).collect()
    };
    let before = snapshot_files();
    assert!(before.iter().all(Option::is_some));

    let options = RunOptions {
        dry_run: true,
        ..RunOptions::default()
    };
    let report = run_once(&fetcher, &store, &options, t0() + Duration::hours(6))
        .await
        .unwrap();
    assert_eq!(report.new_followers, 2);
    assert_eq!(report.unfollowers, 1);

    assert_eq!(snapshot_files(), before);
}

#[tokio::test]
async fn persisted_profile_omits_unlisted_upstream_fields() {
    let store = MemoryStore::new();
    let fetcher = ScriptedFetcher::new(vec![vec![1]]);

    run_once(&fetcher, &store, &RunOptions::default(), t0())
        .await
        .unwrap();

    let latest: Value = read(&store, BlobKey::Latest);
    let profile = latest["profile"].as_object().unwrap();
    assert!(!profile.contains_key("plan"));
    assert!(!profile.contains_key("id"));
    assert_eq!(profile["following_count"], 9);
}

#[test]
fn recompute_stats_on_empty_store_fails_cleanly() {
    let store = MemoryStore::new();
    let err = recompute_stats(&store, t0(), true).unwrap_err();
    assert!(matches!(err, PipelineError::Stats(StatsError::EmptyHistory)));
    assert!(store.is_empty());
}

#[tokio::test]
async fn recompute_stats_rewrites_stats_blob() {
    let store = MemoryStore::new();
    let fetcher = ScriptedFetcher::new(vec![vec![1, 2], vec![1, 2, 3]]);
    run_once(&fetcher, &store, &RunOptions::default(), t0())
        .await
        .unwrap();
    run_once(
        &fetcher,
        &store,
        &RunOptions::default(),
        t0() + Duration::days(1),
    )
    .await
    .unwrap();

    store.put(BlobKey::Stats, b"{}").unwrap();
    let later = t0() + Duration::days(10);
    let stats = recompute_stats(&store, later, true).unwrap();

    assert_eq!(stats.current_followers, 3);
    assert_eq!(stats.growth_7d, 0);
    assert_eq!(stats.growth_30d, 1);
    let stored: Stats = read(&store, BlobKey::Stats);
    assert_eq!(stored, stats);
}
