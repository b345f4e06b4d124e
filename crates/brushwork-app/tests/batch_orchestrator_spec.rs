mod common;

use std::num::NonZeroUsize;
use std::sync::Arc;

use tempfile::TempDir;

use brushwork_app::paths::OutputPaths;
use brushwork_app::services::{
    BatchConfig, FsArtifactStore, GenerationProfile, run_batch,
};
use common::{FailingStore, StaticClient, test_context};

fn batch_config(count: u32, parallel: usize, retries: usize) -> BatchConfig {
    BatchConfig::builder()
        .count(count)
        .max_parallel(NonZeroUsize::new(parallel).expect("non-zero parallelism"))
        .max_retries(retries)
        .build()
}

#[tokio::test]
async fn results_are_ordered_by_index_regardless_of_completion_order() {
    let temp = TempDir::new().expect("temp dir");
    let store = Arc::new(FsArtifactStore::new(OutputPaths::new(
        temp.path().join("out"),
    )));
    let request = GenerationProfile::default().request_for("ordering probe");

    // Randomized latencies scramble completion order; repeat a few times so
    // a lucky in-order completion does not mask a regression.
    for trial in 0..3 {
        let client = Arc::new(StaticClient::new(true));
        let ctx = test_context(client, store.clone());
        let artifacts = run_batch(
            &ctx,
            &request,
            &format!("trial{trial}"),
            &batch_config(50, 5, 0),
        )
        .await
        .expect("batch runs");

        let indexes: Vec<u32> = artifacts.iter().map(|a| a.index).collect();
        assert_eq!(indexes, (1..=50).collect::<Vec<u32>>());
    }
}

#[tokio::test]
async fn artifacts_land_on_disk_under_their_indexed_names() {
    let temp = TempDir::new().expect("temp dir");
    let store = Arc::new(FsArtifactStore::new(OutputPaths::new(
        temp.path().join("out"),
    )));
    let client = Arc::new(StaticClient::new(false));
    let ctx = test_context(client.clone(), store);
    let request = GenerationProfile::default().request_for("a fox in watercolor");

    let artifacts = run_batch(&ctx, &request, "fox", &batch_config(3, 2, 0))
        .await
        .expect("batch runs");

    assert_eq!(client.call_count(), 3);
    assert_eq!(artifacts.len(), 3);
    for (i, artifact) in artifacts.iter().enumerate() {
        let index = (i + 1) as u32;
        assert_eq!(artifact.index, index);
        assert_eq!(
            artifact.path.file_name().and_then(|n| n.to_str()),
            Some(format!("fox_{index}.png").as_str())
        );
        let bytes = std::fs::read(&artifact.path).expect("artifact exists");
        assert_eq!(bytes, b"image for: a fox in watercolor");
    }
}

#[tokio::test]
async fn failed_jobs_leave_gaps_not_placeholders() {
    let temp = TempDir::new().expect("temp dir");
    let paths = OutputPaths::new(temp.path().join("out"));
    let store = Arc::new(FailingStore::new(
        paths.clone(),
        ["imgs_3".to_string(), "imgs_7".to_string()],
    ));
    let client = Arc::new(StaticClient::new(true));
    let ctx = test_context(client, store);
    let request = GenerationProfile::default().request_for("gap probe");

    let artifacts = run_batch(&ctx, &request, "imgs", &batch_config(10, 4, 0))
        .await
        .expect("batch runs despite failed jobs");

    let indexes: Vec<u32> = artifacts.iter().map(|a| a.index).collect();
    assert_eq!(indexes, vec![1, 2, 4, 5, 6, 8, 9, 10]);
    assert!(!paths.artifact_file("imgs", 3).exists());
    assert!(!paths.artifact_file("imgs", 7).exists());
}

#[tokio::test]
async fn zero_count_short_circuits_without_any_calls() {
    let temp = TempDir::new().expect("temp dir");
    let store = Arc::new(FsArtifactStore::new(OutputPaths::new(
        temp.path().join("out"),
    )));
    let client = Arc::new(StaticClient::new(false));
    let ctx = test_context(client.clone(), store);
    let request = GenerationProfile::default().request_for("never sent");

    let artifacts = run_batch(&ctx, &request, "none", &batch_config(0, 4, 2))
        .await
        .expect("empty batch is fine");

    assert!(artifacts.is_empty());
    assert_eq!(client.call_count(), 0);
}
