
use std::collections::HashSet;
use std::sync::atomic::Ordering;
use std::time::Duration;

use serde_json::json;
use synth_core::{fingerprint_of, ResultStore, SubmitResponse, TaskStatus};
use test_support::{eventually, orchestrator, Req};

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_duplicate_submits_share_one_execution() {
    let (orch, pipeline, store) = orchestrator(2);
    let n = 8;

    let responses: Vec<SubmitResponse> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..n).map(|_| s.spawn(|| orch.submit(Req::ok("hello")).unwrap()))
                                    .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let tokens: HashSet<_> = responses.iter().map(|r| r.token().clone()).collect();
    assert_eq!(tokens.len(), 1, "all callers must share the same token");
    let tickets: HashSet<_> = responses.iter().map(|r| r.ticket().cloned().expect("submitted")).collect();
    assert_eq!(tickets.len(), n, "every caller gets its own ticket");

    let token = tokens.into_iter().next().unwrap();
    eventually(|| pipeline.started.load(Ordering::SeqCst) == 1).await;
    assert_eq!(orch.query(&token), Some(TaskStatus::Running));
    assert_eq!(orch.summary().subscribers, n);

    pipeline.gate.open();
    let status = orch.wait_for(&token, Duration::from_millis(5)).await;
    assert_eq!(status, Some(TaskStatus::HitCache));
    assert_eq!(pipeline.calls(), 1);
    assert_eq!(pipeline.started.load(Ordering::SeqCst), 1);
    assert!(store.exists(&token));
    assert_eq!(orch.fetch(&token).unwrap(), Some(b"audio:hello".to_vec()));

    // Un submit posterior es cache hit y no invoca el pipeline.
    let again = orch.submit(Req::ok("hello")).unwrap();
    assert_eq!(again, SubmitResponse::HitCache { token: token.clone() });
    assert_eq!(pipeline.calls(), 1);
    assert_eq!(orch.summary().subscribers, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn distinct_requests_get_distinct_tasks() {
    let (orch, pipeline, _store) = orchestrator(2);
    let a = orch.submit(Req::ok("a")).unwrap();
    let b = orch.submit(Req::ok("b")).unwrap();
    assert_ne!(a.token(), b.token());

    pipeline.gate.open();
    for token in [a.token(), b.token()] {
        assert_eq!(orch.wait_for(token, Duration::from_millis(5)).await, Some(TaskStatus::HitCache));
    }
    assert_eq!(pipeline.calls(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn token_is_the_request_fingerprint() {
    let (orch, pipeline, _store) = orchestrator(1);
    pipeline.gate.open();
    let resp = orch.submit(Req::ok("fp")).unwrap();
    let expected = fingerprint_of(&json!({"fail": false, "name": "fp"})).unwrap();
    assert_eq!(resp.token(), &expected);
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_token_is_not_found() {
    let (orch, _pipeline, _store) = orchestrator(1);
    let never = fingerprint_of(&"never submitted").unwrap();
    assert_eq!(orch.query(&never), None);
    assert_eq!(orch.fetch(&never).unwrap(), None);
}
