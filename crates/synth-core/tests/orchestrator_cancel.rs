
use std::sync::atomic::Ordering;
use std::time::Duration;

use synth_core::constants::{MSG_ALREADY_CACHED, MSG_UNKNOWN_TASK};
use synth_core::{fingerprint_of, ResultStore, SubmitResponse, TaskStatus, Ticket};
use test_support::{eventually, orchestrator, Req};

#[tokio::test(flavor = "multi_thread")]
async fn last_ticket_cancels_a_queued_task() {
    // Un único worker ocupado por `blocker` mantiene `target` en cola.
    let (orch, pipeline, store) = orchestrator(1);
    let blocker = orch.submit(Req::ok("blocker")).unwrap();
    eventually(|| pipeline.started.load(Ordering::SeqCst) == 1).await;

    let first = orch.submit(Req::ok("target")).unwrap();
    let second = orch.submit(Req::ok("target")).unwrap();
    let token = first.token().clone();
    assert_eq!(second.token(), &token);
    assert_eq!(orch.query(&token), Some(TaskStatus::Queued));

    let r = orch.cancel(&token, first.ticket().unwrap());
    assert!(r.succeeded);
    assert_eq!(orch.query(&token), Some(TaskStatus::Queued), "one subscriber remains");

    let r = orch.cancel(&token, second.ticket().unwrap());
    assert!(r.succeeded);
    assert_eq!(orch.query(&token), Some(TaskStatus::Cancelled));
    assert_eq!(orch.summary().queued, 0);

    let r = orch.cancel(&token, second.ticket().unwrap());
    assert!(!r.succeeded);
    assert_eq!(r.message.as_deref(), Some(MSG_UNKNOWN_TASK));

    pipeline.gate.open();
    assert_eq!(orch.wait_for(blocker.token(), Duration::from_millis(5)).await, Some(TaskStatus::HitCache));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(pipeline.calls(), 1, "the cancelled task must never run");
    assert!(!store.exists(&token));
    assert_eq!(orch.fetch(&token).unwrap(), None);
}

#[tokio::test(flavor = "multi_thread")]
async fn cancelling_a_running_task_does_not_stop_it() {
    let (orch, pipeline, store) = orchestrator(1);
    let resp = orch.submit(Req::ok("running")).unwrap();
    let token = resp.token().clone();
    eventually(|| pipeline.started.load(Ordering::SeqCst) == 1).await;
    assert_eq!(orch.query(&token), Some(TaskStatus::Running));

    let r = orch.cancel(&token, resp.ticket().unwrap());
    assert!(r.succeeded);
    // Sin suscriptores ni entrada en el registro, pero la síntesis sigue.
    assert_eq!(orch.query(&token), None);

    pipeline.gate.open();
    eventually(|| store.exists(&token)).await;
    assert_eq!(orch.query(&token), Some(TaskStatus::HitCache));
    assert_eq!(orch.submit(Req::ok("running")).unwrap(), SubmitResponse::HitCache { token });
    assert_eq!(pipeline.calls(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn resubmit_after_cancelled_running_task_is_not_clobbered() {
    let (orch, pipeline, _store) = orchestrator(2);
    let old = orch.submit(Req::failing("late")).unwrap();
    let token = old.token().clone();
    eventually(|| pipeline.started.load(Ordering::SeqCst) == 1).await;
    assert!(orch.cancel(&token, old.ticket().unwrap()).succeeded);

    // Nueva tarea para el mismo fingerprint mientras la anterior sigue viva.
    let new = orch.submit(Req::failing("late")).unwrap();
    assert_ne!(new.ticket(), old.ticket());
    eventually(|| pipeline.started.load(Ordering::SeqCst) == 2).await;

    // Termine primero la que termine, la ejecución vieja no debe retirar la
    // entrada de la nueva ni dejar un fallo visible antes de tiempo.
    pipeline.gate.open();
    let status = orch.wait_for(&token, Duration::from_millis(5)).await;
    assert!(matches!(status, Some(TaskStatus::Failed { .. })));
    assert_eq!(pipeline.calls(), 2);
    assert_eq!(orch.summary().subscribers, 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn cancel_rejects_cached_and_unknown() {
    let (orch, pipeline, _store) = orchestrator(1);
    pipeline.gate.open();
    let resp = orch.submit(Req::ok("done")).unwrap();
    let token = resp.token().clone();
    orch.wait_for(&token, Duration::from_millis(5)).await;

    let r = orch.cancel(&token, resp.ticket().unwrap());
    assert!(!r.succeeded);
    assert_eq!(r.message.as_deref(), Some(MSG_ALREADY_CACHED));

    let unknown = fingerprint_of(&"nobody").unwrap();
    let r = orch.cancel(&unknown, &Ticket::from("ab12"));
    assert!(!r.succeeded);
    assert_eq!(r.message.as_deref(), Some(MSG_UNKNOWN_TASK));
}

#[tokio::test(flavor = "multi_thread")]
async fn two_callers_withdraw_one_by_one() {
    let (orch, pipeline, _store) = orchestrator(1);
    let blocker = orch.submit(Req::ok("busy")).unwrap();
    eventually(|| pipeline.started.load(Ordering::SeqCst) == 1).await;

    let a = orch.submit(Req::ok("song")).unwrap();
    let b = orch.submit(Req::ok("song")).unwrap();
    assert_eq!(a.token(), b.token());
    let token = a.token().clone();

    // Un ticket ajeno a la tarea no la afecta.
    assert!(!orch.cancel(&token, &Ticket::from("zzzzzzzz")).succeeded);
    assert!(orch.cancel(&token, a.ticket().unwrap()).succeeded);
    assert_eq!(orch.summary().subscribers, 2, "blocker + remaining caller");
    assert!(orch.cancel(&token, b.ticket().unwrap()).succeeded);
    assert_eq!(orch.query(&token), Some(TaskStatus::Cancelled));

    // Un nuevo submit acepta trabajo nuevo y borra la marca de cancelación.
    let c = orch.submit(Req::ok("song")).unwrap();
    assert_eq!(orch.query(c.token()), Some(TaskStatus::Queued));

    pipeline.gate.open();
    assert_eq!(orch.wait_for(blocker.token(), Duration::from_millis(5)).await, Some(TaskStatus::HitCache));
    assert_eq!(orch.wait_for(&token, Duration::from_millis(5)).await, Some(TaskStatus::HitCache));
}
