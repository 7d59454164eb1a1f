//! 批量处理集成测试（使用暂停的时钟验证等待时间）

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{default_policy, emails, ScriptedClassifier};
use finmail_classifier::{ApiError, BatchState, Dashboard};
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn test_all_items_succeed_in_submission_order() {
    let dashboard = Dashboard::new(ScriptedClassifier::always_ok(), default_policy());
    let started = Instant::now();

    let summary = dashboard
        .submit_batch(emails(&["primeiro email aqui", "segundo email aqui", "terceiro email aqui"]))
        .await;

    assert_eq!(
        dashboard.batch_state(),
        BatchState {
            is_processing: false,
            total: 3,
            current: 3,
            errors: 0,
        }
    );
    assert_eq!(summary.succeeded, 3);
    assert!(!summary.cancelled);

    // 历史最新在前，反过来就是提交顺序
    let summaries: Vec<String> = dashboard
        .records()
        .into_iter()
        .rev()
        .map(|r| r.classification.summary)
        .collect();
    assert_eq!(
        summaries,
        vec!["primeiro email aqui", "segundo email aqui", "terceiro email aqui"]
    );

    // 两个间隔，最后一封之后不等待
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(4000), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(4100), "{elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_failed_item_is_counted_and_skipped() {
    let classifier = ScriptedClassifier::failing_on("segundo", "Erro interno do servidor");
    let dashboard = Dashboard::new(classifier, default_policy());

    let summary = dashboard
        .submit_batch(emails(&["primeiro email aqui", "segundo email aqui", "terceiro email aqui"]))
        .await;

    let state = dashboard.batch_state();
    assert_eq!(state.current, 3);
    assert_eq!(state.errors, 1);
    assert!(!state.is_processing);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.succeeded, 2);

    let records = dashboard.records();
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.content != "segundo email aqui"));
}

#[tokio::test(start_paused = true)]
async fn test_rate_limited_item_adds_cooldown() {
    let classifier = ScriptedClassifier::failing_on("email B", "429 rate limited");
    let dashboard = Dashboard::new(classifier, default_policy());
    let started = Instant::now();

    dashboard
        .submit_batch(emails(&["email A text here", "email B text here"]))
        .await;

    assert_eq!(
        dashboard.batch_state(),
        BatchState {
            is_processing: false,
            total: 2,
            current: 2,
            errors: 1,
        }
    );
    assert!(started.elapsed() >= Duration::from_millis(7000));
    assert_eq!(dashboard.records().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_remote_429_status_triggers_cooldown() {
    let classifier = ScriptedClassifier::new(|_| {
        Err(ApiError::remote("/api/classify", 429, "Too Many Requests"))
    });
    let dashboard = Dashboard::new(classifier, default_policy());
    let started = Instant::now();

    dashboard.submit_batch(emails(&["unico email da lista"])).await;

    // 单封：没有间隔，只有冷却
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(5000), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(5100), "{elapsed:?}");
    assert_eq!(dashboard.batch_state().errors, 1);
}

#[tokio::test(start_paused = true)]
async fn test_empty_batch_finishes_immediately() {
    let classifier = Arc::new(ScriptedClassifier::always_ok());
    let dashboard = Dashboard::new(Arc::clone(&classifier), default_policy());

    let summary = dashboard.submit_batch(Vec::new()).await;

    assert_eq!(dashboard.batch_state(), BatchState::default());
    assert_eq!(summary.attempted(), 0);
    assert!(!summary.cancelled);
    assert!(classifier.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_progress_is_published_per_item() {
    let dashboard = Dashboard::new(ScriptedClassifier::always_ok(), default_policy());
    let mut updates = dashboard.subscribe_batch();

    let observer = tokio::spawn(async move {
        let mut seen = Vec::new();
        while updates.changed().await.is_ok() {
            let state = *updates.borrow_and_update();
            seen.push(state.current);
            if !state.is_processing {
                break;
            }
        }
        seen
    });

    dashboard
        .submit_batch(emails(&["primeiro email aqui", "segundo email aqui"]))
        .await;

    let seen = observer.await.unwrap();
    assert!(!seen.is_empty());
    assert_eq!(seen.last(), Some(&2));
    assert!(seen.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_stops_between_items() {
    let classifier = Arc::new(ScriptedClassifier::always_ok());
    let dashboard = Arc::new(Dashboard::new(Arc::clone(&classifier), default_policy()));
    let mut updates = dashboard.subscribe_batch();

    let runner = {
        let dashboard = Arc::clone(&dashboard);
        tokio::spawn(async move {
            dashboard
                .submit_batch(emails(&[
                    "primeiro email aqui",
                    "segundo email aqui",
                    "terceiro email aqui",
                ]))
                .await
        })
    };

    updates.wait_for(|s| s.current >= 1).await.unwrap();
    dashboard.cancel_batch();
    let summary = runner.await.unwrap();

    assert!(summary.cancelled);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(classifier.calls(), vec!["primeiro email aqui"]);

    let state = dashboard.batch_state();
    assert!(!state.is_processing);
    assert_eq!(state.current, 1);
    assert_eq!(dashboard.records().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_does_not_leak_into_next_batch() {
    let dashboard = Dashboard::new(ScriptedClassifier::always_ok(), default_policy());

    // 空闲时取消不影响下一批
    dashboard.cancel_batch();
    let summary = dashboard
        .submit_batch(emails(&["primeiro email aqui", "segundo email aqui"]))
        .await;

    assert!(!summary.cancelled);
    assert_eq!(summary.succeeded, 2);
}

#[tokio::test(start_paused = true)]
async fn test_second_batch_is_rejected_while_running() {
    let classifier =
        Arc::new(ScriptedClassifier::always_ok().with_latency(Duration::from_millis(500)));
    let dashboard = Arc::new(Dashboard::new(Arc::clone(&classifier), default_policy()));
    let mut updates = dashboard.subscribe_batch();

    let runner = {
        let dashboard = Arc::clone(&dashboard);
        tokio::spawn(async move {
            dashboard
                .submit_batch(emails(&["primeiro email aqui", "segundo email aqui"]))
                .await
        })
    };
    updates.wait_for(|s| s.is_processing).await.unwrap();

    let rejected = dashboard
        .submit_batch(emails(&["lote concorrente ignorado"]))
        .await;
    assert_eq!(rejected.attempted(), 0);

    let summary = runner.await.unwrap();
    assert_eq!(summary.succeeded, 2);
    assert_eq!(dashboard.batch_state().total, 2);
    assert!(!classifier
        .calls()
        .iter()
        .any(|c| c == "lote concorrente ignorado"));
}

#[tokio::test(start_paused = true)]
async fn test_rate_limited_item_in_the_middle_adds_both_delays() {
    let classifier = ScriptedClassifier::failing_on("email B", "429 rate limited");
    let dashboard = Dashboard::new(classifier, default_policy());
    let started = Instant::now();

    dashboard
        .submit_batch(emails(&[
            "email A text here",
            "email B text here",
            "email C text here",
        ]))
        .await;

    // A → 2000，B → 5000 冷却 + 2000，C 之后不等待
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(9000), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(9100), "{elapsed:?}");
    assert_eq!(dashboard.batch_state().errors, 1);
    assert_eq!(dashboard.records().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_unreachable_backend_gets_no_cooldown() {
    let classifier = ScriptedClassifier::new(|_| {
        Err(ApiError::connectivity(
            "/api/classify",
            "http://ratelimit-gw:8000",
            "connection refused",
        ))
    });
    let dashboard = Dashboard::new(classifier, default_policy());
    let started = Instant::now();

    dashboard.submit_batch(emails(&["unico email da lista"])).await;

    assert!(started.elapsed() < Duration::from_millis(100));
    assert_eq!(dashboard.batch_state().errors, 1);
}

#[tokio::test(start_paused = true)]
async fn test_dropped_batch_does_not_block_later_submissions() {
    let classifier = Arc::new(ScriptedClassifier::always_ok());
    let dashboard = Dashboard::new(Arc::clone(&classifier), default_policy());

    // 第一封之后的间隔中超时，batch future 被丢弃
    let timed_out = tokio::time::timeout(
        Duration::from_millis(100),
        dashboard.submit_batch(emails(&["primeiro email aqui", "segundo email aqui"])),
    )
    .await;
    assert!(timed_out.is_err());

    let state = dashboard.batch_state();
    assert!(!state.is_processing);
    assert_eq!(state.current, 1);

    assert!(dashboard.submit_single("mensagem avulsa depois").await.is_some());

    let summary = dashboard
        .submit_batch(emails(&["terceiro email aqui"]))
        .await;
    assert_eq!(summary.succeeded, 1);
    assert!(!summary.cancelled);
    assert_eq!(
        dashboard.batch_state(),
        BatchState {
            is_processing: false,
            total: 1,
            current: 1,
            errors: 0,
        }
    );
    assert_eq!(dashboard.records().len(), 3);
}
