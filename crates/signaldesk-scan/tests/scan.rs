//! End-to-end pipeline tests: Postgres via `sqlx::test`, the model behind a
//! wiremock server.

use sqlx::PgPool;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use signaldesk_ai::ChatClient;
use signaldesk_scan::{ScanError, Scanner, NO_CLIENTS_ERROR};

fn scanner(pool: &PgPool, server: &MockServer) -> Scanner {
    let client = ChatClient::with_base_url("test-key", "test-model", 30, &server.uri())
        .expect("client construction should not fail");
    Scanner::new(pool.clone(), client, 0.7)
}

/// Wraps an analysis payload in a chat-completions envelope, the analysis
/// itself JSON-encoded into the message content.
fn completion(analysis: &serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "choices": [
            { "message": { "role": "assistant", "content": analysis.to_string() } }
        ]
    })
}

fn three_signal_analysis() -> serde_json::Value {
    serde_json::json!({
        "company_name": "TechVentures Inc",
        "signals": [
            {
                "type": "FUNDING",
                "description": "Closed a $40M Series B led by Acme Capital",
                "confidence": 0.9,
                "source_url": "https://techventures.io/news/series-b",
                "title": "Series B announced"
            },
            {
                "type": "HIRING",
                "description": "Posted 12 new engineering roles this month",
                "confidence": 0.5,
                "source_url": "https://techventures.io/careers",
                "title": "Engineering hiring push"
            },
            {
                "type": "EXPANSION",
                "description": "Opened a new office in Austin",
                "confidence": 0.2,
                "source_url": "https://news.example.com/techventures-austin",
                "title": "Austin expansion"
            }
        ],
        "opportunity_score": 8.0,
        "outreach_hook": "Congrats on the Series B — scaling pains ahead?",
        "content_hook": "How Series B companies rebuild their sales stack",
        "keywords_matched": ["Series B", "hiring"]
    })
}

async fn seed_client(pool: &PgPool, user_id: &str, name: &str, domain: Option<&str>) {
    signaldesk_db::create_client(pool, user_id, name, domain)
        .await
        .expect("seed client");
}

#[sqlx::test(migrations = "../../migrations")]
async fn empty_roster_fails_fast_without_calling_the_model(pool: PgPool) {
    let server = MockServer::start().await;
    // Any request to the model would violate the fail-fast contract.
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = scanner(&pool, &server)
        .run_scan("user-a")
        .await
        .expect("scan should not error");

    assert!(!result.ok);
    assert_eq!(result.digest_count, 0);
    assert_eq!(result.errors, vec![NO_CLIENTS_ERROR.to_string()]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn unseen_signals_become_scored_digest_rows(pool: PgPool) {
    seed_client(&pool, "user-a", "TechVentures Inc", Some("techventures.io")).await;
    signaldesk_db::create_keyword(&pool, "user-a", "Series B")
        .await
        .expect("seed keyword");

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("TechVentures Inc"))
        .and(body_string_contains("Series B"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&three_signal_analysis())))
        .expect(1)
        .mount(&server)
        .await;

    let result = scanner(&pool, &server)
        .run_scan("user-a")
        .await
        .expect("scan should succeed");

    assert!(result.ok);
    assert_eq!(result.digest_count, 3);
    assert!(result.errors.is_empty());

    let date = chrono::Utc::now().date_naive();
    let rows = signaldesk_db::list_digests(&pool, "user-a", Some(date), 50)
        .await
        .expect("list digests");
    assert_eq!(rows.len(), 3);

    // Ordered by score descending: 8.0 * {0.9, 0.5, 0.2}.
    assert!((rows[0].score - 7.2).abs() < 1e-9);
    assert!((rows[1].score - 4.0).abs() < 1e-9);
    assert!((rows[2].score - 1.6).abs() < 1e-9);

    for row in &rows {
        assert_eq!(row.entity, "TechVentures Inc");
        assert_eq!(row.date, date);
        // Hooks are company-level, identical on every row.
        assert_eq!(row.outreach_snippet, "Congrats on the Series B — scaling pains ahead?");
        assert_eq!(row.content_hook, "How Series B companies rebuild their sales stack");
    }
    assert_eq!(rows[0].signal_type, "FUNDING");
}

#[sqlx::test(migrations = "../../migrations")]
async fn rescanning_identical_signals_adds_nothing(pool: PgPool) {
    seed_client(&pool, "user-a", "TechVentures Inc", None).await;

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&three_signal_analysis())))
        .expect(2)
        .mount(&server)
        .await;

    let scanner = scanner(&pool, &server);
    let first = scanner.run_scan("user-a").await.expect("first scan");
    assert_eq!(first.digest_count, 3);

    let second = scanner.run_scan("user-a").await.expect("second scan");
    assert!(second.ok);
    assert_eq!(second.digest_count, 0, "all three URLs are already seen");
    assert!(second.errors.is_empty());

    let date = chrono::Utc::now().date_naive();
    let rows = signaldesk_db::list_digests(&pool, "user-a", Some(date), 50)
        .await
        .expect("list digests");
    assert_eq!(rows.len(), 3, "first run's rows are unchanged");
}

#[sqlx::test(migrations = "../../migrations")]
async fn one_company_failing_does_not_abort_the_batch(pool: PgPool) {
    seed_client(&pool, "user-a", "Failing Corp", None).await;
    seed_client(&pool, "user-a", "Globex", Some("globex.example")).await;

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Failing Corp"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream blew up"))
        .mount(&server)
        .await;

    let globex_analysis = serde_json::json!({
        "company_name": "Globex",
        "signals": [
            {
                "type": "PARTNERSHIP",
                "description": "Announced a reseller agreement with Initech",
                "confidence": 0.7,
                "source_url": "https://globex.example/press/initech",
                "title": "Initech partnership"
            },
            {
                "type": "PRODUCT_LAUNCH",
                "description": "Launched an analytics add-on",
                "confidence": 0.6,
                "source_url": "https://globex.example/blog/analytics",
                "title": "Analytics add-on"
            }
        ],
        "opportunity_score": 6.0,
        "outreach_hook": "Saw the Initech news — how are integrations going?",
        "content_hook": "Partnership-led growth playbooks",
        "keywords_matched": []
    });
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Globex"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&globex_analysis)))
        .mount(&server)
        .await;

    let result = scanner(&pool, &server)
        .run_scan("user-a")
        .await
        .expect("batch should survive one company failing");

    assert!(result.ok, "partial success is still success");
    assert_eq!(result.digest_count, 2);
    assert_eq!(result.errors.len(), 1);
    assert!(
        result.errors[0].starts_with("Failed to analyze Failing Corp:"),
        "error message: {}",
        result.errors[0]
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn invalid_analysis_persists_nothing_for_that_company(pool: PgPool) {
    seed_client(&pool, "user-a", "TechVentures Inc", None).await;

    // Confidence out of range: the validator must reject the payload before
    // any ledger or digest write happens.
    let mut analysis = three_signal_analysis();
    analysis["signals"][1]["confidence"] = serde_json::json!(1.5);

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&analysis)))
        .mount(&server)
        .await;

    let result = scanner(&pool, &server)
        .run_scan("user-a")
        .await
        .expect("scan should succeed at the batch level");

    assert!(result.ok);
    assert_eq!(result.digest_count, 0);
    assert_eq!(result.errors.len(), 1);
    assert!(
        result.errors[0].contains("signals[1].confidence"),
        "error message: {}",
        result.errors[0]
    );

    let seen: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM seen_signals")
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(seen, 0, "a rejected payload must not mark anything seen");

    let digests: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM digests")
        .fetch_one(&pool)
        .await
        .expect("count");
    assert_eq!(digests, 0);
}

#[sqlx::test(migrations = "../../migrations")]
async fn empty_model_content_is_reported_per_company(pool: PgPool) {
    seed_client(&pool, "user-a", "TechVentures Inc", None).await;

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [ { "message": { "role": "assistant", "content": null } } ]
        })))
        .mount(&server)
        .await;

    let result = scanner(&pool, &server)
        .run_scan("user-a")
        .await
        .expect("scan should succeed at the batch level");

    assert!(result.ok);
    assert_eq!(result.digest_count, 0);
    assert_eq!(
        result.errors,
        vec!["Failed to analyze TechVentures Inc: empty model response".to_string()]
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn a_url_seen_for_one_company_is_suppressed_for_another(pool: PgPool) {
    // Dedup is per user, not per company: the shared URL survives only once.
    seed_client(&pool, "user-a", "Acme", None).await;
    seed_client(&pool, "user-a", "Globex", None).await;

    let shared_url = "https://news.example.com/joint-venture";
    let analysis_for = |company: &str| {
        serde_json::json!({
            "company_name": company,
            "signals": [
                {
                    "type": "PARTNERSHIP",
                    "description": "Joint venture coverage",
                    "confidence": 0.8,
                    "source_url": shared_url,
                    "title": "Joint venture"
                }
            ],
            "opportunity_score": 5.0,
            "outreach_hook": "Saw the joint venture news",
            "content_hook": "Joint ventures in practice",
            "keywords_matched": []
        })
    };

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&analysis_for("Acme"))))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Globex"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&analysis_for("Globex"))))
        .mount(&server)
        .await;

    let result = scanner(&pool, &server)
        .run_scan("user-a")
        .await
        .expect("scan should succeed");

    assert!(result.ok);
    assert_eq!(result.digest_count, 1, "the shared URL survives exactly once");
    assert!(result.errors.is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn concurrent_scan_is_rejected_with_a_conflict(pool: PgPool) {
    seed_client(&pool, "user-a", "TechVentures Inc", None).await;

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion(&three_signal_analysis()))
                .set_delay(std::time::Duration::from_millis(250)),
        )
        .mount(&server)
        .await;

    let scanner = scanner(&pool, &server);

    // Both scans start together; the first poll acquires the lease, so the
    // second must be rejected immediately rather than queued — even though
    // it is for a different user.
    let (first, second) = tokio::join!(scanner.run_scan("user-a"), scanner.run_scan("user-b"));

    let first = first.expect("first scan should run to completion");
    assert_eq!(first.digest_count, 3);
    assert!(matches!(second, Err(ScanError::AlreadyRunning)));

    // The lease is free again afterwards.
    assert!(!scanner.is_running());
}
