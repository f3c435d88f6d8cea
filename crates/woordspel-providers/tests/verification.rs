//! Verification through real judge adapters and a file-backed cache.

use std::sync::Arc;
use std::time::Duration;

use woordspel_core::model::{Category, Letter, Verdict};
use woordspel_core::{AnswerCache, JudgeError, VerificationPolicy, VerifyError};
use woordspel_providers::{MockJudge, OracleJudge, RelayClient};
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn dier() -> Category {
    Category::new("Een dier")
}

fn h() -> Letter {
    Letter::new('H')
}

fn completion(content: &str) -> serde_json::Value {
    serde_json::json!({
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
}

#[tokio::test]
async fn learned_answer_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("answers.json");

    let judge = Arc::new(MockJudge::accepting());
    let mut policy = VerificationPolicy::new(AnswerCache::load(&path).unwrap(), judge.clone());
    assert_eq!(
        policy.verify("hond", &dier(), &h()).await.unwrap(),
        Verdict::Accepted
    );
    assert_eq!(judge.check_count(), 1);
    drop(policy);

    // A new process: different judge, same durable cache.
    let judge = Arc::new(MockJudge::rejecting());
    let mut policy = VerificationPolicy::new(AnswerCache::load(&path).unwrap(), judge.clone());
    assert_eq!(
        policy.verify("Hond ", &dier(), &h()).await.unwrap(),
        Verdict::Accepted
    );
    assert_eq!(judge.check_count(), 0);
}

#[tokio::test]
async fn judge_sees_trimmed_original_word() {
    let judge = Arc::new(MockJudge::rejecting());
    let mut policy = VerificationPolicy::new(AnswerCache::in_memory(), judge.clone());

    policy.verify("  Hamster ", &dier(), &h()).await.unwrap();
    let (word, category, letter) = judge.last_check().unwrap();
    assert_eq!(word, "Hamster");
    assert_eq!(category, dier());
    assert_eq!(letter, h());
}

#[tokio::test]
async fn outage_then_recovery() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("answers.json");
    let judge = Arc::new(MockJudge::unavailable());
    let mut policy = VerificationPolicy::new(AnswerCache::load(&path).unwrap(), judge.clone());

    let err = policy.verify("haas", &dier(), &h()).await.unwrap_err();
    assert!(matches!(err, VerifyError::JudgeUnavailable(_)));
    assert!(!path.exists());

    judge.set_unavailable(false);
    let verdict = policy.verify("haas", &dier(), &h()).await.unwrap();
    assert_eq!(verdict, Verdict::Rejected);
    assert!(!path.exists());
}

#[tokio::test(start_paused = true)]
async fn hanging_judge_is_bounded() {
    let judge = Arc::new(MockJudge::accepting().with_delay(Duration::from_secs(3600)));
    let mut policy = VerificationPolicy::new(AnswerCache::in_memory(), judge.clone());

    let err = policy.verify("hond", &dier(), &h()).await.unwrap_err();
    assert!(matches!(
        err,
        VerifyError::JudgeUnavailable(JudgeError::Timeout(10))
    ));
    assert!(policy.cache().is_empty());
}

#[tokio::test]
async fn end_to_end_through_relay_client() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_partial_json(serde_json::json!({"action": "checkAnswer"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Ja, klopt.")))
        .expect(1)
        .mount(&server)
        .await;

    let relay = RelayClient::new(&server.uri()).unwrap();
    let judge = Arc::new(OracleJudge::new(Box::new(relay)));
    let mut policy = VerificationPolicy::new(AnswerCache::in_memory(), judge);

    assert_eq!(
        policy.verify("hond", &dier(), &h()).await.unwrap(),
        Verdict::Accepted
    );
    assert!(policy.cache().contains(&dier(), &h(), "hond"));

    // Served from the cache: the mock's `expect(1)` fails on drop otherwise.
    assert_eq!(
        policy.verify("HOND", &dier(), &h()).await.unwrap(),
        Verdict::Accepted
    );
}

#[tokio::test]
async fn malformed_reply_is_unavailability_not_rejection() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
        .mount(&server)
        .await;

    let relay = RelayClient::new(&server.uri()).unwrap();
    let judge = Arc::new(OracleJudge::new(Box::new(relay)));
    let mut policy = VerificationPolicy::new(AnswerCache::in_memory(), judge);

    let err = policy.verify("hond", &dier(), &h()).await.unwrap_err();
    assert!(matches!(
        err,
        VerifyError::JudgeUnavailable(JudgeError::MalformedReply(_))
    ));
    assert!(policy.cache().is_empty());
}
