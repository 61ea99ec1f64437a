// tests/pipeline_properties.rs
//! End-to-end behaviour of the publish pipeline against scripted services.

mod common;

use common::*;
use pretty_assertions::assert_eq;
use prompt2post::{
    resolve_selector, AcceptedEncoding, DraftPost, FailureStage, GenerationCause, PostPipeline,
    PostValidator, PublishStatus, PublisherErrorKind, RepairPolicy, TextPublisher, Tone,
    ValidationRules, ViolationKind,
};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

const FIFTY_CHARS: &str = "Remote work is here to stay; plan for it with care";

#[test]
fn every_tone_resolves_and_unknown_selectors_fail() {
    for tone in Tone::ALL {
        let template = resolve_selector(tone.selector()).unwrap();
        assert!(!template.prompt_template.trim().is_empty());
    }
    let err = resolve_selector("storytelling").unwrap_err();
    assert_eq!(err.0, "storytelling");
}

#[test]
fn over_long_text_fails_validation_with_length_violation() {
    let validator = PostValidator::new(ValidationRules {
        max_chars: 20,
        encoding: AcceptedEncoding::Unicode,
    });
    let err = validator
        .validate(&DraftPost::manual("x".repeat(21)))
        .unwrap_err();
    assert!(err.contains(ViolationKind::TooLong));
}

#[tokio::test]
async fn publishes_generated_post_and_returns_remote_id() {
    assert_eq!(FIFTY_CHARS.chars().count(), 50);
    let backend = ScriptedGenerator::always(FIFTY_CHARS);
    let platform = ScriptedPlatform::returning("abc123");
    let pipeline = orchestrator(backend.clone(), platform.clone());

    let result = pipeline
        .publish(&request("remote work trends", Tone::Educational))
        .await;

    assert_eq!(result.status(), PublishStatus::Success);
    assert_eq!(result.remote_post_id().unwrap().as_str(), "abc123");
    assert_eq!(result.reason(), None);
    assert_eq!(platform.posted(), vec![FIFTY_CHARS.to_string()]);

    let sent = backend.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].temperature, 0.4);
    assert_eq!(sent[0].max_tokens, 700);
    assert!(sent[0].prompt().unwrap().contains("remote work trends"));
}

#[tokio::test]
async fn generator_failure_never_reaches_the_platform() {
    let backend = ScriptedGenerator::failing(GenerationCause::Unauthorized);
    let platform = ScriptedPlatform::accepting();
    let pipeline = orchestrator(backend.clone(), platform.clone());

    let result = pipeline.publish(&request("hiring", Tone::Casual)).await;

    assert_eq!(result.status(), PublishStatus::Failed);
    assert_eq!(result.failure(), Some(FailureStage::Generation));
    assert!(result.reason().unwrap().contains("API key"));
    assert_eq!(platform.create_calls(), 0);
    // Unauthorized is not worth repeating
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn empty_generation_is_rejected_with_reason() {
    for text in ["", "   \n\t "] {
        let platform = ScriptedPlatform::accepting();
        let pipeline = orchestrator(ScriptedGenerator::always(text), platform.clone());

        let result = pipeline.publish(&request("hiring", Tone::Casual)).await;

        assert_eq!(result.status(), PublishStatus::Rejected);
        assert!(result.reason().unwrap().contains("empty"));
        assert_eq!(platform.create_calls(), 0);
    }
}

#[tokio::test]
async fn transient_failures_are_retried_until_success() {
    for n in 1..=3u32 {
        let failures = (1..n)
            .map(|_| Err(platform_error(PublisherErrorKind::Transient)))
            .collect();
        let platform = ScriptedPlatform::sequence(failures, Ok("abc123".to_string()));
        let pipeline = orchestrator(ScriptedGenerator::always(FIFTY_CHARS), platform.clone());

        let result = pipeline.publish(&request("hiring", Tone::Casual)).await;

        assert!(result.is_success(), "n = {}: {}", n, result);
        assert_eq!(platform.create_calls(), n as usize);
    }
}

#[tokio::test]
async fn transient_failures_beyond_the_budget_fail() {
    let platform = ScriptedPlatform::failing(PublisherErrorKind::Transient);
    let pipeline = orchestrator(ScriptedGenerator::always(FIFTY_CHARS), platform.clone());

    let result = pipeline.publish(&request("hiring", Tone::Casual)).await;

    assert_eq!(result.status(), PublishStatus::Failed);
    assert_eq!(
        result.failure(),
        Some(FailureStage::Publish(PublisherErrorKind::Transient))
    );
    assert_eq!(platform.create_calls(), 3);
}

#[tokio::test]
async fn ambiguous_create_is_never_repeated() {
    let platform = ScriptedPlatform::failing(PublisherErrorKind::Unknown);
    let pipeline = orchestrator(ScriptedGenerator::always(FIFTY_CHARS), platform.clone());

    let result = pipeline.publish(&request("hiring", Tone::Casual)).await;

    assert_eq!(result.status(), PublishStatus::Failed);
    assert!(result.outcome_unknown());
    assert_eq!(platform.create_calls(), 1);
}

#[tokio::test]
async fn permanent_and_auth_failures_are_not_retried() {
    for kind in [
        PublisherErrorKind::PermanentRejected,
        PublisherErrorKind::Unauthorized,
    ] {
        let platform = ScriptedPlatform::failing(kind);
        let pipeline = orchestrator(ScriptedGenerator::always(FIFTY_CHARS), platform.clone());

        let result = pipeline.publish(&request("hiring", Tone::Casual)).await;

        assert_eq!(result.failure(), Some(FailureStage::Publish(kind)));
        assert_eq!(platform.create_calls(), 1);
    }
}

#[tokio::test]
async fn rate_limit_hint_is_honoured_or_surfaced() {
    let short = platform_error(PublisherErrorKind::RateLimited)
        .with_retry_after(Some(Duration::from_millis(10)));
    let platform = ScriptedPlatform::sequence(vec![Err(short)], Ok("abc123".to_string()));
    let pipeline = orchestrator(ScriptedGenerator::always(FIFTY_CHARS), platform.clone());
    assert!(pipeline.publish(&request("a", Tone::Casual)).await.is_success());
    assert_eq!(platform.create_calls(), 2);

    // longer than the policy's 100ms ceiling
    let long = platform_error(PublisherErrorKind::RateLimited)
        .with_retry_after(Some(Duration::from_secs(30)));
    let platform = ScriptedPlatform::sequence(vec![Err(long)], Ok("abc123".to_string()));
    let pipeline = orchestrator(ScriptedGenerator::always(FIFTY_CHARS), platform.clone());
    let result = pipeline.publish(&request("a", Tone::Casual)).await;
    assert_eq!(
        result.failure(),
        Some(FailureStage::Publish(PublisherErrorKind::RateLimited))
    );
    assert_eq!(platform.create_calls(), 1);
}

#[tokio::test]
async fn retryable_generation_failure_is_retried_once() {
    let backend = ScriptedGenerator::sequence(
        vec![Err(GenerationCause::Transport("connection reset".into()))],
        Ok(FIFTY_CHARS.to_string()),
    );
    let platform = ScriptedPlatform::accepting();
    let pipeline = orchestrator(backend.clone(), platform.clone());

    let result = pipeline.publish(&request("a", Tone::Casual)).await;

    assert!(result.is_success());
    assert_eq!(backend.calls(), 2);

    let backend = ScriptedGenerator::failing(GenerationCause::Timeout(Duration::from_secs(1)));
    let pipeline = orchestrator(backend.clone(), ScriptedPlatform::accepting());
    let result = pipeline.publish(&request("a", Tone::Casual)).await;
    assert_eq!(result.failure(), Some(FailureStage::Generation));
    assert_eq!(backend.calls(), 2);
}

#[tokio::test]
async fn generation_retries_can_be_disabled() {
    let backend = ScriptedGenerator::failing(GenerationCause::Provider {
        status: 503,
        message: "overloaded".into(),
    });
    let pipeline = orchestrator_with(
        backend.clone(),
        ScriptedPlatform::accepting(),
        ValidationRules::default(),
        settings(0, RepairPolicy::Abort),
    );

    let result = pipeline.publish(&request("a", Tone::Casual)).await;

    assert_eq!(result.status(), PublishStatus::Failed);
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn over_long_draft_is_rejected_or_truncated_per_policy() {
    let long = "word ".repeat(40);
    let rules = ValidationRules {
        max_chars: 50,
        encoding: AcceptedEncoding::Unicode,
    };

    let platform = ScriptedPlatform::accepting();
    let pipeline = orchestrator_with(
        ScriptedGenerator::always(long.clone()),
        platform.clone(),
        rules.clone(),
        settings(1, RepairPolicy::Abort),
    );
    let result = pipeline.publish(&request("a", Tone::Casual)).await;
    assert_eq!(result.status(), PublishStatus::Rejected);
    assert!(result.text().is_some());
    assert_eq!(platform.create_calls(), 0);

    let platform = ScriptedPlatform::accepting();
    let pipeline = orchestrator_with(
        ScriptedGenerator::always(long),
        platform.clone(),
        rules,
        settings(1, RepairPolicy::Truncate),
    );
    let result = pipeline.publish(&request("a", Tone::Casual)).await;
    assert!(result.is_success(), "{}", result);
    let posted = &platform.posted()[0];
    assert!(posted.chars().count() <= 50);
    assert!(posted.ends_with("..."));
    assert!(!posted.contains("wo..."));
}

#[tokio::test]
async fn truncation_does_not_mask_other_violations() {
    let rules = ValidationRules {
        max_chars: 10,
        encoding: AcceptedEncoding::Ascii,
    };
    let platform = ScriptedPlatform::accepting();
    let pipeline = orchestrator_with(
        ScriptedGenerator::always("café café café café"),
        platform.clone(),
        rules,
        settings(1, RepairPolicy::Truncate),
    );

    let result = pipeline.publish(&request("a", Tone::Casual)).await;

    assert_eq!(result.status(), PublishStatus::Rejected);
    assert!(result.reason().unwrap().contains("ascii"));
    assert_eq!(platform.create_calls(), 0);
}

#[tokio::test]
async fn draft_validates_without_publishing() {
    let platform = ScriptedPlatform::accepting();
    let pipeline = orchestrator(ScriptedGenerator::always("  A tidy draft.  "), platform.clone());

    let post = pipeline
        .draft(&request("a", Tone::Professional))
        .await
        .unwrap();

    assert_eq!(post.text(), "A tidy draft.");
    assert_eq!(post.tone(), Some(Tone::Professional));
    assert_eq!(platform.create_calls(), 0);
}

#[tokio::test]
async fn user_text_is_validated_then_published() {
    let platform = ScriptedPlatform::returning("own-1");
    let pipeline = orchestrator(ScriptedGenerator::always("unused"), platform.clone());

    let result = pipeline.publish_text("My own words.").await;
    assert_eq!(result.remote_post_id().unwrap().as_str(), "own-1");

    let result = pipeline.publish_text("   ").await;
    assert_eq!(result.status(), PublishStatus::Rejected);
    assert_eq!(platform.create_calls(), 1);
}

#[tokio::test]
async fn text_publisher_works_without_a_generator() {
    let platform = ScriptedPlatform::returning("own-2");
    let poster = TextPublisher::new(PostValidator::default(), publisher(platform.clone(), 3));

    let result = poster.publish_text("Shipping on Friday.").await;

    assert!(result.is_success());
    assert_eq!(result.text(), Some("Shipping on Friday."));
}

#[tokio::test]
async fn post_url_is_derived_from_template() {
    let platform = ScriptedPlatform::returning("abc123");
    let pipeline = prompt2post::PublishOrchestrator::new(
        generator(ScriptedGenerator::always(FIFTY_CHARS)),
        PostValidator::default(),
        publisher(platform, 3)
            .with_post_url_template(Some("https://social.test/posts/{id}".to_string())),
        settings(1, RepairPolicy::Abort),
    );

    let result = pipeline.publish(&request("a", Tone::Casual)).await;

    assert_eq!(result.post_url(), Some("https://social.test/posts/abc123"));
}

#[tokio::test]
async fn cancelled_before_create_never_publishes() {
    let platform = ScriptedPlatform::accepting();
    let pipeline = orchestrator(
        ScriptedGenerator::slow(FIFTY_CHARS, Duration::from_millis(200)),
        platform.clone(),
    );
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        canceller.cancel();
    });

    let result = pipeline
        .publish_until_cancelled(&request("a", Tone::Casual), &token)
        .await;

    assert_eq!(result.failure(), Some(FailureStage::Cancelled));
    assert!(result.reason().unwrap().contains("cancelled"));
    assert!(!result.outcome_unknown());
    assert_eq!(platform.create_calls(), 0);
}

#[tokio::test]
async fn cancelled_during_create_reports_unknown_outcome() {
    let platform = ScriptedPlatform::slow(Duration::from_millis(500));
    let pipeline = orchestrator(ScriptedGenerator::always(FIFTY_CHARS), platform.clone());
    let token = CancellationToken::new();
    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let result = pipeline
        .publish_until_cancelled(&request("a", Tone::Casual), &token)
        .await;

    assert_eq!(result.status(), PublishStatus::Failed);
    assert!(result.outcome_unknown());
    assert_eq!(platform.create_calls(), 1);
}

#[tokio::test]
async fn uncancelled_token_behaves_like_publish() {
    let pipeline = orchestrator(
        ScriptedGenerator::always(FIFTY_CHARS),
        ScriptedPlatform::returning("abc123"),
    );
    let result = pipeline
        .publish_until_cancelled(&request("a", Tone::Casual), &CancellationToken::new())
        .await;
    assert!(result.is_success());
}

#[tokio::test]
async fn concurrent_requests_are_independent() {
    let platform = ScriptedPlatform::accepting();
    let pipeline = orchestrator(ScriptedGenerator::always(FIFTY_CHARS), platform.clone());

    let requests: Vec<_> = (0..8)
        .map(|i| request(&format!("topic {}", i), Tone::Inspirational))
        .collect();
    let results =
        futures::future::join_all(requests.iter().map(|r| pipeline.publish(r))).await;

    assert!(results.iter().all(|r| r.is_success()));
    let mut ids: Vec<_> = results
        .iter()
        .map(|r| r.remote_post_id().unwrap().to_string())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 8);
    assert_eq!(platform.create_calls(), 8);
}

#[tokio::test]
async fn presentation_boundary_parses_tone_selector() {
    let pipeline = orchestrator(
        ScriptedGenerator::always(FIFTY_CHARS),
        ScriptedPlatform::returning("abc123"),
    );
    let boundary: &dyn PostPipeline = &pipeline;

    let result = boundary
        .publish("remote work trends", "Educational")
        .await
        .unwrap();
    assert!(result.is_success());

    let err = boundary.publish("remote work trends", "sarcastic").await.unwrap_err();
    assert_eq!(err.0, "sarcastic");

    let blank = boundary.publish("   ", "casual").await.unwrap();
    assert_eq!(blank.failure(), Some(FailureStage::Generation));
}
