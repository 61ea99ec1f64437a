// tests/common/mod.rs
//! Scripted stand-ins for the generation service and the platform API.
#![allow(dead_code)]

use parking_lot::Mutex;
use prompt2post::{
    Completion, CompletionRequest, ContentGenerator, GenerationCause, GenerationError,
    GenerationRequest, PipelineSettings, PlatformApi, PostValidator, Profile, PublishOrchestrator,
    Publisher, PublisherError, PublisherErrorKind, RemotePostId, RepairPolicy, RetryPolicy,
    TextGenerator, Tone, Topic, ValidationRules,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Generator that replays scripted outcomes, then repeats a fallback.
pub struct ScriptedGenerator {
    script: Mutex<VecDeque<Result<String, GenerationCause>>>,
    fallback: Result<String, GenerationCause>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedGenerator {
    pub fn always(text: impl Into<String>) -> Arc<Self> {
        Self::build(Vec::new(), Ok(text.into()), None)
    }

    pub fn failing(cause: GenerationCause) -> Arc<Self> {
        Self::build(Vec::new(), Err(cause), None)
    }

    /// Plays `script` in order, then answers `then` forever.
    pub fn sequence(
        script: Vec<Result<String, GenerationCause>>,
        then: Result<String, GenerationCause>,
    ) -> Arc<Self> {
        Self::build(script, then, None)
    }

    pub fn slow(text: impl Into<String>, delay: Duration) -> Arc<Self> {
        Self::build(Vec::new(), Ok(text.into()), Some(delay))
    }

    fn build(
        script: Vec<Result<String, GenerationCause>>,
        fallback: Result<String, GenerationCause>,
        delay: Option<Duration>,
    ) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            fallback,
            delay,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait::async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let next = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        next.map(|text| Completion {
            text,
            model: Some("scripted".to_string()),
        })
        .map_err(GenerationError::new)
    }
}

/// Platform that replays scripted create outcomes and counts every call.
pub struct ScriptedPlatform {
    creates: Mutex<VecDeque<Result<String, PublisherError>>>,
    create_fallback: Result<String, PublisherError>,
    create_delay: Option<Duration>,
    create_calls: AtomicUsize,
    delete_calls: AtomicUsize,
    profile_calls: AtomicUsize,
    posted: Mutex<Vec<String>>,
}

impl ScriptedPlatform {
    /// Every create succeeds with ids `post-1`, `post-2`, ...
    pub fn accepting() -> Arc<Self> {
        Self::build(Vec::new(), Ok(String::new()), None)
    }

    pub fn returning(id: &str) -> Arc<Self> {
        Self::build(Vec::new(), Ok(id.to_string()), None)
    }

    pub fn failing(kind: PublisherErrorKind) -> Arc<Self> {
        Self::build(Vec::new(), Err(platform_error(kind)), None)
    }

    pub fn sequence(
        script: Vec<Result<String, PublisherError>>,
        then: Result<String, PublisherError>,
    ) -> Arc<Self> {
        Self::build(script, then, None)
    }

    pub fn slow(delay: Duration) -> Arc<Self> {
        Self::build(Vec::new(), Ok(String::new()), Some(delay))
    }

    fn build(
        script: Vec<Result<String, PublisherError>>,
        fallback: Result<String, PublisherError>,
        create_delay: Option<Duration>,
    ) -> Arc<Self> {
        Arc::new(Self {
            creates: Mutex::new(script.into()),
            create_fallback: fallback,
            create_delay,
            create_calls: AtomicUsize::new(0),
            delete_calls: AtomicUsize::new(0),
            profile_calls: AtomicUsize::new(0),
            posted: Mutex::new(Vec::new()),
        })
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn profile_calls(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }

    /// Texts received by successful creates, in order.
    pub fn posted(&self) -> Vec<String> {
        self.posted.lock().clone()
    }
}

#[async_trait::async_trait]
impl PlatformApi for ScriptedPlatform {
    async fn create_post(&self, text: &str) -> Result<RemotePostId, PublisherError> {
        let call = self.create_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(delay) = self.create_delay {
            tokio::time::sleep(delay).await;
        }

        let next = self
            .creates
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.create_fallback.clone());
        let id = next?;
        let id = if id.is_empty() {
            format!("post-{}", call)
        } else {
            id
        };
        self.posted.lock().push(text.to_string());
        Ok(RemotePostId::new(id).unwrap())
    }

    async fn delete_post(&self, _id: &RemotePostId) -> Result<(), PublisherError> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn fetch_profile(&self) -> Result<Profile, PublisherError> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Profile {
            id: "member-1".to_string(),
            name: "Ada Lovelace".to_string(),
            headline: Some("Analyst".to_string()),
            email: None,
            picture_url: None,
            vanity_name: Some("ada".to_string()),
        })
    }
}

pub fn platform_error(kind: PublisherErrorKind) -> PublisherError {
    PublisherError::new(kind, format!("scripted {} failure", kind))
}

/// Millisecond-scale backoff so retry tests stay fast.
pub fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(5),
        max_retry_after: Duration::from_millis(100),
        jitter: false,
    }
}

pub fn settings(generation_retries: u32, repair: RepairPolicy) -> PipelineSettings {
    PipelineSettings {
        generation_retries,
        repair,
        generation_backoff: fast_policy(1),
    }
}

pub fn generator(backend: Arc<ScriptedGenerator>) -> ContentGenerator {
    ContentGenerator::new(backend, Duration::from_secs(5)).unwrap()
}

pub fn publisher(platform: Arc<ScriptedPlatform>, max_attempts: u32) -> Publisher {
    Publisher::new(platform, fast_policy(max_attempts))
}

pub fn orchestrator_with(
    backend: Arc<ScriptedGenerator>,
    platform: Arc<ScriptedPlatform>,
    rules: ValidationRules,
    settings: PipelineSettings,
) -> PublishOrchestrator {
    PublishOrchestrator::new(
        generator(backend),
        PostValidator::new(rules),
        publisher(platform, 3),
        settings,
    )
}

pub fn orchestrator(
    backend: Arc<ScriptedGenerator>,
    platform: Arc<ScriptedPlatform>,
) -> PublishOrchestrator {
    orchestrator_with(
        backend,
        platform,
        ValidationRules::default(),
        settings(1, RepairPolicy::Abort),
    )
}

pub fn request(topic: &str, tone: Tone) -> GenerationRequest {
    GenerationRequest::new(Topic::new(topic).unwrap(), tone)
}
