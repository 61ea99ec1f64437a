// src/constants.rs
//! Default values for the operational boundaries of the system.
//!
//! None of these are baked into the components themselves: each one is the
//! default of a configuration field that callers may override.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Generation service
// ---------------------------------------------------------------------------

/// OpenAI-compatible endpoint used when `GENERATOR_BASE_URL` is unset.
pub const DEFAULT_GENERATOR_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Model used when `GENERATOR_MODEL` is unset.
pub const DEFAULT_GENERATOR_MODEL: &str = "llama-3.3-70b-versatile";

/// Upper bound on a single completion call.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// How many times the orchestrator repeats a failed generation.
pub const DEFAULT_GENERATION_RETRIES: u32 = 1;

// ---------------------------------------------------------------------------
// Platform API
// ---------------------------------------------------------------------------

/// Upper bound on a single platform API call.
pub const DEFAULT_PLATFORM_TIMEOUT: Duration = Duration::from_secs(30);

/// Character limit applied when the platform limit is not configured.
pub const DEFAULT_MAX_POST_CHARS: usize = 3000;

// ---------------------------------------------------------------------------
// Retry policy
// ---------------------------------------------------------------------------

/// Total attempts, including the first, for retryable platform failures.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Delay before the first retry; doubles on every further attempt.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_secs(1);

/// Ceiling for the exponential backoff delay.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(30);

/// Longest server Retry-After hint the client is willing to sleep through.
pub const DEFAULT_MAX_RETRY_AFTER: Duration = Duration::from_secs(60);

// ---------------------------------------------------------------------------
// Chat assistant
// ---------------------------------------------------------------------------

/// Number of past messages resent with each chat question.
pub const CHAT_HISTORY_LIMIT: usize = 20;

/// Completion budget for advisory answers.
pub const ADVICE_MAX_TOKENS: u32 = 800;

/// Sampling temperature for advisory answers.
pub const ADVICE_TEMPERATURE: f32 = 0.7;

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;

/// Marker appended to drafts shortened by the truncate repair.
pub const TRUNCATION_MARKER: &str = "...";
