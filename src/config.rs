// src/config.rs
//! Command-line input and resolved configuration.
//!
//! Secrets and endpoints come from the environment; tunables come from
//! flags. Everything is resolved up front into explicit config objects that
//! are handed to constructors.

use crate::constants::{
    DEFAULT_BASE_DELAY, DEFAULT_GENERATION_RETRIES, DEFAULT_GENERATION_TIMEOUT,
    DEFAULT_GENERATOR_BASE_URL, DEFAULT_GENERATOR_MODEL, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DELAY,
    DEFAULT_MAX_POST_CHARS, DEFAULT_MAX_RETRY_AFTER, DEFAULT_PLATFORM_TIMEOUT,
};
use crate::error::AppError;
use crate::error_recovery::RetryPolicy;
use crate::model::{GenerationRequest, PostOptions};
use crate::orchestrator::{PipelineSettings, RepairPolicy};
use crate::types::{
    parse_constraint, AccessToken, ApiKey, ModelName, PostLength, Tone, Topic, ValidatedUrl,
};
use crate::validator::{AcceptedEncoding, ValidationRules};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_GENERATOR_API_KEY: &str = "GENERATOR_API_KEY";
pub const ENV_GENERATOR_BASE_URL: &str = "GENERATOR_BASE_URL";
pub const ENV_GENERATOR_MODEL: &str = "GENERATOR_MODEL";
pub const ENV_PLATFORM_ACCESS_TOKEN: &str = "PLATFORM_ACCESS_TOKEN";
pub const ENV_PLATFORM_API_URL: &str = "PLATFORM_API_URL";
pub const ENV_PLATFORM_POST_URL_TEMPLATE: &str = "PLATFORM_POST_URL_TEMPLATE";

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(flatten)]
    pub tuning: TuningArgs,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a post about a topic and publish it
    Publish(PublishArgs),

    /// Validate and publish your own text
    Post {
        /// Post text (reads --file when omitted)
        #[arg(required_unless_present = "file")]
        text: Option<String>,

        /// Read the post text from a file
        #[arg(short, long, conflicts_with = "text")]
        file: Option<PathBuf>,
    },

    /// Ask the content-strategy assistant a question
    Ask {
        /// The question; several words are joined with spaces
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },

    /// Delete a published post
    Delete {
        /// Id returned when the post was created
        id: String,
    },

    /// Show the authenticated profile and check the access token
    Profile,
}

#[derive(Args, Debug, Clone)]
pub struct PublishArgs {
    /// What the post should be about
    pub topic: String,

    /// Writing tone: professional, casual, inspirational or educational
    #[arg(short, long, default_value = "professional")]
    pub tone: String,

    /// Post length: short, medium or long
    #[arg(short, long, default_value = "medium")]
    pub length: PostLength,

    /// Do not ask for hashtags
    #[arg(long, default_value_t = false)]
    pub no_hashtags: bool,

    /// Do not ask for a call to action
    #[arg(long = "no-cta", default_value_t = false)]
    pub no_call_to_action: bool,

    /// Do not ask for emojis
    #[arg(long, default_value_t = false)]
    pub no_emojis: bool,

    /// Intended audience, e.g. "engineering managers"
    #[arg(long)]
    pub audience: Option<String>,

    /// Extra instruction as NAME=VALUE; repeatable, kept in order
    #[arg(short = 'c', long = "constraint", value_name = "NAME=VALUE")]
    pub constraints: Vec<String>,

    /// Generate and validate only; print the draft instead of publishing
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Copy the post text to the clipboard
    #[arg(short = 'b', long, default_value_t = false)]
    pub clipboard: bool,

    /// Also write the post text to this file
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,
}

impl PublishArgs {
    /// Builds the generation request; fails on an unknown tone, a blank
    /// topic or a malformed constraint.
    pub fn to_request(&self) -> Result<GenerationRequest, AppError> {
        let tone: Tone = self.tone.parse()?;
        let topic = Topic::new(self.topic.as_str())?;

        let options = PostOptions {
            hashtags: !self.no_hashtags,
            call_to_action: !self.no_call_to_action,
            emojis: !self.no_emojis,
            audience: self
                .audience
                .as_deref()
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string),
        };

        let mut request = GenerationRequest::new(topic, tone)
            .with_length(self.length)
            .with_options(options);
        for raw in &self.constraints {
            let (name, value) = parse_constraint(raw)?;
            request = request.with_constraint(name, value);
        }
        Ok(request)
    }
}

/// Validation, retry and timeout tunables shared by all subcommands.
#[derive(Args, Debug, Clone)]
pub struct TuningArgs {
    /// Maximum post length in characters
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_POST_CHARS)]
    pub max_chars: usize,

    /// Accepted character set: unicode, latin1 or ascii
    #[arg(long, global = true, default_value = "unicode")]
    pub encoding: AcceptedEncoding,

    /// What to do with an over-long draft: truncate or abort
    #[arg(long, global = true, default_value = "abort")]
    pub repair: RepairPolicy,

    /// Extra generation attempts after a retryable provider failure
    #[arg(long, global = true, default_value_t = DEFAULT_GENERATION_RETRIES)]
    pub generation_retries: u32,

    /// Attempts per platform call, including the first
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// First retry delay in milliseconds
    #[arg(long, global = true, default_value_t = DEFAULT_BASE_DELAY.as_millis() as u64)]
    pub base_delay_ms: u64,

    /// Upper bound for a single retry delay in milliseconds
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DELAY.as_millis() as u64)]
    pub max_delay_ms: u64,

    /// Longest Retry-After (seconds) the client is willing to wait
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_RETRY_AFTER.as_secs())]
    pub max_retry_after_secs: u64,

    /// Generation timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_GENERATION_TIMEOUT.as_secs())]
    pub generation_timeout_secs: u64,

    /// Platform request timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_PLATFORM_TIMEOUT.as_secs())]
    pub platform_timeout_secs: u64,
}

impl Default for TuningArgs {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_POST_CHARS,
            encoding: AcceptedEncoding::default(),
            repair: RepairPolicy::default(),
            generation_retries: DEFAULT_GENERATION_RETRIES,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay_ms: DEFAULT_BASE_DELAY.as_millis() as u64,
            max_delay_ms: DEFAULT_MAX_DELAY.as_millis() as u64,
            max_retry_after_secs: DEFAULT_MAX_RETRY_AFTER.as_secs(),
            generation_timeout_secs: DEFAULT_GENERATION_TIMEOUT.as_secs(),
            platform_timeout_secs: DEFAULT_PLATFORM_TIMEOUT.as_secs(),
        }
    }
}

impl TuningArgs {
    pub fn validation_rules(&self) -> Result<ValidationRules, AppError> {
        if self.max_chars == 0 {
            return Err(AppError::InvalidConfiguration(
                "--max-chars must be greater than zero".to_string(),
            ));
        }
        Ok(ValidationRules {
            max_chars: self.max_chars,
            encoding: self.encoding,
        })
    }

    pub fn retry_policy(&self) -> Result<RetryPolicy, AppError> {
        if self.max_attempts == 0 {
            return Err(AppError::InvalidConfiguration(
                "--max-attempts must be at least 1".to_string(),
            ));
        }
        if self.base_delay_ms > self.max_delay_ms {
            return Err(AppError::InvalidConfiguration(format!(
                "--base-delay-ms ({}) exceeds --max-delay-ms ({})",
                self.base_delay_ms, self.max_delay_ms
            )));
        }
        Ok(RetryPolicy {
            max_attempts: self.max_attempts,
            base_delay: Duration::from_millis(self.base_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            max_retry_after: Duration::from_secs(self.max_retry_after_secs),
            jitter: true,
        })
    }

    pub fn pipeline_settings(&self) -> Result<PipelineSettings, AppError> {
        Ok(PipelineSettings {
            generation_retries: self.generation_retries,
            repair: self.repair,
            generation_backoff: self.retry_policy()?,
        })
    }

    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    pub fn platform_timeout(&self) -> Duration {
        Duration::from_secs(self.platform_timeout_secs)
    }
}

/// Connection settings for the text-generation service.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub base_url: ValidatedUrl,
    pub api_key: ApiKey,
    pub model: ModelName,
    pub timeout: Duration,
}

impl GeneratorConfig {
    /// Reads the generator settings from the process environment.
    pub fn resolve(timeout: Duration) -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok(), timeout)
    }

    /// Reads the generator settings through `lookup`.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let api_key = ApiKey::new(require(&lookup, ENV_GENERATOR_API_KEY)?)?;
        let base_url = ValidatedUrl::parse(
            &optional(&lookup, ENV_GENERATOR_BASE_URL)
                .unwrap_or_else(|| DEFAULT_GENERATOR_BASE_URL.to_string()),
        )?;
        let model = ModelName::new(
            optional(&lookup, ENV_GENERATOR_MODEL)
                .unwrap_or_else(|| DEFAULT_GENERATOR_MODEL.to_string()),
        )?;

        log::debug!(
            "Generator: {} model {} (key {})",
            base_url,
            model,
            api_key
        );
        Ok(Self {
            base_url,
            api_key,
            model,
            timeout,
        })
    }
}

/// Connection settings for the publishing platform.
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    pub api_url: ValidatedUrl,
    pub access_token: AccessToken,
    pub timeout: Duration,
    /// Public post link with an `{id}` placeholder
    pub post_url_template: Option<String>,
}

impl PlatformConfig {
    /// Reads the platform settings from the process environment.
    pub fn resolve(timeout: Duration) -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok(), timeout)
    }

    /// Reads the platform settings through `lookup`.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        timeout: Duration,
    ) -> Result<Self, AppError> {
        let access_token = AccessToken::new(require(&lookup, ENV_PLATFORM_ACCESS_TOKEN)?)?;
        let api_url = ValidatedUrl::parse(&require(&lookup, ENV_PLATFORM_API_URL)?)?;

        let post_url_template = optional(&lookup, ENV_PLATFORM_POST_URL_TEMPLATE);
        if let Some(template) = &post_url_template {
            if !template.contains("{id}") {
                return Err(AppError::InvalidConfiguration(format!(
                    "{} must contain an {{id}} placeholder",
                    ENV_PLATFORM_POST_URL_TEMPLATE
                )));
            }
        }

        log::debug!("Platform: {} (token {})", api_url, access_token);
        Ok(Self {
            api_url,
            access_token,
            timeout,
            post_url_template,
        })
    }
}

fn optional(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn require(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<String, AppError> {
    optional(lookup, name).ok_or_else(|| {
        AppError::MissingConfiguration(format!("{} environment variable not set", name))
    })
}
