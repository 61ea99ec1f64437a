// src/main.rs
use anyhow::Context;
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use prompt2post::config::{Command, PublishArgs, TuningArgs};
use prompt2post::output::{deliver, DeliveryPlan, DeliveryTarget};
use prompt2post::{
    Advisor, AppError, ChatAssistant, ChatCompletionsClient, CommandLineInput, ContentGenerator,
    Drafter, GeneratorConfig, PlatformConfig, PlatformHttpClient, PostValidator,
    PublishOrchestrator, PublishResult, Publisher, RemotePostId, TextPublisher,
};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("prompt2post.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stdout_appender = ConsoleAppender::builder()
        .target(log4rs::append::console::Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] {t} - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("console", Box::new(stdout_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("console")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

fn build_generator(tuning: &TuningArgs) -> Result<ContentGenerator, AppError> {
    let config = GeneratorConfig::resolve(tuning.generation_timeout())?;
    let backend = Arc::new(ChatCompletionsClient::new(config)?);
    ContentGenerator::new(backend, tuning.generation_timeout())
}

fn build_publisher(tuning: &TuningArgs) -> Result<Publisher, AppError> {
    let config = PlatformConfig::resolve(tuning.platform_timeout())?;
    let template = config.post_url_template.clone();
    let api = Arc::new(PlatformHttpClient::new(config)?);
    Ok(Publisher::new(api, tuning.retry_policy()?).with_post_url_template(template))
}

/// Writes the post text wherever the user asked for it.
fn deliver_text(text: &str, clipboard: bool, output_file: Option<&PathBuf>) -> Result<(), AppError> {
    let mut plan = DeliveryPlan::new().with_target_if(clipboard, DeliveryTarget::CopyToClipboard {
        content: text.to_string(),
    });
    if let Some(path) = output_file {
        plan = plan.with_target(DeliveryTarget::WriteFile {
            path: path.clone(),
            content: text.to_string(),
        });
    }
    if plan.is_empty() {
        return Ok(());
    }

    let report = deliver(plan).into_result()?;
    for delivered in &report.delivered {
        println!("✓ Post text sent to {}", delivered.target);
    }
    Ok(())
}

fn print_result(result: &PublishResult) {
    if result.is_success() {
        println!("✓ Published: {}", result);
        if let Some(url) = result.post_url() {
            println!("  {}", url);
        }
        return;
    }

    eprintln!("✗ {}", result);
    if result.outcome_unknown() {
        eprintln!("  The post may have been created. Check the platform before trying again.");
    }
    if let Some(text) = result.text() {
        eprintln!("\n--- rejected draft ---\n{}", text);
    }
}

async fn run_publish(args: &PublishArgs, tuning: &TuningArgs) -> anyhow::Result<()> {
    let request = args.to_request()?;
    let generator = build_generator(tuning)?;
    let validator = PostValidator::new(tuning.validation_rules()?);
    let settings = tuning.pipeline_settings()?;

    if args.dry_run {
        let drafter = Drafter::new(generator, validator, settings);
        let post = drafter
            .draft(&request)
            .await
            .map_err(|failure| anyhow::anyhow!(PublishResult::from(failure).to_string()))?;
        deliver(DeliveryPlan::new().with_target(DeliveryTarget::PrintToStdout {
            content: post.text().to_string(),
        }))
        .into_result()?;
        deliver_text(post.text(), args.clipboard, args.output_file.as_ref())?;
        return Ok(());
    }

    let orchestrator =
        PublishOrchestrator::new(generator, validator, build_publisher(tuning)?, settings);
    let result = orchestrator.publish(&request).await;
    print_result(&result);

    if let Some(text) = result.text() {
        deliver_text(text, args.clipboard, args.output_file.as_ref())?;
    }
    if !result.is_success() {
        anyhow::bail!("publishing did not succeed ({})", result.status());
    }
    Ok(())
}

async fn run_post(
    text: Option<&str>,
    file: Option<&PathBuf>,
    tuning: &TuningArgs,
) -> anyhow::Result<()> {
    let text = match (text, file) {
        (Some(text), _) => text.to_string(),
        (None, Some(path)) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        (None, None) => anyhow::bail!("either TEXT or --file is required"),
    };

    let poster = TextPublisher::new(
        PostValidator::new(tuning.validation_rules()?),
        build_publisher(tuning)?,
    );
    let result = poster.publish_text(&text).await;
    print_result(&result);
    if !result.is_success() {
        anyhow::bail!("publishing did not succeed ({})", result.status());
    }
    Ok(())
}

async fn run_ask(question: &str, tuning: &TuningArgs) -> anyhow::Result<()> {
    let assistant = ChatAssistant::new(build_generator(tuning)?);
    let advice = Advisor::ask(&assistant, question).await?;
    println!("{}", advice);
    Ok(())
}

async fn run_delete(id: &str, tuning: &TuningArgs) -> anyhow::Result<()> {
    let id = RemotePostId::new(id)?;
    build_publisher(tuning)?.delete_post(&id).await?;
    println!("✓ Deleted post {}", id);
    Ok(())
}

async fn run_profile(tuning: &TuningArgs) -> anyhow::Result<()> {
    let profile = build_publisher(tuning)?.verify_connection().await?;
    println!("✓ Connected as {}", profile.display_name());
    if let Some(headline) = &profile.headline {
        println!("  {}", headline);
    }
    if let Some(email) = &profile.email {
        println!("  {}", email);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose).context("failed to initialise logging")?;

    match &cli.command {
        Command::Publish(args) => run_publish(args, &cli.tuning).await,
        Command::Post { text, file } => {
            run_post(text.as_deref(), file.as_ref(), &cli.tuning).await
        }
        Command::Ask { question } => run_ask(&question.join(" "), &cli.tuning).await,
        Command::Delete { id } => run_delete(id, &cli.tuning).await,
        Command::Profile => run_profile(&cli.tuning).await,
    }
}
