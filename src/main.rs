use std::{path::Path, sync::Arc};

use anyhow::{Context, Result, bail};
use tokio::io::AsyncReadExt;

use bti_assistant::{
    analysis::{Analyzer, telemetry::TracingTelemetrySink},
    cli::{DEFAULT_CONFIG_PATH, args_from_env},
    config::Config,
    logging::init_tracing,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = args_from_env()?;
    let config = Config::load_or_default(args.config_path.as_deref(), Path::new(DEFAULT_CONFIG_PATH))
        .context("failed to load config")?;
    let _logging = init_tracing(&config.logging)?;

    let question = match args.question {
        Some(question) => question,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .context("failed to read question from stdin")?;
            buffer
        }
    };
    if question.trim().is_empty() {
        bail!("question is empty");
    }

    let analyzer = Analyzer::new(config.analysis, Arc::new(TracingTelemetrySink))
        .context("failed to construct analyzer")?;
    let verdict = match args.key.as_deref() {
        Some(key) => analyzer.analyze_with_key(&question, key).await,
        None => analyzer.analyze(&question).await,
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&verdict).context("failed to encode verdict")?
    );
    Ok(())
}
