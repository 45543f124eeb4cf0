//! Demo Artifact Writer
//!
//! Writes the toy SPAM/HAM artifact set so the server can run without a
//! trained model.
//!
//! Usage: `demo-artifacts [DIR]` (default: `models`)

use spam_classifier::models::demo::write_demo_artifacts;
use tracing::info;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("spam_classifier=info".parse()?)
                .add_directive("demo_artifacts=info".parse()?),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let dir = args.get(1).map(|s| s.as_str()).unwrap_or("models");

    let paths = write_demo_artifacts(dir)?;

    info!(
        classifier = %paths.classifier.display(),
        vectorizer = %paths.vectorizer.display(),
        "Demo artifacts ready; start the server with artifacts.dir = {:?}",
        dir
    );

    Ok(())
}
