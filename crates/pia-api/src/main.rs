use std::env;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use pia_aggregate::translate::{JsonTranslator, KeyTranslator, Translator};
use pia_api::state::AppState;
use pia_storage::s3::S3Store;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let bucket = env::var("PIA_BUCKET").unwrap_or_else(|_| "pia".to_string());

    // Labels stay as lookup keys unless a translation file is configured.
    let translator: Arc<dyn Translator> = match env::var("PIA_TRANSLATIONS") {
        Ok(path) => {
            let json = std::fs::read_to_string(&path)
                .map_err(|e| eyre::eyre!("failed to read translations at {path}: {e}"))?;
            tracing::info!(path = %path, "loaded translations");
            Arc::new(JsonTranslator::from_json(&json)?)
        }
        Err(_) => Arc::new(KeyTranslator),
    };

    let s3 = pia_storage::client::build_client().await;
    let store = Arc::new(S3Store::new(s3, bucket.clone()));
    tracing::info!(bucket = %bucket, "pia api starting");

    let app = pia_api::router(AppState::new(store, translator));

    lambda_http::run(app).await.map_err(|e| eyre::eyre!(e))
}
