use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use leaf_doctor::{
    catalog::Catalog,
    config::{Config, LogFormat},
    model::Classifier,
    routes::{self, AppState},
    utils::ensure_model_exists,
};

fn init_tracing(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "leaf_doctor=debug,tower_http=info".into());

    match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_level(true),
            )
            .init(),
    }
}

#[cfg(feature = "tensorflow")]
fn load_classifier(config: &Config) -> anyhow::Result<Arc<dyn Classifier>> {
    let classifier =
        leaf_doctor::model::TensorflowClassifier::load(&config.model_path, &config.input_op, &config.output_op)
            .with_context(|| format!("failed to load model from {}", config.model_path.display()))?;
    Ok(Arc::new(classifier))
}

#[cfg(not(feature = "tensorflow"))]
fn load_classifier(_config: &Config) -> anyhow::Result<Arc<dyn Classifier>> {
    anyhow::bail!("built without the `tensorflow` feature, no classifier backend available")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    ensure_model_exists(&config.model_path, config.model_url.as_deref())
        .await
        .context("model file unavailable")?;
    let classifier = load_classifier(&config)?;

    let catalog = Catalog::builtin();
    info!(diseases = catalog.len(), "disease catalog ready");

    let state = Arc::new(AppState {
        classifier,
        catalog,
    });
    let app = routes::app(state, config.body_limit_bytes);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(%addr, "listening");
    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .context("server error")?;

    Ok(())
}
