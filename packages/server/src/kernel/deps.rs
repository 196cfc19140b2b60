//! Production dependencies for the pipeline.
//!
//! Every collaborator is built once here and shared by all runs; the
//! pipeline itself holds nothing per-run.

use std::sync::Arc;

use anthropic_client::AnthropicClient;
use extraction::{
    AnthropicBackend, AnthropicNormalizer, FrankfurterRates, LlmClassifier, Pipeline,
    PipelineConfig,
};
use resend::{ResendOptions, ResendService};
use secrecy::ExposeSecret;

use crate::config::Config;
use crate::delivery::{CallbackDelivery, CompositeDelivery, EmailDelivery};

/// Pipeline configuration taken from the server config.
pub fn pipeline_config(config: &Config) -> PipelineConfig {
    PipelineConfig::new()
        .with_stage_cooldown(config.stage_cooldown)
        .with_run_timeout(config.run_timeout)
        .with_home_currency(config.home_currency.as_str())
}

/// Email first, then the callback.
pub fn build_delivery(config: &Config) -> CompositeDelivery {
    let resend = ResendService::new(ResendOptions {
        api_key: config.resend_api_key.expose_secret().to_string(),
        from: config.from_email.clone(),
        to: config.recipients(),
    });

    CompositeDelivery::new()
        .with("email", Arc::new(EmailDelivery::new(resend)))
        .with(
            "callback",
            Arc::new(CallbackDelivery::new(config.callback_timeout)),
        )
}

/// Build the pipeline with Anthropic models, Frankfurter rates and
/// Resend + callback delivery.
pub fn build_pipeline(config: &Config) -> Pipeline {
    let client = AnthropicClient::new(config.anthropic_api_key.expose_secret());

    let backend = Arc::new(
        AnthropicBackend::new(client.clone())
            .with_fast_model(config.fast_model.as_str())
            .with_accurate_model(config.extraction_model.as_str()),
    );
    let normalizer =
        Arc::new(AnthropicNormalizer::new(client).with_model(config.fast_model.as_str()));
    let classifier = Arc::new(LlmClassifier::new(backend.clone()));
    let rates = Arc::new(FrankfurterRates::new().with_base_url(config.rate_source_url.as_str()));

    Pipeline::new(
        backend,
        normalizer,
        classifier,
        rates,
        Arc::new(build_delivery(config)),
    )
    .with_config(pipeline_config(config))
}
