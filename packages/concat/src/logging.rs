//! Tracing setup for binaries and tests embedding the concatenator.

use fluent_voice_domain::VoiceError;
use tracing_subscriber::{
    EnvFilter, filter::Directive, layer::SubscriberExt, util::SubscriberInitExt,
};

/// Default filter directive.
pub const DEFAULT_DIRECTIVE: &str = "fluent_voice_concat=info";

/// Install a global `fmt` subscriber filtered by `RUST_LOG` plus `directive`.
///
/// Only fails on a malformed directive; an already installed subscriber is
/// left in place.
pub fn init_logging(directive: Option<&str>) -> Result<(), VoiceError> {
    let directive = directive
        .unwrap_or(DEFAULT_DIRECTIVE)
        .parse::<Directive>()
        .map_err(|e| VoiceError::Configuration(format!("Failed to parse tracing directive: {e}")))?;

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(directive))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .try_init();
    Ok(())
}
