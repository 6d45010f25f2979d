use tracing::subscriber::set_global_default;
use tracing::Subscriber;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{fmt::MakeWriter, layer::SubscriberExt, EnvFilter, Registry};

/// Builds the subscriber: human readable lines by default, Bunyan JSON when
/// `json` is set. `RUST_LOG` wins over `env_filter`.
pub fn get_subscriber<Sink>(
    name: impl Into<String>,
    env_filter: impl Into<String>,
    sink: Sink,
    json: bool,
) -> impl Subscriber + Sync + Send
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter.into()));
    let (bunyan_layer, formatting_layer) = if json {
        (Some(BunyanFormattingLayer::new(name.into(), sink)), None)
    } else {
        let formatting_layer = tracing_subscriber::fmt::Layer::new()
            .with_writer(sink)
            .with_target(false)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_ansi(true)
            .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339());
        (None, Some(formatting_layer))
    };
    Registry::default()
        .with(env_filter)
        .with(json.then_some(JsonStorageLayer))
        .with(bunyan_layer)
        .with(formatting_layer)
}

pub fn init_subscriber(subscriber: impl Subscriber + Sync + Send) {
    LogTracer::init().expect("Failed to initialize logger");
    set_global_default(subscriber).expect("Failed to set subscriber");
}
