//! Tracing subscriber and OpenTelemetry setup for binaries.

use opentelemetry::KeyValue;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::{
    Resource,
    trace::{RandomIdGenerator, Sampler, TracerProvider},
};
use opentelemetry_stdout::SpanExporter;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// What [`init_telemetry`] installs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TelemetryOptions {
    /// Log at debug instead of info when `RUST_LOG` is unset
    pub verbose: bool,
    /// Also export spans to stdout through OpenTelemetry
    pub export_spans: bool,
}

impl TelemetryOptions {
    fn default_directive(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_directive()))
    }
}

/// Installs the global tracing subscriber.
///
/// Human-readable logs always go to stderr-style fmt output. With
/// `export_spans`, generation spans (submit, each status check, node
/// transitions) are also exported to stdout under the `atelier` service
/// name. `RUST_LOG` overrides the level chosen by `verbose`.
///
/// # Errors
///
/// Returns error if a global subscriber is already installed.
pub fn init_telemetry(options: TelemetryOptions) -> Result<(), Box<dyn std::error::Error>> {
    let span_layer = if options.export_spans {
        let provider = TracerProvider::builder()
            .with_simple_exporter(SpanExporter::default())
            .with_id_generator(RandomIdGenerator::default())
            .with_sampler(Sampler::AlwaysOn)
            .with_resource(Resource::new(vec![KeyValue::new("service.name", "atelier")]))
            .build();
        let tracer = provider.tracer("atelier");
        opentelemetry::global::set_tracer_provider(provider);

        Some(
            tracing_opentelemetry::layer()
                .with_tracer(tracer)
                .with_filter(options.filter()),
        )
    } else {
        None
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_filter(options.filter());

    tracing_subscriber::registry()
        .with(span_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Flushes exported spans. A no-op when spans were not exported.
pub fn shutdown_telemetry() {
    opentelemetry::global::shutdown_tracer_provider();
}
