use std::io;
use std::time::Instant;

use anyhow::Context;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{Layer, Registry, filter, fmt};

use crate::cli;

/// Reports how long each rewrite pass took.
struct SpanTimingLayer;

impl<S> tracing_subscriber::Layer<S> for SpanTimingLayer
where
    S: tracing::Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_enter(&self, id: &tracing::span::Id, ctx: tracing_subscriber::layer::Context<'_, S>) {
        if let Some(span) = ctx.span(id) {
            if span.extensions().get::<Instant>().is_none() {
                span.extensions_mut().insert(Instant::now());
            }
        }
    }

    fn on_close(&self, id: tracing::span::Id, ctx: tracing_subscriber::layer::Context<'_, S>) {
        if let Some(span) = ctx.span(&id)
            && let Some(start) = span.extensions().get::<Instant>()
            && ctx.enabled(span.metadata())
        {
            let duration = start.elapsed();
            let name = span.name();
            tracing::info!(target: "timing", span = name, span.duration = ?duration);
        }
    }
}

pub fn start(config: &cli::Config) -> anyhow::Result<()> {
    let fmt_filter = filter::Targets::new().with_default(config.log);
    let fmt = fmt::layer().with_writer(io::stderr).with_filter(fmt_filter);

    let timing_filter = filter::Targets::new()
        .with_target("instrumenting", config.log)
        .with_default(LevelFilter::OFF);
    let timing = SpanTimingLayer.with_filter(timing_filter);

    let subscriber = Registry::default().with(fmt).with(timing);
    tracing::subscriber::set_global_default(subscriber).context("Failed to install the logger")
}
