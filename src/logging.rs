/// Per-invocation tracing subscriber: stderr logging plus optional profiling.
use tracing::Subscriber;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::cli::DebugArgs;
use crate::config::LOG_ENV;
use crate::profile::ProfileLayer;

/// Build the log filter from the debug toggles.
///
/// `--debug` forces `debug`; otherwise `MULTITOOL_LOG` applies, defaulting to
/// `warn`. Each `--watch TARGET` adds `TARGET=trace`.
///
/// # Errors
///
/// Returns an error if a watch target does not form a valid directive.
pub fn env_filter(args: &DebugArgs) -> anyhow::Result<EnvFilter> {
    let mut filter = if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .with_env_var(LOG_ENV)
            .from_env_lossy()
    };
    for target in &args.watch {
        filter = filter.add_directive(format!("{target}=trace").parse()?);
    }
    Ok(filter)
}

/// Assemble the subscriber for one invocation.
///
/// The log layer has its own filter so the profiling layer, when present,
/// still sees every span.
///
/// # Errors
///
/// Propagates filter construction errors.
pub fn subscriber(
    args: &DebugArgs,
    profile: Option<ProfileLayer>,
) -> anyhow::Result<impl Subscriber + Send + Sync + use<>> {
    let span_events = if args.watch.is_empty() {
        FmtSpan::NONE
    } else {
        FmtSpan::ENTER | FmtSpan::CLOSE
    };
    let log_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_span_events(span_events)
        .with_filter(env_filter(args)?);

    Ok(Registry::default().with(log_layer).with(profile))
}
