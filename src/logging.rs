use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::config::LoggingConfig;

type FilteredRegistry = tracing_subscriber::layer::Layered<EnvFilter, Registry>;
type BoxedLayer = Box<dyn Layer<FilteredRegistry> + Send + Sync>;

pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},diapred=debug", config.level)));

    let console_layer: BoxedLayer = if config.json {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .json()
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .boxed()
    };

    let mut layers: Vec<BoxedLayer> = vec![console_layer];

    // File logging is opt-in via DIAPRED_LOG_DIR (fallback: LOG_DIR).
    if let Ok(log_dir) = std::env::var("DIAPRED_LOG_DIR").or_else(|_| std::env::var("LOG_DIR")) {
        if let Some(file_layer) = build_file_layer(&log_dir) {
            layers.push(file_layer);
        }
    }

    tracing_subscriber::registry().with(filter).with(layers).init();
}

fn build_file_layer(log_dir: &str) -> Option<BoxedLayer> {
    // `tracing_appender::rolling::daily` will panic (and in our release build,
    // abort) if it can't create the initial log file. So we must preflight
    // writability.
    if std::fs::create_dir_all(log_dir).is_err() {
        eprintln!("Warning: Could not create log directory {log_dir}, file logging disabled");
        return None;
    }
    let test_path = std::path::Path::new(log_dir).join(".diapred_write_test");
    match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&test_path)
    {
        Ok(_) => {
            let _ = std::fs::remove_file(&test_path);

            // Daily rotating file appender
            let file_appender = tracing_appender::rolling::daily(log_dir, "diapred.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            // Keep the guard alive by leaking it (acceptable for long-running process)
            Box::leak(Box::new(guard));

            eprintln!("Logging to: {log_dir}/diapred.log");

            Some(
                tracing_subscriber::fmt::layer()
                    .with_writer(non_blocking)
                    .with_ansi(false) // No color codes in file
                    .with_target(true)
                    .boxed(),
            )
        }
        Err(e) => {
            eprintln!(
                "Warning: Could not write to log directory {log_dir} ({e}), file logging disabled"
            );
            None
        }
    }
}
