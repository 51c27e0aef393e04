use std::io::Write;
use std::str::FromStr;

/// Install the global `env_logger` backend.
///
/// `RUST_LOG` takes precedence over `level`. Safe to call more than once; only the first
/// call installs a logger.
pub fn init_logging(level: &str) {
    let level = log::LevelFilter::from_str(level).unwrap_or(log::LevelFilter::Info);

    let mut builder = env_logger::Builder::new();
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, level);

    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    if builder.try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}
