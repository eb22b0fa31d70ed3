use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use indicatif_log_bridge::LogWrapper;
use log::{Level, LevelFilter};
use env_logger::{Builder, Env, fmt::Color};
use std::io::Write;
use once_cell::sync::OnceCell;

/// Environment variable allowing users to refine log filtering (e.g. `GENDIST_LOG=gendist=trace`)
pub const LOG_ENV_VAR: &str = "GENDIST_LOG";

static INSTANCE: OnceCell<Logger> = OnceCell::new();

#[derive(Debug)]
pub struct Logger {
    multi_pg: MultiProgress,
}

impl Logger {
    /// Initialize the global logger. Log lines are routed through a `MultiProgress` handle,
    /// so that progress bars and log records never overwrite each other on the console.
    ///
    /// # Panics
    /// - if a global logger was already set.
    pub fn init(verbosity: u8) {
        let log_level = Self::u8_to_loglevel(verbosity);
        let env = Env::default().filter(LOG_ENV_VAR);

        let logger = Builder::new().filter_level(log_level)
            .format(|buf, record| {
                let (traceback, set_intensity) = match record.level() {
                    Level::Error => (format!("(@ {}:{}) ", record.file().unwrap_or("unknown"), record.line().unwrap_or(0)), true),
                    _            => (String::new(), false),
                };

                let mut arg_style = buf.style();
                arg_style.set_intense(set_intensity);

                let mut level_style = buf.style();
                let color = match record.level() {
                    Level::Error => Color::Red,
                    Level::Warn  => Color::Yellow,
                    Level::Info  => Color::Green,
                    Level::Debug => Color::Blue,
                    Level::Trace => Color::Cyan
                };
                level_style.set_color(color).set_bold(true);

                writeln!(
                    buf,
                    "[{} {: <5} {}] {traceback}{}",
                    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S"),
                    level_style.value(record.level()),
                    record.target(),
                    arg_style.value(record.args())
                )
            })
            .parse_env(env)
            .build();

        let multi_pg = MultiProgress::new();
        LogWrapper::new(multi_pg.clone(), logger)
            .try_init()
            .expect("Failed to wrap logger with multiprogress");
        INSTANCE.set(Self{multi_pg}).expect("Logger was initialized twice");
    }

    fn u8_to_loglevel(verbosity: u8) -> LevelFilter {
        match verbosity {
            0            => LevelFilter::Error,
            1            => LevelFilter::Warn,
            2            => LevelFilter::Info,
            3            => LevelFilter::Debug,
            4..= u8::MAX => LevelFilter::Trace
        }
    }

    pub fn set_level(verbosity: u8) {
        log::set_max_level(Self::u8_to_loglevel(verbosity));
    }

    /// Global `MultiProgress` handle. `None` if `Logger::init()` was never called (e.g. library use)
    pub fn multi() -> Option<&'static MultiProgress> {
        INSTANCE.get().map(|logger| &logger.multi_pg)
    }

    /// Create a progress bar of `len` steps, attached to the global `MultiProgress`.
    ///
    /// The bar is hidden when the logger is uninitialized, or when the current log level
    /// would not display `info` records anyway.
    pub fn progress_bar(len: u64, msg: &'static str) -> ProgressBar {
        let hidden = ! log::log_enabled!(Level::Info);
        match Self::multi() {
            Some(multi) if ! hidden => {
                let style = ProgressStyle::with_template("{msg} [{elapsed_precise}] [{bar:40}] {pos}/{len}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> ");
                multi.add(ProgressBar::new(len).with_style(style).with_message(msg))
            },
            _ => ProgressBar::hidden(),
        }
    }
}
