use std::io::Write;

use anyhow::Context;
use env_logger::{Builder, WriteStyle};
use log::LevelFilter;

/// Console logger settings, read from `GAME2D_LOG*` environment variables.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: LevelFilter,
    pub colors: bool,
    pub include_module: bool,
}

impl LogConfig {
    pub fn from_env() -> Self {
        let level = std::env::var("GAME2D_LOG")
            .ok()
            .and_then(|v| v.parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Info);
        let colors = std::env::var("GAME2D_LOG_COLORS")
            .map(|v| v != "0")
            .unwrap_or(true);
        let include_module = std::env::var("GAME2D_LOG_MODULE")
            .map(|v| v != "0")
            .unwrap_or(false);

        Self { level, colors, include_module }
    }
}

pub fn init(config: &LogConfig) -> anyhow::Result<()> {
    let mut builder = Builder::new();
    builder.filter_level(config.level);
    builder.write_style(if config.colors { WriteStyle::Auto } else { WriteStyle::Never });

    let include_module = config.include_module;
    builder.format(move |buf, record| {
        let style = buf.default_level_style(record.level());
        if include_module {
            writeln!(
                buf,
                "[{style}{:<5}{style:#}] {:<24} {}",
                record.level(),
                record.target(),
                record.args()
            )
        } else {
            writeln!(buf, "[{style}{:<5}{style:#}] {}", record.level(), record.args())
        }
    });

    builder.try_init().context("logger init failed")
}
