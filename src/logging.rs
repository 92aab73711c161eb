use chrono::Local;
use std::path::PathBuf;
use std::sync::Once;

static INIT: Once = Once::new();

const LEVEL_VAR: &str = "QR_NBU_LOG_LEVEL";
const DIR_VAR: &str = "QR_NBU_LOG_DIR";

#[derive(Debug, PartialEq, Eq)]
struct LogSettings {
    level: log::LevelFilter,
    dir: Option<PathBuf>,
}

impl LogSettings {
    fn from_env() -> Self {
        let level = std::env::var(LEVEL_VAR)
            .or_else(|_| std::env::var("RUST_LOG"))
            .ok();
        let dir = std::env::var(DIR_VAR).ok();
        Self::from_values(level.as_deref(), dir.as_deref())
    }

    fn from_values(level: Option<&str>, dir: Option<&str>) -> Self {
        let level = level
            .and_then(|value| value.parse::<log::LevelFilter>().ok())
            .unwrap_or(log::LevelFilter::Info);
        // file logging is opt-in
        let dir = match dir.map(str::trim) {
            None | Some("off") | Some("none") | Some("") => None,
            Some(path) => Some(PathBuf::from(path)),
        };
        Self { level, dir }
    }
}

pub fn init_logging(app_name: &str) -> Result<(), String> {
    let mut init_result: Result<(), String> = Ok(());
    INIT.call_once(|| {
        if let Err(err) = init_logging_inner(app_name, LogSettings::from_env()) {
            init_result = Err(err);
        }
    });
    init_result
}

fn init_logging_inner(app_name: &str, settings: LogSettings) -> Result<(), String> {
    // stdout carries payloads, so log lines go to stderr
    let mut dispatch = fern::Dispatch::new()
        .level(settings.level)
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} | {:<5} | {} | {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            ))
        })
        .chain(std::io::stderr());

    if let Some(dir) = settings.dir {
        std::fs::create_dir_all(&dir)
            .map_err(|err| format!("cannot create log directory {}: {err}", dir.display()))?;
        let date = Local::now().format("%Y_%m_%d");
        let file_path = dir.join(format!("{app_name}-{date}.log"));
        dispatch = dispatch.chain(fern::log_file(file_path).map_err(|err| err.to_string())?);
    }

    dispatch.apply().map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_info_without_file() {
        assert_eq!(
            LogSettings::from_values(None, None),
            LogSettings {
                level: log::LevelFilter::Info,
                dir: None
            }
        );
    }

    #[test]
    fn unknown_level_falls_back_to_info() {
        let settings = LogSettings::from_values(Some("chatty"), None);
        assert_eq!(settings.level, log::LevelFilter::Info);
        let settings = LogSettings::from_values(Some("debug"), None);
        assert_eq!(settings.level, log::LevelFilter::Debug);
    }

    #[test]
    fn log_dir_can_be_switched_off() {
        for value in ["off", "none", "", "  "] {
            assert_eq!(LogSettings::from_values(None, Some(value)).dir, None);
        }
        assert_eq!(
            LogSettings::from_values(None, Some("logs")).dir,
            Some(PathBuf::from("logs"))
        );
    }
}
