use std::fs::OpenOptions;
use std::path::Path;

use log::LevelFilter;
use simplelog::{ColorChoice, Config, ConfigBuilder, TermLogger, TerminalMode, WriteLogger};

use crate::error::{Error, Result};

fn logger_config() -> Config {
    ConfigBuilder::new().set_time_format_rfc3339().build()
}

/// Install a stderr logger for the crate's `log` output.
/// Fails if a logger is already installed.
pub fn init(level: LevelFilter) -> Result<()> {
    TermLogger::init(
        level,
        logger_config(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .map_err(|e| Error::Logging(e.to_string()))
}

/// Install a logger that appends to `path`, creating parent directories.
/// Fails if a logger is already installed or the file cannot be opened.
pub fn init_file(level: LevelFilter, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    WriteLogger::init(level, logger_config(), file).map_err(|e| Error::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormatConfig;
    use crate::node::{Script, Statement};

    // Only test in this binary that installs a global logger.
    #[test]
    fn file_logger_captures_dump_and_rejects_second_logger() {
        let dir = std::env::temp_dir().join(format!("shellgen-log-{}", std::process::id()));
        let path = dir.join("nested").join("shellgen.log");
        init_file(LevelFilter::Debug, &path).unwrap();

        let script = Script::with_content([Statement::new("echo logged")]);
        script.dump(&FormatConfig::default()).unwrap();
        log::logger().flush();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("rendered script"));

        assert!(matches!(init(LevelFilter::Info), Err(Error::Logging(_))));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
