use std::path::Path;
use std::time::SystemTime;

use log::LevelFilter;

/// sets up the global logger: `[time level target] message` lines on stdout, and in `log_file` if one is passed.
///
/// Can only succeed once per process
pub fn init_logger(level: LevelFilter, log_file: Option<&Path>) -> Result<(), fern::InitError> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_seconds(SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        // sqlite noise
        .level_for("rusqlite", LevelFilter::Warn)
        .chain(std::io::stdout());
    if let Some(path) = log_file {
        dispatch = dispatch.chain(fern::log_file(path)?);
    }
    dispatch.apply()?;
    Ok(())
}
