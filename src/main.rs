use std::process::ExitCode;

use charts::{
    chart::render_all,
    config::{ChartConfig, DEFAULT_CONFIG_PATH},
    file_logger, local_offset, stdout_logger,
};
use time::UtcOffset;
use tracing::{error, info, warn};

fn main() -> ExitCode {
    // 必须在日志 worker 线程启动前读取
    let offset = local_offset();
    let tz = offset.unwrap_or(UtcOffset::UTC);

    let config = ChartConfig::load_or_default(DEFAULT_CONFIG_PATH);
    let log_file = config
        .as_ref()
        .ok()
        .and_then(|(c, _)| c.log_file.as_deref());
    let _guard = match log_file {
        Some(name) => match file_logger(name, tz) {
            Ok(guard) => Some(guard),
            Err(e) => {
                if let Err(e) = stdout_logger(tz) {
                    eprintln!("stdout logger: {e}");
                }
                error!("file logger: {e}, logging to stdout");
                None
            }
        },
        None => {
            if let Err(e) = stdout_logger(tz) {
                eprintln!("stdout logger: {e}");
            }
            None
        }
    };

    info!("start");
    if let Err(e) = offset {
        warn!("local offset unavailable ({e}), logging in UTC");
    }
    let config = match config {
        Ok((config, source)) => {
            info!("{source}");
            config
        }
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match render_all(&config) {
        Ok(paths) => {
            info!(
                "{} charts written to {}",
                paths.len(),
                config.output_dir.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
