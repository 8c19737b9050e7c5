use std::path::Path;

use time::{
    error::IndeterminateOffset, format_description::FormatItem, macros::format_description,
    OffsetDateTime, UtcOffset,
};
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{format::FmtSpan, format::Writer, time::FormatTime};
use tracing_subscriber::FmtSubscriber;

pub const LOG_DIR: &str = "./logs";

const LOG_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const LOG_NAME_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

struct Timer(UtcOffset);
impl FormatTime for Timer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = now_in(self.0)
            .format(LOG_TIME_FORMAT)
            .map_err(|_| std::fmt::Error)?;
        write!(w, "{}", now)
    }
}

/// 本地时区偏移；多线程启动后无法可靠读取，须在创建任何线程之前调用
pub fn local_offset() -> Result<UtcOffset, IndeterminateOffset> {
    UtcOffset::current_local_offset()
}

pub fn now_in(offset: UtcOffset) -> OffsetDateTime {
    OffsetDateTime::now_utc().to_offset(offset)
}

/// <dir>/<file_name>.log，不轮转
pub fn file_appender(dir: impl AsRef<Path>, file_name: &str) -> anyhow::Result<RollingFileAppender> {
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .filename_suffix("log")
        .build(dir.as_ref())?;
    Ok(appender)
}

/// 日志写入 ./logs/<file_name>.log，返回的 guard 需要保持到程序结束
pub fn init_log(file_name: &str, offset: UtcOffset) -> anyhow::Result<WorkerGuard> {
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender(LOG_DIR, file_name)?);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_writer(non_blocking)
        .with_span_events(FmtSpan::CLOSE)
        .with_file(true)
        .with_line_number(true)
        .with_timer(Timer(offset))
        .with_ansi(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(guard)
}

pub fn log_name(name: &str, offset: UtcOffset) -> anyhow::Result<String> {
    let stamp = now_in(offset).format(LOG_NAME_FORMAT)?;
    Ok(if name.is_empty() {
        format!("charts_{stamp}")
    } else {
        format!("charts_{name}_{stamp}")
    })
}

pub fn file_logger(name: &str, offset: UtcOffset) -> anyhow::Result<WorkerGuard> {
    init_log(&log_name(name, offset)?, offset)
}

pub fn stdout_logger(offset: UtcOffset) -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_span_events(FmtSpan::CLOSE)
        .with_file(true)
        .with_line_number(true)
        .with_timer(Timer(offset))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn appender_blocked_by_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("logs");
        std::fs::write(&blocker, b"").unwrap();
        assert!(file_appender(&blocker, "charts").is_err());
    }

    #[test]
    fn appender_writes_named_log() {
        let dir = tempfile::tempdir().unwrap();
        let logs = dir.path().join("logs");
        let mut appender = file_appender(&logs, "charts").unwrap();
        appender.write_all(b"hello\n").unwrap();
        appender.flush().unwrap();
        let content = std::fs::read_to_string(logs.join("charts.log")).unwrap();
        assert_eq!(content, "hello\n");
    }

    #[test]
    fn log_name_uses_given_offset() {
        let offset = UtcOffset::from_hms(8, 0, 0).unwrap();
        assert_eq!(now_in(offset).offset(), offset);
        let name = log_name("run", offset).unwrap();
        assert!(name.starts_with("charts_run_"));
        assert!(log_name("", UtcOffset::UTC).unwrap().starts_with("charts_"));
        assert!(!log_name("", UtcOffset::UTC).unwrap().starts_with("charts__"));
    }
}
