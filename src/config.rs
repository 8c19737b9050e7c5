use std::{
    fmt,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_CONFIG_PATH: &str = "./config/charts.toml";
pub const DEFAULT_DPI: u32 = 300;
/// 8x5 英寸 @1200dpi 约 9600x6000 像素
pub const MAX_DPI: u32 = 1200;

/// 配置来自哪里，日志初始化后再输出
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults(PathBuf),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "config read from {}", path.display()),
            ConfigSource::Defaults(path) => {
                write!(f, "no config at {}, using defaults", path.display())
            }
        }
    }
}

/// 输出配置，只影响图片写到哪里、分辨率多大，不影响数据
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChartConfig {
    pub output_dir: PathBuf,
    pub dpi: u32,
    /// 设置后日志写入 ./logs/<log_file>.log，否则输出到 stdout
    pub log_file: Option<String>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            dpi: DEFAULT_DPI,
            log_file: None,
        }
    }
}

impl ChartConfig {
    pub fn value_parse(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let c = std::fs::read_to_string(path)?;
        let val: Self = toml::from_str(&c).map_err(|source| Error::Config {
            path: path.to_owned(),
            source,
        })?;
        val.validate()?;
        Ok(val)
    }

    /// 配置文件不存在时使用默认值
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<(Self, ConfigSource)> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok((Self::default(), ConfigSource::Defaults(path.to_owned())));
        }
        let val = Self::value_parse(path)?;
        Ok((val, ConfigSource::File(path.to_owned())))
    }

    pub fn validate(&self) -> Result<()> {
        if self.dpi == 0 {
            return Err(Error::InvalidConfig("dpi must be greater than 0".into()));
        }
        if self.dpi > MAX_DPI {
            return Err(Error::InvalidConfig(format!(
                "dpi {} exceeds maximum {}",
                self.dpi, MAX_DPI
            )));
        }
        Ok(())
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        let (cfg, source) = ChartConfig::load_or_default(&path).unwrap();
        assert_eq!(source, ConfigSource::Defaults(path.clone()));
        assert!(source.to_string().contains("using defaults"));
        assert_eq!(cfg, ChartConfig::default());
        assert_eq!(cfg.dpi, 300);
        assert_eq!(cfg.output_dir, PathBuf::from("."));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let f = write_config("dpi = 72\n");
        let (cfg, source) = ChartConfig::load_or_default(f.path()).unwrap();
        assert_eq!(source, ConfigSource::File(f.path().to_owned()));
        assert_eq!(cfg.dpi, 72);
        assert_eq!(cfg.output_dir, PathBuf::from("."));
        assert_eq!(cfg.log_file, None);

        let f = write_config("output_dir = \"out\"\nlog_file = \"charts\"\n");
        let cfg = ChartConfig::value_parse(f.path()).unwrap();
        assert_eq!(cfg.output_dir, PathBuf::from("out"));
        assert_eq!(cfg.log_file.as_deref(), Some("charts"));
        assert_eq!(cfg.dpi, DEFAULT_DPI);
    }

    #[test]
    fn malformed_file_is_error() {
        let f = write_config("dpi = \"high\"\n");
        assert!(matches!(
            ChartConfig::value_parse(f.path()),
            Err(Error::Config { .. })
        ));
        let f = write_config("colour = 1\n");
        assert!(matches!(
            ChartConfig::load_or_default(f.path()),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn out_of_range_dpi_rejected() {
        for content in ["dpi = 0\n", "dpi = 1201\n", "dpi = 100000\n"] {
            let f = write_config(content);
            assert!(
                matches!(
                    ChartConfig::value_parse(f.path()),
                    Err(Error::InvalidConfig(_))
                ),
                "{content}"
            );
        }
        let f = write_config("dpi = 1200\n");
        assert_eq!(ChartConfig::value_parse(f.path()).unwrap().dpi, MAX_DPI);
    }
}
