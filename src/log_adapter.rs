use std::str::FromStr;
use log::LevelFilter;

/// 日志适配器
///
/// 日志统一输出到 stderr，stdout 只留给应答协议。
pub struct LogAdapter;

impl LogAdapter {
    /// 初始化日志系统，RUST_LOG 优先于传入的默认级别
    pub fn init(default_level: &str) -> Result<(), Box<dyn std::error::Error>> {
        let level = Self::parse_level(default_level);
        env_logger::Builder::new()
            .filter_level(level)
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .try_init()?;
        Ok(())
    }

    /// 无法识别的级别按 warn 处理
    pub fn parse_level(level: &str) -> LevelFilter {
        LevelFilter::from_str(level).unwrap_or(LevelFilter::Warn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(LogAdapter::parse_level("debug"), LevelFilter::Debug);
        assert_eq!(LogAdapter::parse_level("INFO"), LevelFilter::Info);
        assert_eq!(LogAdapter::parse_level("off"), LevelFilter::Off);
        assert_eq!(LogAdapter::parse_level("loud"), LevelFilter::Warn);
    }
}
