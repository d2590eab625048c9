use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// 默认配置文件（可选，不存在时忽略）
pub const DEFAULT_CONFIG_FILE: &str = "best_rates.toml";

/// 环境变量前缀，例如 BEST_RATES__LOGGING__LEVEL=debug
pub const ENV_PREFIX: &str = "BEST_RATES";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub console: ConsoleConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConsoleConfig {
    pub show_banner: bool,
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            console: ConsoleConfig {
                show_banner: true,
                prompt: "Please send your instructions below:".to_string(),
            },
            logging: LoggingConfig {
                level: "warn".to_string(),
            },
        }
    }
}

impl Config {
    /// 默认值 -> 配置文件 -> 环境变量，后者覆盖前者
    pub fn load(path: Option<&str>) -> Result<Self> {
        let defaults = Config::default();
        let file = path.unwrap_or(DEFAULT_CONFIG_FILE);

        let settings = config::Config::builder()
            .set_default("console.show_banner", defaults.console.show_banner)?
            .set_default("console.prompt", defaults.console.prompt)?
            .set_default("logging.level", defaults.logging.level)?
            // 显式指定的文件必须存在
            .add_source(config::File::with_name(file).required(path.is_some()))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .with_context(|| format!("加载配置失败: {}", file))?;

        settings
            .try_deserialize()
            .context("解析配置失败")
    }
}
