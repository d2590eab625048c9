use std::io;
use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::info;

use crate::config::Config;
use crate::console::Console;

// 命令行参数常量
const NO_BANNER_ARG: &str = "no-banner";
const CONFIG_ARG: &str = "config";
const LOG_LEVEL_ARG: &str = "log-level";

/// 命令行选项
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOptions {
    pub no_banner: bool,
    pub config_path: Option<String>,
    pub log_level: Option<String>,
}

impl CliOptions {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            no_banner: matches.get_flag(NO_BANNER_ARG),
            config_path: matches.get_one::<String>(CONFIG_ARG).cloned(),
            log_level: matches.get_one::<String>(LOG_LEVEL_ARG).cloned(),
        }
    }
}

/// CLI应用程序结构
pub struct CliApp {
    config: Config,
    options: CliOptions,
}

impl CliApp {
    pub fn new(config: Config, options: CliOptions) -> Self {
        Self { config, options }
    }

    /// 构建命令行参数解析器
    pub fn build_cli() -> Command {
        Command::new("best-rates")
            .version(env!("CARGO_PKG_VERSION"))
            .about("跨交易所最佳汇率查询")
            .arg(
                Arg::new(NO_BANNER_ARG)
                    .long(NO_BANNER_ARG)
                    .short('n')
                    .help("启动时不显示说明横幅")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new(CONFIG_ARG)
                    .long(CONFIG_ARG)
                    .short('c')
                    .help("配置文件路径 (默认: best_rates.toml，可不存在)")
                    .value_name("FILE"),
            )
            .arg(
                Arg::new(LOG_LEVEL_ARG)
                    .long(LOG_LEVEL_ARG)
                    .short('l')
                    .help("日志级别: error, warn, info, debug, trace")
                    .value_name("LEVEL"),
            )
    }

    /// 日志级别：命令行优先于配置
    pub fn log_level(&self) -> &str {
        self.options
            .log_level
            .as_deref()
            .unwrap_or(&self.config.logging.level)
    }

    pub fn show_banner(&self) -> bool {
        self.config.console.show_banner && !self.options.no_banner
    }

    /// 在标准输入输出上运行控制台
    pub fn run(&self) -> Result<()> {
        info!("启动控制台...");
        let stdin = io::stdin();
        let stdout = io::stdout();
        let mut console = Console::new(
            stdin.lock(),
            stdout.lock(),
            self.show_banner(),
            self.config.console.prompt.clone(),
        );
        console.run()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(args: &[&str]) -> CliOptions {
        let matches = CliApp::build_cli().try_get_matches_from(args).unwrap();
        CliOptions::from_matches(&matches)
    }

    #[test]
    fn test_default_options() {
        assert_eq!(options(&["best-rates"]), CliOptions::default());
    }

    #[test]
    fn test_flags_override_config() {
        let opts = options(&["best-rates", "--no-banner", "--log-level", "debug", "-c", "custom.toml"]);
        assert_eq!(opts.config_path.as_deref(), Some("custom.toml"));

        let app = CliApp::new(Config::default(), opts);
        assert!(!app.show_banner());
        assert_eq!(app.log_level(), "debug");
    }

    #[test]
    fn test_config_controls_banner() {
        let mut config = Config::default();
        config.console.show_banner = false;
        let app = CliApp::new(config, options(&["best-rates"]));
        assert!(!app.show_banner());
        assert_eq!(app.log_level(), Config::default().logging.level);
    }
}
