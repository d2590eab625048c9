use anyhow::{anyhow, Result};
use log::info;

use best_rates::cli::{CliApp, CliOptions};
use best_rates::config::Config;
use best_rates::log_adapter::LogAdapter;

fn main() -> Result<()> {
    // 加载 .env 文件
    dotenv::dotenv().ok();

    let matches = CliApp::build_cli().get_matches();
    let options = CliOptions::from_matches(&matches);

    // 加载配置
    let config = Config::load(options.config_path.as_deref())?;
    let app = CliApp::new(config, options);

    // 初始化日志系统
    LogAdapter::init(app.log_level()).map_err(|e| anyhow!("初始化日志失败: {}", e))?;
    info!("配置加载完成");

    app.run()
}
