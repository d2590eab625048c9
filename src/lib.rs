//! Best Rates - 跨交易所最佳汇率查询
//!
//! 接收各交易所带时间戳的价格更新，维护汇率图，并回答
//! "把交易所 X 上的货币 A 换成交易所 Y 上的货币 B，最佳汇率是多少、经过哪些步骤"。
//! 同一种货币可以在交易所之间免费转移；存在套利环时汇率报告为无穷大。

pub mod cli;
pub mod config;
pub mod console;
pub mod core;
pub mod error;
pub mod formatter;
pub mod log_adapter;
pub mod parser;
pub mod utils;

// 重新导出常用类型
pub use crate::config::Config;
pub use crate::console::Console;
pub use crate::core::{
    BestRate, BestRatePath, BestRateRequest, BestRateResponse, BestRateTable, ExchangeCurrency,
    ExchangeRate, ExchangeRateGraph, RateSnapshot,
};
pub use crate::error::ParseError;
