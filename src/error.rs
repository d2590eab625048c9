//! 输入解析相关的错误类型

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Input is not a price update or an exchange rate request: {0}")]
    Unrecognized(String),

    #[error("Product of forward_factor and backward_factor is greater than one: {0}")]
    InvalidFactors(String),

    #[error("Invalid timestamp {value}: {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("Invalid decimal {value}: {reason}")]
    InvalidDecimal { value: String, reason: String },
}

/// 解析操作的 Result 别名
pub type Result<T> = std::result::Result<T, ParseError>;
