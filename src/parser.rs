use std::str::FromStr;
use std::sync::LazyLock;
use bigdecimal::BigDecimal;
use chrono::DateTime;
use num_traits::One;
use regex::Regex;
use crate::core::types::{BestRateRequest, ExchangeCurrency, ExchangeRate};
use crate::error::{ParseError, Result};

/// 输入行中的退出命令
pub const EXIT_COMMAND: &str = "X";

/// 汇率查询的关键字
pub const EXCHANGE_RATE_REQUEST: &str = "EXCHANGE_RATE_REQUEST";

const TIME_PATTERN: &str =
    r"\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])T([01]\d|2[0-3]):[0-5]\d:[0-5]\d[+\-]([01]\d|2[0-3]):[0-5]\d";

const TEXT_PATTERN: &str = r" \S+";

const DECIMAL_PATTERN: &str = r" (\d+|\d+\.\d+)";

/// 价格更新：<时间> <交易所> <源货币> <目标货币> <正向系数> <反向系数>
static PRICE_UPDATE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        "^{}{}{}{}{}{}$",
        TIME_PATTERN,
        TEXT_PATTERN,
        TEXT_PATTERN,
        TEXT_PATTERN,
        DECIMAL_PATTERN,
        DECIMAL_PATTERN
    );
    Regex::new(&pattern).expect("price update pattern is valid")
});

/// 汇率查询：EXCHANGE_RATE_REQUEST <源交易所> <源货币> <目标交易所> <目标货币>
static EXCHANGE_RATE_REQ: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(
        "^{}{}{}{}{}$",
        EXCHANGE_RATE_REQUEST, TEXT_PATTERN, TEXT_PATTERN, TEXT_PATTERN, TEXT_PATTERN
    );
    Regex::new(&pattern).expect("exchange rate request pattern is valid")
});

/// 一行输入解析后的指令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    PriceUpdate([ExchangeRate; 2]),
    ExchangeRateRequest(BestRateRequest),
    Exit,
}

pub fn is_price_update(input: &str) -> bool {
    PRICE_UPDATE.is_match(input)
}

pub fn is_exchange_rate_request(input: &str) -> bool {
    EXCHANGE_RATE_REQ.is_match(input)
}

pub fn is_exit(input: &str) -> bool {
    input.eq_ignore_ascii_case(EXIT_COMMAND)
}

/// 正向系数与反向系数的乘积不能大于 1
pub fn is_price_update_valid(price_update: &str) -> Result<bool> {
    let segments = segments(price_update, 6)?;
    let forward = parse_decimal(segments[4])?;
    let backward = parse_decimal(segments[5])?;
    Ok(forward * backward <= BigDecimal::one())
}

/// 一条价格更新产生正反两条汇率，时间戳相同
pub fn parse_price_update(price_update: &str) -> Result<[ExchangeRate; 2]> {
    let segments = segments(price_update, 6)?;
    let timestamp = DateTime::parse_from_rfc3339(segments[0]).map_err(|e| ParseError::InvalidTimestamp {
        value: segments[0].to_string(),
        reason: e.to_string(),
    })?;
    let src_currency = ExchangeCurrency::new(segments[1], segments[2]);
    let dest_currency = ExchangeCurrency::new(segments[1], segments[3]);
    let forward = parse_decimal(segments[4])?;
    let backward = parse_decimal(segments[5])?;

    Ok([
        ExchangeRate::new(timestamp, src_currency.clone(), dest_currency.clone(), forward),
        ExchangeRate::new(timestamp, dest_currency, src_currency, backward),
    ])
}

pub fn parse_exchange_rate_request(request: &str) -> Result<BestRateRequest> {
    let segments = segments(request, 5)?;
    Ok(BestRateRequest::new(
        ExchangeCurrency::new(segments[1], segments[2]),
        ExchangeCurrency::new(segments[3], segments[4]),
    ))
}

/// 识别并解析一行输入
pub fn parse_line(input: &str) -> Result<Instruction> {
    if is_exit(input) {
        return Ok(Instruction::Exit);
    }
    if is_exchange_rate_request(input) {
        return parse_exchange_rate_request(input).map(Instruction::ExchangeRateRequest);
    }
    if is_price_update(input) {
        if !is_price_update_valid(input)? {
            return Err(ParseError::InvalidFactors(input.to_string()));
        }
        return parse_price_update(input).map(Instruction::PriceUpdate);
    }
    Err(ParseError::Unrecognized(input.to_string()))
}

fn segments(input: &str, expected: usize) -> Result<Vec<&str>> {
    let segments: Vec<&str> = input.split(' ').collect();
    if segments.len() != expected {
        return Err(ParseError::Unrecognized(input.to_string()));
    }
    Ok(segments)
}

fn parse_decimal(value: &str) -> Result<BigDecimal> {
    BigDecimal::from_str(value).map_err(|e| ParseError::InvalidDecimal {
        value: value.to_string(),
        reason: e.to_string(),
    })
}
