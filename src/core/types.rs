use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use crate::utils::chain_rate;

/// 某个交易所上的某种货币，图中的节点
///
/// 字段顺序即排序顺序：先按交易所，再按货币代码。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExchangeCurrency {
    pub exchange: String, // 交易所名称，大小写按原样保留
    pub currency: String, // 货币代码
}

impl ExchangeCurrency {
    pub fn new(exchange: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            exchange: exchange.into(),
            currency: currency.into(),
        }
    }

    /// 同一种货币，但位于不同的交易所
    pub fn is_same_currency(&self, other: &ExchangeCurrency) -> bool {
        self.currency == other.currency && self.exchange != other.exchange
    }
}

impl fmt::Display for ExchangeCurrency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.exchange, self.currency)
    }
}

/// 有向边：1 单位 src_currency 可以换成 rate 单位 dest_currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub timestamp: DateTime<FixedOffset>, // 观测时间（保留时区偏移）
    pub src_currency: ExchangeCurrency,
    pub dest_currency: ExchangeCurrency,
    pub rate: BigDecimal,
}

impl ExchangeRate {
    pub fn new(
        timestamp: DateTime<FixedOffset>,
        src_currency: ExchangeCurrency,
        dest_currency: ExchangeCurrency,
        rate: BigDecimal,
    ) -> Self {
        Self {
            timestamp,
            src_currency,
            dest_currency,
            rate,
        }
    }

    /// 严格早于：时间相同不算更旧
    pub fn is_older_than(&self, other: &ExchangeRate) -> bool {
        self.timestamp < other.timestamp
    }
}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] -> [{}] @ {}",
            self.timestamp.to_rfc3339(),
            self.src_currency,
            self.dest_currency,
            self.rate
        )
    }
}

/// 当前图中每个有序货币对的最新汇率
pub type RateSnapshot = HashMap<ExchangeCurrency, HashMap<ExchangeCurrency, ExchangeRate>>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BestRateRequest {
    pub src_currency: ExchangeCurrency,
    pub dest_currency: ExchangeCurrency,
}

impl BestRateRequest {
    pub fn new(src_currency: ExchangeCurrency, dest_currency: ExchangeCurrency) -> Self {
        Self {
            src_currency,
            dest_currency,
        }
    }
}

/// 查询结果中的汇率：有限值、无穷大（套利环）或无路径
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BestRate {
    Finite(BigDecimal),
    Unbounded,
    NoPath,
}

impl BestRate {
    pub fn as_decimal(&self) -> Option<&BigDecimal> {
        match self {
            BestRate::Finite(rate) => Some(rate),
            _ => None,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, BestRate::Unbounded)
    }

    pub fn is_no_path(&self) -> bool {
        matches!(self, BestRate::NoPath)
    }
}

impl fmt::Display for BestRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BestRate::Finite(rate) => write!(f, "{}", rate),
            BestRate::Unbounded => write!(f, "Infinity"),
            BestRate::NoPath => write!(f, "null"),
        }
    }
}

/// 实现最佳汇率所需的兑换步骤
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestRatePath {
    pub steps: Vec<ExchangeCurrency>,
    pub circular: bool, // 路径重复访问了某个节点（套利环），在重复处截断
}

impl BestRatePath {
    pub fn new(steps: Vec<ExchangeCurrency>, circular: bool) -> Self {
        Self { steps, circular }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_circular(&self) -> bool {
        self.circular
    }
}

/// 一次查询的完整结果，交给格式化器输出
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestRateResponse {
    pub request: BestRateRequest,
    pub rate: BestRate,
    pub path: BestRatePath,
    pub original_rates: RateSnapshot, // 查询时刻的边快照，用于标注每一跳的汇率
}

impl BestRateResponse {
    pub fn new(
        request: BestRateRequest,
        rate: BestRate,
        path: BestRatePath,
        original_rates: RateSnapshot,
    ) -> Self {
        Self {
            request,
            rate,
            path,
            original_rates,
        }
    }

    /// 快照中 src -> dest 的直接汇率
    pub fn hop_rate(&self, src: &ExchangeCurrency, dest: &ExchangeCurrency) -> Option<&BigDecimal> {
        self.original_rates
            .get(src)
            .and_then(|rates| rates.get(dest))
            .map(|rate| &rate.rate)
    }

    /// 环形路径中闭合环的汇率乘积（从重复节点首次出现处到末尾）
    ///
    /// 非环形路径或快照缺边时返回 None。
    pub fn cycle_rate(&self) -> Option<BigDecimal> {
        if !self.path.is_circular() {
            return None;
        }
        let steps = &self.path.steps;
        let repeated = steps.last()?;
        let start = steps.iter().position(|step| step == repeated)?;
        let hops: Option<Vec<&BigDecimal>> = steps[start..]
            .windows(2)
            .map(|pair| self.hop_rate(&pair[0], &pair[1]))
            .collect();
        hops.map(chain_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn ts(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_exchange_currency_ordering() {
        let mut currencies = vec![
            ExchangeCurrency::new("kraken", "usd"),
            ExchangeCurrency::new("bitfinex", "usd"),
            ExchangeCurrency::new("bitfinex", "btc"),
        ];
        currencies.sort();
        assert_eq!(currencies[0], ExchangeCurrency::new("bitfinex", "btc"));
        assert_eq!(currencies[2], ExchangeCurrency::new("kraken", "usd"));
    }

    #[test]
    fn test_same_currency_requires_different_exchange() {
        let a = ExchangeCurrency::new("gdax", "BTC");
        assert!(a.is_same_currency(&ExchangeCurrency::new("kraken", "BTC")));
        assert!(!a.is_same_currency(&ExchangeCurrency::new("gdax", "BTC")));
        // 大小写敏感
        assert!(!a.is_same_currency(&ExchangeCurrency::new("kraken", "btc")));
    }

    #[test]
    fn test_is_older_than_is_strict() {
        let src = ExchangeCurrency::new("gdax", "BTC");
        let dest = ExchangeCurrency::new("gdax", "USD");
        let rate = BigDecimal::from_str("9999.9").unwrap();
        let a = ExchangeRate::new(ts("2018-05-26T09:42:23+00:00"), src.clone(), dest.clone(), rate.clone());
        // 同一时刻，不同时区写法
        let b = ExchangeRate::new(ts("2018-05-26T11:42:23+02:00"), src.clone(), dest.clone(), rate.clone());
        let c = ExchangeRate::new(ts("2018-05-26T09:42:24+00:00"), src, dest, rate);
        assert!(!a.is_older_than(&b));
        assert!(!b.is_older_than(&a));
        assert!(a.is_older_than(&c));
        assert!(!c.is_older_than(&a));
    }

    #[test]
    fn test_best_rate_display() {
        assert_eq!(BestRate::Finite(BigDecimal::from(10000)).to_string(), "10000");
        assert_eq!(BestRate::Unbounded.to_string(), "Infinity");
        assert_eq!(BestRate::NoPath.to_string(), "null");
    }
}
