use std::collections::{HashMap, HashSet};
use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, Utc};
use log::{info, debug, warn};
use num_traits::One;
use crate::core::best_rates::BestRateTable;
use crate::core::path::reconstruct_path;
use crate::utils::is_profitable;
use crate::core::types::{
    BestRate, BestRateRequest, BestRateResponse, ExchangeCurrency, ExchangeRate, RateSnapshot,
};

/// 汇率图，保存每个有序货币对的最新汇率
///
/// 非线程安全：由调用方保证同一时刻只有一个使用者。
#[derive(Debug, Clone, Default)]
pub struct ExchangeRateGraph {
    existing_currencies: HashSet<ExchangeCurrency>, // 所有出现过的节点
    rates: RateSnapshot,                            // src -> dest -> 当前汇率
}

impl ExchangeRateGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加或更新汇率
    ///
    /// 同一有序货币对只保留时间戳最新的一条；时间相同保留已有的。
    /// 首次出现的节点会与其他交易所上的同种货币自动建立汇率为 1 的双向边。
    pub fn add_or_update_exchange_rates<I>(&mut self, exchange_rates: I)
    where
        I: IntoIterator<Item = ExchangeRate>,
    {
        for exchange_rate in exchange_rates {
            info!("添加汇率 {}", exchange_rate);

            let src_currency = exchange_rate.src_currency.clone();
            let dest_currency = exchange_rate.dest_currency.clone();

            let dest_rates = self.rates.entry(src_currency.clone()).or_default();
            match dest_rates.get(&dest_currency) {
                None => {
                    info!("已添加 {}", exchange_rate);
                    dest_rates.insert(dest_currency.clone(), exchange_rate);
                }
                Some(current) if current.is_older_than(&exchange_rate) => {
                    info!("已更新 {} (原为 {})", exchange_rate, current);
                    dest_rates.insert(dest_currency.clone(), exchange_rate);
                }
                Some(current) => {
                    info!("已存在更新的汇率 {}，忽略 {}", current, exchange_rate);
                }
            }

            for currency in [src_currency, dest_currency] {
                if !self.existing_currencies.contains(&currency) {
                    self.add_same_currency_rates(&currency);
                    self.existing_currencies.insert(currency);
                }
            }
        }
    }

    /// 单条汇率的便捷入口
    pub fn add_or_update_exchange_rate(&mut self, exchange_rate: ExchangeRate) {
        self.add_or_update_exchange_rates([exchange_rate]);
    }

    /// 为新节点与所有已知的同种货币（不同交易所）建立汇率为 1 的双向边
    ///
    /// 这类边不受时间戳规则约束，总是直接覆盖。
    fn add_same_currency_rates(&mut self, new_currency: &ExchangeCurrency) {
        let same_currencies: Vec<ExchangeCurrency> = self
            .existing_currencies
            .iter()
            .filter(|existing| new_currency.is_same_currency(existing))
            .cloned()
            .collect();

        for existing in same_currencies {
            let now: DateTime<FixedOffset> = Utc::now().into();

            let forward = ExchangeRate::new(now, existing.clone(), new_currency.clone(), BigDecimal::one());
            debug!("已添加同币种汇率 {}", forward);
            self.rates
                .entry(existing.clone())
                .or_default()
                .insert(new_currency.clone(), forward);

            let backward = ExchangeRate::new(now, new_currency.clone(), existing.clone(), BigDecimal::one());
            debug!("已添加同币种汇率 {}", backward);
            self.rates
                .entry(new_currency.clone())
                .or_default()
                .insert(existing, backward);
        }
    }

    /// 当前 src -> dest 的直接汇率
    pub fn get_exchange_rate(&self, src: &ExchangeCurrency, dest: &ExchangeCurrency) -> Option<&ExchangeRate> {
        self.rates.get(src).and_then(|dests| dests.get(dest))
    }

    /// 获取指定节点的所有出边
    pub fn get_rates_from(&self, src: &ExchangeCurrency) -> Option<&HashMap<ExchangeCurrency, ExchangeRate>> {
        self.rates.get(src)
    }

    pub fn contains(&self, currency: &ExchangeCurrency) -> bool {
        self.existing_currencies.contains(currency)
    }

    pub fn currencies(&self) -> &HashSet<ExchangeCurrency> {
        &self.existing_currencies
    }

    pub fn rates(&self) -> &RateSnapshot {
        &self.rates
    }

    /// 获取图的统计信息：(节点数量, 边数量)
    pub fn get_stats(&self) -> (usize, usize) {
        let currency_count = self.existing_currencies.len();
        let edge_count = self.rates.values().map(|dests| dests.len()).sum();
        (currency_count, edge_count)
    }

    /// 基于当前数据重新计算全部最佳汇率
    pub fn compute_best_rates(&self) -> BestRateTable {
        BestRateTable::compute(&self.existing_currencies, &self.rates)
    }

    /// 查询最佳汇率及其兑换路径
    ///
    /// 每次查询都从头计算；路径出现环时汇率报告为无穷大。
    pub fn get_best_rate(&self, request: &BestRateRequest) -> BestRateResponse {
        let table = self.compute_best_rates();
        let path = reconstruct_path(&table, &request.src_currency, &request.dest_currency);

        let rate = if path.is_circular() {
            BestRate::Unbounded
        } else {
            match table.best_rate(&request.src_currency, &request.dest_currency) {
                Some(rate) => BestRate::Finite(rate.clone()),
                None => BestRate::NoPath,
            }
        };

        info!(
            "查询 [{}] -> [{}]: 汇率 {}, 步骤 {}, 环形 {}",
            request.src_currency,
            request.dest_currency,
            rate,
            path.len(),
            path.is_circular()
        );

        let response = BestRateResponse::new(request.clone(), rate, path, self.rates.clone());
        if let Some(cycle_rate) = response.cycle_rate() {
            if is_profitable(&cycle_rate) {
                debug!("检测到套利环，单圈汇率乘积 {}", cycle_rate);
            } else {
                warn!("环形路径的单圈汇率乘积 {} 不大于 1", cycle_rate);
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::str::FromStr;

    fn ts(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    fn rate(timestamp: &str, src: &ExchangeCurrency, dest: &ExchangeCurrency, value: &str) -> ExchangeRate {
        ExchangeRate::new(ts(timestamp), src.clone(), dest.clone(), BigDecimal::from_str(value).unwrap())
    }

    #[test]
    fn test_graph_creation() {
        let graph = ExchangeRateGraph::new();
        assert_eq!(graph.get_stats(), (0, 0));
    }

    #[test]
    fn test_newer_rate_wins_in_either_order() {
        let btc = ExchangeCurrency::new("bitfinex", "btc");
        let eth = ExchangeCurrency::new("bitfinex", "eth");
        let older = rate("2018-05-26T09:42:23+00:00", &btc, &eth, "10");
        let newer = ExchangeRate::new(older.timestamp + Duration::seconds(1), btc.clone(), eth.clone(), BigDecimal::from_str("10.1").unwrap());

        let mut graph = ExchangeRateGraph::new();
        graph.add_or_update_exchange_rates([older.clone(), newer.clone()]);
        assert_eq!(graph.get_exchange_rate(&btc, &eth), Some(&newer));

        let mut graph = ExchangeRateGraph::new();
        graph.add_or_update_exchange_rates([newer.clone(), older]);
        assert_eq!(graph.get_exchange_rate(&btc, &eth), Some(&newer));
    }

    #[test]
    fn test_equal_timestamp_keeps_existing() {
        let btc = ExchangeCurrency::new("bitfinex", "btc");
        let eth = ExchangeCurrency::new("bitfinex", "eth");
        let first = rate("2018-05-26T09:42:23+00:00", &btc, &eth, "10");
        let same_instant = rate("2018-05-26T10:42:23+01:00", &btc, &eth, "11");

        let mut graph = ExchangeRateGraph::new();
        graph.add_or_update_exchange_rate(first.clone());
        graph.add_or_update_exchange_rate(same_instant);
        assert_eq!(graph.get_exchange_rate(&btc, &eth), Some(&first));
    }

    #[test]
    fn test_same_currency_bridges_are_one_both_ways() {
        let gdax_usd = ExchangeCurrency::new("gdax", "usd");
        let gdax_btc = ExchangeCurrency::new("gdax", "btc");
        let kraken_usd = ExchangeCurrency::new("kraken", "usd");
        let kraken_eth = ExchangeCurrency::new("kraken", "eth");

        let mut graph = ExchangeRateGraph::new();
        graph.add_or_update_exchange_rate(rate("2018-05-26T09:42:23+00:00", &gdax_usd, &gdax_btc, "0.0001"));
        graph.add_or_update_exchange_rate(rate("2018-05-26T09:42:23+00:00", &kraken_usd, &kraken_eth, "0.000981"));

        assert_eq!(graph.get_exchange_rate(&gdax_usd, &kraken_usd).unwrap().rate, BigDecimal::one());
        assert_eq!(graph.get_exchange_rate(&kraken_usd, &gdax_usd).unwrap().rate, BigDecimal::one());
        assert!(graph.get_exchange_rate(&gdax_btc, &kraken_eth).is_none());
        assert_eq!(graph.get_stats(), (4, 4));
    }

    #[test]
    fn test_both_endpoints_become_currencies() {
        let btc = ExchangeCurrency::new("bitfinex", "btc");
        let usd = ExchangeCurrency::new("bitfinex", "usd");
        let mut graph = ExchangeRateGraph::new();
        graph.add_or_update_exchange_rate(rate("2018-05-26T09:42:23+00:00", &btc, &usd, "10000"));
        assert!(graph.contains(&btc));
        assert!(graph.contains(&usd));
        assert_eq!(graph.get_rates_from(&btc).map(|r| r.len()), Some(1));
        assert!(graph.get_rates_from(&usd).is_none());
    }

    #[test]
    fn test_unknown_currency_query_is_no_path() {
        let btc = ExchangeCurrency::new("bitfinex", "btc");
        let usd = ExchangeCurrency::new("bitfinex", "usd");
        let mut graph = ExchangeRateGraph::new();
        graph.add_or_update_exchange_rate(rate("2018-05-26T09:42:23+00:00", &btc, &usd, "10000"));

        let unknown = ExchangeCurrency::new("binance", "doge");
        let response = graph.get_best_rate(&BestRateRequest::new(btc, unknown));
        assert!(response.rate.is_no_path());
        assert!(response.path.is_empty());
        assert!(!response.path.is_circular());
    }
}
