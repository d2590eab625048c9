use std::collections::{HashMap, HashSet};
use bigdecimal::BigDecimal;
use log::debug;
use num_traits::One;
use crate::core::types::{ExchangeCurrency, RateSnapshot};

/// 全源最佳汇率表
///
/// 改造的 Floyd-Warshall：松弛时乘积代替加和，"更好"指乘积严格更大。
/// 节点按 (交易所, 货币) 排序后编号，保证相同乘积下选中的路径在每次运行中一致。
pub struct BestRateTable {
    currencies: Vec<ExchangeCurrency>,            // 排序后的节点
    index: HashMap<ExchangeCurrency, usize>,      // 节点 -> 编号
    best_rates: Vec<Vec<Option<BigDecimal>>>,     // best_rates[i][j]，None 表示无路径
    next_currencies: Vec<Vec<Option<usize>>>,     // i 去往 j 的第一跳
}

impl BestRateTable {
    /// 基于当前全部节点和边从头计算
    pub fn compute(currencies: &HashSet<ExchangeCurrency>, rates: &RateSnapshot) -> Self {
        let mut sorted: Vec<ExchangeCurrency> = currencies.iter().cloned().collect();
        sorted.sort();

        let index: HashMap<ExchangeCurrency, usize> = sorted
            .iter()
            .enumerate()
            .map(|(i, currency)| (currency.clone(), i))
            .collect();

        let n = sorted.len();
        let mut best_rates: Vec<Vec<Option<BigDecimal>>> = (0..n)
            .map(|i| {
                (0..n)
                    .map(|j| if i == j { Some(BigDecimal::one()) } else { None })
                    .collect()
            })
            .collect();
        let mut next_currencies: Vec<Vec<Option<usize>>> = vec![vec![None; n]; n];

        // 直接边
        for (src, dests) in rates {
            let Some(&i) = index.get(src) else { continue };
            for (dest, rate) in dests {
                let Some(&j) = index.get(dest) else { continue };
                best_rates[i][j] = Some(rate.rate.clone());
                next_currencies[i][j] = Some(j);
            }
        }

        let mut improvements = 0usize;
        for k in 0..n {
            for i in 0..n {
                for j in 0..n {
                    // 每次都重新读取 i->k，j == k 时它可能刚被改进
                    let candidate = match (&best_rates[i][k], &best_rates[k][j]) {
                        (Some(ik), Some(kj)) => ik * kj,
                        _ => continue,
                    };
                    let improves = match &best_rates[i][j] {
                        None => true,
                        Some(ij) => *ij < candidate,
                    };
                    if improves {
                        best_rates[i][j] = Some(candidate);
                        // 沿用 i->k 的第一跳
                        next_currencies[i][j] = next_currencies[i][k];
                        improvements += 1;
                    }
                }
            }
        }

        debug!("最佳汇率表计算完成，节点数量: {}, 松弛改进次数: {}", n, improvements);

        Self {
            currencies: sorted,
            index,
            best_rates,
            next_currencies,
        }
    }

    /// 参与计算的节点数量
    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }

    pub fn contains(&self, currency: &ExchangeCurrency) -> bool {
        self.index.contains_key(currency)
    }

    /// src 到 dest 的最大乘积，未知节点或不可达时为 None
    pub fn best_rate(&self, src: &ExchangeCurrency, dest: &ExchangeCurrency) -> Option<&BigDecimal> {
        let (i, j) = self.indices(src, dest)?;
        self.best_rates[i][j].as_ref()
    }

    /// 从 src 出发前往 dest 的下一跳
    pub fn next_currency(&self, src: &ExchangeCurrency, dest: &ExchangeCurrency) -> Option<&ExchangeCurrency> {
        let (i, j) = self.indices(src, dest)?;
        self.next_currencies[i][j].map(|next| &self.currencies[next])
    }

    fn indices(&self, src: &ExchangeCurrency, dest: &ExchangeCurrency) -> Option<(usize, usize)> {
        Some((*self.index.get(src)?, *self.index.get(dest)?))
    }
}
