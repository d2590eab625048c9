use std::collections::HashSet;
use log::debug;
use crate::core::best_rates::BestRateTable;
use crate::core::types::{BestRatePath, ExchangeCurrency};

/// 沿下一跳表从 src 走向 dest，还原兑换步骤
///
/// 只要 `next(current, dest)` 存在就继续前进；通常 `next(dest, dest)` 不存在，
/// 于是到达 dest 即停止。dest 自身位于盈利环上时会继续绕环，直到重复。
/// 一旦某个节点第二次出现，记为环形路径，追加该节点后立即截断。
pub fn reconstruct_path(table: &BestRateTable, src: &ExchangeCurrency, dest: &ExchangeCurrency) -> BestRatePath {
    let Some(mut next) = table.next_currency(src, dest) else {
        return BestRatePath::empty();
    };

    let mut steps = vec![src.clone()];
    let mut visited: HashSet<&ExchangeCurrency> = HashSet::new();
    visited.insert(src);

    loop {
        steps.push(next.clone());
        if !visited.insert(next) {
            debug!("路径在 [{}] 处出现重复，截断为环形路径", next);
            return BestRatePath::new(steps, true);
        }
        match table.next_currency(next, dest) {
            Some(following) => next = following,
            None => break,
        }
    }

    BestRatePath::new(steps, false)
}
