use std::fmt::Write;
use crate::core::types::BestRateResponse;

pub const BEST_RATES_BEGIN: &str = "BEST_RATES_BEGIN";
pub const BEST_RATES_END: &str = "BEST_RATES_END";
const ELLIPSIS: &str = "...";

/// 将查询结果渲染为文本块
///
/// 第一行为请求与汇率，随后每行一个步骤；除第一个步骤外，每行附带
/// 上一步到该步骤的当前直接汇率。环形路径在截断处追加 `...` 与目标货币。
pub fn format(response: &BestRateResponse) -> String {
    let request = &response.request;
    let mut out = String::new();

    // 写入 String 不会失败
    let _ = writeln!(
        out,
        "{} {} {} {}",
        BEST_RATES_BEGIN, request.src_currency, request.dest_currency, response.rate
    );

    let mut previous = None;
    for step in &response.path.steps {
        match previous {
            None => {
                let _ = writeln!(out, "{}", step);
            }
            Some(prev) => match response.hop_rate(prev, step) {
                Some(rate) => {
                    let _ = writeln!(out, "{} {}", step, rate);
                }
                None => {
                    let _ = writeln!(out, "{}", step);
                }
            },
        }
        previous = Some(step);
    }

    if response.path.is_circular() {
        let _ = writeln!(out, "{}", ELLIPSIS);
        let _ = writeln!(out, "{}", request.dest_currency);
    }

    let _ = writeln!(out, "{}", BEST_RATES_END);
    out
}
