use bigdecimal::BigDecimal;
use num_traits::One;

/// 沿路径累乘汇率，不做任何舍入
pub fn chain_rate<'a, I>(rates: I) -> BigDecimal
where
    I: IntoIterator<Item = &'a BigDecimal>,
{
    rates
        .into_iter()
        .fold(BigDecimal::one(), |acc, rate| acc * rate)
}

/// 乘积大于 1 的环可以无限套利
pub fn is_profitable(product: &BigDecimal) -> bool {
    *product > BigDecimal::one()
}
