pub mod best_rates;
pub mod exchange_graph;
pub mod path;
pub mod types;

// 重新导出核心类型，方便外部使用
pub use best_rates::BestRateTable;
pub use exchange_graph::ExchangeRateGraph;
pub use path::reconstruct_path;
pub use types::*;
