//! Market-data tools exposed to the LLM

pub mod compare;
pub mod earnings;
pub mod fundamental;
pub mod news;
pub mod stock_price;

pub use compare::CompareStocksTool;
pub use earnings::EarningsDataTool;
pub use fundamental::FundamentalMetricsTool;
pub use news::CompanyNewsTool;
pub use stock_price::StockPriceTool;
