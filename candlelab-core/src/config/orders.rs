//! Order style per action. Passed through to the host, never interpreted here.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    Limit,
    Market,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTypes {
    pub buy: OrderKind,
    pub sell: OrderKind,
    pub stoploss: OrderKind,
    #[serde(default)]
    pub stoploss_on_exchange: bool,
}

impl Default for OrderTypes {
    /// Limit entries and exits, market stoploss kept off-exchange.
    fn default() -> Self {
        Self {
            buy: OrderKind::Limit,
            sell: OrderKind::Limit,
            stoploss: OrderKind::Market,
            stoploss_on_exchange: false,
        }
    }
}
