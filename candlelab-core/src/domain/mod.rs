//! Domain types for CandleLab

pub mod candle;
pub mod ids;
pub mod metadata;
pub mod series;
pub mod timeframe;

pub use candle::Candle;
pub use ids::{ConfigHash, DatasetHash};
pub use metadata::PairMetadata;
pub use series::{CandleSeries, SeriesError};
pub use timeframe::{Timeframe, TimeframeError};
