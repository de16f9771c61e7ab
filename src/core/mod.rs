pub mod engine;
pub mod tracker;

pub use crate::domain::model::{BmiRecord, NewBmiRecord, RecordId};
pub use crate::domain::ports::{BmiApi, ConfigProvider};
pub use crate::utils::error::Result;
