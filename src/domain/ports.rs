use crate::domain::model::{BmiRecord, NewBmiRecord, RecordId};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// 外部 BMI 紀錄服務
#[async_trait]
pub trait BmiApi: Send + Sync {
    async fn list_records(&self) -> Result<Vec<BmiRecord>>;
    async fn create_record(&self, record: &NewBmiRecord) -> Result<Option<BmiRecord>>;
    async fn delete_record(&self, id: &RecordId) -> Result<()>;
}

pub trait ConfigProvider: Send + Sync {
    fn api_base_url(&self) -> &str;
    fn request_timeout(&self) -> Option<Duration>;
    fn headers(&self) -> &HashMap<String, String>;
    fn precision(&self) -> u32;
}
