use crate::core::{BmiApi, BmiRecord, ConfigProvider, NewBmiRecord, RecordId};
use crate::utils::error::{ApiOperation, Result, TrackerError};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

const RECORDS_PATH: [&str; 3] = ["api", "user", "bmi"];
const CREATE_PATH: [&str; 3] = ["api", "create", "bmi"];

/// `BmiApi` backed by the REST service.
#[derive(Debug, Clone)]
pub struct HttpBmiApi {
    client: Client,
    base_url: Url,
    headers: HashMap<String, String>,
    timeout: Option<Duration>,
}

impl HttpBmiApi {
    pub fn new(base_url: &str) -> Result<Self> {
        crate::utils::validation::validate_url("api.base_url", base_url)?;
        Ok(Self {
            client: Client::builder().build()?,
            base_url: Url::parse(base_url)?,
            headers: HashMap::new(),
            timeout: None,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut api = Self::new(config.api_base_url())?;
        api.headers = config.headers().clone();
        api.timeout = config.request_timeout();
        Ok(api)
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// 在 base URL 之後附加路徑片段（保留 base URL 既有的路徑前綴）
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TrackerError::InvalidConfigValueError {
                field: "api.base_url".to_string(),
                value: self.base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!("📡 {} {}", method, url);

        let mut request = self
            .client
            .request(method, url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");

        // 添加自定義標頭
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }

        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }

        request
    }

    async fn send(&self, operation: ApiOperation, request: RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|source| TrackerError::Transport { operation, source })?;

        let status = response.status();
        tracing::debug!("📡 {}: API response status: {}", operation, status);

        if status.is_success() {
            return Ok(response);
        }

        // 嘗試讀取伺服器的錯誤訊息 {"message": "..."}
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body.get("message").and_then(|m| m.as_str()).map(String::from));

        Err(TrackerError::ApiStatus {
            operation,
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl BmiApi for HttpBmiApi {
    async fn list_records(&self) -> Result<Vec<BmiRecord>> {
        let operation = ApiOperation::ListRecords;
        let url = self.endpoint(RECORDS_PATH)?;
        let response = self.send(operation, self.request(Method::GET, url)).await?;

        response
            .json::<Vec<BmiRecord>>()
            .await
            .map_err(|source| TrackerError::Transport { operation, source })
    }

    async fn create_record(&self, record: &NewBmiRecord) -> Result<Option<BmiRecord>> {
        let operation = ApiOperation::CreateRecord;
        let url = self.endpoint(CREATE_PATH)?;
        let request = self.request(Method::POST, url).json(record);
        let response = self.send(operation, request).await?;

        let body = response
            .bytes()
            .await
            .map_err(|source| TrackerError::Transport { operation, source })?;
        if body.is_empty() {
            return Ok(None);
        }

        match serde_json::from_slice::<BmiRecord>(&body) {
            Ok(created) => Ok(Some(created)),
            Err(e) => {
                tracing::debug!("Create response is not a BMI record: {}", e);
                Ok(None)
            }
        }
    }

    async fn delete_record(&self, id: &RecordId) -> Result<()> {
        let id = id.to_string();
        let mut segments: Vec<&str> = RECORDS_PATH.to_vec();
        segments.push(&id);
        let url = self.endpoint(segments)?;
        self.send(ApiOperation::DeleteRecord, self.request(Method::DELETE, url))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let api = HttpBmiApi::new("https://example.com/tracker/").unwrap();
        let url = api.endpoint(RECORDS_PATH).unwrap();
        assert_eq!(url.as_str(), "https://example.com/tracker/api/user/bmi");

        let api = HttpBmiApi::new("http://localhost:3000").unwrap();
        let url = api.endpoint(CREATE_PATH).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/create/bmi");
    }

    #[test]
    fn test_endpoint_encodes_record_id() {
        let api = HttpBmiApi::new("http://localhost:3000").unwrap();
        let url = api.endpoint(["api", "user", "bmi", "a b/c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/api/user/bmi/a%20b%2Fc");
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        assert!(HttpBmiApi::new("ftp://example.com").is_err());
        assert!(HttpBmiApi::new("").is_err());
    }
}
