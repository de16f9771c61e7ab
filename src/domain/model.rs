use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// 伺服器指派的紀錄 ID，可能是字串或整數
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        value
            .parse::<i64>()
            .map(RecordId::Number)
            .unwrap_or_else(|_| RecordId::Text(value.to_string()))
    }
}

/// A persisted BMI calculation as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BmiRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    pub height: f64,
    pub weight: f64,
    #[serde(default, deserialize_with = "lenient_age")]
    pub age: Option<u8>,
    #[serde(default)]
    pub bmi: Option<f64>,
    #[serde(default, deserialize_with = "lenient_created_at")]
    pub created_at: Option<DateTime<Utc>>,
}

const AGE_RANGE: std::ops::RangeInclusive<f64> = 1.0..=120.0;

/// 年齡無法辨識時視為未填，不讓單筆紀錄拖垮整個列表
fn lenient_age<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    let age = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    Ok(age
        .filter(|a| a.is_finite())
        .map(f64::trunc)
        .filter(|a| AGE_RANGE.contains(a))
        .map(|a| a as u8))
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` (read as UTC) and epoch
/// milliseconds. Anything else becomes `None`.
fn lenient_created_at<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => parse_timestamp(s.trim()),
        Some(Value::Number(n)) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    })
}

fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|naive| naive.and_utc())
}

impl BmiRecord {
    /// BMI recomputed from the stored height and weight.
    pub fn recomputed_bmi(&self, precision: u32) -> f64 {
        crate::core::engine::compute_bmi(self.height, self.weight, precision)
    }

    pub fn classification(&self, precision: u32) -> Classification {
        crate::core::engine::classify(self.recomputed_bmi(precision))
    }

    /// 伺服器儲存的 bmi 是否與重新計算的值不一致
    pub fn has_stale_bmi(&self, precision: u32) -> bool {
        match self.bmi {
            Some(stored) => {
                let tolerance = 0.5 * 10f64.powi(-(precision as i32));
                (stored - self.recomputed_bmi(precision)).abs() > tolerance
            }
            None => false,
        }
    }
}

/// Request body for `POST /api/create/bmi`. Only [`NewBmiRecord::new`] builds
/// one, so `bmi` always comes from the engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBmiRecord {
    height: f64,
    weight: f64,
    age: Option<u8>,
    bmi: f64,
    created_at: DateTime<Utc>,
}

impl NewBmiRecord {
    pub fn new(measurements: Measurements, precision: u32, created_at: DateTime<Utc>) -> Self {
        Self {
            height: measurements.height,
            weight: measurements.weight,
            age: measurements.age,
            bmi: crate::core::engine::compute_bmi(
                measurements.height,
                measurements.weight,
                precision,
            ),
            created_at,
        }
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn age(&self) -> Option<u8> {
        self.age
    }

    pub fn bmi(&self) -> f64 {
        self.bmi
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// 已通過驗證的量測值
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measurements {
    pub height: f64,
    pub weight: f64,
    pub age: Option<u8>,
}

/// 原始表單欄位（尚未解析的字串）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BmiForm {
    pub height: String,
    pub weight: String,
    pub age: String,
}

impl BmiForm {
    pub fn new(height: impl Into<String>, weight: impl Into<String>, age: impl Into<String>) -> Self {
        Self {
            height: height.into(),
            weight: weight.into(),
            age: age.into(),
        }
    }

    pub fn clear(&mut self) {
        self.height.clear();
        self.weight.clear();
        self.age.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.height.is_empty() && self.weight.is_empty() && self.age.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal weight",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

impl std::fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub category: BmiCategory,
    pub color: &'static str,
    pub advice: &'static str,
}
