use crate::domain::model::{BmiForm, Measurements};
use crate::utils::error::{TrackerError, Result};
use url::Url;

pub const MIN_HEIGHT_M: f64 = 0.5;
pub const MAX_HEIGHT_M: f64 = 3.0;
pub const MIN_WEIGHT_KG: f64 = 10.0;
pub const MAX_WEIGHT_KG: f64 = 500.0;
pub const MIN_AGE_YEARS: i64 = 1;
pub const MAX_AGE_YEARS: i64 = 120;

const HEIGHT_RANGE_MESSAGE: &str = "Please enter a realistic height between 0.5m and 3m.";
const WEIGHT_RANGE_MESSAGE: &str = "Please enter a realistic weight between 10kg and 500kg.";
const AGE_RANGE_MESSAGE: &str = "Please enter a realistic age between 1 and 120 years.";

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 表單驗證模式：「計算並儲存」與「僅計算」的訊息不同
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormMode {
    Submission,
    CalculationOnly,
}

impl FormMode {
    fn invalid_number_message(&self) -> &'static str {
        match self {
            FormMode::Submission => "Please enter valid numbers for all fields.",
            FormMode::CalculationOnly => "Please enter valid height and weight.",
        }
    }

    fn non_positive_message(&self) -> &'static str {
        match self {
            FormMode::Submission => "Please enter positive values for all fields.",
            FormMode::CalculationOnly => "Please enter positive values.",
        }
    }
}

enum AgeField {
    Absent,
    Invalid,
    Given(i64),
}

/// Parses a numeric form field. Empty, unparsable, non-finite and zero values
/// all count as "not a number".
fn parse_number(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    if !value.is_finite() || value == 0.0 {
        return None;
    }
    Some(value)
}

fn parse_age(raw: &str) -> AgeField {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return AgeField::Absent;
    }
    match trimmed.parse::<i64>() {
        Ok(0) | Err(_) => AgeField::Invalid,
        Ok(age) => AgeField::Given(age),
    }
}

fn check_range<T: PartialOrd>(value: T, min: T, max: T, message: &str) -> Result<()> {
    if value < min || value > max {
        return Err(TrackerError::invalid_input(message));
    }
    Ok(())
}

fn validate_form(form: &BmiForm, mode: FormMode) -> Result<Measurements> {
    let height = parse_number(&form.height);
    let weight = parse_number(&form.weight);
    let age = match mode {
        FormMode::Submission => parse_age(&form.age),
        FormMode::CalculationOnly => AgeField::Absent,
    };

    let (height, weight, age) = match (height, weight, age) {
        (Some(h), Some(w), AgeField::Absent) => (h, w, None),
        (Some(h), Some(w), AgeField::Given(a)) => (h, w, Some(a)),
        _ => return Err(TrackerError::invalid_input(mode.invalid_number_message())),
    };

    if height <= 0.0 || weight <= 0.0 || age.is_some_and(|a| a <= 0) {
        return Err(TrackerError::invalid_input(mode.non_positive_message()));
    }

    check_range(height, MIN_HEIGHT_M, MAX_HEIGHT_M, HEIGHT_RANGE_MESSAGE)?;
    check_range(weight, MIN_WEIGHT_KG, MAX_WEIGHT_KG, WEIGHT_RANGE_MESSAGE)?;

    let age = match age {
        Some(a) => {
            check_range(a, MIN_AGE_YEARS, MAX_AGE_YEARS, AGE_RANGE_MESSAGE)?;
            // 已確認在 1..=120 範圍內
            Some(a as u8)
        }
        None => None,
    };

    Ok(Measurements {
        height,
        weight,
        age,
    })
}

/// 驗證「計算並儲存」表單：身高、體重必填，年齡選填
pub fn validate_submission(form: &BmiForm) -> Result<Measurements> {
    validate_form(form, FormMode::Submission)
}

/// 驗證「僅計算」表單：忽略年齡欄位
pub fn validate_measurements(form: &BmiForm) -> Result<Measurements> {
    validate_form(form, FormMode::CalculationOnly)
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(TrackerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(TrackerError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(TrackerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(TrackerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}
