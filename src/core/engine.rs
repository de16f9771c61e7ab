use crate::domain::model::{BmiCategory, Classification};

pub const UNDERWEIGHT_BELOW: f64 = 18.5;
pub const OVERWEIGHT_FROM: f64 = 25.0;
pub const OBESE_FROM: f64 = 30.0;

pub const DEFAULT_PRECISION: u32 = 2;

/// 四捨五入到指定小數位數（遠離零方向）
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// `weight / height²`, rounded to `precision` decimal places.
///
/// Inputs are expected to be validated already; non-positive values produce
/// meaningless (but non-panicking) results.
pub fn compute_bmi(height: f64, weight: f64, precision: u32) -> f64 {
    round_to(weight / (height * height), precision)
}

/// Maps a BMI value onto its bucket. Bins are left-inclusive; anything that
/// is not below 30 (including NaN) lands in `Obese`.
pub fn classify(bmi: f64) -> Classification {
    let category = if bmi < UNDERWEIGHT_BELOW {
        BmiCategory::Underweight
    } else if bmi < OVERWEIGHT_FROM {
        BmiCategory::Normal
    } else if bmi < OBESE_FROM {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    };

    Classification {
        category,
        color: category_color(category),
        advice: category_advice(category),
    }
}

pub fn category_color(category: BmiCategory) -> &'static str {
    match category {
        BmiCategory::Underweight => "#3b82f6",
        BmiCategory::Normal => "#10b981",
        BmiCategory::Overweight => "#f59e0b",
        BmiCategory::Obese => "#ef4444",
    }
}

pub fn category_advice(category: BmiCategory) -> &'static str {
    match category {
        BmiCategory::Underweight => {
            "Consider consulting a healthcare provider about healthy weight gain strategies."
        }
        BmiCategory::Normal => {
            "Great! You are in the healthy weight range. Maintain your current lifestyle."
        }
        BmiCategory::Overweight => {
            "Consider adopting healthier eating habits and increasing physical activity."
        }
        BmiCategory::Obese => {
            "Please consult with a healthcare provider about weight management strategies."
        }
    }
}

/// BMI 量表對照（用於顯示圖例）
pub fn scale_reference() -> [(BmiCategory, &'static str); 4] {
    [
        (BmiCategory::Underweight, "<18.5"),
        (BmiCategory::Normal, "18.5-24.9"),
        (BmiCategory::Overweight, "25-29.9"),
        (BmiCategory::Obese, "≥30"),
    ]
}
