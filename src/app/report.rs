use crate::core::engine::scale_reference;
use crate::core::tracker::{MessageKind, StatusMessage};
use crate::core::BmiRecord;
use crate::domain::model::{Classification, RecordId};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub fn render_message(message: &StatusMessage) -> String {
    match message.kind {
        MessageKind::Success => format!("✅ {}", message.text),
        MessageKind::Error => format!("❌ {}", message.text),
    }
}

pub fn render_result(bmi: f64, classification: &Classification) -> String {
    let scale: Vec<String> = scale_reference()
        .iter()
        .map(|(category, range)| format!("{}: {}", category, range))
        .collect();

    [
        "🎯 Your BMI Result".to_string(),
        format!("BMI: {}", bmi),
        format!("Category: {}", classification.category),
        format!("💡 Advice: {}", classification.advice),
        format!("BMI Scale Reference: {}", scale.join(" | ")),
    ]
    .join("\n")
}

fn format_date(record: &BmiRecord) -> String {
    record
        .created_at
        .map(|t| t.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// 歷史紀錄的純文字表格
pub fn render_history(records: &[BmiRecord], precision: u32) -> String {
    if records.is_empty() {
        return "📊 No BMI records found\n\
                Calculate and save your first BMI to start tracking your progress!"
            .to_string();
    }

    let mut lines = vec![
        format!("📊 Total Records: {}", records.len()),
        format!(
            "{:<10} {:<14} {:>7} {:<14} {:>7} {:>8} {:>4}",
            "ID", "Date", "BMI", "Category", "Height", "Weight", "Age"
        ),
    ];

    for record in records {
        let classification = record.classification(precision);
        let id = record.id.as_ref().map(|id| id.to_string()).unwrap_or_else(|| "-".to_string());
        let age = record.age.map(|a| a.to_string()).unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "{:<10} {:<14} {:>7} {:<14} {:>6}m {:>6}kg {:>4}",
            id,
            format_date(record),
            record.recomputed_bmi(precision),
            classification.category.label(),
            record.height,
            record.weight,
            age
        ));
        lines.push(format!("           💡 Health Status: {}", classification.advice));
    }

    lines.join("\n")
}

/// JSON 輸出的單筆紀錄，`bmi` 一律以身高體重重新計算
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a RecordId>,
    pub height: f64,
    pub weight: f64,
    pub age: Option<u8>,
    pub bmi: f64,
    pub created_at: Option<DateTime<Utc>>,
    pub category: &'static str,
    pub color: &'static str,
    pub advice: &'static str,
}

pub fn history_entries(records: &[BmiRecord], precision: u32) -> Vec<HistoryEntry<'_>> {
    records
        .iter()
        .map(|record| {
            let classification = record.classification(precision);
            HistoryEntry {
                id: record.id.as_ref(),
                height: record.height,
                weight: record.weight,
                age: record.age,
                bmi: record.recomputed_bmi(precision),
                created_at: record.created_at,
                category: classification.category.label(),
                color: classification.color,
                advice: classification.advice,
            }
        })
        .collect()
}
