use crate::core::BmiRecord;
use crate::utils::error::Result;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Serialize)]
struct HistoryRow<'a> {
    id: String,
    created_at: String,
    height_m: f64,
    weight_kg: f64,
    age: Option<u8>,
    bmi: f64,
    category: &'a str,
    advice: &'a str,
}

/// 將歷史紀錄寫成 CSV，BMI 與分類皆以身高體重重新計算
pub fn write_history_csv<W: Write>(writer: W, records: &[BmiRecord], precision: u32) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for record in records {
        let classification = record.classification(precision);
        csv_writer.serialize(HistoryRow {
            id: record.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
            created_at: record
                .created_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
            height_m: record.height,
            weight_kg: record.weight,
            age: record.age,
            bmi: record.recomputed_bmi(precision),
            category: classification.category.label(),
            advice: classification.advice,
        })?;
    }

    csv_writer.flush()?;
    Ok(records.len())
}

pub fn export_history_csv<P: AsRef<Path>>(path: P, records: &[BmiRecord], precision: u32) -> Result<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::File::create(path)?;
    let written = write_history_csv(file, records, precision)?;
    tracing::info!("📁 Exported {} BMI records to {}", written, path.display());
    Ok(written)
}
