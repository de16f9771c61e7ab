use crate::adapters::export::export_history_csv;
use crate::app::report;
use crate::config::cli::{Command, OutputFormat};
use crate::core::tracker::{BmiTracker, Tab};
use crate::core::{BmiApi, RecordId};
use crate::domain::model::BmiForm;
use crate::utils::error::Result;
use std::io::Write;

fn print_status<A: BmiApi, W: Write>(tracker: &BmiTracker<A>, out: &mut W) -> Result<()> {
    if let Some(message) = tracker.message() {
        writeln!(out, "{}", report::render_message(message))?;
    }
    Ok(())
}

fn print_result<A: BmiApi, W: Write>(tracker: &BmiTracker<A>, out: &mut W) -> Result<()> {
    if let (Some(bmi), Some(classification)) = (tracker.result(), tracker.classification()) {
        writeln!(out, "{}", report::render_result(bmi, &classification))?;
    }
    Ok(())
}

fn print_history<A: BmiApi, W: Write>(
    tracker: &BmiTracker<A>,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::Table => {
            writeln!(out, "{}", report::render_history(tracker.history(), tracker.precision()))?;
        }
        OutputFormat::Json => {
            let entries = report::history_entries(tracker.history(), tracker.precision());
            writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
        }
    }
    Ok(())
}

/// 執行單一 CLI 指令。`confirm` 在刪除前被呼叫，回傳 false 則取消刪除。
///
/// Every failure is written to `out` as a single `❌` line before it is returned.
pub async fn run_command<A, W, F>(
    tracker: &mut BmiTracker<A>,
    command: Command,
    confirm: F,
    out: &mut W,
) -> Result<()>
where
    A: BmiApi,
    W: Write,
    F: FnOnce(&RecordId) -> bool,
{
    let outcome = execute(tracker, command, confirm, out).await;
    if let Err(e) = &outcome {
        writeln!(out, "❌ {}", e.user_message())?;
    }
    outcome
}

/// 成功時輸出結果與狀態訊息；失敗的訊息交由 `run_command` 統一輸出
async fn execute<A, W, F>(
    tracker: &mut BmiTracker<A>,
    command: Command,
    confirm: F,
    out: &mut W,
) -> Result<()>
where
    A: BmiApi,
    W: Write,
    F: FnOnce(&RecordId) -> bool,
{
    match command {
        Command::Calc { height, weight } => {
            tracker.set_form(BmiForm::new(height, weight, ""));
            tracker.calculate_only()?;
            print_result(tracker, out)?;
            print_status(tracker, out)
        }
        Command::Save {
            height,
            weight,
            age,
        } => {
            tracker.set_form(BmiForm::new(height, weight, age));
            let outcome = tracker.submit().await;
            // 儲存失敗時 BMI 仍已算出
            print_result(tracker, out)?;
            outcome?;
            print_status(tracker, out)
        }
        Command::List { format } => {
            tracker.switch_tab(Tab::History).await?;
            print_history(tracker, format, out)?;
            print_status(tracker, out)
        }
        Command::Delete { id, yes } => {
            let id = RecordId::from(id.as_str());
            if !yes && !confirm(&id) {
                writeln!(out, "Deletion of record {} cancelled.", id)?;
                return Ok(());
            }

            tracker.delete_record(&id).await?;
            print_history(tracker, OutputFormat::Table, out)?;
            print_status(tracker, out)
        }
        Command::Export { output } => {
            tracker.fetch_history().await?;
            let written = export_history_csv(&output, tracker.history(), tracker.precision())?;
            writeln!(out, "📁 Exported {} records to {}", written, output.display())?;
            Ok(())
        }
    }
}
