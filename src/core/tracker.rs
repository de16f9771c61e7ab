use crate::core::engine::classify;
use crate::core::BmiApi;
use crate::domain::model::{BmiForm, BmiRecord, Classification, NewBmiRecord, RecordId};
use crate::utils::error::{Result, TrackerError};
use crate::utils::validation::{validate_measurements, validate_submission};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Calculator,
    History,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: MessageKind,
    pub text: String,
}

impl StatusMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Error,
            text: text.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == MessageKind::Success
    }
}

/// 限制同時只有一個進行中的請求
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn try_acquire(&self) -> Result<BusyGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| TrackerError::Busy)?;
        Ok(BusyGuard(self.0.clone()))
    }

    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Releases the busy flag on drop, including when the owning future is dropped.
#[derive(Debug)]
pub struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// One user's tracking session: form input, computed result, status message
/// and the history fetched from the API.
pub struct BmiTracker<A: BmiApi> {
    api: A,
    precision: u32,
    form: BmiForm,
    active_tab: Tab,
    result: Option<f64>,
    message: Option<StatusMessage>,
    history: Vec<BmiRecord>,
    busy: BusyFlag,
}

impl<A: BmiApi> BmiTracker<A> {
    pub fn new(api: A, precision: u32) -> Self {
        Self {
            api,
            precision,
            form: BmiForm::default(),
            active_tab: Tab::default(),
            result: None,
            message: None,
            history: Vec::new(),
            busy: BusyFlag::default(),
        }
    }

    pub fn form(&self) -> &BmiForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut BmiForm {
        &mut self.form
    }

    pub fn set_form(&mut self, form: BmiForm) {
        self.form = form;
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn result(&self) -> Option<f64> {
        self.result
    }

    pub fn classification(&self) -> Option<Classification> {
        self.result.map(classify)
    }

    pub fn message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    pub fn history(&self) -> &[BmiRecord] {
        &self.history
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    fn fail<T>(&mut self, error: TrackerError) -> Result<T> {
        self.message = Some(StatusMessage::error(error.user_message()));
        Err(error)
    }

    /// 僅計算 BMI，不呼叫 API
    pub fn calculate_only(&mut self) -> Result<f64> {
        self.message = None;

        let measurements = match validate_measurements(&self.form) {
            Ok(m) => m,
            Err(e) => return self.fail(e),
        };

        let bmi = crate::core::engine::compute_bmi(
            measurements.height,
            measurements.weight,
            self.precision,
        );
        self.result = Some(bmi);
        self.message = Some(StatusMessage::success(
            "BMI calculated successfully (not saved to database).",
        ));
        tracing::debug!("🧮 Calculated BMI {} without saving", bmi);
        Ok(bmi)
    }

    /// 計算並儲存 BMI 紀錄
    pub async fn submit(&mut self) -> Result<f64> {
        let _guard = self.busy.try_acquire()?;
        self.message = None;

        let measurements = match validate_submission(&self.form) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("❌ Submission rejected: {}", e);
                return self.fail(e);
            }
        };

        let record = NewBmiRecord::new(measurements, self.precision, Utc::now());
        let bmi = record.bmi();
        self.result = Some(bmi);

        tracing::debug!(
            "💾 Saving BMI record: height={} weight={} age={:?} bmi={}",
            record.height(),
            record.weight(),
            record.age(),
            bmi
        );

        match self.api.create_record(&record).await {
            Ok(created) => {
                if let Some(id) = created.as_ref().and_then(|r| r.id.as_ref()) {
                    tracing::info!("✅ BMI record {} saved", id);
                } else {
                    tracing::info!("✅ BMI record saved");
                }
                self.message = Some(StatusMessage::success(
                    "BMI calculated and saved successfully!",
                ));
                self.form.clear();

                if self.active_tab == Tab::History {
                    // 刷新失敗只影響訊息，儲存本身已成功
                    let _ = self.load_history().await;
                }
                Ok(bmi)
            }
            Err(e) => {
                tracing::error!("❌ Failed to save BMI record: {}", e);
                self.fail(e)
            }
        }
    }

    pub async fn fetch_history(&mut self) -> Result<()> {
        let _guard = self.busy.try_acquire()?;
        self.load_history().await
    }

    async fn load_history(&mut self) -> Result<()> {
        self.message = None;

        match self.api.list_records().await {
            Ok(records) => {
                for record in records.iter().filter(|r| r.has_stale_bmi(self.precision)) {
                    tracing::warn!(
                        "⚠️ Stored BMI {:?} for record {:?} does not match height/weight, using {}",
                        record.bmi,
                        record.id,
                        record.recomputed_bmi(self.precision)
                    );
                }
                tracing::info!("📈 Loaded {} BMI records", records.len());
                self.history = records;
                self.message = Some(StatusMessage::success("BMI history loaded successfully!"));
                Ok(())
            }
            Err(e) => {
                tracing::error!("❌ Failed to load BMI history: {}", e);
                self.history.clear();
                self.fail(e)
            }
        }
    }

    /// 刪除紀錄後重新載入歷史
    pub async fn delete_record(&mut self, id: &RecordId) -> Result<()> {
        let _guard = self.busy.try_acquire()?;

        match self.api.delete_record(id).await {
            Ok(()) => {
                tracing::info!("🗑️ BMI record {} deleted", id);
                self.message = Some(StatusMessage::success("BMI record deleted successfully!"));
                self.load_history().await
            }
            Err(e) => {
                tracing::error!("❌ Failed to delete BMI record {}: {}", id, e);
                self.fail(e)
            }
        }
    }

    pub async fn switch_tab(&mut self, tab: Tab) -> Result<()> {
        self.active_tab = tab;
        if tab == Tab::History {
            self.fetch_history().await?;
        }
        Ok(())
    }

    pub fn clear_form(&mut self) {
        self.form.clear();
        self.result = None;
        self.message = None;
    }
}
