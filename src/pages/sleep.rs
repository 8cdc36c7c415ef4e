//! Sleep Page
//!
//! One record per night, looked up by wake-up date. The summary card doubles
//! as the switch between adding a new night and correcting the existing one.

use std::cell::Cell;

use chrono::NaiveDate;
use serde::Serialize;

use super::{clear_fields, reject_invalid, ActionError, ActionResult};
use crate::common::dates::{clock_range, datetime_local, duration_hm, format_date};
use crate::forms::{EditMode, FormValues, ValidationError};
use crate::host::Host;
use crate::http::Transport;
use crate::models::SleepRecord;
use crate::render::{self, escape_html};
use crate::sync::{report_failure, run_mutation, Container, LoadKind, LoadOutcome, PageContext};

pub const SLEEP_PATH: &str = "/api/sleep/";

pub mod ids {
    pub const SUMMARY: &str = "sleep-summary";
    pub const MODAL: &str = "sleepRecordModal";
    pub const MODAL_TITLE: &str = "sleepRecordModalLabel";
    pub const SUBMIT: &str = "sleep-submit";
    pub const SLEEP_TIME: &str = "sleep-time";
    pub const WAKEUP_TIME: &str = "wakeup-time";
}

const TIMES_REQUIRED: &str = "请填写入睡和起床时间！";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SleepInput {
    pub sleep_time: String,
    pub wakeup_time: String,
}

impl SleepInput {
    pub fn from_form(form: &FormValues) -> Result<Self, ValidationError> {
        Ok(Self {
            sleep_time: form.required(ids::SLEEP_TIME, TIMES_REQUIRED)?.to_string(),
            wakeup_time: form.required(ids::WAKEUP_TIME, TIMES_REQUIRED)?.to_string(),
        })
    }
}

/// `8h 30m`; `-- 小时` without a record
pub fn duration_label(record: Option<&SleepRecord>) -> String {
    match record {
        None => "-- 小时".to_string(),
        Some(r) => r
            .duration
            .as_deref()
            .and_then(duration_hm)
            .map(|(h, m)| format!("{}h {}m", h, m))
            .unwrap_or_else(|| "--".to_string()),
    }
}

pub fn range_label(record: Option<&SleepRecord>) -> String {
    match record {
        None => "未记录".to_string(),
        Some(r) => clock_range(&r.sleep_time, &r.wakeup_time),
    }
}

pub fn render_summary(record: Option<&SleepRecord>) -> String {
    format!(
        r#"<h3 class="card-title mb-1" id="sleep-duration-display">{}</h3><p class="text-muted mb-0" id="sleep-range-display">{}</p>"#,
        escape_html(&duration_label(record)),
        escape_html(&range_label(record)),
    )
}

pub struct SleepPage<T, H> {
    ctx: PageContext<T, H>,
    summary: Container<Vec<SleepRecord>>,
    mode: Cell<EditMode>,
    date: Cell<NaiveDate>,
}

impl<T: Transport, H: Host> SleepPage<T, H> {
    pub fn new(ctx: PageContext<T, H>, date: NaiveDate) -> Self {
        Self {
            ctx,
            summary: Container::new(ids::SUMMARY).with_error_markup(render::error_paragraph),
            mode: Cell::new(EditMode::Create),
            date: Cell::new(date),
        }
    }

    pub fn mode(&self) -> EditMode {
        self.mode.get()
    }

    /// Load the night that ended on `date`. An existing record puts the form
    /// into edit mode.
    pub async fn reconcile(&self, date: NaiveDate) -> LoadOutcome<Vec<SleepRecord>> {
        self.date.set(date);
        let day = format_date(date);
        let query = [("record_date", day.as_str())];
        let fetch = self.ctx.client.get(SLEEP_PATH, &query);
        let outcome = self.summary.load(&self.ctx, LoadKind::Primary, fetch).await;

        if let LoadOutcome::Applied(records) = &outcome {
            let record = records.first();
            self.mode.set(match record {
                Some(r) => EditMode::Edit(r.id),
                None => EditMode::Create,
            });
            self.ctx.host.render(ids::SUMMARY, render_summary(record));
        }
        outcome
    }

    /// Prepare and show the modal. Edit mode prefills from the stored record.
    pub async fn open_modal(&self) -> ActionResult {
        let host = &self.ctx.host;
        match self.mode.get() {
            EditMode::Edit(id) => {
                host.set_text(ids::MODAL_TITLE, "修改睡眠记录");
                host.set_text(ids::SUBMIT, "更新记录");
                let path = format!("{}{}/", SLEEP_PATH, id);
                let record: SleepRecord = match self.ctx.client.get(&path, &[]).await {
                    Ok(record) => record,
                    Err(e) => {
                        report_failure(&self.ctx, &e, "获取记录失败: ");
                        return Err(e.into());
                    }
                };
                host.set_value(ids::SLEEP_TIME, &datetime_local(&record.sleep_time));
                host.set_value(ids::WAKEUP_TIME, &datetime_local(&record.wakeup_time));
            }
            EditMode::Create => {
                host.set_text(ids::MODAL_TITLE, "添加睡眠记录");
                host.set_text(ids::SUBMIT, "保存记录");
                clear_fields(host, &[ids::SLEEP_TIME, ids::WAKEUP_TIME]);
            }
        }
        host.show_modal(ids::MODAL, true);
        Ok(())
    }

    pub async fn submit(&self, form: &FormValues) -> ActionResult {
        let input = SleepInput::from_form(form).map_err(|e| reject_invalid(&self.ctx.host, e))?;

        let mode = self.mode.get();
        let (method, path) = mode.target(SLEEP_PATH);
        let host = &self.ctx.host;
        host.set_disabled(ids::SUBMIT, true);
        host.set_text(ids::SUBMIT, "正在保存...");

        let result = run_mutation(
            &self.ctx,
            self.ctx.client.send::<_, SleepRecord>(method, &path, &input),
            mode.pick("记录添加成功！", "记录更新成功！"),
        )
        .await;

        host.set_disabled(ids::SUBMIT, false);
        host.set_text(ids::MODAL_TITLE, "记录你的睡眠");
        host.set_text(ids::SUBMIT, "保存记录");

        result.map_err(ActionError::Api)?;
        host.show_modal(ids::MODAL, false);
        self.reconcile(self.date.get()).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;
    use crate::testing::Harness;
    use serde_json::json;

    fn may_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn seed_night(harness: &Harness) {
        harness.backend.seed(
            "sleep",
            json!({
                "sleep_time": "2024-04-30T23:00:00+08:00",
                "wakeup_time": "2024-05-01T07:30:00+08:00",
                "duration": "08:30:00",
                "record_date": "2024-05-01"
            }),
        );
    }

    #[test]
    fn test_labels() {
        let record = SleepRecord {
            id: 1,
            sleep_time: "2024-04-30T23:05:00+08:00".into(),
            wakeup_time: "2024-05-01T06:45:00+08:00".into(),
            duration: Some("07:40:00".into()),
        };
        assert_eq!(duration_label(Some(&record)), "7h 40m");
        assert_eq!(range_label(Some(&record)), "23:05 - 06:45");
        assert_eq!(duration_label(None), "-- 小时");
        assert_eq!(range_label(None), "未记录");

        let partial = SleepRecord { duration: None, ..record };
        assert_eq!(duration_label(Some(&partial)), "--");
    }

    #[tokio::test]
    async fn test_existing_record_enables_edit() {
        let harness = Harness::new();
        seed_night(&harness);
        let page = SleepPage::new(harness.ctx.clone(), may_first());

        page.reconcile(may_first()).await;
        let html = harness.host.rendered(ids::SUMMARY).unwrap();
        assert!(html.contains("8h 30m"));
        assert!(html.contains("23:00 - 07:30"));
        assert_eq!(page.mode(), EditMode::Edit(1));

        page.open_modal().await.unwrap();
        assert_eq!(harness.host.text(ids::MODAL_TITLE).as_deref(), Some("修改睡眠记录"));
        assert_eq!(harness.host.value(ids::SLEEP_TIME).as_deref(), Some("2024-04-30T23:00"));
        assert_eq!(harness.host.value(ids::WAKEUP_TIME).as_deref(), Some("2024-05-01T07:30"));
        assert_eq!(harness.host.modal(ids::MODAL), Some(true));
    }

    #[tokio::test]
    async fn test_empty_day_creates() {
        let harness = Harness::new();
        let page = SleepPage::new(harness.ctx.clone(), may_first());

        page.reconcile(may_first()).await;
        let html = harness.host.rendered(ids::SUMMARY).unwrap();
        assert!(html.contains("-- 小时"));
        assert!(html.contains("未记录"));

        page.open_modal().await.unwrap();
        assert_eq!(harness.host.text(ids::MODAL_TITLE).as_deref(), Some("添加睡眠记录"));

        let form = FormValues::new()
            .with(ids::SLEEP_TIME, "2024-04-30T22:30")
            .with(ids::WAKEUP_TIME, "2024-05-01T06:30");
        page.submit(&form).await.unwrap();

        let post = harness.backend.last_request(Method::Post).unwrap();
        assert_eq!(post.path, SLEEP_PATH);
        assert_eq!(
            post.body.unwrap(),
            json!({"sleep_time": "2024-04-30T22:30", "wakeup_time": "2024-05-01T06:30"})
        );
        assert_eq!(harness.host.modal(ids::MODAL), Some(false));
        assert_eq!(harness.host.last_notice().unwrap().message, "记录添加成功！");
        assert_eq!(harness.host.text(ids::SUBMIT).as_deref(), Some("保存记录"));
    }

    #[tokio::test]
    async fn test_update_uses_existing_id() {
        let harness = Harness::new();
        seed_night(&harness);
        let page = SleepPage::new(harness.ctx.clone(), may_first());
        page.reconcile(may_first()).await;

        let form = FormValues::new()
            .with(ids::SLEEP_TIME, "2024-04-30T23:30")
            .with(ids::WAKEUP_TIME, "2024-05-01T07:00");
        page.submit(&form).await.unwrap();

        assert_eq!(harness.backend.last_request(Method::Put).unwrap().path, "/api/sleep/1/");
        assert_eq!(harness.host.last_notice().unwrap().message, "记录更新成功！");
    }

    #[tokio::test]
    async fn test_missing_time_rejected() {
        let harness = Harness::new();
        let page = SleepPage::new(harness.ctx.clone(), may_first());

        let form = FormValues::new().with(ids::SLEEP_TIME, "2024-04-30T23:30");
        let err = page.submit(&form).await.unwrap_err();
        assert_eq!(err, ActionError::Invalid(ValidationError::new(TIMES_REQUIRED)));
        assert!(harness.backend.requests().is_empty());
    }

    #[tokio::test]
    async fn test_auth_failure_redirects() {
        let harness = Harness::new();
        harness.backend.respond(Method::Get, SLEEP_PATH, 403, "");
        let page = SleepPage::new(harness.ctx.clone(), may_first());

        page.reconcile(may_first()).await;
        assert!(harness.host.navigations().is_empty());
        assert_eq!(harness.host.scheduled_delays(), vec![3000]);
        harness.host.run_scheduled();
        assert_eq!(harness.host.navigations(), vec!["/login/".to_string()]);
    }
}
