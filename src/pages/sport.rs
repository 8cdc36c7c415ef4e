//! Sports Page
//!
//! Daily list of sport records with one shared create/edit form.

use std::cell::Cell;

use chrono::NaiveDate;
use serde::Serialize;

use super::{clear_fields, reject_invalid, row_buttons, ActionError, ActionResult, RowAction};
use crate::common::dates::format_date;
use crate::forms::{EditMode, FormValues, ValidationError};
use crate::host::Host;
use crate::http::Transport;
use crate::models::SportRecord;
use crate::render::{self, escape_html, fixed};
use crate::sync::{confirmed, report_failure, run_mutation, Container, LoadKind, LoadOutcome, PageContext};

pub const SPORTS_PATH: &str = "/api/sports/";

/// Element ids on the sports page
pub mod ids {
    pub const LIST: &str = "sport-list";
    pub const TOTAL: &str = "total-calories";
    pub const SUBMIT: &str = "sport-submit";
    pub const SPORT_TYPE: &str = "sport_type";
    pub const DURATION: &str = "duration_minutes";
    pub const CALORIES: &str = "calories_burned";
}

const FIELDS_REQUIRED: &str = "请填写所有字段！";

/// Body of POST/PUT `/api/sports/`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SportInput {
    pub sport_type: String,
    pub duration_minutes: u32,
    pub calories_burned: f64,
    pub record_date: String,
}

impl SportInput {
    pub fn from_form(form: &FormValues, record_date: NaiveDate) -> Result<Self, ValidationError> {
        Ok(Self {
            sport_type: form.required(ids::SPORT_TYPE, FIELDS_REQUIRED)?.to_string(),
            duration_minutes: form.integer(ids::DURATION, FIELDS_REQUIRED)?,
            calories_burned: form.number(ids::CALORIES, FIELDS_REQUIRED)?,
            record_date: format_date(record_date),
        })
    }
}

/// `跑步 - 30分钟 (300.0 大卡)`
pub fn entry_text(record: &SportRecord) -> String {
    format!(
        "{} - {}分钟 ({} 大卡)",
        record.sport_type,
        record.duration_minutes,
        fixed(record.calories_burned, 1)
    )
}

pub fn total_calories(records: &[SportRecord]) -> f64 {
    records.iter().map(|r| r.calories_burned).fold(0.0, |acc, c| acc + c)
}

pub fn render_list(records: &[SportRecord]) -> String {
    if records.is_empty() {
        return render::empty_list_item("当日暂无运动记录");
    }
    records
        .iter()
        .map(|r| {
            format!(
                r#"<li class="list-group-item d-flex justify-content-between align-items-center" data-id="{id}"><div><strong>{kind}</strong> - {minutes}分钟 <small class="text-muted">({kcal} 大卡)</small></div><div>{buttons}</div></li>"#,
                id = r.id,
                kind = escape_html(&r.sport_type),
                minutes = r.duration_minutes,
                kcal = fixed(r.calories_burned, 1),
                buttons = row_buttons(r.id),
            )
        })
        .collect()
}

pub struct SportPage<T, H> {
    ctx: PageContext<T, H>,
    list: Container<Vec<SportRecord>>,
    mode: Cell<EditMode>,
    date: Cell<NaiveDate>,
}

impl<T: Transport, H: Host> SportPage<T, H> {
    pub fn new(ctx: PageContext<T, H>, date: NaiveDate) -> Self {
        Self {
            ctx,
            list: Container::new(ids::LIST).with_error_markup(render::error_list_item),
            mode: Cell::new(EditMode::Create),
            date: Cell::new(date),
        }
    }

    pub fn mode(&self) -> EditMode {
        self.mode.get()
    }

    /// Reload and re-render the list for `date`
    pub async fn reconcile(&self, date: NaiveDate) -> LoadOutcome<Vec<SportRecord>> {
        self.date.set(date);
        let day = format_date(date);
        let query = [("record_date", day.as_str())];
        let fetch = self.ctx.client.get(SPORTS_PATH, &query);
        let outcome = self.list.load(&self.ctx, LoadKind::Primary, fetch).await;

        if let LoadOutcome::Applied(records) = &outcome {
            self.ctx.host.render(ids::LIST, render_list(records));
            self.ctx.host.set_text(ids::TOTAL, &fixed(total_calories(records), 1));
        }
        outcome
    }

    pub async fn handle(&self, action: RowAction) -> ActionResult {
        match action {
            RowAction::Edit(id) => self.begin_edit(id).await,
            RowAction::Delete(id) => self.delete(id).await,
            _ => Ok(()),
        }
    }

    /// Create or update, depending on the current mode
    pub async fn submit(&self, form: &FormValues) -> ActionResult {
        let input = SportInput::from_form(form, self.date.get())
            .map_err(|e| reject_invalid(&self.ctx.host, e))?;

        let mode = self.mode.get();
        let (method, path) = mode.target(SPORTS_PATH);
        let host = &self.ctx.host;
        host.set_disabled(ids::SUBMIT, true);
        host.set_text(ids::SUBMIT, mode.pick("正在添加...", "正在更新..."));

        let result = run_mutation(
            &self.ctx,
            self.ctx.client.send::<_, SportRecord>(method, &path, &input),
            mode.pick("记录添加成功！", "记录更新成功！"),
        )
        .await;

        host.set_disabled(ids::SUBMIT, false);
        match result {
            Ok(_) => {
                self.reset_form();
                self.reconcile(self.date.get()).await;
                Ok(())
            }
            Err(e) => {
                host.set_text(ids::SUBMIT, mode.pick("添加记录", "更新记录"));
                Err(ActionError::Api(e))
            }
        }
    }

    /// Fetch the full record and switch the form into edit mode
    pub async fn begin_edit(&self, id: u64) -> ActionResult {
        let record: SportRecord = match self.ctx.client.get(&format!("{}{}/", SPORTS_PATH, id), &[]).await {
            Ok(record) => record,
            Err(e) => {
                report_failure(&self.ctx, &e, "获取记录失败: ");
                return Err(e.into());
            }
        };

        let host = &self.ctx.host;
        host.set_value(ids::SPORT_TYPE, &record.sport_type);
        host.set_value(ids::DURATION, &record.duration_minutes.to_string());
        host.set_value(ids::CALORIES, &record.calories_burned.to_string());
        host.set_text(ids::SUBMIT, "更新记录");
        self.mode.set(EditMode::Edit(id));
        Ok(())
    }

    pub async fn delete(&self, id: u64) -> ActionResult {
        if !confirmed(&self.ctx.host, "您确定要删除这条记录吗？") {
            return Err(ActionError::Cancelled);
        }
        run_mutation(
            &self.ctx,
            self.ctx.client.delete(&format!("{}{}/", SPORTS_PATH, id)),
            "记录删除成功！",
        )
        .await?;
        if self.mode.get() == EditMode::Edit(id) {
            self.reset_form();
        }
        self.reconcile(self.date.get()).await;
        Ok(())
    }

    /// Back to create mode with a blank form
    pub fn reset_form(&self) {
        self.mode.set(EditMode::Create);
        clear_fields(&self.ctx.host, &[ids::SPORT_TYPE, ids::DURATION, ids::CALORIES]);
        self.ctx.host.set_text(ids::SUBMIT, "添加记录");
    }
}
