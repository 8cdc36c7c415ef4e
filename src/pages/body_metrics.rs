//! Body Metrics Page
//!
//! Weight and height history with BMI classification. The current card, the
//! history table and the trend chart are all drawn from one cached list.

use std::cell::Cell;

use chrono::NaiveDate;
use serde::Serialize;

use super::{draw_chart, reject_invalid, row_buttons, ActionError, ActionResult, RowAction};
use crate::charts::{builders, ChartSlot};
use crate::common::dates::format_date;
use crate::forms::{EditMode, FormValues, ValidationError};
use crate::host::Host;
use crate::http::Transport;
use crate::models::{compute_bmi, BmiStatus, BodyMetric};
use crate::render::{self, escape_html, fixed};
use crate::sync::{
    confirmed, report_failure, run_mutation_with, Container, LoadKind, LoadOutcome, PageContext,
};

pub const BODY_METRICS_PATH: &str = "/api/body-metrics/";

/// Chart ranges offered by the range selector, in days
pub const CHART_RANGES: [i64; 4] = [7, 30, 90, 365];

pub mod ids {
    pub const CURRENT: &str = "current-metrics";
    pub const HISTORY: &str = "history-tbody";
    pub const CHART: &str = "trend-chart";
    pub const MODAL: &str = "bodyMetricModal";
    pub const EDITING_ID: &str = "editing-id";
    pub const WEIGHT: &str = "weight-input";
    pub const HEIGHT: &str = "height-input";
    pub const RECORD_DATE: &str = "record-date-input";
    pub const PREVIEW: &str = "bmi-preview";
}

const HISTORY_COLUMNS: usize = 6;
const INVALID_MEASURES: &str = "请输入有效的体重和身高！";

fn bmi_badge(status: BmiStatus) -> String {
    format!(r#"<span class="badge {}">{}</span>"#, status.badge_class(), status.label())
}

fn bmi_text(bmi: Option<f64>) -> String {
    bmi.map(|b| fixed(b, 2)).unwrap_or_else(|| "--".to_string())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyMetricInput {
    pub weight: f64,
    pub height: f64,
    pub record_date: String,
}

impl BodyMetricInput {
    /// Also returns the edit mode carried by the hidden id field
    pub fn from_form(form: &FormValues) -> Result<(Self, EditMode), ValidationError> {
        let input = Self {
            weight: form.positive(ids::WEIGHT, INVALID_MEASURES)?,
            height: form.positive(ids::HEIGHT, INVALID_MEASURES)?,
            record_date: form.required(ids::RECORD_DATE, "请选择记录日期！")?.to_string(),
        };
        let mode = form
            .get(ids::EDITING_ID)
            .parse::<u64>()
            .map(EditMode::Edit)
            .unwrap_or(EditMode::Create);
        Ok((input, mode))
    }
}

/// Latest record card; the list arrives newest first
pub fn render_current(metrics: &[BodyMetric]) -> String {
    let card = |weight: String, height: String, bmi: String, badge: String| {
        format!(
            r#"<div class="row text-center"><div class="col"><div class="text-muted small">体重</div><div class="fs-4" id="current-weight">{}</div></div><div class="col"><div class="text-muted small">身高</div><div class="fs-4" id="current-height">{}</div></div><div class="col"><div class="text-muted small">BMI</div><div class="fs-4" id="current-bmi">{}</div>{}</div></div>"#,
            weight, height, bmi, badge
        )
    };

    match metrics.first() {
        None => card(
            "-- kg".into(),
            "-- cm".into(),
            "--".into(),
            r#"<span class="badge bg-secondary">暂无数据</span>"#.into(),
        ),
        Some(latest) => {
            let bmi = latest.effective_bmi();
            card(
                format!("{} kg", latest.weight),
                format!("{} cm", latest.height),
                bmi_text(bmi),
                bmi_badge(BmiStatus::classify(bmi)),
            )
        }
    }
}

pub fn render_history(metrics: &[BodyMetric]) -> String {
    if metrics.is_empty() {
        return format!(
            r#"<tr><td colspan="{}" class="text-center text-muted">暂无记录，点击"添加记录"开始</td></tr>"#,
            HISTORY_COLUMNS
        );
    }
    metrics
        .iter()
        .map(|m| {
            let bmi = m.effective_bmi();
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                escape_html(&m.record_date),
                m.weight,
                m.height,
                bmi_text(bmi),
                bmi_badge(BmiStatus::classify(bmi)),
                row_buttons(m.id),
            )
        })
        .collect()
}

/// Live preview shown under the form inputs
pub fn render_preview(bmi: Option<f64>) -> String {
    match bmi {
        Some(b) => {
            let status = BmiStatus::classify(Some(b));
            format!(
                r#"BMI: <strong>{}</strong><span class="badge ms-2 {}">{}</span>"#,
                fixed(b, 2),
                status.badge_class(),
                status.label()
            )
        }
        None => r#"BMI: <strong>--</strong><span class="badge ms-2">--</span>"#.to_string(),
    }
}

fn error_history_row(message: &str) -> String {
    render::error_table_row(HISTORY_COLUMNS, message)
}

pub struct BodyMetricsPage<T, H> {
    ctx: PageContext<T, H>,
    metrics: Container<Vec<BodyMetric>>,
    chart: ChartSlot,
    range_days: Cell<i64>,
    today: NaiveDate,
}

impl<T: Transport, H: Host> BodyMetricsPage<T, H> {
    pub fn new(ctx: PageContext<T, H>, today: NaiveDate) -> Self {
        let chart = ctx.chart_slot(ids::CHART);
        Self {
            ctx,
            metrics: Container::new(ids::HISTORY).with_error_markup(error_history_row),
            chart,
            range_days: Cell::new(30),
            today,
        }
    }

    pub fn range_days(&self) -> i64 {
        self.range_days.get()
    }

    pub async fn reconcile(&self) -> LoadOutcome<Vec<BodyMetric>> {
        let fetch = self.ctx.client.get(BODY_METRICS_PATH, &[]);
        let outcome = self.metrics.load(&self.ctx, LoadKind::Primary, fetch).await;

        match &outcome {
            LoadOutcome::Applied(metrics) => {
                self.ctx.host.render(ids::CURRENT, render_current(metrics));
                self.ctx.host.render(ids::HISTORY, render_history(metrics));
                self.redraw_chart(metrics);
            }
            LoadOutcome::Failed(_) => self.chart.clear(),
            LoadOutcome::Stale => {}
        }
        outcome
    }

    /// Switch the chart window; redrawn from the cached list without a request
    pub fn set_range(&self, days: i64) {
        if !CHART_RANGES.contains(&days) {
            return;
        }
        self.range_days.set(days);
        self.metrics.with_view(|metrics| self.redraw_chart(metrics));
    }

    fn redraw_chart(&self, metrics: &[BodyMetric]) {
        let config = builders::weight_trend(metrics, self.range_days.get(), self.today);
        draw_chart(&self.chart, Some(config));
    }

    /// Recompute the preview from the current inputs
    pub fn preview(&self, form: &FormValues) -> Option<f64> {
        let weight = form.get(ids::WEIGHT).parse::<f64>().unwrap_or(0.0);
        let height = form.get(ids::HEIGHT).parse::<f64>().unwrap_or(0.0);
        let bmi = compute_bmi(weight, height);
        self.ctx.host.render(ids::PREVIEW, render_preview(bmi));
        bmi
    }

    /// Blank form dated today
    pub fn open_create(&self) {
        let host = &self.ctx.host;
        host.set_value(ids::EDITING_ID, "");
        host.set_value(ids::WEIGHT, "");
        host.set_value(ids::HEIGHT, "");
        host.set_value(ids::RECORD_DATE, &format_date(self.today));
        host.render(ids::PREVIEW, render_preview(None));
        host.show_modal(ids::MODAL, true);
    }

    pub async fn handle(&self, action: RowAction) -> ActionResult {
        match action {
            RowAction::Edit(id) => self.begin_edit(id).await,
            RowAction::Delete(id) => self.delete(id).await,
            _ => Ok(()),
        }
    }

    pub async fn begin_edit(&self, id: u64) -> ActionResult {
        let path = format!("{}{}/", BODY_METRICS_PATH, id);
        let metric: BodyMetric = match self.ctx.client.get(&path, &[]).await {
            Ok(metric) => metric,
            Err(e) => {
                report_failure(&self.ctx, &e, "获取记录失败: ");
                return Err(e.into());
            }
        };

        let host = &self.ctx.host;
        host.set_value(ids::EDITING_ID, &metric.id.to_string());
        host.set_value(ids::WEIGHT, &metric.weight.to_string());
        host.set_value(ids::HEIGHT, &metric.height.to_string());
        host.set_value(ids::RECORD_DATE, metric.record_date.get(..10).unwrap_or(&metric.record_date));
        host.render(ids::PREVIEW, render_preview(compute_bmi(metric.weight, metric.height)));
        host.show_modal(ids::MODAL, true);
        Ok(())
    }

    pub async fn submit(&self, form: &FormValues) -> ActionResult {
        let (input, mode) =
            BodyMetricInput::from_form(form).map_err(|e| reject_invalid(&self.ctx.host, e))?;
        let (method, path) = mode.target(BODY_METRICS_PATH);

        run_mutation_with(
            &self.ctx,
            self.ctx.client.send::<_, BodyMetric>(method, &path, &input),
            "记录保存成功！",
            "保存失败: ",
        )
        .await?;

        self.ctx.host.set_value(ids::EDITING_ID, "");
        self.ctx.host.show_modal(ids::MODAL, false);
        self.reconcile().await;
        Ok(())
    }

    pub async fn delete(&self, id: u64) -> ActionResult {
        if !confirmed(&self.ctx.host, "确定要删除这条记录吗？") {
            return Err(ActionError::Cancelled);
        }
        let path = format!("{}{}/", BODY_METRICS_PATH, id);
        run_mutation_with(&self.ctx, self.ctx.client.delete(&path), "记录已删除", "删除失败: ").await?;
        self.reconcile().await;
        Ok(())
    }
}
