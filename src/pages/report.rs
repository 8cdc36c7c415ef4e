//! Health Report Page
//!
//! Seven-day health summary. The report is kept after loading so a theme
//! change can redraw it without another request.

use std::cell::Cell;

use chrono::NaiveDate;

use super::draw_chart;
use crate::charts::{builders, ChartSlot};
use crate::common::dates::{days_ago, format_date};
use crate::common::Theme;
use crate::error::ApiError;
use crate::host::Host;
use crate::http::Transport;
use crate::models::{ensure_success, HealthReport, HealthReportResponse};
use crate::render::{escape_html, fixed};
use crate::sync::{Container, LoadKind, LoadOutcome, PageContext};

pub const HEALTH_SUMMARY_PATH: &str = "/api/reports/health-summary/";

/// Days covered by the report, today included
pub const REPORT_DAYS: i64 = 7;

pub mod ids {
    pub const REPORT: &str = "health-report-container";
    pub const DIET_CHART: &str = "diet-pie-chart";
}

/// `text-success` from 80, `text-warning` from 60, `text-danger` below
pub fn score_class(score: f64) -> &'static str {
    if score >= 80.0 {
        "text-success"
    } else if score >= 60.0 {
        "text-warning"
    } else {
        "text-danger"
    }
}

/// Inclusive `(start, end)` window ending today
pub fn report_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (days_ago(today, REPORT_DAYS - 1), today)
}

fn render_overview(report: &HealthReport) -> String {
    let overall = &report.overall_summary;
    let balance = &overall.calorie_balance;
    let suggestions: String = overall
        .priority_suggestions
        .iter()
        .map(|s| {
            format!(
                r#"<li class="mb-2"><i class="bi bi-pin-angle-fill text-primary me-2"></i>{}</li>"#,
                escape_html(s)
            )
        })
        .collect();

    format!(
        r#"<div class="card mb-4"><div class="card-header bg-primary"><h4 class="mb-0 text-white">本周总览: {title}</h4></div><div class="card-body"><div class="row align-items-center"><div class="col-md-4 text-center border-end"><p class="text-muted mb-1">综合健康得分</p><h1 class="display-3 fw-bold {class}">{score}</h1></div><div class="col-md-8"><h5 class="card-title">核心改进建议</h5><ul class="list-unstyled">{suggestions}</ul><hr><p class="card-text"><strong>热量平衡分析:</strong> 日均摄入 <span class="fw-bold">{intake}</span> 大卡，日均运动消耗 <span class="fw-bold">{burn}</span> 大卡。<span class="badge bg-secondary">{comment}</span></p></div></div></div></div>"#,
        title = escape_html(&overall.title),
        class = score_class(overall.overall_score),
        score = overall.overall_score,
        suggestions = suggestions,
        intake = balance.average_intake,
        burn = balance.average_activity_burn,
        comment = escape_html(&balance.comment),
    )
}

fn analysis_card(title: &str, score: f64, items: &[(&str, String)], extra: &str) -> String {
    let rows: String = items
        .iter()
        .map(|(label, value)| format!(r#"<li class="list-group-item">{}: <strong>{}</strong></li>"#, label, value))
        .collect();
    format!(
        r#"<div class="col-lg-4 mb-3"><div class="card h-100"><div class="card-body"><h5 class="card-title d-flex justify-content-between"><span>{}</span><span class="fw-bold {}">{}/100</span></h5><ul class="list-group list-group-flush">{}</ul>{}</div></div></div>"#,
        title,
        score_class(score),
        score,
        rows,
        extra
    )
}

/// Overview card plus the three analysis cards; the doughnut canvas lives in the diet card
pub fn render_report(report: &HealthReport) -> String {
    let sleep = &report.sleep_analysis;
    let sports = &report.sports_analysis;
    let diet = &report.diet_analysis;

    let sleep_card = analysis_card(
        "睡眠分析",
        sleep.score,
        &[
            ("平均时长", format!("{} 小时", fixed(sleep.average_duration_hours, 1))),
            ("作息规律性", escape_html(&sleep.consistency.comment)),
            ("数据覆盖率", format!("{}%", sleep.data_coverage_percent)),
        ],
        "",
    );
    let sports_card = analysis_card(
        "运动分析",
        sports.score,
        &[
            ("周均频率", format!("{} 次", fixed(sports.frequency_per_week, 1))),
            ("总消耗", format!("{} 大卡", sports.total_calories_burned)),
            (
                "最常进行",
                escape_html(sports.most_frequent_activity.as_deref().filter(|a| !a.is_empty()).unwrap_or("无")),
            ),
        ],
        "",
    );
    let diet_card = analysis_card(
        "饮食分析",
        diet.score,
        &[
            ("日均摄入", format!("{} 大卡", diet.average_daily_calories)),
            ("数据覆盖率", format!("{}%", diet.data_coverage_percent)),
        ],
        r#"<canvas id="diet-pie-chart" class="mt-3" style="max-height: 150px;"></canvas>"#,
    );

    format!(
        r#"{}<div class="row">{}{}{}</div>"#,
        render_overview(report),
        sleep_card,
        sports_card,
        diet_card
    )
}

pub struct ReportPage<T, H> {
    ctx: PageContext<T, H>,
    report: Container<HealthReport>,
    diet_chart: ChartSlot,
    theme: Cell<Theme>,
}

impl<T: Transport, H: Host> ReportPage<T, H> {
    pub fn new(ctx: PageContext<T, H>, theme: Theme) -> Self {
        Self {
            diet_chart: ctx.chart_slot(ids::DIET_CHART),
            report: Container::new(ids::REPORT),
            theme: Cell::new(theme),
            ctx,
        }
    }

    pub async fn reconcile(&self, today: NaiveDate) -> LoadOutcome<HealthReport> {
        let (start, end) = report_window(today);
        let (start, end) = (format_date(start), format_date(end));
        let fetch = async {
            let response: HealthReportResponse = self
                .ctx
                .client
                .get(HEALTH_SUMMARY_PATH, &[("start_date", start.as_str()), ("end_date", end.as_str())])
                .await?;
            ensure_success(&response.status, &response.message)?;
            response
                .report
                .ok_or_else(|| ApiError::Rejected("报告数据为空".to_string()))
        };

        let outcome = self.report.load(&self.ctx, LoadKind::Primary, fetch).await;
        match &outcome {
            LoadOutcome::Applied(report) => self.draw(report),
            LoadOutcome::Failed(_) => self.diet_chart.clear(),
            LoadOutcome::Stale => {}
        }
        outcome
    }

    /// Redraw the cached report in the new theme. Returns false when nothing is cached.
    pub fn set_theme(&self, theme: Theme) -> bool {
        self.theme.set(theme);
        self.report.with_view(|report| self.draw(report)).is_some()
    }

    fn draw(&self, report: &HealthReport) {
        self.ctx.host.render(ids::REPORT, render_report(report));
        let distribution = &report.diet_analysis.calorie_distribution;
        draw_chart(&self.diet_chart, builders::calorie_distribution(distribution, self.theme.get()));
    }
}
