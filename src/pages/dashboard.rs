//! Dashboard Page
//!
//! Daily overview: one aggregated request per date drives the sleep, sport
//! and diet cards plus the health summary. Goal rings and the weekly sleep
//! chart are auxiliary and never block the overview.

use std::cell::Cell;

use chrono::NaiveDate;

use super::draw_chart;
use crate::charts::{builders, ChartSlot};
use crate::common::dates::{clock_range, format_date};
use crate::host::Host;
use crate::http::Transport;
use crate::models::{ensure_success, DashboardData, DashboardResponse, HealthGoals, HealthStatus, WeeklySleep};
use crate::render::{escape_html, fixed};
use crate::sync::{BusyGuard, Container, LoadKind, LoadOutcome, PageContext};

pub const GOALS_PATH: &str = "/api/goals/";

/// Class of the summary panel before a status is known
const SUMMARY_BASE_CLASS: &str = "mt-4";

pub fn dashboard_path(date: NaiveDate) -> String {
    format!("/api/dashboard/{}/", format_date(date))
}

pub fn weekly_sleep_path(date: NaiveDate) -> String {
    format!("/api/reports/weekly-sleep/{}/", format_date(date))
}

pub mod ids {
    pub const SUMMARY: &str = "health-summary";
    pub const SLEEP_CARD: &str = "sleep-card-body";
    pub const SPORT_CARD: &str = "sport-card-body";
    pub const DIET_CARD: &str = "diet-card-body";
    pub const USERNAME: &str = "username-display";
    pub const DATE: &str = "today-date";
    pub const GOALS: &str = "goals-panel";
    pub const SLEEP_RING: &str = "goal-sleep-ring";
    pub const SPORT_RING: &str = "goal-sport-ring";
    pub const DIET_RING: &str = "goal-diet-ring";
    pub const SLEEP_PERCENT: &str = "goal-sleep-percent";
    pub const SPORT_PERCENT: &str = "goal-sport-percent";
    pub const DIET_PERCENT: &str = "goal-diet-percent";
    pub const WEEKLY_SLEEP: &str = "weekly-sleep-chart";
}

// ============ Cards ============

pub fn render_sleep_card(data: &DashboardData) -> String {
    let sleep = &data.sleep;
    let (headline, detail) = match (sleep.record_exists, sleep.duration_hours) {
        (true, Some(hours)) => (
            format!("{} 小时", fixed(hours, 1)),
            clock_range(
                sleep.sleep_time.as_deref().unwrap_or_default(),
                sleep.wakeup_time.as_deref().unwrap_or_default(),
            ),
        ),
        _ => ("暂无记录".to_string(), "一夜好眠，从记录开始".to_string()),
    };
    format!(
        r#"<h3 class="card-text" id="sleep-duration">{}</h3><p class="text-muted mb-0" id="sleep-time-range">{}</p>"#,
        escape_html(&headline),
        escape_html(&detail)
    )
}

pub fn render_sport_card(data: &DashboardData) -> String {
    let sports = &data.sports;
    let (calories, detail) = if sports.record_exists {
        (
            fixed(sports.total_calories_burned, 0),
            format!("共 {} 次运动，总时长 {} 分钟", sports.count, sports.total_duration_minutes),
        )
    } else {
        ("0".to_string(), "今天你运动了吗？".to_string())
    };
    format!(
        r#"<h3 class="card-text" id="calories-burned">{}</h3><p class="text-muted mb-0" id="sport-details">{}</p>"#,
        calories, detail
    )
}

/// Bar width in percent (capped at 100) and color, both from the uncapped share
pub fn diet_progress(eaten: f64, goal: f64) -> (f64, &'static str) {
    let percent = if goal > 0.0 { eaten / goal * 100.0 } else { 0.0 };
    let color = if percent > 90.0 {
        "#dc3545"
    } else if percent > 70.0 {
        "#ffc107"
    } else {
        "#198754"
    };
    (percent.clamp(0.0, 100.0), color)
}

pub fn render_diet_card(data: &DashboardData, goal: f64) -> String {
    let diet = &data.diet;
    if !diet.record_exists {
        return r#"<h3 class="card-text" id="calories-eaten">0</h3><p class="text-muted mb-0" id="diet-details">记录饮食，掌控健康</p>"#.to_string();
    }
    let (width, color) = diet_progress(diet.total_calories_eaten, goal);
    format!(
        r#"<h3 class="card-text" id="calories-eaten">{eaten}</h3><p class="text-muted" id="diet-details">营养均衡，活力满满</p><div class="progress" role="progressbar" aria-valuenow="{eaten}" aria-valuemin="0" aria-valuemax="{goal}"><div class="progress-bar" id="diet-progress-bar" style="width: {width}%; --progress-color: {color}"></div></div>"#,
        eaten = fixed(diet.total_calories_eaten, 0),
        goal = fixed(goal, 0),
        width = fixed(width, 1),
        color = color,
    )
}

/// Inner markup of the summary panel; the panel itself carries the alert box
pub fn render_summary(data: &DashboardData) -> String {
    format!(
        r#"<p class="mb-0" id="summary-suggestion">{}</p>"#,
        escape_html(&data.health_summary.suggestion)
    )
}

pub fn summary_class(data: &DashboardData) -> String {
    let status = HealthStatus::parse(&data.health_summary.status_code);
    format!("{} alert {}", SUMMARY_BASE_CLASS, status.alert_class())
}

// ============ Controller ============

pub struct DashboardPage<T, H> {
    ctx: PageContext<T, H>,
    overview: Container<DashboardResponse>,
    goals: Container<HealthGoals>,
    weekly: Container<WeeklySleep>,
    sleep_ring: ChartSlot,
    sport_ring: ChartSlot,
    diet_ring: ChartSlot,
    weekly_chart: ChartSlot,
    date: Cell<NaiveDate>,
}

impl<T: Transport, H: Host> DashboardPage<T, H> {
    pub fn new(ctx: PageContext<T, H>, date: NaiveDate) -> Self {
        Self {
            sleep_ring: ctx.chart_slot(ids::SLEEP_RING),
            sport_ring: ctx.chart_slot(ids::SPORT_RING),
            diet_ring: ctx.chart_slot(ids::DIET_RING),
            weekly_chart: ctx.chart_slot(ids::WEEKLY_SLEEP),
            overview: Container::new(ids::SUMMARY),
            goals: Container::new(ids::GOALS),
            weekly: Container::new(ids::WEEKLY_SLEEP),
            date: Cell::new(date),
            ctx,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date.get()
    }

    /// Date picker change or first load
    pub async fn reconcile(&self, date: NaiveDate) -> LoadOutcome<DashboardResponse> {
        self.date.set(date);
        let outcome = self.load_overview(date).await;
        if let LoadOutcome::Applied(_) = &outcome {
            self.load_goals().await;
            self.load_weekly_sleep(date).await;
        }
        outcome
    }

    async fn load_overview(&self, date: NaiveDate) -> LoadOutcome<DashboardResponse> {
        let _busy = BusyGuard::new(&self.ctx.host);
        let path = dashboard_path(date);
        let fetch = async {
            let response: DashboardResponse = self.ctx.client.get(&path, &[]).await?;
            ensure_success(&response.status, &response.message)?;
            Ok(response)
        };
        let outcome = self.overview.load(&self.ctx, LoadKind::Primary, fetch).await;

        // The error panel brings its own alert box
        if let LoadOutcome::Failed(_) = &outcome {
            self.ctx.host.set_class(ids::SUMMARY, SUMMARY_BASE_CLASS);
        }
        if let LoadOutcome::Applied(response) = &outcome {
            let host = &self.ctx.host;
            let data = &response.data;
            if let Some(user) = &response.user {
                host.set_text(ids::USERNAME, &user.username);
            }
            host.set_text(ids::DATE, &data.date);
            host.set_class(ids::SUMMARY, &summary_class(data));
            host.render(ids::SLEEP_CARD, render_sleep_card(data));
            host.render(ids::SPORT_CARD, render_sport_card(data));
            host.render(ids::DIET_CARD, render_diet_card(data, self.ctx.config.dashboard.diet_goal_calories));
            host.render(ids::SUMMARY, render_summary(data));
        }
        outcome
    }

    /// Progress rings against the user's goals, using the cached overview
    pub async fn load_goals(&self) -> LoadOutcome<HealthGoals> {
        let fetch = self.ctx.client.get(GOALS_PATH, &[]);
        let outcome = self.goals.load(&self.ctx, LoadKind::Secondary, fetch).await;
        if let LoadOutcome::Applied(goals) = &outcome {
            self.overview.with_view(|response| self.draw_rings(&response.data, goals));
        }
        outcome
    }

    fn draw_rings(&self, data: &DashboardData, goals: &HealthGoals) {
        let slept = data.sleep.duration_hours.unwrap_or(0.0);
        let moved = data.sports.total_duration_minutes;
        let eaten = data.diet.total_calories_eaten;
        let rings = [
            (&self.sleep_ring, ids::SLEEP_PERCENT, slept, goals.target_sleep_duration, "#6f42c1"),
            (&self.sport_ring, ids::SPORT_PERCENT, moved, f64::from(goals.target_sport_duration_minutes), "#0d6efd"),
            (&self.diet_ring, ids::DIET_PERCENT, eaten, f64::from(goals.target_diet_calories), "#fd7e14"),
        ];
        for (slot, label, value, target, color) in rings {
            draw_chart(slot, builders::goal_ring(value, target, color));
            let text = if target > 0.0 {
                format!("{}%", fixed(builders::goal_percent(value, target), 0))
            } else {
                "未设置目标".to_string()
            };
            self.ctx.host.set_text(label, &text);
        }
    }

    pub async fn load_weekly_sleep(&self, date: NaiveDate) -> LoadOutcome<WeeklySleep> {
        let path = weekly_sleep_path(date);
        let fetch = self.ctx.client.get(&path, &[]);
        let outcome = self.weekly.load(&self.ctx, LoadKind::Secondary, fetch).await;
        if let LoadOutcome::Applied(weekly) = &outcome {
            let target = self.goals.with_view(|g| g.target_sleep_duration);
            draw_chart(&self.weekly_chart, builders::weekly_sleep(&weekly.data, target));
        }
        outcome
    }
}
