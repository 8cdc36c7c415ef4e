//! Chart configuration builders
//!
//! Pure functions from collection views to chart options. Builders that could
//! end up with zero data points return `None` (or a placeholder) instead.

use chrono::NaiveDate;
use serde_json::{json, Value};

use super::{ChartConfig, ChartLibrary};
use crate::common::dates::{format_date, parse_date};
use crate::common::Theme;
use crate::models::{BodyMetric, CalorieDistribution, SleepDay};

const WEIGHT_SERIES: &str = "体重 (kg)";

/// ECharts weight/BMI trend over the last `range_days` days, oldest first.
/// Empty input yields a "暂无数据" placeholder with no series.
pub fn weight_trend(records: &[BodyMetric], range_days: i64, today: NaiveDate) -> ChartConfig {
    let cutoff = today - chrono::Duration::days(range_days);
    let mut points: Vec<(NaiveDate, &BodyMetric)> = records
        .iter()
        .filter_map(|r| parse_date(&r.record_date).map(|d| (d, r)))
        .filter(|(d, _)| *d >= cutoff)
        .collect();
    points.sort_by_key(|(d, _)| *d);

    if points.is_empty() {
        return ChartConfig {
            library: ChartLibrary::ECharts,
            options: json!({
                "title": { "text": "暂无数据", "left": "center", "top": "center" },
                "xAxis": { "show": false },
                "yAxis": { "show": false },
                "series": []
            }),
        };
    }

    let dates: Vec<String> = points.iter().map(|(d, _)| format_date(*d)).collect();
    let weights: Vec<f64> = points.iter().map(|(_, r)| r.weight).collect();
    let bmis: Vec<Value> = points
        .iter()
        .map(|(_, r)| {
            r.effective_bmi()
                .map(|b| json!((b * 100.0).round() / 100.0))
                .unwrap_or(Value::Null)
        })
        .collect();

    let min = weights.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = weights.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

    ChartConfig {
        library: ChartLibrary::ECharts,
        options: json!({
            "tooltip": { "trigger": "axis", "axisPointer": { "type": "cross" } },
            "legend": { "data": [WEIGHT_SERIES, "BMI"], "bottom": 0 },
            "grid": { "left": "3%", "right": "4%", "bottom": "15%", "containLabel": true },
            "xAxis": { "type": "category", "data": dates, "axisLabel": { "rotate": 45 } },
            "yAxis": [
                {
                    "type": "value",
                    "name": WEIGHT_SERIES,
                    "position": "left",
                    "min": (min - 5.0).floor(),
                    "max": (max + 5.0).ceil()
                },
                {
                    "type": "value",
                    "name": "BMI",
                    "position": "right",
                    "min": 15,
                    "max": 35,
                    "splitLine": { "show": false }
                }
            ],
            "series": [
                {
                    "name": WEIGHT_SERIES,
                    "type": "line",
                    "data": weights,
                    "smooth": true,
                    "symbol": "circle",
                    "symbolSize": 8,
                    "lineStyle": { "width": 3 },
                    "itemStyle": { "color": "#5470c6" }
                },
                {
                    "name": "BMI",
                    "type": "line",
                    "yAxisIndex": 1,
                    "data": bmis,
                    "smooth": true,
                    "symbol": "diamond",
                    "symbolSize": 8,
                    "lineStyle": { "width": 2, "type": "dashed" },
                    "itemStyle": { "color": "#91cc75" },
                    "markLine": {
                        "silent": true,
                        "data": [
                            { "yAxis": 18.5, "name": "偏瘦", "lineStyle": { "color": "#17a2b8" } },
                            { "yAxis": 24, "name": "正常上限", "lineStyle": { "color": "#28a745" } },
                            { "yAxis": 28, "name": "超重", "lineStyle": { "color": "#ffc107" } }
                        ]
                    }
                }
            ]
        }),
    }
}

/// Chart.js doughnut of calories per meal type; `None` when nothing was eaten
pub fn calorie_distribution(distribution: &CalorieDistribution, theme: Theme) -> Option<ChartConfig> {
    if distribution.total() <= 0.0 {
        return None;
    }
    let text = theme.chart_text_color();

    Some(ChartConfig {
        library: ChartLibrary::ChartJs,
        options: json!({
            "type": "doughnut",
            "data": {
                "labels": ["早餐", "午餐", "晚餐", "加餐"],
                "datasets": [{
                    "label": "热量分布 (大卡)",
                    "data": [
                        distribution.breakfast,
                        distribution.lunch,
                        distribution.dinner,
                        distribution.snack
                    ],
                    "backgroundColor": [
                        "rgba(255, 99, 132, 0.7)",
                        "rgba(54, 162, 235, 0.7)",
                        "rgba(255, 206, 86, 0.7)",
                        "rgba(75, 192, 192, 0.7)"
                    ],
                    "borderColor": theme.chart_border_color(),
                    "hoverOffset": 4
                }]
            },
            "options": {
                "responsive": true,
                "maintainAspectRatio": false,
                "plugins": {
                    "legend": {
                        "position": "top",
                        "labels": { "boxWidth": 10, "font": { "size": 10 }, "color": text }
                    },
                    "tooltip": { "titleColor": text, "bodyColor": text }
                }
            }
        }),
    })
}

/// Progress ring: achieved share of `target`, capped at 100%.
/// `None` when no goal is set.
pub fn goal_ring(value: f64, target: f64, color: &str) -> Option<ChartConfig> {
    if target <= 0.0 {
        return None;
    }
    let achieved = value.max(0.0).min(target);
    let remaining = target - achieved;

    Some(ChartConfig {
        library: ChartLibrary::ChartJs,
        options: json!({
            "type": "doughnut",
            "data": {
                "datasets": [{
                    "data": [achieved, remaining],
                    "backgroundColor": [color, "rgba(200, 200, 200, 0.25)"],
                    "borderWidth": 0
                }]
            },
            "options": {
                "cutout": "75%",
                "responsive": true,
                "maintainAspectRatio": false,
                "plugins": { "legend": { "display": false }, "tooltip": { "enabled": false } }
            }
        }),
    })
}

/// Share of a goal reached, in percent and capped at 100
pub fn goal_percent(value: f64, target: f64) -> f64 {
    if target <= 0.0 {
        return 0.0;
    }
    (value / target * 100.0).clamp(0.0, 100.0)
}

/// Chart.js bar chart of nightly sleep, with an optional dashed target line.
/// `None` when the week has no entries.
pub fn weekly_sleep(days: &[SleepDay], target_hours: Option<f64>) -> Option<ChartConfig> {
    if days.is_empty() {
        return None;
    }

    let labels: Vec<&str> = days
        .iter()
        .map(|d| d.date.get(5..).unwrap_or(&d.date))
        .collect();
    let hours: Vec<f64> = days.iter().map(|d| d.duration_hours).collect();

    let mut datasets = vec![json!({
        "type": "bar",
        "label": "睡眠时长 (小时)",
        "data": hours,
        "backgroundColor": "rgba(54, 162, 235, 0.6)"
    })];
    if let Some(target) = target_hours.filter(|t| *t > 0.0) {
        datasets.push(json!({
            "type": "line",
            "label": "目标",
            "data": vec![target; days.len()],
            "borderColor": "#dc3545",
            "borderDash": [6, 4],
            "pointRadius": 0,
            "fill": false
        }));
    }

    Some(ChartConfig {
        library: ChartLibrary::ChartJs,
        options: json!({
            "type": "bar",
            "data": { "labels": labels, "datasets": datasets },
            "options": {
                "responsive": true,
                "maintainAspectRatio": false,
                "scales": { "y": { "beginAtZero": true, "suggestedMax": 10 } }
            }
        }),
    })
}
