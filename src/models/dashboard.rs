use serde::Deserialize;

/// `GET /api/dashboard/{date}/`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user: Option<DashboardUser>,
    pub data: DashboardData,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardUser {
    pub username: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DashboardData {
    pub date: String,
    pub sleep: SleepSummary,
    pub sports: SportsSummary,
    pub diet: DietSummary,
    pub health_summary: HealthSummary,
}

/// Only `record_exists` is guaranteed; the rest is absent when there is no record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SleepSummary {
    pub record_exists: bool,
    #[serde(default)]
    pub duration_hours: Option<f64>,
    #[serde(default)]
    pub sleep_time: Option<String>,
    #[serde(default)]
    pub wakeup_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SportsSummary {
    pub record_exists: bool,
    #[serde(default)]
    pub total_calories_burned: f64,
    #[serde(default)]
    pub total_duration_minutes: f64,
    #[serde(default)]
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DietSummary {
    pub record_exists: bool,
    #[serde(default)]
    pub total_calories_eaten: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthSummary {
    pub suggestion: String,
    pub status_code: String,
}

/// Summary classification computed by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthStatus {
    Balanced,
    HighIntake,
    LowIntake,
    PoorSleep,
    LowActivity,
    Neutral,
    Unknown,
}

impl HealthStatus {
    pub fn parse(code: &str) -> Self {
        match code {
            "BALANCED" => HealthStatus::Balanced,
            "HIGH_INTAKE" => HealthStatus::HighIntake,
            "LOW_INTAKE" => HealthStatus::LowIntake,
            "POOR_SLEEP" => HealthStatus::PoorSleep,
            "LOW_ACTIVITY" => HealthStatus::LowActivity,
            "NEUTRAL" => HealthStatus::Neutral,
            _ => HealthStatus::Unknown,
        }
    }

    /// Bootstrap alert class for the summary panel
    pub fn alert_class(&self) -> &'static str {
        match self {
            HealthStatus::Balanced => "alert-success",
            HealthStatus::HighIntake => "alert-warning",
            HealthStatus::LowIntake => "alert-info",
            HealthStatus::Neutral => "alert-secondary",
            _ => "alert-info",
        }
    }
}

/// `GET /api/goals/`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthGoals {
    /// Hours
    #[serde(default)]
    pub target_sleep_duration: f64,
    #[serde(default)]
    pub target_sport_duration_minutes: u32,
    #[serde(default)]
    pub target_sport_calories: u32,
    #[serde(default)]
    pub target_diet_calories: u32,
}

/// `GET /api/reports/weekly-sleep/{end_date}/`, one entry per day, zero when unrecorded
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeeklySleep {
    pub data: Vec<SleepDay>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SleepDay {
    pub date: String,
    #[serde(default)]
    pub duration_hours: f64,
}
