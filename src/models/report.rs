use serde::Deserialize;

/// `GET /api/reports/health-summary/?start_date=&end_date=`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthReportResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub report: Option<HealthReport>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HealthReport {
    pub overall_summary: OverallSummary,
    pub sleep_analysis: SleepAnalysis,
    pub sports_analysis: SportsAnalysis,
    pub diet_analysis: DietAnalysis,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OverallSummary {
    pub title: String,
    pub overall_score: f64,
    #[serde(default)]
    pub priority_suggestions: Vec<String>,
    pub calorie_balance: CalorieBalance,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CalorieBalance {
    #[serde(default)]
    pub average_intake: f64,
    #[serde(default)]
    pub average_activity_burn: f64,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SleepAnalysis {
    pub score: f64,
    #[serde(default)]
    pub average_duration_hours: f64,
    #[serde(default)]
    pub consistency: SleepConsistency,
    #[serde(default)]
    pub data_coverage_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct SleepConsistency {
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SportsAnalysis {
    pub score: f64,
    #[serde(default)]
    pub frequency_per_week: f64,
    #[serde(default)]
    pub total_calories_burned: f64,
    #[serde(default)]
    pub most_frequent_activity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DietAnalysis {
    pub score: f64,
    #[serde(default)]
    pub average_daily_calories: f64,
    #[serde(default)]
    pub data_coverage_percent: f64,
    #[serde(default)]
    pub calorie_distribution: CalorieDistribution,
}

/// Calories per meal type over the report window
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct CalorieDistribution {
    #[serde(default)]
    pub breakfast: f64,
    #[serde(default)]
    pub lunch: f64,
    #[serde(default)]
    pub dinner: f64,
    #[serde(default)]
    pub snack: f64,
}

impl CalorieDistribution {
    pub fn total(&self) -> f64 {
        self.breakfast + self.lunch + self.dinner + self.snack
    }
}
