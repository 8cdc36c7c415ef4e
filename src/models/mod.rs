//! Wire Types
//!
//! Transient projections of server resources. Unknown fields are ignored and
//! optional ones default, so a partial payload still renders.

mod account;
mod article;
mod bmi;
mod dashboard;
mod diet;
mod records;
mod report;
mod social;

pub use account::{
    LoginRequest, LoginResponse, Profile, ProfileUpdate, RegisterRequest, StatusMessage,
};
pub use article::{Article, ArticleCategory};
pub use bmi::{compute_bmi, BmiStatus};
pub use dashboard::{
    DashboardData, DashboardResponse, DashboardUser, DietSummary, HealthGoals, HealthStatus, HealthSummary,
    SleepDay, SleepSummary, SportsSummary, WeeklySleep,
};
pub use diet::{DietRecommendation, DietRecommendations, FoodItem, Meal, MealItem, MealType};
pub use records::{BodyMetric, SleepRecord, SportRecord};
pub use report::{
    CalorieBalance, CalorieDistribution, DietAnalysis, HealthReport, HealthReportResponse,
    OverallSummary, SleepAnalysis, SleepConsistency, SportsAnalysis,
};
pub use social::{Comment, FeedItem, FeedUser, Friendship, UserRef};

use crate::error::{ApiError, ApiResult};

/// Endpoints that wrap their payload in `{status, message, ...}` report
/// failures with a 2xx status and `status != "success"`.
pub(crate) fn ensure_success(status: &str, message: &str) -> ApiResult<()> {
    if status == "success" {
        Ok(())
    } else {
        Err(ApiError::Rejected(message.to_string()))
    }
}
