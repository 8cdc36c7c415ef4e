use serde::{Deserialize, Serialize};

/// One night's sleep. `duration` is serialized as `HH:MM:SS`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SleepRecord {
    pub id: u64,
    pub sleep_time: String,
    pub wakeup_time: String,
    #[serde(default)]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SportRecord {
    pub id: u64,
    pub sport_type: String,
    pub duration_minutes: u32,
    pub calories_burned: f64,
    pub record_date: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BodyMetric {
    pub id: u64,
    pub weight: f64,
    pub height: f64,
    #[serde(default)]
    pub bmi: Option<f64>,
    pub record_date: String,
}
