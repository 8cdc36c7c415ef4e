//! BMI arithmetic and bands, shared by the body metrics page and the trend chart

use super::BodyMetric;

/// weight / (height in metres)², only when both are positive
pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> Option<f64> {
    if weight_kg > 0.0 && height_cm > 0.0 {
        let metres = height_cm / 100.0;
        Some(weight_kg / (metres * metres))
    } else {
        None
    }
}

impl BodyMetric {
    /// The server's BMI when it sent a positive one, else computed locally
    pub fn effective_bmi(&self) -> Option<f64> {
        self.bmi.filter(|b| *b > 0.0).or_else(|| compute_bmi(self.weight, self.height))
    }
}

/// BMI band. Boundaries belong to the upper band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiStatus {
    Underweight,
    Normal,
    Overweight,
    Obese,
    Unknown,
}

impl BmiStatus {
    pub fn classify(bmi: Option<f64>) -> Self {
        match bmi {
            Some(b) if b > 0.0 && b < 18.5 => BmiStatus::Underweight,
            Some(b) if b > 0.0 && b < 24.0 => BmiStatus::Normal,
            Some(b) if b > 0.0 && b < 28.0 => BmiStatus::Overweight,
            Some(b) if b >= 28.0 => BmiStatus::Obese,
            _ => BmiStatus::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiStatus::Underweight => "偏瘦",
            BmiStatus::Normal => "正常",
            BmiStatus::Overweight => "超重",
            BmiStatus::Obese => "肥胖",
            BmiStatus::Unknown => "未知",
        }
    }

    pub fn badge_class(&self) -> &'static str {
        match self {
            BmiStatus::Underweight => "bg-info",
            BmiStatus::Normal => "bg-success",
            BmiStatus::Overweight => "bg-warning",
            BmiStatus::Obese => "bg-danger",
            BmiStatus::Unknown => "bg-secondary",
        }
    }
}
