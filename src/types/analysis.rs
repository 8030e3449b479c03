//! Analysis types recognised by the gateway.

use serde::{Deserialize, Serialize};

/// The business-layer purpose of a completion request.
///
/// Scopes cache keys and interaction records so that, for example, a
/// chat reply is never served from a workout-analysis cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    Chat,
    WorkoutAnalysis,
    NutritionAnalysis,
    PlanGeneration,
    ProgressSummary,
}

impl AnalysisType {
    /// Stable string form, used in cache keys and metric labels.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisType::Chat => "chat",
            AnalysisType::WorkoutAnalysis => "workout_analysis",
            AnalysisType::NutritionAnalysis => "nutrition_analysis",
            AnalysisType::PlanGeneration => "plan_generation",
            AnalysisType::ProgressSummary => "progress_summary",
        }
    }
}

impl std::fmt::Display for AnalysisType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
