use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{DeepSiloError, Result};
use crate::modes::ResearchMode;

/// A cited reference returned inside a structured result payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlashCard {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedVideo {
    pub title: String,
    pub description: String,
}

/// Keyword/frequency pair backing the keyword chart panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordFrequency {
    pub keyword: String,
    pub frequency: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchData {
    pub summary: String,
    pub sources: Vec<Source>,
    pub flash_cards: Vec<FlashCard>,
    pub related_videos: Vec<RelatedVideo>,
    pub mini_app_data: Vec<KeywordFrequency>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeFile {
    pub filename: String,
    pub language: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasData {
    pub sources: Vec<Source>,
    pub code: Vec<CodeFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentStep {
    pub title: String,
    pub reasoning: String,
    #[serde(default, rename = "sourceURL", skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentData {
    pub summary: String,
    pub sources: Vec<Source>,
    pub agent_path: Vec<AgentStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Argument {
    pub claim: String,
    pub evidence: String,
    pub counter_argument: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewpoint {
    pub title: String,
    pub summary: String,
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebateData {
    pub topic: String,
    pub viewpoints: Vec<Viewpoint>,
    pub points_of_consensus: String,
    pub unresolved_questions: Vec<String>,
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyConcept {
    pub concept: String,
    pub definition: String,
    pub example: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPlanItem {
    pub timeframe: String,
    pub topics: Vec<String>,
    pub activities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeProblem {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analogy {
    pub concept: String,
    pub analogy: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyData {
    pub key_concepts: Vec<KeyConcept>,
    pub study_plan: Vec<StudyPlanItem>,
    pub practice_problems: Vec<PracticeProblem>,
    pub analogies: Vec<Analogy>,
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoIdea {
    pub title: String,
    pub hook: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptSegment {
    pub scene: String,
    pub dialogue: String,
    pub visuals: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioData {
    pub topic: String,
    pub video_ideas: Vec<VideoIdea>,
    pub script: Vec<ScriptSegment>,
    pub seo_keywords: Vec<String>,
    pub hashtags: Vec<String>,
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub time: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryDay {
    pub day: String,
    pub title: String,
    pub activities: Vec<Activity>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetItem {
    pub category: String,
    pub cost: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripData {
    pub destination: String,
    pub trip_summary: String,
    pub itinerary: Vec<ItineraryDay>,
    pub packing_list: Vec<String>,
    pub budget_breakdown: Vec<BudgetItem>,
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub sets: String,
    pub reps: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDay {
    pub day: String,
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealDay {
    pub day: String,
    pub meals: Vec<Meal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthData {
    pub goal: String,
    pub disclaimer: String,
    pub workout_plan: Vec<WorkoutDay>,
    pub meal_plan: Vec<MealDay>,
    pub healthy_habits: Vec<String>,
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewQuestion {
    pub question: String,
    pub sample_answer: String,
    pub tips: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewData {
    pub job_role: String,
    pub introduction: String,
    pub common_questions: Vec<InterviewQuestion>,
    pub behavioral_questions: Vec<InterviewQuestion>,
    pub technical_questions: Vec<InterviewQuestion>,
    pub closing_statement: String,
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudienceSegment {
    pub segment: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub name: String,
    pub strengths: String,
    pub weaknesses: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Swot {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub opportunities: Vec<String>,
    pub threats: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketData {
    pub product_idea: String,
    pub summary: String,
    pub target_audience: Vec<AudienceSegment>,
    pub competitors: Vec<Competitor>,
    pub swot_analysis: Swot,
    pub marketing_strategies: Vec<String>,
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub quantity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChefData {
    pub recipe_name: String,
    pub description: String,
    pub prep_time: String,
    pub cook_time: String,
    pub difficulty: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    pub sources: Vec<Source>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameMechanic {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterConcept {
    pub name: String,
    pub description: String,
    pub abilities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameData {
    pub title: String,
    pub concept: String,
    pub core_mechanics: Vec<GameMechanic>,
    pub character_concepts: Vec<CharacterConcept>,
    pub monetization: Vec<String>,
    pub sources: Vec<Source>,
}

/// Parsed payload for one completed query, tagged by the mode that produced
/// it. Dispatch is always by this tag, never by probing for telltale fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "data")]
pub enum ModeResult {
    #[serde(rename = "deep_research")]
    Research(ResearchData),
    #[serde(rename = "deep_canvas")]
    Canvas(CanvasData),
    #[serde(rename = "deep_agent")]
    Agent(AgentData),
    #[serde(rename = "deep_debate")]
    Debate(DebateData),
    #[serde(rename = "deep_study")]
    Study(StudyData),
    #[serde(rename = "deep_studio")]
    Studio(StudioData),
    #[serde(rename = "deep_trip")]
    Trip(TripData),
    #[serde(rename = "deep_health")]
    Health(HealthData),
    #[serde(rename = "deep_interview")]
    Interview(InterviewData),
    #[serde(rename = "deep_market")]
    Market(MarketData),
    #[serde(rename = "deep_chef")]
    Chef(ChefData),
    #[serde(rename = "deep_game")]
    Game(GameData),
}

impl ModeResult {
    /// Deserialize a validated JSON payload into the variant matching `mode`.
    pub fn from_value(mode: ResearchMode, value: serde_json::Value) -> Result<Self> {
        let result = match mode {
            ResearchMode::DeepResearch => ModeResult::Research(from_value(value)?),
            ResearchMode::DeepCanvas => ModeResult::Canvas(from_value(value)?),
            ResearchMode::DeepAgent => ModeResult::Agent(from_value(value)?),
            ResearchMode::DeepDebate => ModeResult::Debate(from_value(value)?),
            ResearchMode::DeepStudy => ModeResult::Study(from_value(value)?),
            ResearchMode::DeepStudio => ModeResult::Studio(from_value(value)?),
            ResearchMode::DeepTrip => ModeResult::Trip(from_value(value)?),
            ResearchMode::DeepHealth => ModeResult::Health(from_value(value)?),
            ResearchMode::DeepInterview => ModeResult::Interview(from_value(value)?),
            ResearchMode::DeepMarket => ModeResult::Market(from_value(value)?),
            ResearchMode::DeepChef => ModeResult::Chef(from_value(value)?),
            ResearchMode::DeepGame => ModeResult::Game(from_value(value)?),
        };
        Ok(result)
    }

    pub fn mode(&self) -> ResearchMode {
        match self {
            ModeResult::Research(_) => ResearchMode::DeepResearch,
            ModeResult::Canvas(_) => ResearchMode::DeepCanvas,
            ModeResult::Agent(_) => ResearchMode::DeepAgent,
            ModeResult::Debate(_) => ResearchMode::DeepDebate,
            ModeResult::Study(_) => ResearchMode::DeepStudy,
            ModeResult::Studio(_) => ResearchMode::DeepStudio,
            ModeResult::Trip(_) => ResearchMode::DeepTrip,
            ModeResult::Health(_) => ResearchMode::DeepHealth,
            ModeResult::Interview(_) => ResearchMode::DeepInterview,
            ModeResult::Market(_) => ResearchMode::DeepMarket,
            ModeResult::Chef(_) => ResearchMode::DeepChef,
            ModeResult::Game(_) => ResearchMode::DeepGame,
        }
    }
}

fn from_value<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    serde_json::from_value(value).map_err(DeepSiloError::MalformedResponse)
}

/// Immutable snapshot of one completed query, persisted most-recent-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub query: String,
    pub mode: ResearchMode,
    pub result: ModeResult,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(query: String, result: ModeResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            query,
            mode: result.mode(),
            result,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// A `{uri, title}` record extracted from retrieval grounding metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub uri: String,
    pub title: String,
}

/// One turn of the follow-up conversation tied to a result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<Citation>,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            citations: Vec::new(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            citations: Vec::new(),
        }
    }

    pub fn assistant_with_citations(text: impl Into<String>, citations: Vec<Citation>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
            citations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_result_round_trips_through_json() {
        let result = ModeResult::Chef(ChefData {
            recipe_name: "Chicken and Rice Bowl".to_string(),
            description: "A weeknight staple.".to_string(),
            prep_time: "15 minutes".to_string(),
            cook_time: "30 minutes".to_string(),
            difficulty: "Easy".to_string(),
            ingredients: vec![Ingredient {
                name: "chicken thighs".to_string(),
                quantity: "500 g".to_string(),
            }],
            instructions: vec!["Cook the rice.".to_string()],
            sources: vec![],
        });

        let json = serde_json::to_string(&result).expect("serialize");
        assert!(json.contains(r#""mode":"deep_chef""#));
        let back: ModeResult = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, result);
    }

    #[test]
    fn from_value_dispatches_by_mode_tag() {
        let payload = serde_json::json!({
            "summary": "Rust ownership explained.",
            "sources": [],
            "flashCards": [],
            "relatedVideos": [],
            "miniAppData": [{"keyword": "borrowing", "frequency": 42}],
        });

        let result = ModeResult::from_value(ResearchMode::DeepResearch, payload)
            .expect("research payload should deserialize");
        match result {
            ModeResult::Research(data) => {
                assert_eq!(data.mini_app_data[0].keyword, "borrowing");
            }
            other => panic!("expected research variant, got {other:?}"),
        }
    }

    #[test]
    fn from_value_rejects_wrong_shape() {
        let payload = serde_json::json!({"summary": 3});
        let err = ModeResult::from_value(ResearchMode::DeepResearch, payload)
            .expect_err("shape mismatch must fail");
        assert!(matches!(err, DeepSiloError::MalformedResponse(_)));
    }

    #[test]
    fn history_entry_records_mode_tag() {
        let result = ModeResult::Canvas(CanvasData {
            sources: vec![],
            code: vec![],
        });
        let entry = HistoryEntry::new("a pomodoro timer".to_string(), result);
        assert_eq!(entry.mode, ResearchMode::DeepCanvas);
        assert_eq!(entry.query, "a pomodoro timer");
    }
}
