//! The closed catalog of research modes.
//!
//! Modes are defined at compile time and never created or destroyed at
//! runtime. Each mode owns exactly one prompt template and one response
//! schema; adding a mode means adding an enum variant and its entries here
//! and in `schema.rs`.

use serde::{Deserialize, Serialize};

use crate::error::{DeepSiloError, Result};
use crate::schema::{self, SchemaNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchMode {
    DeepResearch,
    DeepCanvas,
    DeepAgent,
    DeepDebate,
    DeepStudy,
    DeepStudio,
    DeepTrip,
    DeepHealth,
    DeepInterview,
    DeepMarket,
    DeepChef,
    DeepGame,
}

/// Display metadata for one mode, as shown on the mode selection screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSpec {
    pub mode: ResearchMode,
    pub title: &'static str,
    pub description: &'static str,
    pub tag: &'static str,
}

impl ResearchMode {
    /// All modes, in catalog display order.
    pub const ALL: [ResearchMode; 12] = [
        ResearchMode::DeepResearch,
        ResearchMode::DeepAgent,
        ResearchMode::DeepCanvas,
        ResearchMode::DeepDebate,
        ResearchMode::DeepStudy,
        ResearchMode::DeepStudio,
        ResearchMode::DeepTrip,
        ResearchMode::DeepHealth,
        ResearchMode::DeepInterview,
        ResearchMode::DeepMarket,
        ResearchMode::DeepChef,
        ResearchMode::DeepGame,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            ResearchMode::DeepResearch => "deep_research",
            ResearchMode::DeepCanvas => "deep_canvas",
            ResearchMode::DeepAgent => "deep_agent",
            ResearchMode::DeepDebate => "deep_debate",
            ResearchMode::DeepStudy => "deep_study",
            ResearchMode::DeepStudio => "deep_studio",
            ResearchMode::DeepTrip => "deep_trip",
            ResearchMode::DeepHealth => "deep_health",
            ResearchMode::DeepInterview => "deep_interview",
            ResearchMode::DeepMarket => "deep_market",
            ResearchMode::DeepChef => "deep_chef",
            ResearchMode::DeepGame => "deep_game",
        }
    }

    /// Resolve a stable string id back to a mode.
    ///
    /// Ids come from the compiled-in catalog, so a miss is a
    /// programming-error-class fault (or history written by an incompatible
    /// version), not something a user can trigger from the UI.
    pub fn from_id(id: &str) -> Result<Self> {
        ResearchMode::ALL
            .into_iter()
            .find(|mode| mode.id() == id)
            .ok_or_else(|| DeepSiloError::UnknownMode(id.to_string()))
    }

    pub fn spec(&self) -> ModeSpec {
        match self {
            ResearchMode::DeepResearch => ModeSpec {
                mode: *self,
                title: "Deep Research",
                description: "In-depth analysis with sources, flashcards, and more.",
                tag: "CORE",
            },
            ResearchMode::DeepAgent => ModeSpec {
                mode: *self,
                title: "Deep Agent",
                description: "Autonomous AI agent that shows its research path.",
                tag: "PRO",
            },
            ResearchMode::DeepCanvas => ModeSpec {
                mode: *self,
                title: "Deep Canvas",
                description: "Generate a fully functional web app from a prompt.",
                tag: "NEW",
            },
            ResearchMode::DeepDebate => ModeSpec {
                mode: *self,
                title: "Deep Debate",
                description: "Explore both sides of a controversial topic.",
                tag: "BETA",
            },
            ResearchMode::DeepStudy => ModeSpec {
                mode: *self,
                title: "Deep Study",
                description: "Create a personalized study guide for any subject.",
                tag: "NEW",
            },
            ResearchMode::DeepStudio => ModeSpec {
                mode: *self,
                title: "Deep Studio",
                description: "Generate video ideas, scripts, and SEO keywords.",
                tag: "NEW",
            },
            ResearchMode::DeepTrip => ModeSpec {
                mode: *self,
                title: "Deep Trip",
                description: "Plan your next vacation with a detailed itinerary.",
                tag: "NEW",
            },
            ResearchMode::DeepHealth => ModeSpec {
                mode: *self,
                title: "Deep Health",
                description: "Get a personalized workout and meal plan.",
                tag: "NEW",
            },
            ResearchMode::DeepInterview => ModeSpec {
                mode: *self,
                title: "Deep Interview",
                description: "Ace your next job interview with prep materials.",
                tag: "NEW",
            },
            ResearchMode::DeepMarket => ModeSpec {
                mode: *self,
                title: "Deep Market",
                description: "Analyze market trends for your business idea.",
                tag: "NEW",
            },
            ResearchMode::DeepChef => ModeSpec {
                mode: *self,
                title: "Deep Chef",
                description: "Generate a complete recipe from ingredients or a dish idea.",
                tag: "NEW",
            },
            ResearchMode::DeepGame => ModeSpec {
                mode: *self,
                title: "Deep Game",
                description: "Design a game concept with mechanics and characters.",
                tag: "NEW",
            },
        }
    }

    /// The instruction string sent for `query`. The query is embedded
    /// verbatim and every field of the paired response schema is described,
    /// so template and schema cannot drift apart.
    pub fn prompt(&self, query: &str) -> String {
        match self {
            ResearchMode::DeepResearch => format!(
                "Perform a deep research analysis on the following topic: \"{query}\". \
                 Provide a comprehensive summary, credible sources, study flashcards, \
                 ideas for related videos, and keyword frequency data for a mini-app \
                 visualization."
            ),
            ResearchMode::DeepCanvas => format!(
                "You are a web developer AI. Your task is to build a single-page \
                 application based on a user's request. You must provide the complete \
                 HTML, CSS, and JavaScript code for the application. Also, list any \
                 sources you used to gather information for the content of the app. \
                 Make sure the app is visually appealing.\n\nRequest: \"{query}\""
            ),
            ResearchMode::DeepAgent => format!(
                "Act as an autonomous research agent. Your goal is to conduct a deep \
                 investigation into the topic: \"{query}\". You must document your \
                 step-by-step process, including your reasoning at each stage. \
                 Formulate a plan, find sources, synthesize information, and produce a \
                 final summary. Your entire process and findings must be returned in \
                 the specified JSON format."
            ),
            ResearchMode::DeepDebate => format!(
                "Act as an unbiased moderator and researcher. Your goal is to conduct \
                 a deep analysis of the debate topic: \"{query}\".\n\nYou must:\n\
                 1. Identify the primary, distinct viewpoints in this debate.\n\
                 2. For each viewpoint, summarize its core position.\n\
                 3. For each viewpoint, present its strongest arguments, including the \
                 claim, supporting evidence, and a common counter-argument.\n\
                 4. Identify any points of consensus between the viewpoints.\n\
                 5. List the key unresolved questions central to the ongoing debate.\n\
                 6. Provide a list of credible sources you consulted.\n\n\
                 Return the entire analysis in the specified JSON format."
            ),
            ResearchMode::DeepStudy => format!(
                "Act as an expert tutor and instructional designer. Your goal is to \
                 create a comprehensive, engaging, and effective study guide for the \
                 topic: \"{query}\".\n\nYou must provide:\n\
                 1. Key Concepts: The most important foundational ideas.\n\
                 2. Study Plan: A structured plan to guide the learner.\n\
                 3. Practice Problems: Questions to test knowledge and application.\n\
                 4. Analogies: Simple ways to understand complex parts.\n\
                 5. Sources: Credible references for further reading.\n\n\
                 Return the entire study guide in the specified JSON format."
            ),
            ResearchMode::DeepStudio => format!(
                "Act as a creative strategist for a content creator on platforms like \
                 YouTube and TikTok. Your goal is to develop a complete content \
                 package for the topic: \"{query}\". You must generate engaging video \
                 ideas, a detailed script for one of them, SEO keywords, relevant \
                 hashtags, and cite your sources. Return the entire package in the \
                 specified JSON format."
            ),
            ResearchMode::DeepTrip => format!(
                "Act as an expert travel agent. Your goal is to create a comprehensive \
                 and inspiring travel plan based on the user's request: \"{query}\". \
                 You must provide a trip summary, a detailed day-by-day itinerary, a \
                 practical packing list, a budget breakdown, and credible sources. \
                 Return the entire plan in the specified JSON format."
            ),
            ResearchMode::DeepHealth => format!(
                "Act as a wellness planner. Create a personalized health and fitness \
                 plan based on the user's goal: \"{query}\". You MUST include a clear \
                 disclaimer that this is not medical advice and a doctor should be \
                 consulted. Also provide a workout plan, a sample meal plan, healthy \
                 habit tips, and credible sources. Return the entire plan in the \
                 specified JSON format."
            ),
            ResearchMode::DeepInterview => format!(
                "Act as an expert interview coach and career advisor. Your goal is to \
                 create a comprehensive, encouraging, and actionable interview \
                 preparation guide for the job role: \"{query}\". Provide common, \
                 behavioral, and technical questions with high-quality sample answers \
                 and tips. Also, give advice for closing the interview strongly. \
                 Return the entire guide in the specified JSON format."
            ),
            ResearchMode::DeepMarket => format!(
                "Act as a senior market analyst and business strategist. Your goal is \
                 to conduct a detailed and insightful market analysis for the product \
                 or business idea: \"{query}\". Provide a summary, target audience \
                 breakdown, competitor analysis, a full SWOT analysis, and actionable \
                 marketing strategies. Return the entire analysis in the specified \
                 JSON format."
            ),
            ResearchMode::DeepChef => format!(
                "Act as an expert chef. Your goal is to create a delicious and \
                 easy-to-follow recipe based on the user's request: \"{query}\". \
                 Provide a recipe name, description, timings, difficulty, a complete \
                 ingredient list, and step-by-step instructions. Also include sources \
                 for your recipe. Return the entire recipe in the specified JSON \
                 format."
            ),
            ResearchMode::DeepGame => format!(
                "Act as an expert game designer. Your goal is to brainstorm a \
                 compelling game concept based on the user's idea: \"{query}\". \
                 Develop a game title, a core concept, key gameplay mechanics, \
                 interesting character concepts, and potential monetization \
                 strategies. Also include sources for inspiration. Return the entire \
                 game concept in the specified JSON format."
            ),
        }
    }

    pub fn response_schema(&self) -> SchemaNode {
        schema::response_schema(*self)
    }
}

impl std::fmt::Display for ResearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.spec().title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_for_every_mode() {
        for mode in ResearchMode::ALL {
            let parsed = ResearchMode::from_id(mode.id()).expect("catalog id must resolve");
            assert_eq!(parsed, mode);
        }
    }

    #[test]
    fn unknown_id_is_rejected() {
        let err = ResearchMode::from_id("deep_fake").expect_err("unknown id must fail");
        assert!(matches!(err, DeepSiloError::UnknownMode(id) if id == "deep_fake"));
    }

    #[test]
    fn mode_tag_serializes_as_snake_case_id() {
        let json = serde_json::to_string(&ResearchMode::DeepResearch).expect("serialize");
        assert_eq!(json, r#""deep_research""#);
    }

    #[test]
    fn prompts_embed_the_query_verbatim() {
        let query = "sourdough starters & wild yeast (2024)";
        for mode in ResearchMode::ALL {
            let prompt = mode.prompt(query);
            assert!(
                prompt.contains(query),
                "{} prompt must embed the query verbatim",
                mode.id()
            );
        }
    }

    #[test]
    fn catalog_has_unique_ids_and_titles() {
        let mut ids: Vec<&str> = ResearchMode::ALL.iter().map(|m| m.id()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), ResearchMode::ALL.len());

        let mut titles: Vec<&str> = ResearchMode::ALL.iter().map(|m| m.spec().title).collect();
        titles.sort();
        titles.dedup();
        assert_eq!(titles.len(), ResearchMode::ALL.len());
    }
}
