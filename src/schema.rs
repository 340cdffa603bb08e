//! Declarative response schemas for each research mode.
//!
//! Each mode declares the JSON shape it expects back from the model as a
//! [`SchemaNode`] tree. The tree serializes to the `responseSchema` wire
//! format of the generative language API and is also the single source of
//! truth for the required top-level fields the dispatcher validates.

use serde_json::{Map, Value, json};

use crate::modes::ResearchMode;

#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub kind: SchemaKind,
    pub description: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaKind {
    Object(Vec<Field>),
    Array(Box<SchemaNode>),
    String,
    Integer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub required: bool,
    pub node: SchemaNode,
}

impl SchemaNode {
    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = Some(description);
        self
    }

    /// Render the node in the API's `responseSchema` wire shape.
    pub fn to_value(&self) -> Value {
        let mut map = Map::new();
        match &self.kind {
            SchemaKind::Object(fields) => {
                map.insert("type".into(), json!("OBJECT"));
                let mut properties = Map::new();
                for field in fields {
                    properties.insert(field.name.into(), field.node.to_value());
                }
                map.insert("properties".into(), Value::Object(properties));
                let required: Vec<Value> = fields
                    .iter()
                    .filter(|f| f.required)
                    .map(|f| json!(f.name))
                    .collect();
                if !required.is_empty() {
                    map.insert("required".into(), Value::Array(required));
                }
            }
            SchemaKind::Array(items) => {
                map.insert("type".into(), json!("ARRAY"));
                map.insert("items".into(), items.to_value());
            }
            SchemaKind::String => {
                map.insert("type".into(), json!("STRING"));
            }
            SchemaKind::Integer => {
                map.insert("type".into(), json!("INTEGER"));
            }
        }
        if let Some(description) = self.description {
            map.insert("description".into(), json!(description));
        }
        Value::Object(map)
    }

    /// Names of required top-level fields. Empty for non-object roots.
    pub fn top_level_required(&self) -> Vec<&'static str> {
        match &self.kind {
            SchemaKind::Object(fields) => fields
                .iter()
                .filter(|f| f.required)
                .map(|f| f.name)
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn string(description: &'static str) -> SchemaNode {
    SchemaNode {
        kind: SchemaKind::String,
        description: Some(description),
    }
}

fn integer(description: &'static str) -> SchemaNode {
    SchemaNode {
        kind: SchemaKind::Integer,
        description: Some(description),
    }
}

fn array(items: SchemaNode) -> SchemaNode {
    SchemaNode {
        kind: SchemaKind::Array(Box::new(items)),
        description: None,
    }
}

fn object(fields: Vec<Field>) -> SchemaNode {
    SchemaNode {
        kind: SchemaKind::Object(fields),
        description: None,
    }
}

fn req(name: &'static str, node: SchemaNode) -> Field {
    Field {
        name,
        required: true,
        node,
    }
}

fn opt(name: &'static str, node: SchemaNode) -> Field {
    Field {
        name,
        required: false,
        node,
    }
}

/// Every mode cites its sources with the same record shape.
fn sources(description: &'static str) -> SchemaNode {
    array(object(vec![
        req("title", string("The title of the source article or page.")),
        req("url", string("The full URL of the source.")),
        req("snippet", string("A brief snippet from the source relevant to the topic.")),
    ]))
    .describe(description)
}

/// The declared response shape for `mode`.
pub fn response_schema(mode: ResearchMode) -> SchemaNode {
    match mode {
        ResearchMode::DeepResearch => research(),
        ResearchMode::DeepCanvas => canvas(),
        ResearchMode::DeepAgent => agent(),
        ResearchMode::DeepDebate => debate(),
        ResearchMode::DeepStudy => study(),
        ResearchMode::DeepStudio => studio(),
        ResearchMode::DeepTrip => trip(),
        ResearchMode::DeepHealth => health(),
        ResearchMode::DeepInterview => interview(),
        ResearchMode::DeepMarket => market(),
        ResearchMode::DeepChef => chef(),
        ResearchMode::DeepGame => game(),
    }
}

fn research() -> SchemaNode {
    object(vec![
        req(
            "summary",
            string("A detailed, comprehensive summary of the research topic, at least 3 paragraphs long."),
        ),
        req("sources", sources("A list of at least 5 credible sources used for the research.")),
        req(
            "flashCards",
            array(object(vec![
                req("question", string("A concise question about a key concept.")),
                req("answer", string("The corresponding answer to the question.")),
            ]))
            .describe("A list of 5-10 flashcards to help study the topic."),
        ),
        req(
            "relatedVideos",
            array(object(vec![
                req("title", string("A compelling title for a related video.")),
                req("description", string("A one-sentence description of the video.")),
            ]))
            .describe("A list of 3-5 related video topics."),
        ),
        req(
            "miniAppData",
            array(object(vec![
                req("keyword", string("A key term or concept.")),
                req("frequency", integer("A number between 10 and 100 representing its frequency.")),
            ]))
            .describe("5-7 key terms and their hypothetical frequency in relevant literature."),
        ),
    ])
}

fn canvas() -> SchemaNode {
    object(vec![
        req("sources", sources("Credible sources used to gather the application's content.")),
        req(
            "code",
            array(object(vec![
                req("filename", string("The name of the file (e.g., 'index.html').")),
                req("language", string("The programming language (e.g., 'html', 'css', 'javascript').")),
                req("content", string("The full content of the code file.")),
            ]))
            .describe("Code files, typically index.html, style.css and script.js."),
        ),
    ])
}

fn agent() -> SchemaNode {
    object(vec![
        req(
            "summary",
            string("A comprehensive summary synthesized from the agent's findings."),
        ),
        req("sources", sources("At least 5 credible sources the agent consulted.")),
        req(
            "agentPath",
            array(object(vec![
                req("title", string("A short title for the research step.")),
                req("reasoning", string("The agent's reasoning for this step.")),
                opt("sourceURL", string("URL of the source consulted in this step, if any.")),
            ]))
            .describe("A step-by-step log of the agent's research process."),
        ),
    ])
}

fn debate() -> SchemaNode {
    object(vec![
        req("topic", string("The main topic of the debate, restated clearly.")),
        req(
            "viewpoints",
            array(object(vec![
                req("title", string("The name of the viewpoint (e.g., 'Pro Position').")),
                req("summary", string("A neutral, comprehensive summary of this viewpoint.")),
                req(
                    "arguments",
                    array(object(vec![
                        req("claim", string("The central claim of the argument.")),
                        req("evidence", string("Evidence or reasoning supporting the claim.")),
                        req("counterArgument", string("A common rebuttal to this claim.")),
                    ]))
                    .describe("Key arguments supporting this viewpoint."),
                ),
            ]))
            .describe("2-3 distinct viewpoints on the topic."),
        ),
        req(
            "pointsOfConsensus",
            string("A paragraph on where the viewpoints share common ground."),
        ),
        req(
            "unresolvedQuestions",
            array(string("An open question central to the debate."))
                .describe("3-5 key questions that remain unresolved."),
        ),
        req("sources", sources("At least 5 credible sources used for the research.")),
    ])
}

fn study() -> SchemaNode {
    object(vec![
        req(
            "keyConcepts",
            array(object(vec![
                req("concept", string("The name of the key concept.")),
                req("definition", string("A clear and concise definition.")),
                req("example", string("A simple example illustrating the concept.")),
            ]))
            .describe("5-7 fundamental concepts crucial for understanding the topic."),
        ),
        req(
            "studyPlan",
            array(object(vec![
                req("timeframe", string("The timeframe for this part of the plan (e.g., 'Week 1').")),
                req(
                    "topics",
                    array(string("A topic to cover.")).describe("Specific topics for this timeframe."),
                ),
                req(
                    "activities",
                    array(string("A suggested learning activity."))
                        .describe("Suggested activities (e.g., 'Read chapter 5')."),
                ),
            ]))
            .describe("A structured study plan to master the topic."),
        ),
        req(
            "practiceProblems",
            array(object(vec![
                req("question", string("A practice question.")),
                req("answer", string("The detailed solution to the question.")),
            ]))
            .describe("5-8 practice problems with detailed answers."),
        ),
        req(
            "analogies",
            array(object(vec![
                req("concept", string("The complex concept being explained.")),
                req("analogy", string("The simple analogy.")),
            ]))
            .describe("3-5 simple analogies for the hardest parts of the topic."),
        ),
        req("sources", sources("Credible sources used to create the study guide.")),
    ])
}

fn studio() -> SchemaNode {
    object(vec![
        req("topic", string("The main topic for the content, restated clearly.")),
        req(
            "videoIdeas",
            array(object(vec![
                req("title", string("A catchy, clickable title for the video.")),
                req("hook", string("A 1-2 sentence hook for the first seconds.")),
                req("description", string("A brief summary of the video concept.")),
            ]))
            .describe("3-5 engaging video ideas for platforms like YouTube or TikTok."),
        ),
        req(
            "script",
            array(object(vec![
                req("scene", string("The name of the scene or segment (e.g., 'Intro').")),
                req("dialogue", string("The spoken dialogue or voiceover for the segment.")),
                req("visuals", string("Suggested on-screen visuals, B-roll or overlays.")),
            ]))
            .describe("A detailed script for the most promising idea, by scene."),
        ),
        req(
            "seoKeywords",
            array(string("A relevant SEO keyword.")).describe("5-10 keywords for discoverability."),
        ),
        req(
            "hashtags",
            array(string("A relevant hashtag.")).describe("5-10 hashtags for social platforms."),
        ),
        req("sources", sources("Credible sources used for content research.")),
    ])
}

fn trip() -> SchemaNode {
    object(vec![
        req("destination", string("The primary destination of the trip.")),
        req("tripSummary", string("A brief, enticing summary of the planned trip.")),
        req(
            "itinerary",
            array(object(vec![
                req("day", string("The day of the trip (e.g., 'Day 1').")),
                req("title", string("A title for the day's activities.")),
                req(
                    "activities",
                    array(object(vec![
                        req("time", string("Time of day (e.g., 'Morning', '9:00 AM').")),
                        req("description", string("Description of the activity.")),
                    ])),
                ),
            ]))
            .describe("A detailed day-by-day itinerary."),
        ),
        req(
            "packingList",
            array(string("An item to pack.")).describe("Recommended items to pack."),
        ),
        req(
            "budgetBreakdown",
            array(object(vec![
                req("category", string("Budget category (e.g., 'Flights').")),
                req("cost", string("Estimated cost or range.")),
            ]))
            .describe("An estimated budget breakdown for the trip."),
        ),
        req("sources", sources("Credible sources used for planning.")),
    ])
}

fn health() -> SchemaNode {
    object(vec![
        req("goal", string("The health and fitness goal this plan is designed for.")),
        req(
            "disclaimer",
            string("A mandatory disclaimer that this is not medical advice and a doctor should be consulted."),
        ),
        req(
            "workoutPlan",
            array(object(vec![
                req("day", string("The day or focus of the workout (e.g., 'Monday - Upper Body').")),
                req(
                    "exercises",
                    array(object(vec![
                        req("name", string("Name of the exercise.")),
                        req("sets", string("Number of sets.")),
                        req("reps", string("Number of repetitions.")),
                    ])),
                ),
            ]))
            .describe("A structured workout plan."),
        ),
        req(
            "mealPlan",
            array(object(vec![
                req("day", string("The day for the meal plan (e.g., 'Day 1').")),
                req(
                    "meals",
                    array(object(vec![
                        req("name", string("Meal name (e.g., 'Breakfast').")),
                        req("description", string("Description of the meal.")),
                    ])),
                ),
            ]))
            .describe("A sample meal plan for a few days."),
        ),
        req(
            "healthyHabits",
            array(string("An actionable habit tip.")).describe("Actionable tips for healthy habits."),
        ),
        req("sources", sources("Credible sources used for information.")),
    ])
}

fn interview() -> SchemaNode {
    let question_set = |description: &'static str| {
        array(object(vec![
            req("question", string("The interview question.")),
            req("sampleAnswer", string("A detailed, high-quality sample answer.")),
            req(
                "tips",
                array(string("An actionable tip.")).describe("Tips for answering this question."),
            ),
        ]))
        .describe(description)
    };
    object(vec![
        req("jobRole", string("The job role the preparation is generated for.")),
        req("introduction", string("A brief, encouraging introduction for the candidate.")),
        req(
            "commonQuestions",
            question_set("3-5 common, non-technical interview questions."),
        ),
        req(
            "behavioralQuestions",
            question_set("3-5 behavioral questions, answered in STAR format."),
        ),
        req(
            "technicalQuestions",
            question_set("3-5 technical questions relevant to the role; empty for non-technical roles."),
        ),
        req(
            "closingStatement",
            string("Advice on asking good questions and ending the interview well."),
        ),
        req("sources", sources("Credible sources used for information.")),
    ])
}

fn market() -> SchemaNode {
    object(vec![
        req("productIdea", string("The product or business idea being analyzed.")),
        req("summary", string("A high-level executive summary of the market analysis.")),
        req(
            "targetAudience",
            array(object(vec![
                req("segment", string("The name of the audience segment.")),
                req("description", string("Demographics, needs and behaviors of this segment.")),
            ]))
            .describe("A breakdown of the primary target audience segments."),
        ),
        req(
            "competitors",
            array(object(vec![
                req("name", string("The name of the competitor.")),
                req("strengths", string("Key strengths of this competitor.")),
                req("weaknesses", string("Key weaknesses or gaps in their offering.")),
            ]))
            .describe("An analysis of 2-4 key competitors."),
        ),
        req(
            "swotAnalysis",
            object(vec![
                req(
                    "strengths",
                    array(string("An internal strength.")).describe("Internal strengths."),
                ),
                req(
                    "weaknesses",
                    array(string("An internal weakness.")).describe("Internal weaknesses."),
                ),
                req(
                    "opportunities",
                    array(string("An external opportunity.")).describe("External opportunities."),
                ),
                req(
                    "threats",
                    array(string("An external threat.")).describe("External threats."),
                ),
            ])
            .describe("A SWOT analysis for the product idea."),
        ),
        req(
            "marketingStrategies",
            array(string("An actionable strategy.")).describe("5-7 actionable marketing strategies."),
        ),
        req("sources", sources("Credible sources used for information.")),
    ])
}

fn chef() -> SchemaNode {
    object(vec![
        req("recipeName", string("The name of the recipe.")),
        req("description", string("A short, enticing description of the dish.")),
        req("prepTime", string("Estimated preparation time (e.g., '15 minutes').")),
        req("cookTime", string("Estimated cooking time (e.g., '30 minutes').")),
        req("difficulty", string("Difficulty level, one of: 'Easy', 'Medium', 'Hard'.")),
        req(
            "ingredients",
            array(object(vec![
                req("name", string("Name of the ingredient.")),
                req("quantity", string("Quantity and unit (e.g., '2 cups').")),
            ]))
            .describe("All ingredients required for the recipe."),
        ),
        req(
            "instructions",
            array(string("One preparation step.")).describe("Step-by-step instructions."),
        ),
        req("sources", sources("Sources for the recipe or cooking techniques.")),
    ])
}

fn game() -> SchemaNode {
    object(vec![
        req("title", string("A catchy and creative title for the game.")),
        req("concept", string("A high-level elevator pitch summarizing the theme.")),
        req(
            "coreMechanics",
            array(object(vec![
                req("name", string("The name of the mechanic (e.g., 'Crafting System').")),
                req("description", string("How the mechanic works.")),
            ]))
            .describe("3-5 core gameplay mechanics."),
        ),
        req(
            "characterConcepts",
            array(object(vec![
                req("name", string("The character's name or title.")),
                req("description", string("A brief backstory and personality.")),
                req(
                    "abilities",
                    array(string("A key skill or ability.")).describe("Key skills or abilities."),
                ),
            ]))
            .describe("2-3 interesting character concepts."),
        ),
        req(
            "monetization",
            array(string("A monetization strategy.")).describe("Potential monetization strategies."),
        ),
        req("sources", sources("Sources for design inspiration or market data.")),
    ])
}
