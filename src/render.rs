//! Terminal panels for each result variant.
//!
//! Rendering dispatches on the `ModeResult` tag. Every top-level field a
//! renderer reads is listed in [`rendered_fields`], which the schema tests
//! check against the declared required fields so a renderer can never read a
//! field the schema does not guarantee.

use colored::Colorize;

use crate::models::{
    AgentData, CanvasData, ChefData, DebateData, GameData, HealthData, HistoryEntry,
    InterviewData, InterviewQuestion, MarketData, ModeResult, ResearchData, Role, Source,
    StudioData, StudyData, TripData,
};
use crate::modes::ResearchMode;

/// Top-level payload fields read by each mode's renderer, in wire naming.
pub fn rendered_fields(mode: ResearchMode) -> &'static [&'static str] {
    match mode {
        ResearchMode::DeepResearch => {
            &["summary", "sources", "flashCards", "relatedVideos", "miniAppData"]
        }
        ResearchMode::DeepCanvas => &["sources", "code"],
        ResearchMode::DeepAgent => &["summary", "sources", "agentPath"],
        ResearchMode::DeepDebate => &[
            "topic",
            "viewpoints",
            "pointsOfConsensus",
            "unresolvedQuestions",
            "sources",
        ],
        ResearchMode::DeepStudy => &[
            "keyConcepts",
            "studyPlan",
            "practiceProblems",
            "analogies",
            "sources",
        ],
        ResearchMode::DeepStudio => &[
            "topic",
            "videoIdeas",
            "script",
            "seoKeywords",
            "hashtags",
            "sources",
        ],
        ResearchMode::DeepTrip => &[
            "destination",
            "tripSummary",
            "itinerary",
            "packingList",
            "budgetBreakdown",
            "sources",
        ],
        ResearchMode::DeepHealth => &[
            "goal",
            "disclaimer",
            "workoutPlan",
            "mealPlan",
            "healthyHabits",
            "sources",
        ],
        ResearchMode::DeepInterview => &[
            "jobRole",
            "introduction",
            "commonQuestions",
            "behavioralQuestions",
            "technicalQuestions",
            "closingStatement",
            "sources",
        ],
        ResearchMode::DeepMarket => &[
            "productIdea",
            "summary",
            "targetAudience",
            "competitors",
            "swotAnalysis",
            "marketingStrategies",
            "sources",
        ],
        ResearchMode::DeepChef => &[
            "recipeName",
            "description",
            "prepTime",
            "cookTime",
            "difficulty",
            "ingredients",
            "instructions",
            "sources",
        ],
        ResearchMode::DeepGame => &[
            "title",
            "concept",
            "coreMechanics",
            "characterConcepts",
            "monetization",
            "sources",
        ],
    }
}

pub fn render_catalog() {
    println!("\n{}", "What will you create today?".bold());
    println!("Select a specialized AI mode to begin.\n");
    for (i, mode) in ResearchMode::ALL.iter().enumerate() {
        let spec = mode.spec();
        println!(
            "  {:>2}. {} {}",
            i + 1,
            spec.title.bold(),
            format!("[{}]", spec.tag).dimmed()
        );
        println!("      {}", spec.description.dimmed());
    }
    println!();
}

pub fn render_history_list(entries: &[HistoryEntry]) {
    if entries.is_empty() {
        println!("\nNo research history yet.\n");
        return;
    }
    println!("\n{}\n", "Research History".bold());
    for (i, entry) in entries.iter().enumerate() {
        println!(
            "  {:>2}. {} {} {}",
            i + 1,
            entry.mode.spec().title.bold(),
            entry.query,
            entry
                .created_at
                .format("(%Y-%m-%d %H:%M UTC)")
                .to_string()
                .dimmed()
        );
    }
    println!();
}

pub fn render_result(query: &str, result: &ModeResult) {
    let title = result.mode().spec().title;
    println!("\n{}  {}", title.bold().blue(), query.italic());
    match result {
        ModeResult::Research(data) => render_research(data),
        ModeResult::Canvas(data) => render_canvas(data),
        ModeResult::Agent(data) => render_agent(data),
        ModeResult::Debate(data) => render_debate(data),
        ModeResult::Study(data) => render_study(data),
        ModeResult::Studio(data) => render_studio(data),
        ModeResult::Trip(data) => render_trip(data),
        ModeResult::Health(data) => render_health(data),
        ModeResult::Interview(data) => render_interview(data),
        ModeResult::Market(data) => render_market(data),
        ModeResult::Chef(data) => render_chef(data),
        ModeResult::Game(data) => render_game(data),
    }
}

pub fn render_chat_turn(turn: &crate::models::ChatTurn) {
    match turn.role {
        Role::User => println!("{} {}", "you:".bold(), turn.text),
        Role::Assistant => {
            println!("{} {}", "assistant:".bold().green(), turn.text);
            if !turn.citations.is_empty() {
                println!("  {}", "Sources:".dimmed());
                for (i, citation) in turn.citations.iter().enumerate() {
                    println!("  {}. {} — {}", i + 1, citation.title, citation.uri.dimmed());
                }
            }
        }
    }
}

fn section(name: &str) {
    println!("\n{}", name.bold().underline());
}

fn render_sources(sources: &[Source]) {
    section("Sources");
    for (i, source) in sources.iter().enumerate() {
        println!("  {}. {} — {}", i + 1, source.title, source.url.dimmed());
        if !source.snippet.is_empty() {
            println!("     {}", source.snippet.dimmed());
        }
    }
}

fn render_research(data: &ResearchData) {
    section("Summary");
    println!("{}", data.summary);

    section("Flashcards");
    for card in &data.flash_cards {
        println!("  {} {}", "Q:".bold(), card.question);
        println!("  {} {}", "A:".bold(), card.answer);
    }

    section("Related Videos");
    for video in &data.related_videos {
        println!("  {} — {}", video.title.bold(), video.description);
    }

    section("Keyword Frequency");
    for item in &data.mini_app_data {
        println!("  {:<24} {}", item.keyword, "█".repeat((item.frequency / 10) as usize));
    }

    render_sources(&data.sources);
}

fn render_canvas(data: &CanvasData) {
    for file in &data.code {
        section(&format!("{} ({})", file.filename, file.language));
        println!("{}", file.content);
    }
    render_sources(&data.sources);
}

fn render_agent(data: &AgentData) {
    section("Research Path");
    for (i, step) in data.agent_path.iter().enumerate() {
        println!("  {}. {}", i + 1, step.title.bold());
        println!("     {}", step.reasoning);
        if let Some(url) = &step.source_url {
            println!("     {}", url.dimmed());
        }
    }

    section("Summary");
    println!("{}", data.summary);

    render_sources(&data.sources);
}

fn render_debate(data: &DebateData) {
    section("Topic");
    println!("{}", data.topic);

    for viewpoint in &data.viewpoints {
        section(&viewpoint.title);
        println!("{}", viewpoint.summary);
        for argument in &viewpoint.arguments {
            println!("  {} {}", "Claim:".bold(), argument.claim);
            println!("  {} {}", "Evidence:".bold(), argument.evidence);
            println!("  {} {}", "Counter:".bold(), argument.counter_argument);
        }
    }

    section("Points of Consensus");
    println!("{}", data.points_of_consensus);

    section("Unresolved Questions");
    for question in &data.unresolved_questions {
        println!("  - {question}");
    }

    render_sources(&data.sources);
}

fn render_study(data: &StudyData) {
    section("Key Concepts");
    for concept in &data.key_concepts {
        println!("  {}: {}", concept.concept.bold(), concept.definition);
        println!("    e.g. {}", concept.example.dimmed());
    }

    section("Study Plan");
    for item in &data.study_plan {
        println!("  {}", item.timeframe.bold());
        println!("    Topics: {}", item.topics.join(", "));
        println!("    Activities: {}", item.activities.join(", "));
    }

    section("Practice Problems");
    for problem in &data.practice_problems {
        println!("  {} {}", "Q:".bold(), problem.question);
        println!("  {} {}", "A:".bold(), problem.answer);
    }

    section("Analogies");
    for analogy in &data.analogies {
        println!("  {}: {}", analogy.concept.bold(), analogy.analogy);
    }

    render_sources(&data.sources);
}

fn render_studio(data: &StudioData) {
    section("Topic");
    println!("{}", data.topic);

    section("Video Ideas");
    for idea in &data.video_ideas {
        println!("  {}", idea.title.bold());
        println!("    Hook: {}", idea.hook);
        println!("    {}", idea.description);
    }

    section("Script");
    for segment in &data.script {
        println!("  [{}]", segment.scene.bold());
        println!("    {}", segment.dialogue);
        println!("    Visuals: {}", segment.visuals.dimmed());
    }

    section("SEO Keywords");
    println!("  {}", data.seo_keywords.join(", "));

    section("Hashtags");
    println!("  {}", data.hashtags.join(" "));

    render_sources(&data.sources);
}

fn render_trip(data: &TripData) {
    section("Destination");
    println!("{}", data.destination.bold());
    println!("{}", data.trip_summary);

    section("Itinerary");
    for day in &data.itinerary {
        println!("  {} — {}", day.day.bold(), day.title);
        for activity in &day.activities {
            println!("    {}: {}", activity.time, activity.description);
        }
    }

    section("Packing List");
    for item in &data.packing_list {
        println!("  - {item}");
    }

    section("Budget Breakdown");
    for item in &data.budget_breakdown {
        println!("  {:<20} {}", item.category, item.cost);
    }

    render_sources(&data.sources);
}

fn render_health(data: &HealthData) {
    section("Goal");
    println!("{}", data.goal);
    println!("\n{}", data.disclaimer.yellow());

    section("Workout Plan");
    for day in &data.workout_plan {
        println!("  {}", day.day.bold());
        for exercise in &day.exercises {
            println!("    {} — {} x {}", exercise.name, exercise.sets, exercise.reps);
        }
    }

    section("Meal Plan");
    for day in &data.meal_plan {
        println!("  {}", day.day.bold());
        for meal in &day.meals {
            println!("    {}: {}", meal.name.bold(), meal.description);
        }
    }

    section("Healthy Habits");
    for habit in &data.healthy_habits {
        println!("  - {habit}");
    }

    render_sources(&data.sources);
}

fn render_question_set(name: &str, questions: &[InterviewQuestion]) {
    section(name);
    for question in questions {
        println!("  {} {}", "Q:".bold(), question.question);
        println!("  {} {}", "A:".bold(), question.sample_answer);
        for tip in &question.tips {
            println!("     tip: {}", tip.dimmed());
        }
    }
}

fn render_interview(data: &InterviewData) {
    section("Role");
    println!("{}", data.job_role.bold());
    println!("{}", data.introduction);

    render_question_set("Common Questions", &data.common_questions);
    render_question_set("Behavioral Questions", &data.behavioral_questions);
    render_question_set("Technical Questions", &data.technical_questions);

    section("Closing the Interview");
    println!("{}", data.closing_statement);

    render_sources(&data.sources);
}

fn render_market(data: &MarketData) {
    section("Product Idea");
    println!("{}", data.product_idea.bold());
    println!("{}", data.summary);

    section("Target Audience");
    for segment in &data.target_audience {
        println!("  {}: {}", segment.segment.bold(), segment.description);
    }

    section("Competitors");
    for competitor in &data.competitors {
        println!("  {}", competitor.name.bold());
        println!("    Strengths: {}", competitor.strengths);
        println!("    Weaknesses: {}", competitor.weaknesses);
    }

    section("SWOT");
    println!("  Strengths:     {}", data.swot_analysis.strengths.join("; "));
    println!("  Weaknesses:    {}", data.swot_analysis.weaknesses.join("; "));
    println!("  Opportunities: {}", data.swot_analysis.opportunities.join("; "));
    println!("  Threats:       {}", data.swot_analysis.threats.join("; "));

    section("Marketing Strategies");
    for strategy in &data.marketing_strategies {
        println!("  - {strategy}");
    }

    render_sources(&data.sources);
}

fn render_chef(data: &ChefData) {
    section("Recipe");
    println!("{}", data.recipe_name.bold());
    println!("{}", data.description);
    println!(
        "Prep: {}  Cook: {}  Difficulty: {}",
        data.prep_time, data.cook_time, data.difficulty
    );

    section("Ingredients");
    for ingredient in &data.ingredients {
        println!("  {:<12} {}", ingredient.quantity, ingredient.name);
    }

    section("Instructions");
    for (i, step) in data.instructions.iter().enumerate() {
        println!("  {}. {step}", i + 1);
    }

    render_sources(&data.sources);
}

fn render_game(data: &GameData) {
    section("Title");
    println!("{}", data.title.bold());
    println!("{}", data.concept);

    section("Core Mechanics");
    for mechanic in &data.core_mechanics {
        println!("  {}: {}", mechanic.name.bold(), mechanic.description);
    }

    section("Characters");
    for character in &data.character_concepts {
        println!("  {}", character.name.bold());
        println!("    {}", character.description);
        println!("    Abilities: {}", character.abilities.join(", "));
    }

    section("Monetization");
    for item in &data.monetization {
        println!("  - {item}");
    }

    render_sources(&data.sources);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;

    /// Every field a renderer reads must be guaranteed by the mode's schema.
    #[test]
    fn schema_required_fields_cover_rendered_fields() {
        for mode in ResearchMode::ALL {
            let required = schema::response_schema(mode).top_level_required();
            for field in rendered_fields(mode) {
                assert!(
                    required.contains(field),
                    "{} renderer reads '{}' which the schema does not require",
                    mode.id(),
                    field
                );
            }
        }
    }

    /// The dispatcher validates exactly what the renderers depend on, so a
    /// schema field that nothing renders would be dead weight.
    #[test]
    fn rendered_fields_match_schema_required_exactly() {
        for mode in ResearchMode::ALL {
            let mut required = schema::response_schema(mode).top_level_required();
            let mut rendered: Vec<&str> = rendered_fields(mode).to_vec();
            required.sort_unstable();
            rendered.sort_unstable();
            assert_eq!(required, rendered, "mismatch for {}", mode.id());
        }
    }
}
