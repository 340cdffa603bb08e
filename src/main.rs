use std::io::Write;

use anyhow::Result;
use colored::Colorize;

use deepsilo::render;
use deepsilo::{Config, DeepSilo, Page, ResearchMode, Screen};

#[tokio::main]
async fn main() -> Result<()> {
    // Log to stderr so panels on stdout stay clean.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load();
    let mut app = DeepSilo::new(config).await?;

    println!("{}", "Silo Labs — deep research".bold());
    println!("Commands: :history  :settings  :home  :quit\n");

    let mut results_rendered = false;

    loop {
        if app.session().screen() != Screen::Results {
            results_rendered = false;
        }

        match app.session().page() {
            Page::History => {
                let entries = app.history_entries().await?;
                render::render_history_list(&entries);
                let Some(input) = prompt("history> pick a number, :clear, or :home: ") else {
                    break;
                };
                if handle_nav(&mut app, &input) {
                    continue;
                }
                if input == ":clear" {
                    app.clear_history().await?;
                    println!("History cleared.");
                    continue;
                }
                if let Ok(n) = input.parse::<usize>()
                    && n >= 1
                    && app.restore(n - 1).await?
                {
                    continue;
                }
                println!("No such entry.");
                continue;
            }
            Page::Settings => {
                let config = app.config();
                println!("\n{}", "Settings".bold());
                println!("  app:        {} v{}", config.app.name, config.app.version);
                println!("  model:      {}", config.gemini.model);
                println!("  chat model: {}", config.gemini.chat_model);
                println!("  data file:  {}", config.app.data_path);
                println!(
                    "  The API key is read from the local store or the GEMINI_API_KEY \
                     environment variable.\n"
                );
                let Some(input) = prompt("settings> :home to go back: ") else {
                    break;
                };
                if !handle_nav(&mut app, &input) {
                    app.navigate(Page::Home);
                }
                continue;
            }
            Page::Home => {}
        }

        match app.session().screen() {
            Screen::CredentialEntry => {
                println!("Enter your Gemini API key to continue.");
                println!("Get one at https://aistudio.google.com/app/apikey");
                let Some(input) = prompt("api key> ") else {
                    break;
                };
                if input == ":quit" {
                    break;
                }
                app.save_credential(&input).await?;
            }
            Screen::ModeSelection => {
                render::render_catalog();
                let Some(input) = prompt("mode> ") else {
                    break;
                };
                if handle_nav(&mut app, &input) {
                    continue;
                }
                match parse_mode(&input) {
                    Some(mode) => app.select_mode(mode),
                    None => println!("Pick a mode by number or id (e.g. 3 or deep_canvas)."),
                }
            }
            Screen::Searching => {
                let mode = app.session().mode().map(|m| m.spec().title).unwrap_or("?");
                if let Some(error) = app.session().error() {
                    println!("\n{} {}", "error:".red().bold(), error);
                    println!("Adjust your query and try again.");
                }
                let Some(input) = prompt(&format!("{mode}> query (:back to change mode): ")) else {
                    break;
                };
                if handle_nav(&mut app, &input) {
                    continue;
                }
                if input == ":back" {
                    app.back_to_modes();
                    continue;
                }
                if !input.is_empty() {
                    println!("{}", "Researching…".dimmed());
                }
                app.run_query(&input).await;
            }
            Screen::Loading => {
                // Queries are awaited inline, so this screen is never
                // observed by the prompt loop.
                continue;
            }
            Screen::Results => {
                if !results_rendered {
                    if let (Some(query), Some(result)) =
                        (app.session().query(), app.session().result())
                    {
                        render::render_result(query, result);
                    }
                    if let Some(chat) = app.session().chat()
                        && let Some(greeting) = chat.transcript().first()
                    {
                        println!();
                        render::render_chat_turn(greeting);
                    }
                    results_rendered = true;
                }
                let Some(input) = prompt("chat> follow-up question (:new to start over): ") else {
                    break;
                };
                if handle_nav(&mut app, &input) {
                    continue;
                }
                if input == ":new" {
                    app.reset();
                    continue;
                }
                if input.is_empty() {
                    continue;
                }
                if let Some(turn) = app.send_chat(&input).await {
                    render::render_chat_turn(turn);
                }
            }
        }
    }

    Ok(())
}

/// Handle page navigation and quit. Returns true when the input was consumed.
fn handle_nav(app: &mut DeepSilo, input: &str) -> bool {
    match input {
        ":history" => {
            app.navigate(Page::History);
            true
        }
        ":settings" => {
            app.navigate(Page::Settings);
            true
        }
        ":home" => {
            app.navigate(Page::Home);
            true
        }
        ":quit" => {
            std::process::exit(0);
        }
        _ => false,
    }
}

fn parse_mode(input: &str) -> Option<ResearchMode> {
    if let Ok(n) = input.parse::<usize>() {
        return ResearchMode::ALL.get(n.checked_sub(1)?).copied();
    }
    ResearchMode::from_id(input).ok()
}

fn prompt(text: &str) -> Option<String> {
    print!("{text}");
    std::io::stdout().flush().ok()?;
    let mut line = String::new();
    match std::io::stdin().read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}
