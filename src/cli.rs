use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand, ValueEnum};

use crate::calendar::GoogleEvent;
use crate::event::{Event, EventRecord};

/// VoiceCal - turn a schedule sentence into calendar events
#[derive(Debug, Parser)]
#[command(name = "voicecal")]
#[command(about = "Turn a schedule sentence into calendar events", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute (if not specified, enters interactive mode)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract events from a sentence
    Parse {
        /// The schedule sentence, e.g. "lunch at the cafe from 12 to 1pm"
        #[arg(required = true)]
        sentence: String,

        /// Reference time instead of now (YYYY-MM-DD HH:MM)
        #[arg(long, value_parser = parse_reference)]
        reference: Option<NaiveDateTime>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Start the HTTP API server
    Serve {
        /// Address to listen on (defaults to the configured one)
        #[arg(long)]
        address: Option<String>,
    },

    /// View configuration
    Config {
        #[command(subcommand)]
        action: ConfigActions,
    },
}

#[derive(Debug, Subcommand)]
pub enum ConfigActions {
    /// Print the effective configuration
    Show,
    /// Print the configuration file path
    Path,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Google,
}

pub const REFERENCE_FORMAT: &str = "%Y-%m-%d %H:%M";

fn parse_reference(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value.trim(), REFERENCE_FORMAT)
        .map_err(|e| format!("expected YYYY-MM-DD HH:MM: {}", e))
}

/// Render extracted events in the requested format
pub fn render_events(events: &[Event], format: OutputFormat, time_zone: &str) -> Result<String> {
    match format {
        OutputFormat::Text => {
            if events.is_empty() {
                return Ok("No events found".to_string());
            }
            let lines: Vec<String> = events.iter().map(Event::to_string).collect();
            Ok(lines.join("\n"))
        }
        OutputFormat::Json => {
            let records: Vec<EventRecord> = events.iter().map(EventRecord::from).collect();
            serde_json::to_string_pretty(&records).context("Failed to serialize events")
        }
        OutputFormat::Google => {
            let google_events = events
                .iter()
                .map(|event| GoogleEvent::from_event(event, time_zone))
                .collect::<Result<Vec<_>, _>>()?;
            serde_json::to_string_pretty(&google_events).context("Failed to serialize events")
        }
    }
}

/// What a line typed at the interactive prompt asks for
#[derive(Debug, PartialEq, Eq)]
pub enum PromptInput<'a> {
    Help,
    Exit,
    SetFormat(OutputFormat),
    Sentence(&'a str),
    Empty,
}

impl<'a> PromptInput<'a> {
    pub fn classify(line: &'a str) -> Self {
        match line.trim() {
            "" => PromptInput::Empty,
            "help" => PromptInput::Help,
            "exit" | "quit" => PromptInput::Exit,
            ":text" => PromptInput::SetFormat(OutputFormat::Text),
            ":json" => PromptInput::SetFormat(OutputFormat::Json),
            ":google" => PromptInput::SetFormat(OutputFormat::Google),
            sentence => PromptInput::Sentence(sentence),
        }
    }
}

pub fn print_help() {
    println!("Type a schedule sentence to see its events, for example:");
    println!("  meeting tomorrow at 3pm");
    println!("  lunch at the cafe from 12 to 1pm");
    println!("  in 2 hours call mom");
    println!();
    println!("Commands:");
    println!("  :text   - Print events as text (default)");
    println!("  :json   - Print events as key/value records");
    println!("  :google - Print events as calendar event bodies");
    println!("  help    - Show this help");
    println!("  exit    - Exit the application");
}
