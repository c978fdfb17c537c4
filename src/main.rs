use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::{error, info};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use voicecal::api_server;
use voicecal::cli::{self, Cli, Commands, ConfigActions, OutputFormat, PromptInput};
use voicecal::config::{self, Config};
use voicecal::parser::ScheduleParser;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging with custom format
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            use chrono::Local;
            use std::io::Write;
            writeln!(
                buf,
                "{} [{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Some(Commands::Parse { sentence, reference, format }) => {
            let time_zone = config.time_zone()?;
            let parser = match reference {
                Some(reference) => ScheduleParser::new(reference),
                None => ScheduleParser::now(time_zone),
            };
            let events = parser.parse(&sentence);
            println!("{}", cli::render_events(&events, format, time_zone.name())?);
            Ok(())
        }
        Some(Commands::Serve { address }) => api_server::start_api_server(config, address).await,
        Some(Commands::Config { action }) => {
            match action {
                ConfigActions::Show => print!("{}", toml::to_string_pretty(&config)?),
                ConfigActions::Path => println!("{}", config::get_config_path()?.display()),
            }
            Ok(())
        }
        None => run_interactive(&config),
    }
}

fn run_interactive(config: &Config) -> Result<()> {
    let time_zone = config.time_zone()?;
    info!("Starting VoiceCal interactive mode");

    let mut rl = DefaultEditor::new()?;
    let mut format = OutputFormat::Text;
    println!("Welcome to VoiceCal! Type 'help' for commands.");

    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                match PromptInput::classify(&line) {
                    PromptInput::Empty => {}
                    PromptInput::Help => cli::print_help(),
                    PromptInput::Exit => break,
                    PromptInput::SetFormat(new_format) => {
                        format = new_format;
                        println!("Output format set to {:?}", format);
                    }
                    PromptInput::Sentence(sentence) => {
                        let events = ScheduleParser::now(time_zone).parse(sentence);
                        match cli::render_events(&events, format, time_zone.name()) {
                            Ok(output) => println!("{}", output),
                            Err(err) => error!("Failed to render events: {:?}", err),
                        }
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
