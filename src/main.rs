//! Voice Reminder - Entry Point
//!
//! Reads one utterance per line (as a speech recognizer would hand it over),
//! interprets it, and speaks the reply. Alarms fire in the background while the
//! prompt is waiting.

use voice_reminder::command::Assistant;
use voice_reminder::core::config::AssistantConfig;
use voice_reminder::core::error::Result;
use voice_reminder::core::types::{format_millis, Reminder, ReminderId, ReminderKind};
use voice_reminder::scheduler::TokioScheduler;
use voice_reminder::speech::ConsoleSpeaker;
use voice_reminder::store::{JsonFileStore, MemoryStore, ReminderStore};

use chrono::Utc;
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

/// Voice Reminder - speak (or type) reminders and ask where you left things
#[derive(Parser, Debug)]
#[command(name = "voice-reminder")]
#[command(about = "Capture reminders and item locations from spoken commands")]
struct Args {
    /// Configuration file (TOML)
    #[arg(long, default_value = "voice-reminder.toml")]
    config: PathBuf,

    /// Override the store file from the config
    #[arg(long)]
    store: Option<PathBuf>,

    /// Keep reminders in memory only
    #[arg(long)]
    memory: bool,

    /// Handle a single utterance and exit
    #[arg(long)]
    say: Option<String>,

    /// Print the one-shot outcome as JSON
    #[arg(long, requires = "say")]
    json: bool,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = AssistantConfig::load(&args.config)?;
    if let Some(store) = &args.store {
        config.store_path = store.clone();
    }

    let filter = if args.verbose {
        EnvFilter::new("voice_reminder=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Voice Reminder starting...");

    // Timers for alarms run on this runtime
    let rt = Runtime::new()?;
    let (scheduler, mut alarms) = TokioScheduler::new(rt.handle().clone());

    let store: Box<dyn ReminderStore> = if args.memory {
        Box::new(MemoryStore::new())
    } else {
        Box::new(JsonFileStore::open(&config.store_path)?)
    };

    let mut assistant = Assistant::new(store, scheduler, ConsoleSpeaker).with_config(&config);

    if let Some(utterance) = &args.say {
        let outcome = assistant.handle(utterance)?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        if outcome.scheduled {
            tracing::warn!("One-shot mode exits before alarms fire; they are restored on the next interactive start");
        }
        return Ok(());
    }

    assistant.restore_alarms(Utc::now().timestamp_millis())?;

    rt.spawn(async move {
        while let Some(alarm) = alarms.recv().await {
            tracing::info!(title = %alarm.title, "Alarm fired");
            println!("\n⏰ {}", alarm);
            print!("> ");
            let _ = io::stdout().flush();
        }
    });

    println!("\n=== VOICE REMINDER ===");
    println!("Say things like:");
    println!("  remind me to take medicine at 8 pm");
    println!("  i kept my glasses on the table");
    println!("  where are my glasses");
    println!();
    println!("Commands:");
    println!("  list / l        - Show saved reminders");
    println!("  delete <id>     - Remove a reminder");
    println!("  quit / q        - Exit");
    println!();

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input == "quit" || input == "q" {
            break;
        }

        if input == "list" || input == "l" {
            match assistant.list() {
                Ok(reminders) => display_reminders(&reminders),
                Err(e) => println!("Could not read reminders: {}", e),
            }
            continue;
        }

        if let Some(arg) = input.strip_prefix("delete ") {
            match arg.trim().parse::<i64>() {
                Ok(id) => match assistant.delete(ReminderId(id)) {
                    Ok(()) => println!("Deleted reminder {}.", id),
                    Err(e) => println!("{}", e),
                },
                Err(_) => println!("Usage: delete <id>"),
            }
            continue;
        }

        if let Err(e) = assistant.handle(input) {
            tracing::error!("Failed to handle utterance: {}", e);
            println!("Something went wrong: {}", e);
        }
    }

    println!("\nGoodbye!");
    Ok(())
}

fn display_reminders(reminders: &[Reminder]) {
    if reminders.is_empty() {
        println!("No reminders saved yet.");
        return;
    }

    println!();
    for reminder in reminders {
        let kind = match reminder.kind {
            ReminderKind::Task => "task",
            ReminderKind::Item => "item",
        };
        let when = reminder
            .time_millis
            .map(format_millis)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  [{}] {:<4} {:<24} {:<28} {}",
            reminder.id,
            kind,
            reminder.title,
            when,
            reminder.details.as_deref().unwrap_or("")
        );
    }
    println!();
}
