use std::fs;
use std::io;
use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use upchaarak_config::AppConfig;
use upchaarak_gateway::chat::ChatGateway;
use upchaarak_gateway::hospitals::{self, HospitalDirectory};
use upchaarak_store::{
    AccountLedger, AccountPatch, AppointmentLedger, ChatHistoryLedger, KvStore, Session,
    SessionManager,
};

const CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Parser)]
#[command(
    name = "upchaarak",
    version,
    about = "Healthcare assistant: chat, appointments, and local hospitals"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Register a new account and log in.
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Log in with an existing account.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// End the current session.
    Logout,
    /// Show who is currently logged in.
    Whoami,
    /// Update the logged-in account's profile.
    Profile {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
    },
    /// Send a message to the assistant and record the exchange.
    Chat {
        message: String,
    },
    /// Manage the chat transcript.
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// Book an appointment.
    Book {
        #[arg(long)]
        patient_name: String,
        #[arg(long)]
        age: u32,
        #[arg(long)]
        symptoms: String,
        /// Calendar date as YYYY-MM-DD.
        #[arg(long)]
        date: String,
        /// Time of day, e.g. 10:00.
        #[arg(long)]
        time: String,
    },
    /// Manage appointments.
    Appointments {
        #[command(subcommand)]
        command: AppointmentCommands,
    },
    /// List nearby hospitals from the directory backend.
    Hospitals {
        /// Filter by name, address, or specialty.
        #[arg(long)]
        search: Option<String>,
    },
    /// Delete all chat history and appointments.
    Reset {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
enum HistoryCommands {
    /// Show the transcript, newest first.
    List {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Delete one entry by id.
    Delete {
        id: String,
    },
    /// Delete the whole transcript.
    Clear,
    /// Export chat history and appointments to a JSON file.
    Export {
        #[arg(value_name = "PATH")]
        path: String,
    },
}

#[derive(Debug, Subcommand)]
enum AppointmentCommands {
    /// All appointments, newest first.
    List,
    /// Still-scheduled appointments from today onward, soonest first.
    Upcoming,
    /// Cancel an appointment by id.
    Cancel {
        id: String,
    },
    /// Delete an appointment by id.
    Delete {
        id: String,
    },
}

fn require_session(sessions: &SessionManager<'_>) -> Result<Session> {
    sessions
        .current()?
        .context("not logged in (run `upchaarak login` first)")
}

fn print_session(session: &Session) {
    println!("logged in as {} <{}>", session.name, session.email);
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::load_from(CONFIG_PATH)?;
    let store = KvStore::open(&config.store.path)
        .with_context(|| format!("opening store at {}", config.store.path))?;
    let accounts = AccountLedger::new(&store);
    let sessions = SessionManager::new(&store);
    let chat = ChatHistoryLedger::new(&store);
    let appointments = AppointmentLedger::new(&store);

    let cli = Cli::parse();
    match cli.command {
        Commands::Signup {
            name,
            email,
            password,
        } => {
            let account = accounts.create(&name, &email, &password)?;
            // Auto-login after signup, same as the web flow.
            let session = sessions.start(&account)?;
            print_session(&session);
        }
        Commands::Login { email, password } => {
            let account = accounts.find_by_credentials(&email, &password)?;
            let session = sessions.start(&account)?;
            print_session(&session);
        }
        Commands::Logout => {
            sessions.end()?;
            println!("logged out");
        }
        Commands::Whoami => match sessions.current()? {
            Some(session) => print_session(&session),
            None => println!("not logged in"),
        },
        Commands::Profile {
            name,
            email,
            password,
        } => {
            let session = require_session(&sessions)?;
            let patch = AccountPatch {
                name,
                email,
                password,
            };
            let updated = accounts.update(&session.id, patch)?;
            // Keep the denormalized session copy in sync with the account.
            let session = sessions.start(&updated)?;
            print_session(&session);
        }
        Commands::Chat { message } => {
            require_session(&sessions)?;
            let api_key = config
                .api_key()
                .with_context(|| format!("set {} to use chat", config.gateway.api_key_env))?;
            let gateway = ChatGateway::new(
                &config.gateway.api_url,
                api_key,
                Duration::from_secs(config.gateway.request_timeout_secs),
            )?;

            let reply = gateway.complete(&message).await?;
            chat.append(&message, &reply)?;
            println!("{reply}");
        }
        Commands::History { command } => match command {
            HistoryCommands::List { limit } => {
                let entries = chat.recent(limit)?;
                if entries.is_empty() {
                    println!("no chat history");
                }
                for entry in entries {
                    println!("[{}] {} {}", entry.id, entry.date, entry.time);
                    println!("  you: {}", entry.user_message);
                    println!("  bot: {}", entry.bot_response);
                }
            }
            HistoryCommands::Delete { id } => {
                chat.delete(&id)?;
                println!("deleted {id}");
            }
            HistoryCommands::Clear => {
                chat.clear()?;
                println!("chat history cleared");
            }
            HistoryCommands::Export { path } => {
                let export = upchaarak_store::export_user_data(&store)?;
                let json = serde_json::to_string_pretty(&export)?;
                fs::write(&path, json).with_context(|| format!("writing {path}"))?;
                println!("exported to {path}");
            }
        },
        Commands::Book {
            patient_name,
            age,
            symptoms,
            date,
            time,
        } => {
            require_session(&sessions)?;
            let booked = appointments.book(&patient_name, age, &symptoms, &date, &time)?;
            println!(
                "booked {} for {} on {} at {}",
                booked.id, booked.patient_name, booked.date, booked.time
            );
        }
        Commands::Appointments { command } => match command {
            AppointmentCommands::List => {
                for appointment in appointments.list()? {
                    println!(
                        "[{}] {} — {} {} ({}) {}",
                        appointment.id,
                        appointment.patient_name,
                        appointment.date,
                        appointment.time,
                        appointment.status.label(),
                        appointment.symptoms,
                    );
                }
            }
            AppointmentCommands::Upcoming => {
                for appointment in appointments.upcoming()? {
                    println!(
                        "[{}] {} — {} {} {}",
                        appointment.id,
                        appointment.patient_name,
                        appointment.date,
                        appointment.time,
                        appointment.symptoms,
                    );
                }
            }
            AppointmentCommands::Cancel { id } => {
                let cancelled = appointments.cancel(&id)?;
                println!("{} is now {}", cancelled.id, cancelled.status.label());
            }
            AppointmentCommands::Delete { id } => {
                appointments.delete(&id)?;
                println!("deleted {id}");
            }
        },
        Commands::Hospitals { search } => {
            let directory = HospitalDirectory::new(&config.gateway.backend_url);
            let listing = directory.list().await?;
            let listing = match search {
                Some(term) => hospitals::search(&listing, &term),
                None => listing,
            };
            if listing.is_empty() {
                println!("no hospitals found");
            }
            for hospital in listing {
                println!("{} — {}", hospital.name, hospital.address);
                if !hospital.contact.is_empty() {
                    println!("  contact: {}", hospital.contact);
                }
                if !hospital.specialties.is_empty() {
                    println!("  specialties: {}", hospital.specialties.join(", "));
                }
            }
        }
        Commands::Reset { yes } => {
            if !yes {
                print!("delete all chat history and appointments? [y/N] ");
                io::stdout().flush()?;
                let mut answer = String::new();
                io::stdin().read_line(&mut answer)?;
                if !answer.trim().eq_ignore_ascii_case("y") {
                    bail!("aborted");
                }
            }
            upchaarak_store::clear_all_user_data(&store)?;
            println!("all user data cleared");
        }
    }

    Ok(())
}
