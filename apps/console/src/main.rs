use std::sync::Arc;

use anyhow::Result;
use dotenv::dotenv;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use conversation_cell::{
    pickable_actions, ChatError, ConversationTurn, IdentityService, PatientSession, Role, Session,
    Speaker,
};
use report_cell::DoctorSession;
use shared_backend::SchedulerClient;
use shared_config::AppConfig;

type InputLines = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting medibook console");

    // Load configuration
    let config = AppConfig::from_env();
    let client = Arc::new(SchedulerClient::new(&config));
    let identity = IdentityService::new(Arc::clone(&client));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let role = loop {
        println!("Sign in as [patient/doctor]:");
        match lines.next_line().await?.as_deref().map(str::trim) {
            Some("patient") => break Role::Patient,
            Some("doctor") => break Role::Doctor,
            Some(_) => continue,
            None => return Ok(()),
        }
    };

    println!("Name:");
    let name = lines.next_line().await?.unwrap_or_default();
    let session = identity.sign_in(role, name.trim()).await;

    match role {
        Role::Patient => run_patient(client, &session, config.default_patient_id, &mut lines).await,
        Role::Doctor => run_doctor(client, &session, &mut lines).await,
    }
}

fn render_new_turns(turns: &[ConversationTurn], printed: &mut usize) {
    for turn in &turns[*printed..] {
        let who = match turn.speaker {
            Speaker::User => "you",
            Speaker::Agent => "agent",
        };
        println!("[{}] {}", who, turn.text);
    }
    *printed = turns.len();
}

fn report_chat_error(error: ChatError) {
    println!("({})", error);
}

async fn run_patient(
    client: Arc<SchedulerClient>,
    session: &Session,
    patient_id: i64,
    lines: &mut InputLines,
) -> Result<()> {
    let mut chat = PatientSession::new(client, session, patient_id);
    let mut printed = 0;

    println!("Commands: /slots /book /confirm /pick <n> /panel /reset /quit");
    render_new_turns(chat.transcript().turns(), &mut printed);

    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        match line.split_whitespace().next() {
            Some("/quit") => break,
            Some("/slots") => chat.check_slots().await,
            Some("/book") => {
                let reason = line.strip_prefix("/book").unwrap_or("").trim();
                let reason = if reason.is_empty() { "UI booking" } else { reason };
                chat.book(reason).await;
            }
            Some("/confirm") => {
                if let Err(e) = chat.confirm().await {
                    report_chat_error(e);
                }
            }
            Some("/pick") => {
                let actions = chat
                    .suggestions()
                    .map(pickable_actions)
                    .unwrap_or_default();
                let index = line
                    .split_whitespace()
                    .nth(1)
                    .and_then(|n| n.parse::<usize>().ok());
                match index.and_then(|i| actions.get(i).cloned()) {
                    Some(action) => {
                        if let Err(e) = chat.pick(&action).await {
                            report_chat_error(e);
                        }
                    }
                    None => {
                        for (i, action) in actions.iter().enumerate() {
                            println!(
                                "{}: {} on {} at {}",
                                i, action.doctor_name, action.date, action.start
                            );
                        }
                    }
                }
            }
            Some("/panel") => {
                let panel = chat.panel();
                println!(
                    "doctor {} | date {} | selected '{}' | {} slot(s) listed",
                    panel.doctor_id,
                    panel.date,
                    panel.selected_slot,
                    panel.available_slots.len()
                );
            }
            Some("/reset") => {
                chat.reset();
                printed = 0;
            }
            _ => {
                if let Err(e) = chat.submit(&line).await {
                    report_chat_error(e);
                }
            }
        }

        render_new_turns(chat.transcript().turns(), &mut printed);
        if chat.is_confirmable() {
            println!("(booking is ready - /confirm to book via chat)");
        }
    }

    Ok(())
}

async fn run_doctor(
    client: Arc<SchedulerClient>,
    session: &Session,
    lines: &mut InputLines,
) -> Result<()> {
    let mut chat = DoctorSession::new(client, session);
    let mut printed = 0;

    println!("Commands: /history /doctor <id> /quit");
    render_new_turns(chat.transcript().turns(), &mut printed);

    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        match line.split_whitespace().next() {
            Some("/quit") => break,
            Some("/history") => match chat.history().await {
                Ok(entries) => {
                    for entry in entries {
                        println!("{} | {}", entry.created_at, entry.prompt);
                    }
                }
                Err(_) => println!("(history unavailable)"),
            },
            Some("/doctor") => {
                if let Some(id) = line
                    .split_whitespace()
                    .nth(1)
                    .and_then(|n| n.parse::<i64>().ok())
                {
                    chat.set_doctor(id);
                }
            }
            _ => {
                if let Err(e) = chat.submit(&line).await {
                    report_chat_error(e);
                }
            }
        }

        render_new_turns(chat.transcript().turns(), &mut printed);
    }

    Ok(())
}
