//! A terminal front end for the chat widget, handy for trying the persona
//! against the real model.

#[macro_use]
extern crate tracing;

use std::env;
use std::io::Write as _;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use leadchat::SessionBuilder;
use leadchat::core::conversation::Role;
use leadchat_gemini_model::{GeminiConfigBuilder, GeminiProvider};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt};
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::sleep;

enum SessionEvent {
    Idle,
    Reply(String),
}

const BAR_CHAR: &str = "▎";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let Ok(api_key) = env::var("GEMINI_API_KEY") else {
        eprintln!("GEMINI_API_KEY environment variable is not set");
        return;
    };
    let mut config = GeminiConfigBuilder::with_api_key(api_key);
    if let Ok(model) = env::var("GEMINI_MODEL") {
        config = config.with_model(model);
    }
    if let Ok(base_url) = env::var("GEMINI_BASE_URL") {
        config = config.with_base_url(base_url);
    }
    match env::var("LEADCHAT_TIMEOUT_SECS").map(|v| v.parse::<u64>()) {
        Ok(Ok(secs)) => config = config.with_timeout(Duration::from_secs(secs)),
        Ok(Err(err)) => warn!("ignoring LEADCHAT_TIMEOUT_SECS: {err}"),
        Err(_) => {}
    }
    let config = config.build();
    debug!("using {config:?}");
    let model_provider = GeminiProvider::new(config);

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();

    let mut builder = SessionBuilder::with_model_provider(model_provider)
        .on_idle({
            let event_tx = event_tx.clone();
            move || {
                event_tx.send(SessionEvent::Idle).ok();
            }
        })
        .on_transcript({
            let event_tx = event_tx.clone();
            move |msg| {
                if msg.role() == Role::Assistant {
                    event_tx
                        .send(SessionEvent::Reply(msg.content().to_owned()))
                        .ok();
                }
            }
        });
    if let Ok(name) = env::var("LEADCHAT_BUSINESS_NAME") {
        builder = builder.with_business_name(name);
    }
    let session = builder.build();

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    println!("Commands: /open toggles the window, /state dumps it, /quit.");
    print_reply(session.state().latest().map(|m| m.content()).unwrap_or(""));

    'outer: loop {
        print!("> ");
        std::io::stdout().flush().unwrap();

        let Some(line) = read_line().await else {
            break;
        };
        let line = line.trim();
        match line {
            "" => continue,
            "/quit" => break,
            "/open" => {
                let was_open = session.state().is_open();
                let mut state_rx = session.subscribe();
                if session.toggle_open().is_err() {
                    break;
                }
                // The toggle is applied asynchronously.
                let Ok(state) =
                    state_rx.wait_for(|s| s.is_open() != was_open).await
                else {
                    break;
                };
                let is_open = state.is_open();
                drop(state);
                println!("window is {}", if is_open { "open" } else { "closed" });
                continue;
            }
            "/state" => {
                match serde_json::to_string_pretty(&session.state()) {
                    Ok(json) => println!("{json}"),
                    Err(err) => error!("cannot serialize state: {err}"),
                }
                continue;
            }
            _ => {}
        }

        session.set_draft_input(line).ok();
        if session.send_message(line).is_err() {
            error!("widget has terminated");
            break;
        }

        let mut progress_bar = None;

        loop {
            // Create a new progress bar if it has been finished.
            progress_bar
                .get_or_insert_with(|| {
                    let progress_bar = ProgressBar::new_spinner();
                    progress_bar.set_style(progress_style.clone());
                    progress_bar.set_message("Typing...");
                    progress_bar
                })
                .inc(1);

            let sleep = sleep(Duration::from_millis(100));
            let event = select! {
                event = event_rx.recv() => {
                    let Some(event) = event else {
                        break 'outer;
                    };
                    event
                },
                _ = sleep => {
                    continue;
                }
            };

            // Finish the progress bar before printing anything else.
            if let Some(progress_bar) = &progress_bar {
                progress_bar.finish_and_clear();
            }
            progress_bar = None;

            match event {
                SessionEvent::Reply(reply) => print_reply(&reply),
                SessionEvent::Idle => break,
            }
        }
    }
}

fn print_reply(reply: &str) {
    println!("{}💬 {}", BAR_CHAR.bright_cyan(), reply.bright_white());
}

async fn read_line() -> Option<String> {
    let mut stdin = io::BufReader::new(io::stdin());
    let mut line = String::new();

    match stdin.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
