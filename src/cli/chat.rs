// src/cli/chat.rs — Interactive REPL

use std::path::Path;

use crate::core::controller::{Controller, Status};
use crate::provider::Role;

/// Run the interactive chat REPL.
///
/// Two external events reach the controller from here: a file selection
/// (`/open`, or the startup argument) and a submitted question (any
/// non-command line). Everything else is local display.
pub async fn run_chat(
    controller: &mut Controller,
    manual: Option<&Path>,
    quiet: bool,
) -> anyhow::Result<()> {
    eprintln!(
        "manualmate v{} | open a PDF manual, then ask about repairs and maintenance\n",
        env!("CARGO_PKG_VERSION"),
    );

    // Transcript positions already printed, so each refresh only renders
    // the new turns.
    let mut rendered = 0;

    if let Some(path) = manual {
        open_manual(controller, path, quiet).await;
        rendered = render(controller, rendered);
    }

    while let Some(input) = read_input() {
        let trimmed = input.trim();

        if trimmed == "quit" || trimmed == "exit" || trimmed == "/quit" {
            break;
        }

        if trimmed.is_empty() {
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix('/') {
            let (cmd, arg) = match rest.split_once(' ') {
                Some((c, a)) => (c, a.trim()),
                None => (rest, ""),
            };

            match cmd {
                "open" => {
                    if arg.is_empty() {
                        eprintln!("  Usage: /open <path-to-pdf>");
                    } else {
                        open_manual(controller, Path::new(arg), quiet).await;
                        // a new manual starts a fresh transcript
                        rendered = controller.messages().len();
                    }
                }
                "clear" => {
                    controller.on_clear_requested();
                    rendered = 0;
                    eprintln!("  Transcript cleared.");
                }
                "status" => show_status(controller),
                "help" => show_help(),
                _ => eprintln!("Unknown command: /{}. Type /help for commands.", cmd),
            }
            continue;
        }

        // Anything else is a question for the bound manual.
        if !quiet {
            eprintln!("  analyzing manual...");
        }
        controller.on_question_submitted(trimmed).await;
        if let Status::Error(msg) = controller.status() {
            eprintln!("[error] {}", msg);
        }
        rendered = render(controller, rendered);
    }

    Ok(())
}

async fn open_manual(controller: &mut Controller, path: &Path, quiet: bool) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("[error] cannot read {}: {}", path.display(), e);
            return;
        }
    };

    if !quiet {
        eprintln!("  processing {}...", name);
    }
    controller.on_file_selected(&bytes, &name).await;

    match controller.status() {
        Status::Error(msg) => eprintln!("[error] {}", msg),
        _ => eprintln!("  {} ready for questions", name),
    }
}

/// Print transcript turns appended since the last render; returns the
/// new high-water mark.
fn render(controller: &Controller, rendered: usize) -> usize {
    let messages = controller.messages();
    for message in &messages[rendered.min(messages.len())..] {
        match message.role {
            Role::User => {}
            Role::Assistant => println!("{}\n", message.content),
        }
    }
    messages.len()
}

fn show_status(controller: &Controller) {
    let session = controller.session();
    match session.current_file() {
        Some(name) => {
            let bound = if session.document().is_some() {
                "bound"
            } else {
                "not bound (upload failed or expired)"
            };
            eprintln!("  Manual: {} ({})", name, bound);
        }
        None => eprintln!("  Manual: none"),
    }
    eprintln!("  Transcript: {} message(s)", session.messages().len());
}

fn show_help() {
    eprintln!("Slash commands:");
    eprintln!("  /open <path>       Open a PDF manual (replaces the current one)");
    eprintln!("  /clear             Clear the transcript (manual stays open)");
    eprintln!("  /status            Show current manual and transcript size");
    eprintln!("  /help              Show this help");
    eprintln!("  /quit, quit, exit  End session");
}

fn read_input() -> Option<String> {
    use std::io::{self, BufRead, Write};

    print!("> ");
    io::stdout().flush().ok();

    let stdin = io::stdin();
    let mut line = String::new();
    match stdin.lock().read_line(&mut line) {
        Ok(0) => None, // EOF
        Ok(_) => Some(line),
        Err(_) => None,
    }
}
