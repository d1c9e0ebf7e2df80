use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use askq_core::config::{resolve_config, submit_timeout_from_env_value};
use askq_core::identity::author_from_values;
use askq_core::{
    Anonymous, IdentityProvider, LoggingSubmitter, ModalController, ModalView, Notice, NoticeKind,
    Notifier, StaticIdentity,
};
use askq_files::load_candidate;

const HELP: &str = "\
commands:
  ask                  open the ask-a-question modal
  title <text>         set the question title
  details <text>       set the question details
  tag <name>           toggle a tag
  attach <path>...     stage files
  remove <n>           remove the n-th staged file
  show                 redraw the modal
  submit               submit the question
  cancel               close the modal without submitting
  quit                 exit";

/// Prints notices the way a browser alert would interrupt the page.
struct AlertNotifier;

impl Notifier for AlertNotifier {
    fn notify(&self, notice: &Notice) {
        let label = match notice.kind {
            NoticeKind::Success => "ok",
            NoticeKind::Blocked => "cannot submit",
            NoticeKind::Failure => "error",
            NoticeKind::FileRejected => "file skipped",
        };
        println!("[{}] {}", label, notice.message.replace('\n', "\n    "));
    }
}

/// Interactive host for the ask-a-question modal
///
/// Plays the role of the feed page: it owns the modal's visibility, opens it on `ask`,
/// and hides it when the modal reports `on_close`.
///
/// # Environment Variables
/// - `ASKQ_CONFIG`: YAML composer configuration (optional)
/// - `ASKQ_AUTHOR_ID` / `ASKQ_AUTHOR_NAME`: signed-in author (optional; submit fails without)
/// - `ASKQ_SUBMIT_TIMEOUT_SECS`: submit timeout override (optional)
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("askq=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = resolve_config(std::env::var("ASKQ_CONFIG").ok().map(PathBuf::from))?;
    if let Some(timeout) =
        submit_timeout_from_env_value(std::env::var("ASKQ_SUBMIT_TIMEOUT_SECS").ok())?
    {
        config = config.with_submit_timeout(timeout);
    }

    let identity: Arc<dyn IdentityProvider> = match author_from_values(
        std::env::var("ASKQ_AUTHOR_ID").ok(),
        std::env::var("ASKQ_AUTHOR_NAME").ok(),
    )? {
        Some(author) => {
            tracing::info!("++ Signed in as {}", author.name);
            Arc::new(StaticIdentity::new(author))
        }
        None => {
            tracing::warn!("no author configured; submissions will be refused");
            Arc::new(Anonymous)
        }
    };

    let is_open = Arc::new(AtomicBool::new(false));
    let close_flag = Arc::clone(&is_open);
    let mut modal = ModalController::new(
        Arc::new(config),
        identity,
        Arc::new(LoggingSubmitter),
        Arc::new(AlertNotifier),
        Box::new(move || close_flag.store(false, Ordering::SeqCst)),
    );

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();

        match command {
            "" => continue,
            "quit" | "exit" => break,
            "help" => println!("{}", HELP),
            "ask" => {
                is_open.store(true, Ordering::SeqCst);
                print_view(modal.render(true));
            }
            _ if !is_open.load(Ordering::SeqCst) => {
                println!("The modal is closed. Type 'ask' to compose a question.");
            }
            "title" => {
                modal.set_title(rest);
                print_view(modal.render(true));
            }
            "details" => {
                modal.set_details(rest);
                print_view(modal.render(true));
            }
            "tag" => match modal.toggle_tag(rest) {
                Ok(_) => print_view(modal.render(true)),
                Err(e) => println!("{}", e),
            },
            "attach" => {
                let mut candidates = Vec::new();
                for path in rest.split_whitespace() {
                    match load_candidate(&PathBuf::from(path)) {
                        Ok(candidate) => candidates.push(candidate),
                        Err(e) => println!("{}", e),
                    }
                }
                modal.stage_files(candidates);
                print_view(modal.render(true));
            }
            "remove" => {
                let id = rest
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|i| modal.draft().attachments().iter().nth(i).map(|f| f.id()));
                match id {
                    Some(id) => {
                        modal.remove_file(id);
                        print_view(modal.render(true));
                    }
                    None => println!("No staged file number '{}'.", rest),
                }
            }
            "show" => print_view(modal.render(is_open.load(Ordering::SeqCst))),
            "submit" => {
                if !modal.can_submit() {
                    println!("A submission is already in progress.");
                    continue;
                }
                modal.submit().await?;
                print_view(modal.render(is_open.load(Ordering::SeqCst)));
            }
            "cancel" => modal.cancel(),
            other => println!("Unknown command '{}'. Type 'help'.", other),
        }
    }

    Ok(())
}

fn print_view(view: Option<ModalView<'_>>) {
    let Some(view) = view else {
        return;
    };

    println!("--- Ask a Question ---");
    println!("Title:   {} ({})", view.title, view.title_counter);
    println!("Details: {} ({})", view.details, view.details_counter);

    let tags: Vec<String> = view
        .tags
        .iter()
        .map(|chip| {
            if chip.selected {
                format!("[x] {}", chip.label)
            } else {
                format!("[ ] {}", chip.label)
            }
        })
        .collect();
    println!("Tags:    {}", tags.join("  "));

    if view.attachments.is_empty() {
        println!("Files:   none (accepts {})", view.accept);
    } else {
        for (i, row) in view.attachments.iter().enumerate() {
            println!("Files:   {}. {} ({} bytes)", i + 1, row.name, row.size_bytes);
        }
    }

    if !view.submit_enabled {
        println!("(submitting...)");
    }
}
