use askq_core::config::{resolve_config, submit_timeout_from_env_value};
use askq_core::identity::author_from_values;
use askq_core::validation::validate;
use askq_core::{
    Anonymous, ComposerConfig, IdentityProvider, LoggingSubmitter, ModalController, Notice,
    NoticeKind, Notifier, StaticIdentity, SubmitOutcome,
};
use askq_files::load_candidate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "askq")]
#[command(about = "Compose and submit community health questions")]
struct Cli {
    /// YAML composer configuration (falls back to ASKQ_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tags a question can carry
    Tags,
    /// Validate a question without submitting it
    Check(QuestionArgs),
    /// Validate and submit a question
    Submit {
        #[command(flatten)]
        question: QuestionArgs,
        /// Author id (falls back to ASKQ_AUTHOR_ID)
        #[arg(long)]
        author_id: Option<String>,
        /// Author display name (falls back to ASKQ_AUTHOR_NAME)
        #[arg(long)]
        author_name: Option<String>,
    },
}

#[derive(Args)]
struct QuestionArgs {
    /// Question title
    #[arg(long)]
    title: String,
    /// Additional context
    #[arg(long, default_value = "")]
    details: String,
    /// Tag to select (repeatable)
    #[arg(long = "tag")]
    tags: Vec<String>,
    /// File to attach (repeatable)
    #[arg(long = "file")]
    files: Vec<PathBuf>,
}

/// Prints notices to stderr. Stdout carries only command output, such as the payload JSON.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        let prefix = match notice.kind {
            NoticeKind::Success => "",
            NoticeKind::Blocked | NoticeKind::FileRejected => "warning: ",
            NoticeKind::Failure => "error: ",
        };
        eprintln!("{}{}", prefix, notice.message);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("askq=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .or_else(|| std::env::var("ASKQ_CONFIG").ok().map(PathBuf::from));
    let mut config = resolve_config(config_path)?;
    if let Some(timeout) =
        submit_timeout_from_env_value(std::env::var("ASKQ_SUBMIT_TIMEOUT_SECS").ok())?
    {
        config = config.with_submit_timeout(timeout);
    }

    match cli.command {
        Some(Commands::Tags) => {
            for tag in config.vocabulary().iter() {
                println!("{}", tag);
            }
        }
        Some(Commands::Check(question)) => {
            let mut modal = build_modal(config, Arc::new(Anonymous));
            fill(&mut modal, &question)?;

            let violations = validate(modal.draft(), modal.config().title_min_chars());
            if violations.is_empty() {
                println!("Question is ready to submit.");
            } else {
                eprintln!("{}", violations);
                std::process::exit(1);
            }
        }
        Some(Commands::Submit {
            question,
            author_id,
            author_name,
        }) => {
            let author = author_from_values(
                author_id.or_else(|| std::env::var("ASKQ_AUTHOR_ID").ok()),
                author_name.or_else(|| std::env::var("ASKQ_AUTHOR_NAME").ok()),
            )?;
            let identity: Arc<dyn IdentityProvider> = match author {
                Some(author) => Arc::new(StaticIdentity::new(author)),
                None => Arc::new(Anonymous),
            };

            let mut modal = build_modal(config, identity);
            fill(&mut modal, &question)?;

            match modal.submit().await? {
                SubmitOutcome::Submitted(payload) => {
                    println!("{}", payload.to_json_pretty()?);
                }
                SubmitOutcome::Blocked(_) | SubmitOutcome::Failed(_) => {
                    std::process::exit(1);
                }
            }
        }
        None => {
            println!("Use 'askq --help' for commands");
        }
    }

    Ok(())
}

fn build_modal(config: ComposerConfig, identity: Arc<dyn IdentityProvider>) -> ModalController {
    ModalController::new(
        Arc::new(config),
        identity,
        Arc::new(LoggingSubmitter),
        Arc::new(ConsoleNotifier),
        Box::new(|| tracing::debug!("modal closed")),
    )
}

fn fill(modal: &mut ModalController, question: &QuestionArgs) -> anyhow::Result<()> {
    modal.set_title(&question.title);
    modal.set_details(&question.details);

    for tag in &question.tags {
        if !modal.draft().tags().contains(tag) {
            modal.toggle_tag(tag)?;
        }
    }

    let candidates = question
        .files
        .iter()
        .map(|path| load_candidate(path))
        .collect::<Result<Vec<_>, _>>()?;
    modal.stage_files(candidates);

    Ok(())
}
