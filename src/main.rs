use std::error::Error;
use std::sync::Arc;

use clap::Parser;
use colored::{ColoredString, Colorize};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fmsuit_cli::adapters::{BrowserAuthenticator, HttpCatalogSource};
use fmsuit_cli::cache;
use fmsuit_cli::cli::{Cli, Command};
use fmsuit_cli::config::ConfigFile;
use fmsuit_cli::controller::Initializer;
use fmsuit_cli::patch::{self, ChallengeUpdate, PatchOutcome};
use fmsuit_cli::paths::{DataPaths, SITE_URL};
use fmsuit_cli::status::{AppStatus, ChannelSink};
use fmsuit_cli::types::{ChallengeCatalog, ChallengeStatus, Difficulty, Plan};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let paths = match cli.data_dir {
        Some(root) => DataPaths::with_root(root),
        None => DataPaths::from_home(),
    };

    match cli.command {
        Command::List => {
            let catalog = run_engine(paths, false).await?;
            print_catalog(&catalog);
        }
        Command::Sync { force } => {
            let catalog = run_engine(paths, force).await?;
            println!(
                "{} catalog ready, {} challenges",
                "ok".green().bold(),
                catalog.challenges.len()
            );
        }
        Command::SetStatus { id, status } => set_status(&paths, id, &status)?,
        Command::Download { id } => download(&paths, id)?,
        Command::Paths => print_paths(&paths),
    }

    Ok(())
}

/// Wire the production adapters into the engine, render status transitions
/// and resolve the permission gate interactively.
async fn run_engine(paths: DataPaths, force: bool) -> Result<ChallengeCatalog, Box<dyn Error>> {
    let source = Arc::new(HttpCatalogSource::new(SITE_URL));
    let authenticator = Arc::new(BrowserAuthenticator::new(SITE_URL, paths.clone()));
    let mut initializer = Initializer::new(paths, authenticator, source);

    let (tx, mut rx) = mpsc::unbounded_channel();
    initializer.add_sink(Arc::new(ChannelSink::new(tx)));
    let gate = initializer.permission_gate();

    let ui = tokio::spawn(async move {
        while let Some(status) = rx.recv().await {
            match status {
                AppStatus::AwaitingPermission => {
                    let confirmed = tokio::task::spawn_blocking(|| {
                        dialoguer::Confirm::new()
                            .with_prompt("No active session. Open a browser to log in?")
                            .default(true)
                            .interact()
                    })
                    .await;
                    match confirmed {
                        Ok(Ok(true)) => gate.grant(),
                        _ => {
                            eprintln!("{}", "login declined, exiting".yellow());
                            std::process::exit(1);
                        }
                    }
                }
                AppStatus::Error => eprintln!("{} {}", "!!".red().bold(), status),
                other => println!("{} {}", "::".dimmed(), other.to_string().replace('_', " ")),
            }
        }
    });

    let result = if force {
        initializer.refresh().await
    } else {
        initializer.run().await
    };

    // Dropping the engine closes the status channel and ends the renderer.
    drop(initializer);
    let _ = ui.await;

    Ok(result?)
}

fn print_catalog(catalog: &ChallengeCatalog) {
    println!();
    println!(
        "{} {} challenges, updated {}",
        "catalog".bold(),
        catalog.challenges.len(),
        catalog.last_updated.format("%Y-%m-%d %H:%M")
    );
    println!();

    for challenge in &catalog.challenges {
        let marker = match challenge.status {
            ChallengeStatus::Completed => "done".green(),
            ChallengeStatus::Started => "wip ".cyan(),
            ChallengeStatus::NewStart => "new ".blue(),
            ChallengeStatus::Pending => "    ".normal(),
        };
        let new_flag = if challenge.is_new {
            format!(" {}", "new".bright_yellow())
        } else {
            String::new()
        };
        println!(
            "{} {} [{} | {}]{}",
            marker,
            challenge.title.bold(),
            plan_tag(challenge.plan),
            difficulty_tag(challenge.difficulty),
            new_flag
        );
        println!(
            "     {} {}",
            format!("#{}", challenge.id).dimmed(),
            challenge.languages.join(", ").dimmed()
        );
    }
}

fn plan_tag(plan: Plan) -> ColoredString {
    match plan {
        Plan::Free => "free".green(),
        Plan::FreePlus => "free+".blue(),
        Plan::Premium => "premium".yellow(),
    }
}

fn difficulty_tag(difficulty: Difficulty) -> ColoredString {
    match difficulty {
        Difficulty::Newbie => "newbie".green(),
        Difficulty::Junior => "junior".cyan(),
        Difficulty::Intermediate => "intermediate".yellow(),
        Difficulty::Advanced => "advanced".magenta(),
        Difficulty::Guru => "guru".red(),
    }
}

fn set_status(paths: &DataPaths, id: u64, raw: &str) -> Result<(), Box<dyn Error>> {
    let status: ChallengeStatus = raw.parse()?;
    match patch::patch(paths, id, ChallengeUpdate::Status(status))? {
        PatchOutcome::Updated => {
            println!("{} challenge {id} is now {status}", "ok".green().bold());
        }
        PatchOutcome::NoCache => {
            println!(
                "{} no local catalog yet, run `fmsuit list` first",
                "warning".yellow().bold()
            );
        }
        PatchOutcome::NotFound => {
            println!(
                "{} no challenge with id {id} in the catalog",
                "warning".yellow().bold()
            );
        }
    }
    Ok(())
}

fn download(paths: &DataPaths, id: u64) -> Result<(), Box<dyn Error>> {
    let catalog_path = paths.catalog_file();
    if !catalog_path.exists() {
        println!(
            "{} no local catalog yet, run `fmsuit list` first",
            "warning".yellow().bold()
        );
        return Ok(());
    }

    let catalog = cache::load_catalog(&catalog_path)?;
    let Some(challenge) = catalog.challenges.iter().find(|c| c.id == id) else {
        println!(
            "{} no challenge with id {id} in the catalog",
            "warning".yellow().bold()
        );
        return Ok(());
    };
    if challenge.download_link.is_empty() {
        return Err(format!("challenge {id} has no download link").into());
    }

    let config = ConfigFile::load(paths)?;
    std::fs::create_dir_all(&config.challenge_path)?;
    let name = challenge
        .slug()
        .map(str::to_string)
        .unwrap_or_else(|| format!("challenge-{id}"));
    let target = config.challenge_path.join(format!("{name}.zip"));

    println!("{} {}", "downloading".cyan().bold(), challenge.download_link);
    let response = ureq::get(&challenge.download_link).call()?;
    let mut reader = response.into_reader();
    let mut file = std::fs::File::create(&target)?;
    std::io::copy(&mut reader, &mut file)?;
    println!("{} saved to {}", "ok".green().bold(), target.display());

    if challenge.status == ChallengeStatus::Pending {
        patch::patch(paths, id, ChallengeUpdate::Status(ChallengeStatus::Started))?;
    }

    Ok(())
}

fn print_paths(paths: &DataPaths) {
    let mark = |exists: bool| if exists { "present".green() } else { "absent".dimmed() };
    println!("data dir  {}", paths.root().display());
    println!(
        "session   {} ({})",
        paths.session_file().display(),
        mark(paths.session_file().exists())
    );
    println!(
        "catalog   {} ({})",
        paths.catalog_file().display(),
        mark(paths.catalog_file().exists())
    );
    println!(
        "config    {} ({})",
        paths.config_file().display(),
        mark(paths.config_file().exists())
    );
}
