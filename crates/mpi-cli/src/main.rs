//! mpi: command-line client for the missing-person recognition backend.
//!
//! Set MPI_API_URL (or API_URL). Operator commands need MPI_ADMIN_EMAIL and
//! MPI_ADMIN_PASSWORD configured, and the same pair passed with --email/--password.

use anyhow::Context;
use clap::{Parser, Subcommand};
use mpi_api_client::ApiClient;
use mpi_cli::{image_output_path, init_tracing, load_footage, progress_line};
use mpi_coordinator::{
    AdminSession, Catalog, CatalogSynchronizer, ProgressTracker, RecordDeleter, ReportSubmitter,
    SearchCoordinator, SimulatedProgress, StaticCredentials, UploadCoordinator, UploadForm,
};
use mpi_core::models::{
    MissingPersonReport, OpenSearch, PhotoFile, SearchResult, TargetedSearch, TimeWindow,
};
use mpi_core::ClientConfig;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "mpi", about = "Missing-person intelligence client")]
struct Cli {
    /// Operator email for admin commands
    #[arg(long, global = true, env = "MPI_EMAIL")]
    email: Option<String>,
    /// Operator password for admin commands
    #[arg(long, global = true, env = "MPI_PASSWORD", hide_env_values = true)]
    password: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload CCTV footage files (operator)
    Upload {
        /// Video files to upload, sent one after another. The whole batch is read
        /// into memory before the first request
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long)]
        department: String,
        #[arg(long)]
        location: String,
        /// Capture window: 1hour, 2hours or 3hours
        #[arg(long, default_value = "2hours")]
        time_window: TimeWindow,
    },
    /// List uploaded footage
    Videos {
        /// Only footage available to the open search
        #[arg(long)]
        available: bool,
    },
    /// List reported missing persons, or show one record
    Persons {
        /// Show a single record (operator)
        #[arg(long, conflicts_with = "public")]
        id: Option<String>,
        /// Use the public reporting listing instead of the operator one
        #[arg(long)]
        public: bool,
    },
    /// Show search history, optionally for one person
    History {
        #[arg(long)]
        person: Option<String>,
    },
    /// Delete a video (operator)
    DeleteVideo { id: String },
    /// Delete a missing-person record (operator)
    DeletePerson { id: String },
    /// Search all available footage for a person
    Search {
        /// Photo of the person to look for
        #[arg(long)]
        photo: PathBuf,
        #[arg(long)]
        shirt: String,
        #[arg(long)]
        pant: Option<String>,
        /// Where to write the matched frame (file or directory)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Search one video for one reported person (operator)
    AdminSearch {
        #[arg(long)]
        person: String,
        #[arg(long)]
        video: String,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Report a missing person
    Report {
        #[arg(long)]
        photo: PathBuf,
        #[arg(long)]
        name: String,
        #[arg(long)]
        shirt: String,
        #[arg(long)]
        pant: Option<String>,
        #[arg(long, default_value = "")]
        age: String,
        #[arg(long, default_value = "")]
        gender: String,
        #[arg(long, default_value = "")]
        last_seen: String,
        #[arg(long, default_value = "")]
        height: String,
        #[arg(long, default_value = "")]
        notes: String,
        #[arg(long, default_value = "")]
        contact: String,
    },
    /// Download the reported photo of a missing person (operator)
    PersonPhoto {
        id: String,
        #[arg(long)]
        output: PathBuf,
    },
    /// Check backend health
    Health,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

fn login(
    email: Option<&str>,
    password: Option<&str>,
    config: &ClientConfig,
) -> anyhow::Result<AdminSession> {
    let (Some(email), Some(password)) = (email, password) else {
        anyhow::bail!("This command requires --email and --password (or MPI_EMAIL / MPI_PASSWORD)");
    };
    let session = StaticCredentials::from_config(config)
        .authenticate(email, password)
        .context("Operator login failed")?;
    Ok(session)
}

/// Print the result as JSON and write the matched frame when asked to.
fn report_search(result: Option<SearchResult>, output: Option<&Path>) -> anyhow::Result<()> {
    let Some(result) = result else {
        anyhow::bail!("Another search is already running");
    };

    let mut saved_to = None;
    if let (SearchResult::Match(details), Some(output)) = (&result, output) {
        let path = image_output_path(output, &details.result_id, details.image.extension());
        details
            .image
            .save_to(&path)
            .with_context(|| format!("Write matched frame to {}", path.display()))?;
        saved_to = Some(path.display().to_string());
    }

    print_json(&serde_json::json!({ "result": result, "image_path": saved_to }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = ClientConfig::from_env().context(
        "Invalid configuration. Check MPI_API_URL (or API_URL) and the MPI_* settings",
    )?;
    tracing::debug!(api_url = %config.api_url, "Configuration loaded");
    let client = Arc::new(ApiClient::from_config(&config).context("Failed to create API client")?);

    let email = cli.email.as_deref();
    let password = cli.password.as_deref();
    let catalog = Catalog::new();
    let synchronizer = CatalogSynchronizer::new(client.clone(), catalog.clone());

    match cli.command {
        Commands::Upload {
            files,
            department,
            location,
            time_window,
        } => {
            let session = login(email, password, &config)?;
            let selected = load_footage(&files)?;

            let progress = Arc::new(SimulatedProgress::new(config.progress.clone()));
            let coordinator = UploadCoordinator::new(
                client.clone(),
                catalog.clone(),
                progress.clone(),
                config.settle_delay,
                &session,
            );

            let printer = {
                let progress = progress.clone();
                let interval = config.progress.interval;
                tokio::spawn(async move {
                    let mut ticker = tokio::time::interval(interval);
                    loop {
                        ticker.tick().await;
                        for (file, percent) in progress.snapshot().await {
                            eprintln!("{}", progress_line(&file, percent));
                        }
                    }
                })
            };

            let form = UploadForm::new(department, location).with_time_window(time_window);
            let report = coordinator.upload(selected, &form).await;
            printer.abort();
            let report = report?;

            let failed: Vec<_> = report
                .failed()
                .map(|(file, err)| serde_json::json!({ "file": file, "error": err.to_string() }))
                .collect();
            print_json(&serde_json::json!({
                "summary": report.summary(),
                "uploaded": report.succeeded().collect::<Vec<_>>(),
                "failed": failed,
            }))?;
        }
        Commands::Videos { available } => {
            let videos = if available {
                client.list_available_videos().await?
            } else {
                client.list_videos().await?
            };
            print_json(&videos)?;
        }
        Commands::Persons { id: Some(id), .. } => {
            login(email, password, &config)?;
            print_json(&client.missing_person(&id).await?)?;
        }
        Commands::Persons { id: None, public } => {
            let persons = if public {
                client.list_reported_persons().await?
            } else {
                client.list_missing_persons().await?
            };
            print_json(&persons)?;
        }
        Commands::History { person } => match person {
            Some(person_id) => print_json(&client.person_search_history(&person_id).await?)?,
            None => print_json(&client.list_search_history().await?)?,
        },
        Commands::DeleteVideo { id } => {
            let session = login(email, password, &config)?;
            RecordDeleter::new(client.clone(), catalog.clone(), &session)
                .delete_video(&id)
                .await?;
            print_json(
                &serde_json::json!({ "success": true, "message": format!("Video {} deleted", id) }),
            )?;
        }
        Commands::DeletePerson { id } => {
            let session = login(email, password, &config)?;
            RecordDeleter::new(client.clone(), catalog.clone(), &session)
                .delete_missing_person(&id)
                .await?;
            print_json(&serde_json::json!({
                "success": true,
                "message": format!("Missing person {} deleted", id)
            }))?;
        }
        Commands::Search {
            photo,
            shirt,
            pant,
            output,
        } => {
            let photo = PhotoFile::from_path(&photo)
                .with_context(|| format!("Read photo {}", photo.display()))?;
            synchronizer
                .sync_available_videos()
                .await
                .context("Failed to load available footage")?;

            let coordinator = SearchCoordinator::new(client.clone(), synchronizer);
            let result = coordinator
                .search_open(OpenSearch {
                    photo,
                    shirt_color: shirt,
                    pant_color: pant,
                })
                .await?;
            report_search(result, output.as_deref())?;
        }
        Commands::AdminSearch {
            person,
            video,
            output,
        } => {
            let session = login(email, password, &config)?;
            synchronizer
                .sync()
                .await
                .context("Failed to load the catalog")?;

            let coordinator =
                SearchCoordinator::new(client.clone(), synchronizer).with_admin(&session);
            let result = coordinator
                .search_targeted(TargetedSearch {
                    person_id: person,
                    video_id: video,
                })
                .await?;
            report_search(result, output.as_deref())?;
        }
        Commands::Report {
            photo,
            name,
            shirt,
            pant,
            age,
            gender,
            last_seen,
            height,
            notes,
            contact,
        } => {
            let photo = PhotoFile::from_path(&photo)
                .with_context(|| format!("Read photo {}", photo.display()))?;
            let mut report = MissingPersonReport::new(photo, name, shirt);
            report.pant_color = pant;
            report.age = age;
            report.gender = gender;
            report.last_seen_location = last_seen;
            report.height = height;
            report.additional_notes = notes;
            report.contact_info = contact;

            let receipt = ReportSubmitter::new(client.clone()).submit(&report).await?;
            print_json(&receipt)?;
        }
        Commands::PersonPhoto { id, output } => {
            login(email, password, &config)?;
            let image = client.missing_person_photo(&id).await?;
            let path = image_output_path(&output, &id, image.extension());
            image
                .save_to(&path)
                .with_context(|| format!("Write photo to {}", path.display()))?;
            print_json(&serde_json::json!({
                "person_id": id,
                "bytes": image.len(),
                "content_type": image.content_type(),
                "path": path.display().to_string(),
            }))?;
        }
        Commands::Health => {
            print_json(&client.health().await?)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn help_is_handled_by_the_parser() {
        let err = match Cli::try_parse_from(["mpi", "--help"]) {
            Ok(_) => panic!("--help should not parse into a command"),
            Err(err) => err,
        };
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn persons_flags() {
        let cli = Cli::try_parse_from(["mpi", "persons", "--id", "person_1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Persons { id: Some(ref id), public: false } if id == "person_1"
        ));

        let cli = Cli::try_parse_from(["mpi", "persons", "--public"]).unwrap();
        assert!(matches!(cli.command, Commands::Persons { id: None, public: true }));

        assert!(Cli::try_parse_from(["mpi", "persons", "--id", "p", "--public"]).is_err());
    }

    #[test]
    fn upload_requires_files() {
        let args = ["mpi", "upload", "--department", "PD1", "--location", "Main St"];
        let err = match Cli::try_parse_from(args) {
            Ok(_) => panic!("upload without files should not parse"),
            Err(err) => err,
        };
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }
}
