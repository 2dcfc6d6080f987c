//! Command dispatch

use crate::cli::{AddonsCommand, Command, ExportCommand, FilesCommand, TrashCommand};
use amber_client::{AmberClient, CreateExportRequest, Outcome};
use serde::Serialize;
use std::process::ExitCode;

/// What a command produced and where it goes
#[derive(Debug, PartialEq, Eq)]
pub enum Rendered {
    Stdout(String),
    Stderr(String),
}

impl Rendered {
    /// Print and pick the exit code
    pub fn print(self) -> ExitCode {
        match self {
            Self::Stdout(text) => {
                println!("{}", text);
                ExitCode::SUCCESS
            }
            Self::Stderr(text) => {
                eprintln!("error: {}", text);
                ExitCode::FAILURE
            }
        }
    }
}

fn render<T: Serialize>(outcome: Outcome<T>) -> anyhow::Result<Rendered> {
    match outcome {
        Outcome::Data(_) => Ok(Rendered::Stdout(serde_json::to_string_pretty(&outcome)?)),
        Outcome::Error(err) => {
            tracing::debug!(error = ?err, "Command failed");
            Ok(Rendered::Stderr(err.message()))
        }
    }
}

/// Run one command against the API
pub async fn run(client: &AmberClient, command: Command) -> anyhow::Result<Rendered> {
    match command {
        Command::Info => render(client.get_storage_info().await),
        Command::Files { command } => match command {
            FilesCommand::List(args) => render(client.get_files(&args.into()).await),
            FilesCommand::Get { id } => render(client.get_file(&id).await),
            FilesCommand::Delete { id } => render(client.delete_file(&id).await),
            FilesCommand::Restore { id } => render(client.restore_file(&id).await),
        },
        Command::Trash { command } => match command {
            TrashCommand::List => render(client.get_trash().await),
            TrashCommand::Empty => render(client.empty_trash().await),
            TrashCommand::Delete { id } => render(client.permanently_delete_file(&id).await),
        },
        Command::Export { command } => match command {
            ExportCommand::Create {
                export_type,
                filters,
            } => {
                let request = filters
                    .into_iter()
                    .fold(CreateExportRequest::new(export_type), |req, (k, v)| {
                        req.with_filter(k, v)
                    });
                render(client.create_export(&request).await)
            }
            ExportCommand::Status { id } => render(client.get_export(&id).await),
            ExportCommand::Download { id } => render(client.get_export_download(&id).await),
        },
        Command::Addons { command } => match command {
            AddonsCommand::List => render(client.get_addons().await),
            AddonsCommand::Purchase { addon_type } => {
                render(client.purchase_addon(&addon_type).await)
            }
            AddonsCommand::Cancel { id } => render(client.cancel_addon(&id).await),
        },
        Command::DownloadUrl { key } => Ok(Rendered::Stdout(client.download_url(&key))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use amber_client::Config;
    use clap::Parser;
    use serde_json::{json, Value};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn run_args(server: &MockServer, argv: &[&str]) -> Rendered {
        let args = Args::try_parse_from(argv).unwrap();
        let client = AmberClient::new(Config::new(server.uri())).unwrap();
        run(&client, args.command).await.unwrap()
    }

    #[tokio::test]
    async fn test_prints_data_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/storage/trash"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "files": [], "total_size": 0 })),
            )
            .mount(&server)
            .await;

        let Rendered::Stdout(text) = run_args(&server, &["amber", "trash", "list"]).await else {
            panic!("Expected stdout");
        };
        let printed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(printed, json!({ "data": { "files": [], "total_size": 0 } }));
    }

    #[tokio::test]
    async fn test_reports_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/storage/addons"))
            .and(body_json(json!({ "addon_type": "extra_1tb" })))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({ "error": "Unknown add-on" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let rendered = run_args(&server, &["amber", "addons", "purchase", "extra_1tb"]).await;
        assert_eq!(rendered, Rendered::Stderr("Unknown add-on".to_string()));
    }

    #[tokio::test]
    async fn test_export_create_sends_filters() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/storage/export"))
            .and(body_json(json!({ "type": "ivy", "filters": { "year": "2024" } })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "export_id": "exp_3", "status": "pending" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let rendered = run_args(
            &server,
            &["amber", "export", "create", "--type", "ivy", "--filter", "year=2024"],
        )
        .await;
        assert!(matches!(rendered, Rendered::Stdout(_)));
    }

    #[tokio::test]
    async fn test_download_url_is_offline() {
        let server = MockServer::start().await;

        let rendered = run_args(&server, &["amber", "download-url", "a b/c"]).await;

        assert_eq!(
            rendered,
            Rendered::Stdout(format!("{}/api/storage/download/a%20b%2Fc", server.uri()))
        );
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
