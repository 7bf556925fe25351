//! Interactive console front-end for the batch release pipeline.
//!
//! Drives one session from stdin:
//!   audio <path>      upload an audio file
//!   image <path>      upload an image
//!   archive <path>    upload a zip with both
//!   template <title>|<description>|<tag,tag,...>
//!   template clear
//!   /process, /daily, /every_other_day, /weekly, /cancel

use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use bcast_media::FfmpegAssembler;
use bcast_models::{SessionId, UploadTemplate};
use bcast_publish::{DryRunPublisher, FileCredentialStore};
use bcast_session::{SessionConfig, SessionIntent, SessionReply, SessionService};
use bcast_store::UnzipExtractor;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = SessionConfig::from_env();
    info!("Starting console session (work dir: {})", config.work_dir.display());

    let assembler =
        FfmpegAssembler::new(config.frame).with_mux_timeout(config.mux_timeout_secs);
    let publisher = DryRunPublisher::new().with_credential_store(Arc::new(
        FileCredentialStore::new(config.credentials_path.clone()),
    ));
    let service = SessionService::new(
        config,
        Arc::new(assembler),
        Arc::new(UnzipExtractor),
        Arc::new(publisher),
    );

    let session_id = SessionId::new();
    render(&service.handle(&session_id, SessionIntent::Start).await);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some(intent) = parse_line(line) else {
            println!("Unrecognized input: {line}");
            continue;
        };
        render(&service.handle(&session_id, intent).await);

        if service.session_state(&session_id).await.is_none() {
            break;
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn parse_line(line: &str) -> Option<SessionIntent> {
    if line.starts_with('/') {
        return Some(SessionIntent::Text(line.to_string()));
    }

    let (verb, rest) = line.split_once(' ')?;
    let rest = rest.trim();
    match verb {
        "audio" => Some(SessionIntent::AudioUpload {
            path: PathBuf::from(rest),
            original_name: file_name(rest)?,
        }),
        "image" => Some(SessionIntent::ImageUpload {
            path: PathBuf::from(rest),
            original_name: file_name(rest)?,
        }),
        "archive" => Some(SessionIntent::ArchiveUpload {
            path: PathBuf::from(rest),
        }),
        "template" if rest == "clear" => Some(SessionIntent::ClearTemplate),
        "template" => {
            let mut parts = rest.splitn(3, '|');
            let title = parts.next()?.trim().to_string();
            let description = parts.next()?.trim().to_string();
            let tags = UploadTemplate::parse_tags(parts.next().unwrap_or(""));
            Some(SessionIntent::SetTemplate(UploadTemplate {
                title,
                description,
                tags,
            }))
        }
        _ => None,
    }
}

fn file_name(path: &str) -> Option<String> {
    PathBuf::from(path)
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
}

fn render(replies: &[SessionReply]) {
    for reply in replies {
        println!("{}", reply.text);
        if !reply.options.is_empty() {
            println!("  [{}]", reply.options.join("  "));
        }
    }
}
