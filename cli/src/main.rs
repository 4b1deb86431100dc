mod config;
mod terminal;
mod transport;

use std::{fs, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use gateway_admin_core::controller::MIN_CONTENT_LEN;
use gateway_admin_core::resources::{CA_CERTIFICATE, ROUTES};
use gateway_admin_core::{
    AdminClient, Collaborators, EditController, FieldValue, Filter, Gateway, ListController,
    Navigator, RequestDescriptor, SubmitOutcome,
};
use tracing_subscriber::EnvFilter;

use crate::config::Settings;
use crate::terminal::TerminalView;
use crate::transport::ReqwestTransport;

#[derive(Parser, Debug)]
#[command(name = "gateway-admin", about = "Manage gateway resources through the admin API")]
struct Cli {
    /// Settings file (defaults to ./gateway-admin.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Admin API base URL, overrides the settings file and environment
    #[arg(long, global = true)]
    admin_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List routes
    Routes {
        /// Filter as key=value, repeatable
        #[arg(long = "filter", value_parser = parse_pair)]
        filters: Vec<(String, String)>,
        /// Page size
        #[arg(long)]
        size: Option<u32>,
        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Manage CA certificates
    Ca {
        #[command(subcommand)]
        command: CaCommand,
    },
}

#[derive(Subcommand, Debug)]
enum CaCommand {
    Show {
        id: String,
    },
    /// Create (id `__create__`) or update a CA certificate
    Save {
        id: String,
        #[arg(long)]
        cert_file: PathBuf,
        #[arg(long)]
        digest: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    Delete {
        id: String,
    },
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(url) = cli.admin_url {
        settings.admin_url = url;
    }
    init_tracing(&settings.log_filter);

    let transport = ReqwestTransport::new(Duration::from_secs(settings.timeout_secs))
        .context("failed to build HTTP client")?;
    let gateway = Gateway::new(AdminClient::new(&settings.admin_url), Arc::new(transport));

    match cli.command {
        Command::Routes {
            filters,
            size,
            pages,
        } => list_routes(gateway, filters, size, pages).await,
        Command::Ca { command } => match command {
            CaCommand::Show { id } => show_ca_certificate(gateway, &id).await,
            CaCommand::Save {
                id,
                cert_file,
                digest,
                tags,
            } => save_ca_certificate(gateway, &id, cert_file, digest, tags).await,
            CaCommand::Delete { id } => delete_ca_certificate(gateway, &id).await,
        },
    }
}

async fn list_routes(
    gateway: Gateway,
    filters: Vec<(String, String)>,
    size: Option<u32>,
    pages: u32,
) -> Result<()> {
    let view = Arc::new(TerminalView::new("/routes"));
    let mut list = ListController::new(ROUTES, gateway, Collaborators::shared(view));

    let mut filter = filters
        .into_iter()
        .fold(Filter::fields(), |filter, (key, value)| filter.with(key, value));
    if let Some(size) = size {
        filter = filter.with("size", size);
        list = list.with_page_size(size);
    }

    if !list.fetch(Some(&filter)).await {
        bail!("could not load routes");
    }
    for _ in 1..pages {
        if !list.fetch_next().await {
            break;
        }
    }

    for record in list.records() {
        println!(
            "{:<36}  {:<24}  {}",
            record.id().unwrap_or("-"),
            record.display_text,
            record.protocols
        );
    }
    if list.next_page().exists() {
        println!("more routes available (offset {})", list.next_page().offset);
    }
    Ok(())
}

/// An edit screen for an existing certificate, with its record loaded.
async fn load_ca_certificate(gateway: Gateway, id: &str, view: Arc<TerminalView>) -> Result<EditController> {
    let mut editor = EditController::new(CA_CERTIFICATE, id, gateway, Collaborators::shared(view));
    if editor.mode().is_create() {
        bail!("`{id}` is the create placeholder, not a certificate id");
    }
    if !editor.hydrate().await {
        bail!("could not load CA certificate {id}");
    }
    Ok(editor)
}

async fn show_ca_certificate(gateway: Gateway, id: &str) -> Result<()> {
    let view = Arc::new(TerminalView::new(&format!("/certificates/{id}")));
    let editor = load_ca_certificate(gateway, id, view).await?;

    let model = editor.model();
    for key in model.keys() {
        let rendered = match model.get(key) {
            Some(FieldValue::Text(text)) => text.clone(),
            Some(FieldValue::List(items)) => items.join(", "),
            Some(FieldValue::Nested(value)) => value.to_string(),
            None => String::new(),
        };
        println!("{key}: {rendered}");
    }
    Ok(())
}

async fn save_ca_certificate(
    gateway: Gateway,
    id: &str,
    cert_file: PathBuf,
    digest: Option<String>,
    tags: Vec<String>,
) -> Result<()> {
    let cert = fs::read_to_string(&cert_file)
        .with_context(|| format!("failed to read {}", cert_file.display()))?;

    let view = Arc::new(TerminalView::new(&format!("/certificates/{id}")));
    let mut editor = if id == CA_CERTIFICATE.sentinel {
        EditController::new(CA_CERTIFICATE, id, gateway, Collaborators::shared(view.clone()))
    } else {
        load_ca_certificate(gateway, id, view.clone()).await?
    };

    let model = editor.model_mut();
    model.set("cert", cert.trim());
    if let Some(digest) = digest {
        model.set("cert_digest", digest);
    }
    if !tags.is_empty() {
        model.set("tags", tags);
    }

    match editor.submit().await {
        SubmitOutcome::Invalid { field } => {
            bail!("{field} must be longer than {MIN_CONTENT_LEN} characters")
        }
        SubmitOutcome::Created { id } => {
            println!("id: {}", id.as_deref().unwrap_or("unknown"));
            Ok(())
        }
        SubmitOutcome::Updated => Ok(()),
        SubmitOutcome::Failed => Err(anyhow!("CA certificate was not saved")),
    }
}

async fn delete_ca_certificate(gateway: Gateway, id: &str) -> Result<()> {
    let view = Arc::new(TerminalView::new(&format!("/certificates/{id}")));
    load_ca_certificate(gateway.clone(), id, view.clone()).await?;

    let action = view
        .action("Delete")
        .context("no delete action was offered")?;
    let endpoint = action.endpoint.context("delete action has no endpoint")?;
    gateway
        .send(&RequestDescriptor::delete(endpoint))
        .await
        .with_context(|| format!("failed to delete {}", action.resource_label.as_deref().unwrap_or("resource")))?;

    println!("deleted {id}");
    view.navigate(&action.path);
    Ok(())
}
