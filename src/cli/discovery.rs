//! Catalog and discovery document commands.

use std::sync::Arc;

use clap::Subcommand;
use serde::Serialize;
use serde_json::Value;

use crate::config::Config;
use crate::discovery::{DiscoveryDocument, DiscoveryLoader, ReqwestClient};
use crate::registry::{DiscoveryCatalog, ServiceDescriptor};

#[derive(Subcommand, Debug, Clone)]
pub enum DiscoveryCommand {
    /// List services in the catalog
    List {
        /// Only show preferred versions
        #[arg(short, long)]
        preferred: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show a service's catalog entry
    Info {
        /// Service id (e.g. "drive:v3")
        service: String,
    },

    /// Search the catalog by name, title or description
    Search {
        /// Search terms
        query: String,
    },

    /// Fetch a discovery document and summarize it
    Fetch {
        /// Service id or discovery document URL
        target: String,

        /// Print the raw document JSON
        #[arg(long)]
        raw: bool,
    },

    /// List every endpoint in a discovery document
    Endpoints {
        /// Service id or discovery document URL
        target: String,
    },

    /// Find the endpoint that handles a concrete request URL
    Find {
        /// Service id or discovery document URL
        target: String,

        /// Request URL to match (e.g. "https://www.googleapis.com/drive/v3/files/abc")
        url: String,
    },
}

#[derive(Debug, Serialize)]
struct ServiceRow<'a> {
    id: &'a str,
    title: &'a str,
    preferred: bool,
    discovery_url: Option<&'a str>,
}

impl<'a> ServiceRow<'a> {
    fn new(id: &'a str, descriptor: &'a ServiceDescriptor) -> Self {
        let str_field = |key: &str| descriptor.get(key).and_then(Value::as_str);
        Self {
            id,
            title: str_field("title").unwrap_or(""),
            preferred: descriptor
                .get("preferred")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            discovery_url: str_field("discoveryRestUrl"),
        }
    }
}

/// Run a discovery command.
pub async fn run_discovery_command(cmd: DiscoveryCommand, config: &Config) -> anyhow::Result<()> {
    let catalog = DiscoveryCatalog::load_or_bundled(config.catalog.path.as_deref())?;

    match cmd {
        DiscoveryCommand::List { preferred, json } => cmd_list(&catalog, preferred, json),
        DiscoveryCommand::Info { service } => cmd_info(&catalog, &service),
        DiscoveryCommand::Search { query } => cmd_search(&catalog, &query),
        DiscoveryCommand::Fetch { target, raw } => {
            let doc = fetch(&catalog, config, &target).await?;
            cmd_fetch(&doc, raw)
        }
        DiscoveryCommand::Endpoints { target } => {
            let doc = fetch(&catalog, config, &target).await?;
            cmd_endpoints(&doc)
        }
        DiscoveryCommand::Find { target, url } => {
            let doc = fetch(&catalog, config, &target).await?;
            cmd_find(&doc, &url)
        }
    }
}

/// A target that looks like a URL is fetched directly; anything else is a
/// catalog service id.
fn resolve_target<'a>(catalog: &'a DiscoveryCatalog, target: &'a str) -> anyhow::Result<&'a str> {
    if target.starts_with("http://") || target.starts_with("https://") {
        Ok(target)
    } else {
        Ok(catalog.discovery_url(target)?)
    }
}

async fn fetch(
    catalog: &DiscoveryCatalog,
    config: &Config,
    target: &str,
) -> anyhow::Result<DiscoveryDocument> {
    let url = resolve_target(catalog, target)?;
    let client = ReqwestClient::new(&config.http)?;
    let loader = DiscoveryLoader::new(Arc::new(client));

    tracing::info!(requested = target, url, "Loading discovery document");
    Ok(loader.load(url).await?)
}

fn cmd_list(catalog: &DiscoveryCatalog, preferred_only: bool, json: bool) -> anyhow::Result<()> {
    let rows: Vec<ServiceRow<'_>> = catalog
        .items()?
        .into_iter()
        .map(|(id, descriptor)| ServiceRow::new(id, descriptor))
        .filter(|row| !preferred_only || row.preferred)
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No services found.");
        return Ok(());
    }

    println!("{:<28} TITLE", "SERVICE");
    println!("{}", "-".repeat(60));
    for row in &rows {
        let marker = if row.preferred { "" } else { " (not preferred)" };
        println!("{:<28} {}{}", row.id, row.title, marker);
    }
    println!("\n{} service(s).", rows.len());

    Ok(())
}

fn cmd_info(catalog: &DiscoveryCatalog, service: &str) -> anyhow::Result<()> {
    let descriptor = catalog.get_strict(service)?;
    println!("{}", serde_json::to_string_pretty(descriptor)?);
    Ok(())
}

fn cmd_search(catalog: &DiscoveryCatalog, query: &str) -> anyhow::Result<()> {
    let results = catalog.search(query)?;
    if results.is_empty() {
        println!("No services match '{}'.", query);
        return Ok(());
    }

    for (id, descriptor) in results {
        let row = ServiceRow::new(id, descriptor);
        println!("{:<28} {}", row.id, row.title);
    }
    Ok(())
}

fn cmd_fetch(doc: &DiscoveryDocument, raw: bool) -> anyhow::Result<()> {
    if raw {
        println!("{}", serde_json::to_string_pretty(doc.as_json())?);
        return Ok(());
    }

    println!("{}", doc.api_name().unwrap_or("(untitled)"));
    if let Ok(link) = doc.doc_link() {
        println!("  Docs: {}", link);
    }
    println!("  Base URL: {}", doc.base_url());

    let endpoints = doc.endpoints()?;
    println!("  Endpoints: {}", endpoints.len());
    println!("  Distinct URLs: {}", doc.urls()?.len());

    Ok(())
}

fn cmd_endpoints(doc: &DiscoveryDocument) -> anyhow::Result<()> {
    for endpoint in doc.endpoints()? {
        println!("{:<7} {}", endpoint.http_method(), endpoint.url());
    }
    Ok(())
}

fn cmd_find(doc: &DiscoveryDocument, url: &str) -> anyhow::Result<()> {
    let Some(endpoint) = doc.find_endpoint(url)? else {
        anyhow::bail!("No endpoint in {} matches {}", doc.api_name().unwrap_or("document"), url);
    };

    println!("{} {}", endpoint.http_method(), endpoint.url());
    if let Some(id) = endpoint.id() {
        println!("  Id: {}", id);
    }
    if let Some(description) = endpoint.description() {
        println!("  {}", description);
    }
    Ok(())
}
