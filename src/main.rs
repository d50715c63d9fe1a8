use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tagdrift::config::{self, Settings};
use tagdrift::forge::cache::Cache;
use tagdrift::forge::client::ForgeClient;
use tagdrift::forge::provider::RepoProvider;
use tagdrift::registry::RegistryClient;
use tagdrift::report::filter;
use tagdrift::report::merge::{self, FieldValue, MergePolicy, MergedRecord, MissingReason};

#[derive(Parser)]
#[command(name = "tagdrift")]
#[command(version, about = "Reports drift between registry versions and forge release tags")]
struct Cli {
    /// Only report this package
    package: Option<String>,

    /// One row per repository instead of one per published package
    #[arg(short, long)]
    all: bool,

    /// Only rows whose version and tag disagree
    #[arg(short, long)]
    mismatch: bool,

    /// Base URL of the source-hosting service
    #[arg(long)]
    forge_url: Option<String>,

    /// Base URL of the package registry
    #[arg(long)]
    registry_url: Option<String>,

    /// Forge API version segment
    #[arg(long, default_value = config::DEFAULT_API_VERSION)]
    api_version: String,

    /// Colon-separated organizations, highest precedence first
    #[arg(long = "org", value_delimiter = ':')]
    organizations: Vec<String>,

    /// Skip TLS certificate verification
    #[arg(long)]
    no_ssl_verify: bool,

    /// Cache lifetime in seconds
    #[arg(long, default_value_t = config::DEFAULT_CACHE_TTL_SECS)]
    cache_ttl: u64,

    /// Suppress the header row
    #[arg(long)]
    no_header: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let settings = Settings::new(
        cli.forge_url.clone().unwrap_or_default(),
        cli.registry_url.clone().unwrap_or_default(),
        cli.api_version.clone(),
        !cli.no_ssl_verify,
        cli.organizations.clone(),
        Duration::from_secs(cli.cache_ttl),
        config::default_cache_dir(),
    )?;

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(run(&cli, &settings))
}

async fn run(cli: &Cli, settings: &Settings) -> anyhow::Result<()> {
    let cache = Cache::new(settings.cache_dir.clone(), settings.cache_ttl);
    let client = ForgeClient::new(settings);
    let provider = RepoProvider::new(cache, client, settings.host());

    // Aggregation is last-write-wins, so reversing makes the first-listed
    // organization take precedence.
    let ordered: Vec<String> = settings.organizations.iter().rev().cloned().collect();
    let repositories = provider.aggregate(&ordered).await?;

    let packages = RegistryClient::new(&settings.registry_url)
        .latest_versions()
        .await?;

    let policy = if cli.all {
        MergePolicy::Union
    } else {
        MergePolicy::VersionDriven
    };
    let mut records = merge::reconcile(&repositories, &packages, policy);

    if let Some(name) = &cli.package {
        records = filter::by_name(records, name);
    }
    if cli.mismatch {
        records = filter::mismatches(records);
    }

    print_table(&records, policy, cli.no_header);
    Ok(())
}

fn print_table(records: &[MergedRecord], policy: MergePolicy, no_header: bool) {
    if !no_header {
        println!(
            "{:<30} {:<16} {:<50} {:<16}",
            "Package", "Version", "Source", "Tag"
        );
    }
    for record in records {
        println!(
            "{:<30} {:<16} {:<50} {:<16}",
            record.name,
            record.latest_package_version.as_deref().unwrap_or(""),
            render_field(&record.source_url, policy),
            render_field(&record.latest_repo_tag, policy),
        );
    }
}

/// Display strings for absent fields live here, not in the data model. The
/// union policy lists unpublished repositories on purpose, so absence is
/// unremarkable there; the version-driven policy surfaces it loudly.
fn render_field(field: &FieldValue, policy: MergePolicy) -> String {
    match field {
        FieldValue::Present(value) => value.clone(),
        FieldValue::Missing(_) if policy == MergePolicy::Union => "n/a".to_string(),
        FieldValue::Missing(MissingReason::RepositoryNotFound) => {
            "ERROR: repository not found".to_string()
        }
        FieldValue::Missing(MissingReason::NoTags) => "ERROR: no tags".to_string(),
    }
}
