//! API registration CLI commands
//!
//! `apply` and `delete` reconcile; `plan`, `list` and `get` only read.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::client::GatewayClient;
use super::output::{self, OutputFormat, ReportFormat};
use crate::domain::{ApiRecord, ApiSpec, ApiSummary, Intent, Outcome};
use crate::reconcile::{ensure_absent, ensure_present, ApiLookup, Reconciler};

#[derive(Subcommand)]
pub enum ApiCommands {
    /// Register an API, or update it if it differs from the spec
    Apply {
        #[command(flatten)]
        spec: SpecArgs,

        /// Output format (json or yaml)
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Json)]
        output: ReportFormat,
    },

    /// Show what `apply` would do without changing the gateway
    Plan {
        #[command(flatten)]
        spec: SpecArgs,

        /// Output format (json or yaml)
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Json)]
        output: ReportFormat,
    },

    /// Remove a registered API by name
    Delete {
        /// API name
        name: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Output format (json or yaml)
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Json)]
        output: ReportFormat,
    },

    /// List registered APIs
    List {
        /// Output format (json, yaml, or table)
        #[arg(short, long, default_value = "table")]
        output: OutputFormat,
    },

    /// Show a registered API by name or id
    Get {
        /// API name or id
        name_or_id: String,

        /// Output format (json, yaml, or table)
        #[arg(short, long, default_value = "json")]
        output: OutputFormat,
    },
}

/// Desired state, either from a file or from flags
#[derive(Args, Debug, Clone, Default)]
pub struct SpecArgs {
    /// YAML or JSON file with the API spec
    #[arg(
        short,
        long,
        conflicts_with_all = ["name", "upstream_url", "hosts", "uris", "strip_uri", "preserve_host"]
    )]
    pub file: Option<PathBuf>,

    /// API name (unique key on the gateway)
    #[arg(long, required_unless_present = "file")]
    pub name: Option<String>,

    /// Upstream URL the gateway proxies to
    #[arg(long, required_unless_present = "file")]
    pub upstream_url: Option<String>,

    /// Host to route (repeatable or comma separated)
    #[arg(long, value_delimiter = ',')]
    pub hosts: Vec<String>,

    /// URI prefix to route (repeatable or comma separated)
    #[arg(long, value_delimiter = ',')]
    pub uris: Vec<String>,

    /// Strip the matched URI prefix before proxying
    #[arg(long)]
    pub strip_uri: bool,

    /// Forward the client's Host header upstream
    #[arg(long)]
    pub preserve_host: bool,
}

impl SpecArgs {
    /// Build the desired spec from the file or the flags
    pub fn into_spec(self) -> Result<ApiSpec> {
        if let Some(file) = self.file {
            return load_spec(&file);
        }

        let name = self.name.context("--name is required without --file")?;
        let upstream_url = self.upstream_url.context("--upstream-url is required without --file")?;

        let mut spec = ApiSpec::new(name, upstream_url)
            .with_strip_uri(self.strip_uri)
            .with_preserve_host(self.preserve_host);
        if !self.hosts.is_empty() {
            spec = spec.with_hosts(self.hosts);
        }
        if !self.uris.is_empty() {
            spec = spec.with_uris(self.uris);
        }

        Ok(spec)
    }
}

/// Read a spec from a YAML or JSON file
pub fn load_spec(file: &Path) -> Result<ApiSpec> {
    let contents = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read file: {}", file.display()))?;

    // YAML is a superset of JSON
    serde_yaml::from_str(&contents)
        .with_context(|| format!("Failed to parse API spec from file: {}", file.display()))
}

/// What `plan` reports
#[derive(Debug, Serialize)]
pub struct PlanReport {
    pub action: &'static str,
    /// Whether `apply` would mutate the gateway
    pub changes: bool,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired: Option<ApiSpec>,
}

impl PlanReport {
    pub fn from_intent(name: &str, intent: &Intent) -> Self {
        let (id, desired) = match intent {
            Intent::NoOp(record) => (Some(record.id.clone()), None),
            Intent::Create(spec) => (None, Some(spec.clone())),
            Intent::Update { id, spec } => (Some(id.clone()), Some(spec.clone())),
            Intent::Delete { id } => (Some(id.clone()), None),
        };
        Self {
            action: intent.kind(),
            changes: intent.is_mutating(),
            name: name.to_string(),
            id,
            desired,
        }
    }
}

/// Handle API commands
pub async fn handle_api_command(command: ApiCommands, client: &GatewayClient) -> Result<()> {
    match command {
        ApiCommands::Apply { spec, output } => apply_api(client, spec.into_spec()?, output).await?,
        ApiCommands::Plan { spec, output } => plan_api(client, spec.into_spec()?, output).await?,
        ApiCommands::Delete { name, yes, output } => delete_api(client, &name, yes, output).await?,
        ApiCommands::List { output } => list_apis(client, output).await?,
        ApiCommands::Get { name_or_id, output } => get_api(client, &name_or_id, output).await?,
    }

    Ok(())
}

async fn apply_api(client: &GatewayClient, spec: ApiSpec, output: ReportFormat) -> Result<()> {
    let reconciler = Reconciler::new(client.clone());
    let outcome = ensure_present(&spec, &reconciler, client).await?;

    report_outcome(&spec.name, &outcome, output)
}

async fn plan_api(client: &GatewayClient, spec: ApiSpec, output: ReportFormat) -> Result<()> {
    spec.validate()?;
    let reconciler = Reconciler::new(client.clone());
    let intent = reconciler.reconcile(&spec).await?;

    output::print_output(&PlanReport::from_intent(&spec.name, &intent), output.into())
}

async fn delete_api(client: &GatewayClient, name: &str, yes: bool, output: ReportFormat) -> Result<()> {
    if !yes {
        eprintln!("Are you sure you want to delete API '{}'? (y/N)", name);
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            eprintln!("Cancelled");
            return Ok(());
        }
    }

    let reconciler = Reconciler::new(client.clone());
    let outcome = ensure_absent(name, &reconciler, client).await?;

    report_outcome(name, &outcome, output)
}

async fn list_apis(client: &GatewayClient, output: OutputFormat) -> Result<()> {
    let apis = client.list_apis().await?;

    match output {
        OutputFormat::Table => print_apis_table(&apis),
        _ => output::print_output(&apis, output)?,
    }

    Ok(())
}

async fn get_api(client: &GatewayClient, name_or_id: &str, output: OutputFormat) -> Result<()> {
    let record = client.get_api(name_or_id).await?;

    match output {
        OutputFormat::Table => print_record_table(&record),
        _ => output::print_output(&record, output)?,
    }

    Ok(())
}

/// Status line on stderr, machine-readable outcome on stdout
fn report_outcome(name: &str, outcome: &Outcome, output: ReportFormat) -> Result<()> {
    if outcome.changed {
        eprintln!("{} {}", "changed:".yellow(), name);
    } else {
        eprintln!("{} {}", "ok:".green(), name);
    }

    output::print_output(outcome, output.into())
}

fn print_apis_table(apis: &[ApiSummary]) {
    if apis.is_empty() {
        println!("No APIs found");
        return;
    }

    output::print_table_header(&[("Name", 30), ("ID", 38), ("Upstream URL", 40)]);

    for api in apis {
        let upstream = api.extra.get("upstream_url").and_then(|v| v.as_str()).unwrap_or("-");
        println!(
            "{:<30} {:<38} {:<40}",
            output::truncate(api.name.as_deref().unwrap_or("<unnamed>"), 28),
            output::truncate(&api.id, 36),
            output::truncate(upstream, 38),
        );
    }
    println!();
}

fn print_record_table(record: &ApiRecord) {
    let join = |values: &Option<Vec<String>>| {
        values.as_ref().map(|v| v.join(",")).unwrap_or_else(|| "-".to_string())
    };
    let flag = |value: Option<bool>| value.map(|b| b.to_string()).unwrap_or_else(|| "-".to_string());

    output::print_table_header(&[("Field", 15), ("Value", 50)]);
    println!("{:<15} {}", "id", record.id);
    println!("{:<15} {}", "name", record.name);
    println!("{:<15} {}", "upstream_url", record.upstream_url.as_deref().unwrap_or("-"));
    println!("{:<15} {}", "hosts", join(&record.hosts));
    println!("{:<15} {}", "uris", join(&record.uris));
    println!("{:<15} {}", "strip_uri", flag(record.strip_uri));
    println!("{:<15} {}", "preserve_host", flag(record.preserve_host));
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_spec_from_flags() {
        let args = SpecArgs {
            name: Some("Mockbin".to_string()),
            upstream_url: Some("http://mockbin.com".to_string()),
            hosts: vec!["mockbin.com".to_string()],
            strip_uri: true,
            ..Default::default()
        };

        let spec = args.into_spec().unwrap();
        assert_eq!(spec.hosts, Some(vec!["mockbin.com".to_string()]));
        assert_eq!(spec.uris, None);
        assert!(spec.strip_uri);
        assert!(!spec.preserve_host);
    }

    #[test]
    fn test_spec_from_flags_requires_name() {
        let args = SpecArgs {
            upstream_url: Some("http://mockbin.com".to_string()),
            ..Default::default()
        };
        assert!(args.into_spec().is_err());
    }

    #[test]
    fn test_spec_from_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"name": "Mockbin", "upstream_url": "http://mockbin.com", "uris": ["/mock"], "preserve_host": true}}"#
        )
        .unwrap();

        let args = SpecArgs { file: Some(file.path().to_path_buf()), ..Default::default() };
        let spec = args.into_spec().unwrap();
        assert_eq!(spec.uris, Some(vec!["/mock".to_string()]));
        assert!(spec.preserve_host);
    }

    #[test]
    fn test_spec_from_missing_file() {
        let args = SpecArgs { file: Some(PathBuf::from("/nonexistent/api.yaml")), ..Default::default() };
        assert!(args.into_spec().is_err());
    }

    #[test]
    fn test_plan_report() {
        let spec = ApiSpec::new("Mockbin", "http://mockbin.com");
        let report = PlanReport::from_intent("Mockbin", &Intent::Update { id: "1".into(), spec });

        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["action"], "update");
        assert_eq!(value["changes"], true);
        assert_eq!(value["id"], "1");
        assert_eq!(value["desired"]["upstream_url"], "http://mockbin.com");

        let report = PlanReport::from_intent("Mockbin", &Intent::Create(ApiSpec::new("Mockbin", "http://a")));
        let value = serde_json::to_value(&report).unwrap();
        assert!(value.get("id").is_none());

        let record = crate::reconcile::testing::record("1", "Mockbin", "http://mockbin.com");
        let report = PlanReport::from_intent("Mockbin", &Intent::NoOp(record));
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["action"], "noop");
        assert_eq!(value["changes"], false);
    }
}
