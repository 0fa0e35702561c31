use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use rust_sqlscripter::{script_database, EmittedObject, ObjectKind, ObjectSink, ScriptOptions};

#[derive(Parser)]
#[command(name = "rust-sqlscripter")]
#[command(author, version, about = "Script SQL Server database objects into definition files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write one definition script per database object
    Script {
        /// ADO.NET or jdbc:sqlserver:// connection string
        #[arg(short, long, env = "SQLSCRIPT_CONNECTION", hide_env_values = true)]
        connection: String,

        /// Directory that receives <kind>/<schema>.<name>.sql files
        #[arg(short, long)]
        output: PathBuf,

        /// Regular expression an object's [schema].[name] must match (repeatable)
        #[arg(short, long)]
        include: Vec<String>,

        /// Regular expression that drops matching objects (repeatable)
        #[arg(short = 'x', long)]
        exclude: Vec<String>,

        /// File of include patterns, one per line
        #[arg(long)]
        include_file: Option<PathBuf>,

        /// File of exclude patterns, one per line
        #[arg(long)]
        exclude_file: Option<PathBuf>,

        /// Object kinds to script (schema, type, tableType, table, view, trigger, function, procedure)
        #[arg(short, long = "kind", value_delimiter = ',')]
        kinds: Vec<String>,

        /// Leave GRANT/DENY/REVOKE statements out of the scripts
        #[arg(long)]
        skip_permissions: bool,

        /// Seconds allowed for connecting, loading metadata and starting enumeration
        #[arg(long, default_value_t = 60)]
        timeout: u64,

        /// Line written after every batch
        #[arg(long, default_value = "GO")]
        batch_separator: String,

        /// Objects buffered between the enumerator and the renderers
        #[arg(long, default_value_t = 64)]
        channel_capacity: usize,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Script {
            connection,
            output,
            include,
            exclude,
            include_file,
            exclude_file,
            kinds,
            skip_permissions,
            timeout,
            batch_separator,
            channel_capacity,
            verbose,
        } => {
            init_tracing(verbose);

            let options = ScriptOptions {
                connection,
                include,
                exclude,
                include_file,
                exclude_file,
                kinds: if kinds.is_empty() { None } else { Some(kinds) },
                include_permissions: !skip_permissions,
                timeout: Duration::from_secs(timeout),
                batch_separator,
                channel_capacity,
            };

            let cancel = CancellationToken::new();
            let on_signal = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_signal.cancel();
                }
            });

            let mut sink = DirectorySink::new(output.clone());
            let summary = script_database(&options, &mut sink, cancel)
                .await
                .context("Scripting failed")?;

            println!(
                "Scripted {} of {} objects into {}",
                summary.emitted,
                summary.received,
                output.display()
            );
            if summary.render_failures + summary.emit_failures > 0 {
                println!(
                    "{} objects failed to render, {} failed to write",
                    summary.render_failures, summary.emit_failures
                );
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "rust_sqlscripter=debug"
    } else {
        "rust_sqlscripter=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Writes each script to `<root>/<kind>/<schema>.<name>.sql`
struct DirectorySink {
    root: PathBuf,
    created: BTreeSet<ObjectKind>,
}

impl DirectorySink {
    fn new(root: PathBuf) -> Self {
        Self {
            root,
            created: BTreeSet::new(),
        }
    }

    fn path_for(&self, object: &EmittedObject<'_>) -> PathBuf {
        let file_name = match object.kind {
            ObjectKind::Schema => format!("{}.sql", sanitize(object.schema)),
            _ => format!("{}.{}.sql", sanitize(object.schema), sanitize(object.name)),
        };
        self.root.join(object.kind.config_name()).join(file_name)
    }
}

impl ObjectSink for DirectorySink {
    fn emit(&mut self, object: &EmittedObject<'_>) -> Result<()> {
        let path = self.path_for(object);
        if !self.created.contains(&object.kind) {
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
            }
            self.created.insert(object.kind);
        }
        std::fs::write(&path, object.definition)
            .with_context(|| format!("Failed to write script: {}", path.display()))
    }
}

/// Replace characters that are not allowed in file names.
fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}
