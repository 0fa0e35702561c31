//! rust-sqlscripter: deterministic definition scripts for SQL Server databases
//!
//! Reads the catalog of a live database once, then streams every scriptable object
//! (schemas, user-defined types, tables, views, triggers, functions, procedures)
//! through filtering and rendering into a caller-supplied sink.

pub mod catalog;
pub mod error;
pub mod filter;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod util;

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub use error::{RenderError, Result, ScriptError};
pub use filter::{ObjectFilter, Selection};
pub use model::{CatalogObject, MetadataGraph, ObjectKind};
pub use pipeline::{EmittedObject, ObjectSink, Pipeline, ScriptSummary};
pub use render::{Dispatch, RenderContext, RenderOptions};

use catalog::Deadline;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Options for a scripting run
#[derive(Debug, Clone)]
pub struct ScriptOptions {
    /// ADO.NET or `jdbc:sqlserver://` connection string
    pub connection: String,
    /// Regular expressions matched against `[schema].[name]`
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    /// Pattern files, one pattern per line
    pub include_file: Option<PathBuf>,
    pub exclude_file: Option<PathBuf>,
    /// Object kinds to script by name (e.g. `table`, `tableType`); `None` scripts every kind
    pub kinds: Option<Vec<String>>,
    pub include_permissions: bool,
    /// Budget shared by the metadata load and the enumeration query
    pub timeout: Duration,
    pub batch_separator: String,
    /// Bound of the enumerator channel
    pub channel_capacity: usize,
}

impl Default for ScriptOptions {
    fn default() -> Self {
        Self {
            connection: String::new(),
            include: Vec::new(),
            exclude: Vec::new(),
            include_file: None,
            exclude_file: None,
            kinds: None,
            include_permissions: true,
            timeout: DEFAULT_TIMEOUT,
            batch_separator: render::DEFAULT_BATCH_SEPARATOR.to_string(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl ScriptOptions {
    /// Compile filters and the kind allow-list. Touches no database.
    pub fn selection(&self) -> Result<Selection> {
        let include = patterns(&self.include, self.include_file.as_deref())?;
        let exclude = patterns(&self.exclude, self.exclude_file.as_deref())?;
        let kinds = match &self.kinds {
            Some(names) => filter::parse_kinds(names)?,
            None => ObjectKind::ALL.to_vec(),
        };
        Ok(Selection::new(kinds, include, exclude))
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            batch_separator: self.batch_separator.clone(),
            include_permissions: self.include_permissions,
        }
    }
}

fn patterns(inline: &[String], file: Option<&Path>) -> Result<ObjectFilter> {
    let mut all = inline.to_vec();
    if let Some(path) = file {
        all.extend(filter::read_patterns(path)?);
    }
    ObjectFilter::new(all)
}

/// Script every selected object in the database into `sink`.
///
/// Configuration is validated before connecting. The metadata graph is loaded
/// completely before enumeration starts.
pub async fn script_database<S>(
    options: &ScriptOptions,
    sink: &mut S,
    cancel: CancellationToken,
) -> Result<ScriptSummary>
where
    S: ObjectSink + ?Sized,
{
    // Step 1: Validate configuration
    let selection = options.selection()?;
    let config = catalog::parse_connection(&options.connection)?;
    let render_options = options.render_options();

    // Step 2: Connect and load the metadata graph
    let deadline = Deadline::after(options.timeout);
    let (client, graph) = catalog::with_deadline(deadline, &cancel, async {
        let mut client = catalog::connect(config).await?;
        let graph = catalog::load_metadata(&mut client).await?;
        Ok::<_, ScriptError>((client, graph))
    })
    .await?;

    // Step 3: Start the enumerator on its own task
    let (tx, rx) = mpsc::channel(options.channel_capacity.max(1));
    let producer = tokio::spawn(catalog::enumerator::stream_objects(
        client,
        tx,
        deadline,
        cancel.clone(),
    ));

    // Step 4: Filter, render and emit
    let dispatch = Dispatch::new();
    let context = RenderContext::new(&graph, &render_options);
    let summary = Pipeline::new(&selection, &dispatch, context)
        .run(rx, sink)
        .await;

    // Step 5: Surface producer failures
    let sent = producer.await.map_err(|e| ScriptError::Producer {
        message: e.to_string(),
    })??;

    if cancel.is_cancelled() {
        warn!(sent, emitted = summary.emitted, "scripting cancelled");
        return Err(ScriptError::Cancelled);
    }

    info!(
        received = summary.received,
        selected = summary.selected,
        emitted = summary.emitted,
        render_failures = summary.render_failures,
        emit_failures = summary.emit_failures,
        "scripting finished"
    );
    Ok(summary)
}
