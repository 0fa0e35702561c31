//! Read-only catalog access
//!
//! One async function per metadata facet. Each issues a single query on the shared
//! connection and maps rows into model entities grouped by owner name. Any failure
//! aborts the load; no partial graph is ever returned.

pub mod enumerator;
mod queries;
mod rows;

use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::time::Duration;

use futures_util::TryFutureExt;
use tiberius::{Client, Config, Row};
use tokio::net::TcpStream;
use tokio::time::Instant;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{Result, ScriptError};
use crate::model::{
    Column, ComputedColumn, DataSpace, DefaultConstraint, Durability, Encryption, ForeignKey,
    ForeignKeyColumn, GeneratedAlways, Identity, Index, IndexType, IndexedColumn, LockEscalation,
    MetadataGraph, MetadataGraphBuilder, Namespace, PermissionRecord, PermissionState,
    ReferentialAction, Retention, ScalarAlias, Table, TemporalRole, UserDefinedType,
    UserTypeShape, XmlSchemaCollection,
};
use crate::util::{qualified_name, quote_ident};
use rows::RowReader;

pub type SqlClient = Client<Compat<TcpStream>>;

/// An entity and the qualified name of the object or type that owns it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owned<T> {
    pub namespace: Namespace,
    pub owner: String,
    pub item: T,
}

/// Single time budget shared by every database round trip of a run
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    pub at: Instant,
    pub limit: Duration,
}

impl Deadline {
    pub fn after(limit: Duration) -> Self {
        Self {
            at: Instant::now() + limit,
            limit,
        }
    }
}

/// Run `work` until it finishes, the deadline passes or the run is cancelled.
pub(crate) async fn with_deadline<F, T>(
    deadline: Deadline,
    cancel: &CancellationToken,
    work: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ScriptError::Cancelled),
        outcome = tokio::time::timeout_at(deadline.at, work) => match outcome {
            Ok(result) => result,
            Err(_) => Err(ScriptError::Timeout(deadline.limit)),
        },
    }
}

/// Parse an ADO.NET connection string, or a JDBC one when prefixed with `jdbc:`.
pub fn parse_connection(connection: &str) -> Result<Config> {
    let trimmed = connection.trim();
    if trimmed.is_empty() {
        return Err(ScriptError::InvalidConnection {
            message: "connection string is empty".to_string(),
        });
    }
    let is_jdbc = trimmed
        .get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("jdbc:"));
    let parsed = if is_jdbc {
        Config::from_jdbc_string(trimmed)
    } else {
        Config::from_ado_string(trimmed)
    };
    parsed.map_err(|e| ScriptError::InvalidConnection {
        message: e.to_string(),
    })
}

pub async fn connect(config: Config) -> Result<SqlClient> {
    let addr = config.get_addr();
    info!(%addr, "connecting to SQL Server");

    let tcp = TcpStream::connect(&addr)
        .await
        .map_err(|source| ScriptError::Connect {
            addr: addr.clone(),
            source,
        })?;
    tcp.set_nodelay(true)
        .map_err(|source| ScriptError::Connect {
            addr: addr.clone(),
            source,
        })?;

    Client::connect(config, tcp.compat_write())
        .await
        .map_err(|e| ScriptError::database(format!("logging in to {}", addr), e))
}

async fn fetch(client: &mut SqlClient, facet: &'static str, sql: &str) -> Result<Vec<Row>> {
    debug!(facet, "querying catalog");
    let rows = client
        .simple_query(sql)
        .map_err(|e| ScriptError::database(format!("querying {}", facet), e))
        .await?
        .into_first_result()
        .await
        .map_err(|e| ScriptError::database(format!("reading {}", facet), e))?;
    debug!(facet, rows = rows.len(), "catalog rows loaded");
    Ok(rows)
}

/// Major version from `SERVERPROPERTY('ProductVersion')`, e.g. 15 for `15.0.2000.5`.
pub async fn server_version(client: &mut SqlClient) -> Result<u16> {
    let rows = fetch(client, "server version", queries::SERVER_VERSION).await?;
    let row = rows.first().ok_or_else(|| ScriptError::Catalog {
        facet: "server version",
        message: "no rows returned".to_string(),
    })?;
    let reader = RowReader::new(row, "server version");
    let version = reader.required_str(0, "product_version")?;
    parse_major_version(version).ok_or_else(|| {
        reader.catalog_error(format!("unrecognised product version '{}'", version))
    })
}

pub(crate) fn parse_major_version(version: &str) -> Option<u16> {
    version.split('.').next()?.trim().parse().ok()
}

pub async fn database_collation(client: &mut SqlClient) -> Result<Option<String>> {
    let rows = fetch(client, "collation", queries::DATABASE_COLLATION).await?;
    match rows.first() {
        Some(row) => RowReader::new(row, "collation").string(0),
        None => Ok(None),
    }
}

/// Schema, object and type permissions; type grants land in [`Namespace::Type`].
pub async fn permissions(client: &mut SqlClient) -> Result<Vec<(Namespace, PermissionRecord)>> {
    let rows = fetch(client, "permissions", queries::PERMISSIONS).await?;
    rows.iter()
        .map(|row| {
            let r = RowReader::new(row, "permissions");
            let class = r.required_int(0, "securable_class")?;
            let schema = r.required_str(1, "schema_name")?;
            let (namespace, securable) = match class {
                3 => (Namespace::Object, quote_ident(schema)),
                1 => (
                    Namespace::Object,
                    qualified_name(schema, r.required_str(2, "object_name")?),
                ),
                6 => (
                    Namespace::Type,
                    qualified_name(schema, r.required_str(2, "object_name")?),
                ),
                other => {
                    return Err(r.catalog_error(format!("unexpected securable class {}", other)))
                }
            };
            let state = r
                .required_str(4, "state_desc")?
                .parse::<PermissionState>()
                .map_err(|message| r.catalog_error(message))?;
            Ok((
                namespace,
                PermissionRecord {
                    securable,
                    grantee: r.required_string(3, "grantee")?,
                    state,
                    permission: r.required_string(5, "permission_name")?,
                },
            ))
        })
        .collect()
}

pub async fn user_defined_types(client: &mut SqlClient) -> Result<Vec<UserDefinedType>> {
    let rows = fetch(client, "user types", queries::USER_TYPES).await?;
    rows.iter()
        .map(|row| {
            let r = RowReader::new(row, "user types");
            let shape = if r.flag(2)? {
                UserTypeShape::Table {
                    is_memory_optimized: r.flag(9)?,
                }
            } else {
                UserTypeShape::Scalar(ScalarAlias {
                    base_type: r.required_string(3, "base_type")?,
                    max_length: r.string(4)?,
                    precision: r.int(5)?,
                    scale: r.int(6)?,
                    collation: r.string(7)?,
                    is_nullable: r.opt_flag(8)?.unwrap_or(true),
                })
            };
            Ok(UserDefinedType {
                schema: r.required_string(0, "schema_name")?,
                name: r.required_string(1, "name")?,
                shape,
            })
        })
        .collect()
}

fn owner(r: &RowReader<'_>) -> Result<(Namespace, String)> {
    let namespace = if r.flag(0)? {
        Namespace::Type
    } else {
        Namespace::Object
    };
    let owner = qualified_name(
        r.required_str(1, "owner_schema")?,
        r.required_str(2, "owner_name")?,
    );
    Ok((namespace, owner))
}

/// Columns of user tables and table types.
pub async fn columns(client: &mut SqlClient) -> Result<Vec<Owned<Column>>> {
    let rows = fetch(client, "columns", queries::COLUMNS).await?;
    rows.iter()
        .map(|row| {
            let r = RowReader::new(row, "columns");
            let (namespace, owner) = owner(&r)?;

            let identity = if r.flag(13)? {
                Some(Identity {
                    seed: r.bigint(14)?.unwrap_or(1),
                    increment: r.bigint(15)?.unwrap_or(1),
                    not_for_replication: r.flag(16)?,
                })
            } else {
                None
            };
            let computed = match r.string(17)? {
                Some(expression) => Some(ComputedColumn {
                    expression,
                    is_persisted: r.flag(18)?,
                }),
                None => None,
            };
            let default = match (r.string(19)?, r.string(20)?) {
                (Some(name), Some(definition)) => Some(DefaultConstraint { name, definition }),
                _ => None,
            };
            let encryption = match r.string(27)? {
                Some(key_name) => Some(Encryption {
                    key_name,
                    encryption_type: r.string(28)?.unwrap_or_default(),
                    algorithm: r.string(29)?.unwrap_or_default(),
                }),
                None => None,
            };
            let xml_collection = match (r.string(31)?, r.string(32)?) {
                (Some(schema), Some(name)) => Some(XmlSchemaCollection {
                    is_document: r.flag(30)?,
                    schema,
                    name,
                }),
                _ => None,
            };

            let column = Column {
                column_id: r.required_int(3, "column_id")?,
                name: r.required_string(4, "column_name")?,
                type_name: r.required_string(5, "type_name")?,
                type_schema: r.string(6)?,
                is_user_defined: r.flag(7)?,
                max_length: r.string(8)?,
                precision: r.int(9)?,
                scale: r.int(10)?,
                is_nullable: r.opt_flag(11)?.unwrap_or(true),
                collation: r.string(12)?,
                identity,
                computed,
                default,
                is_sparse: r.flag(21)?,
                is_column_set: r.flag(22)?,
                is_filestream: r.flag(23)?,
                is_rowguidcol: r.flag(24)?,
                is_hidden: r.flag(25)?,
                masking_function: r.string(26)?,
                encryption,
                xml_collection,
                generated_always: r.int(33)?.and_then(GeneratedAlways::from_catalog),
                description: r.string(34)?,
            };
            Ok(Owned {
                namespace,
                owner,
                item: column,
            })
        })
        .collect()
}

/// Indexes with their key and included columns, one entry per index.
pub async fn indexes(client: &mut SqlClient, major_version: u16) -> Result<Vec<Owned<Index>>> {
    let sql = queries::select_dialect(&queries::INDEXES, major_version);
    let rows = fetch(client, "indexes", sql).await?;

    let mut by_key: BTreeMap<(bool, String, String), Owned<Index>> = BTreeMap::new();
    let mut skipped: BTreeSet<(String, String)> = BTreeSet::new();

    for row in &rows {
        let r = RowReader::new(row, "indexes");
        let (namespace, owner) = owner(&r)?;
        let index_name = r.required_string(3, "index_name")?;
        let type_desc = r.required_str(4, "type_desc")?;

        let Some(index_type) = IndexType::from_type_desc(type_desc) else {
            if skipped.insert((owner.clone(), index_name.clone())) {
                warn!(%owner, index = %index_name, type_desc, "skipping index of unsupported type");
            }
            continue;
        };

        let key = (namespace == Namespace::Type, owner.clone(), index_name.clone());
        if !by_key.contains_key(&key) {
            let mut index = Index::new(index_name.clone(), index_type);
            index.is_primary_key = r.flag(5)?;
            index.is_unique = r.flag(6)?;
            index.is_unique_constraint = r.flag(7)?;
            index.ignore_dup_key = r.flag(8)?;
            index.bucket_count = r.bigint(9)?;
            index.filter = r.string(10)?;
            index.fill_factor = r.int(11)?.unwrap_or(0);
            index.is_padded = r.flag(12)?;
            index.allow_row_locks = r.opt_flag(13)?.unwrap_or(true);
            index.allow_page_locks = r.opt_flag(14)?.unwrap_or(true);
            index.optimize_for_sequential_key = r.flag(15)?;
            index.is_disabled = r.flag(16)?;
            index.description = r.string(22)?;
            by_key.insert(
                key.clone(),
                Owned {
                    namespace,
                    owner,
                    item: index,
                },
            );
        }

        let Some(column_name) = r.string(17)? else {
            continue;
        };
        let key_ordinal = r.int(18)?.unwrap_or(0);
        let is_included = r.flag(21)?;
        // partitioning columns appear with key ordinal 0 without being keys
        if !is_included && key_ordinal == 0 {
            continue;
        }
        let ordinal = if is_included {
            r.int(19)?.unwrap_or(0)
        } else {
            key_ordinal
        };
        let mut column = IndexedColumn::new(column_name, ordinal);
        column.is_descending = r.flag(20)?;

        if let Some(entry) = by_key.get_mut(&key) {
            if is_included {
                entry.item.included_columns.push(column);
            } else {
                entry.item.key_columns.push(column);
            }
        }
    }

    Ok(by_key.into_values().collect())
}

/// Foreign keys with their column pairs, one entry per key.
pub async fn foreign_keys(client: &mut SqlClient) -> Result<Vec<Owned<ForeignKey>>> {
    let rows = fetch(client, "foreign keys", queries::FOREIGN_KEYS).await?;
    let mut by_key: BTreeMap<(String, String), Owned<ForeignKey>> = BTreeMap::new();

    for row in &rows {
        let r = RowReader::new(row, "foreign keys");
        let owner = qualified_name(
            r.required_str(0, "schema_name")?,
            r.required_str(1, "table_name")?,
        );
        let name = r.required_string(2, "foreign_key_name")?;
        let key = (owner.clone(), name.clone());

        if !by_key.contains_key(&key) {
            let mut foreign_key = ForeignKey::new(
                name,
                r.required_str(3, "referenced_schema")?,
                r.required_str(4, "referenced_table")?,
            );
            foreign_key.on_delete = referential_action(&r, 5)?;
            foreign_key.on_update = referential_action(&r, 6)?;
            foreign_key.is_disabled = r.flag(7)?;
            foreign_key.is_not_trusted = r.flag(8)?;
            foreign_key.is_not_for_replication = r.flag(9)?;
            foreign_key.description = r.string(13)?;
            by_key.insert(
                key.clone(),
                Owned {
                    namespace: Namespace::Object,
                    owner,
                    item: foreign_key,
                },
            );
        }

        let column = ForeignKeyColumn {
            ordinal: r.required_int(10, "ordinal")?,
            column: r.required_string(11, "column_name")?,
            referenced_column: r.required_string(12, "referenced_column")?,
        };
        if let Some(entry) = by_key.get_mut(&key) {
            entry.item.columns.push(column);
        }
    }

    Ok(by_key.into_values().collect())
}

fn referential_action(r: &RowReader<'_>, idx: usize) -> Result<ReferentialAction> {
    match r.str(idx)? {
        None => Ok(ReferentialAction::NoAction),
        Some(desc) => ReferentialAction::from_desc(desc)
            .ok_or_else(|| r.catalog_error(format!("unknown referential action '{}'", desc))),
    }
}

pub async fn tables(client: &mut SqlClient, major_version: u16) -> Result<Vec<Table>> {
    let sql = queries::select_dialect(&queries::TABLES, major_version);
    let rows = fetch(client, "tables", sql).await?;
    rows.iter()
        .map(|row| {
            let r = RowReader::new(row, "tables");
            let mut table = Table::new(
                r.required_str(0, "schema_name")?,
                r.required_str(1, "name")?,
            );
            table.data_space = match (r.string(2)?, r.flag(3)?, r.string(4)?) {
                (Some(scheme), true, Some(column)) => {
                    Some(DataSpace::PartitionScheme { scheme, column })
                }
                (Some(filegroup), _, _) => Some(DataSpace::Filegroup(filegroup)),
                _ => None,
            };
            table.lob_data_space = r.string(5)?;
            table.filestream_data_space = r.string(6)?;
            table.lock_escalation = r
                .str(7)?
                .and_then(LockEscalation::from_desc)
                .unwrap_or_default();
            table.is_memory_optimized = r.flag(8)?;
            table.durability = match r.str(9)? {
                Some("SCHEMA_ONLY") => Durability::SchemaOnly,
                _ => Durability::SchemaAndData,
            };
            table.temporal_role = TemporalRole::from_catalog(r.int(10)?.unwrap_or(0));
            table.history_table = match (r.string(11)?, r.string(12)?) {
                (Some(schema), Some(name)) => Some((schema, name)),
                _ => None,
            };
            table.is_tracked_by_cdc = r.flag(13)?;
            table.is_filetable = r.flag(14)?;
            table.is_node = r.flag(15)?;
            table.is_edge = r.flag(16)?;
            table.history_retention = match (r.int(17)?, r.str(18)?) {
                (Some(count), Some(unit)) => match Retention::from_catalog(count, unit) {
                    Retention::Infinite => None,
                    finite => Some(finite),
                },
                _ => None,
            };
            Ok(table)
        })
        .collect()
}

/// Load every facet into an immutable graph.
///
/// Facets are read one after another on the same connection, before any object is
/// enumerated, so renderers never see facets read at different points of the run.
pub async fn load_metadata(client: &mut SqlClient) -> Result<MetadataGraph> {
    let major_version = server_version(client).await?;
    info!(major_version, "detected server version");

    let mut builder = MetadataGraphBuilder::new(major_version);
    builder.collation(database_collation(client).await?);

    for (namespace, record) in permissions(client).await? {
        builder.add_permission(namespace, record);
    }
    for user_type in user_defined_types(client).await? {
        builder.add_user_type(user_type);
    }
    for column in columns(client).await? {
        builder.add_column(column.namespace, &column.owner, column.item);
    }
    for index in indexes(client, major_version).await? {
        builder.add_index(index.namespace, &index.owner, index.item);
    }
    for foreign_key in foreign_keys(client).await? {
        builder.add_foreign_key(&foreign_key.owner, foreign_key.item);
    }
    for table in tables(client, major_version).await? {
        builder.add_table(table);
    }

    let graph = builder.build();
    info!(
        tables = graph.table_count(),
        user_types = graph.user_type_count(),
        "metadata loaded"
    );
    Ok(graph)
}
