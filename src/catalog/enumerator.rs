//! Streams scriptable objects from the catalog into a bounded channel

use futures_util::{TryFutureExt, TryStreamExt};
use tiberius::Row;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::rows::RowReader;
use super::{queries, with_deadline, Deadline, SqlClient};
use crate::error::{Result, ScriptError};
use crate::model::{CatalogObject, DatabaseObject, Module, ObjectKind, ParentObject};

/// Map one row of the object query into a catalog record.
///
/// Module kinds carry their ANSI_NULLS and QUOTED_IDENTIFIER settings; everything
/// else is a plain object.
pub(crate) fn object_from_row(row: &Row) -> Result<CatalogObject> {
    let r = RowReader::new(row, "objects");
    let tag = r.required_str(1, "object_kind")?;
    let kind = ObjectKind::from_catalog_tag(tag)
        .ok_or_else(|| r.catalog_error(format!("unknown object kind '{}'", tag)))?;

    let mut object = DatabaseObject::new(
        r.required_str(2, "catalog_name")?,
        r.required_str(3, "schema_name")?,
        r.required_str(4, "object_name")?,
        kind,
    );
    object.owner = r.string(5)?;
    object.definition = r.string(6)?;
    object.description = r.string(9)?;
    if kind == ObjectKind::Trigger {
        object.parent = match (r.string(10)?, r.str(11)?) {
            (Some(name), Some("TABLE")) => Some(ParentObject::Table(name)),
            (Some(name), Some("VIEW")) => Some(ParentObject::View(name)),
            _ => None,
        };
    }

    if kind.is_module() {
        Ok(CatalogObject::Module(Module {
            object,
            ansi_nulls: r.opt_flag(7)?,
            quoted_identifier: r.opt_flag(8)?,
        }))
    } else {
        Ok(CatalogObject::Plain(object))
    }
}

/// Send every object in the database to `tx`, one row at a time.
///
/// Takes ownership of the connection; the metadata load must be finished before
/// this starts. Returns the number of objects sent. Stops quietly when the
/// receiver goes away or the token is cancelled.
pub async fn stream_objects(
    mut client: SqlClient,
    tx: mpsc::Sender<CatalogObject>,
    deadline: Deadline,
    cancel: CancellationToken,
) -> Result<usize> {
    let query = client
        .simple_query(queries::OBJECTS)
        .map_err(|e| ScriptError::database("querying objects", e));
    let stream = with_deadline(deadline, &cancel, query).await?;
    let mut rows = stream.into_row_stream();

    let mut sent = 0usize;
    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => {
                warn!(sent, "object enumeration cancelled");
                return Ok(sent);
            }
            next = rows.try_next() => next.map_err(|e| ScriptError::database("reading object rows", e))?,
        };
        let Some(row) = next else {
            break;
        };
        let object = object_from_row(&row)?;

        tokio::select! {
            _ = cancel.cancelled() => {
                warn!(sent, "object enumeration cancelled");
                return Ok(sent);
            }
            delivered = tx.send(object) => {
                if delivered.is_err() {
                    debug!(sent, "object receiver closed");
                    break;
                }
            }
        }
        sent += 1;
    }

    debug!(sent, "object enumeration finished");
    Ok(sent)
}
