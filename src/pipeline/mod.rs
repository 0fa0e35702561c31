//! Staged object pipeline
//!
//! Objects arrive from the enumerator over a bounded channel and flow through
//! kind filter, include filter, exclude filter, render and emit, in that order.
//! Render and sink failures are logged and counted; they never stop the stream.

use std::cell::Cell;
use std::future;

use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, error, warn};

use crate::filter::Selection;
use crate::model::{CatalogObject, ObjectKind};
use crate::render::{Dispatch, RenderContext};

/// A rendered object handed to the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmittedObject<'a> {
    pub catalog: &'a str,
    pub schema: &'a str,
    pub name: &'a str,
    pub kind: ObjectKind,
    pub definition: &'a [u8],
}

/// Destination for rendered scripts.
///
/// Implemented for any `FnMut(&EmittedObject) -> anyhow::Result<()>`.
pub trait ObjectSink {
    fn emit(&mut self, object: &EmittedObject<'_>) -> anyhow::Result<()>;
}

impl<F> ObjectSink for F
where
    F: FnMut(&EmittedObject<'_>) -> anyhow::Result<()>,
{
    fn emit(&mut self, object: &EmittedObject<'_>) -> anyhow::Result<()> {
        self(object)
    }
}

/// Counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptSummary {
    /// Objects received from the enumerator
    pub received: usize,
    /// Objects that passed every filter
    pub selected: usize,
    /// Objects the sink accepted
    pub emitted: usize,
    pub render_failures: usize,
    pub emit_failures: usize,
}

pub struct Pipeline<'a> {
    selection: &'a Selection,
    dispatch: &'a Dispatch,
    context: RenderContext<'a>,
}

impl<'a> Pipeline<'a> {
    pub fn new(selection: &'a Selection, dispatch: &'a Dispatch, context: RenderContext<'a>) -> Self {
        Self {
            selection,
            dispatch,
            context,
        }
    }

    /// Drain `rx` until the producer drops its sender.
    pub async fn run<S>(&self, rx: mpsc::Receiver<CatalogObject>, sink: &mut S) -> ScriptSummary
    where
        S: ObjectSink + ?Sized,
    {
        let received = Cell::new(0usize);
        let selected = Cell::new(0usize);
        let render_failures = Cell::new(0usize);
        let mut emitted = 0usize;
        let mut emit_failures = 0usize;

        ReceiverStream::new(rx)
            .inspect(|_| received.set(received.get() + 1))
            .filter(|object| future::ready(self.selection.kind_allowed(object.kind())))
            .filter(|object| future::ready(self.selection.included(&object.qualified_name())))
            .filter(|object| future::ready(!self.selection.excluded(&object.qualified_name())))
            .inspect(|_| selected.set(selected.get() + 1))
            .filter_map(|object| {
                let rendered = match self.dispatch.render(&self.context, &object) {
                    Ok(script) => Some((object, script)),
                    Err(e) => {
                        warn!(error = %e, "skipping object that failed to render");
                        render_failures.set(render_failures.get() + 1);
                        None
                    }
                };
                future::ready(rendered)
            })
            .for_each(|(object, script)| {
                let inner = object.object();
                let emitted_object = EmittedObject {
                    catalog: &inner.catalog,
                    schema: &inner.schema,
                    name: &inner.name,
                    kind: inner.kind,
                    definition: script.as_bytes(),
                };
                match sink.emit(&emitted_object) {
                    Ok(()) => {
                        debug!(object = %inner.qualified_name(), kind = %inner.kind, "scripted");
                        emitted += 1;
                    }
                    Err(e) => {
                        error!(object = %inner.qualified_name(), error = %format!("{:#}", e), "failed to emit object");
                        emit_failures += 1;
                    }
                }
                future::ready(())
            })
            .await;

        ScriptSummary {
            received: received.get(),
            selected: selected.get(),
            emitted,
            render_failures: render_failures.get(),
            emit_failures,
        }
    }
}
