//! Pipeline Orchestrator Tests

use pretty_assertions::assert_eq;
use tokio::sync::mpsc;

use rust_sqlscripter::model::{CatalogObject, MetadataGraph, ObjectKind};
use rust_sqlscripter::{
    Dispatch, EmittedObject, ObjectFilter, Pipeline, RenderContext, RenderOptions, ScriptSummary,
    Selection,
};

use crate::common::{module, plain, schema, test_type_graph, Captured, CATALOG};

fn objects() -> Vec<CatalogObject> {
    vec![
        schema("sales"),
        plain("dbo", "TestType", ObjectKind::TableType),
        module(
            "sales",
            "OpenOrders",
            ObjectKind::View,
            "CREATE VIEW [sales].[OpenOrders] AS SELECT 1 AS [One]",
        ),
    ]
}

/// Push `objects` through a pipeline and collect what reaches the sink.
async fn run(
    graph: &MetadataGraph,
    selection: &Selection,
    objects: Vec<CatalogObject>,
    fail_on: Option<&str>,
) -> (ScriptSummary, Vec<Captured>) {
    let (tx, rx) = mpsc::channel(objects.len().max(1));
    for object in objects {
        tx.send(object).await.unwrap();
    }
    drop(tx);

    let options = RenderOptions::default();
    let dispatch = Dispatch::new();
    let context = RenderContext::new(graph, &options);

    let mut captured = Vec::new();
    let mut sink = |object: &EmittedObject<'_>| {
        if Some(object.name) == fail_on {
            anyhow::bail!("disk full");
        }
        captured.push(Captured::from(object));
        Ok::<(), anyhow::Error>(())
    };
    let summary = Pipeline::new(selection, &dispatch, context)
        .run(rx, &mut sink)
        .await;
    (summary, captured)
}

#[tokio::test]
async fn test_objects_are_emitted_in_enumeration_order() {
    let graph = test_type_graph();
    let (summary, captured) = run(&graph, &Selection::all(), objects(), None).await;

    let names: Vec<(&str, ObjectKind)> = captured
        .iter()
        .map(|c| (c.name.as_str(), c.kind))
        .collect();
    assert_eq!(
        names,
        vec![
            ("sales", ObjectKind::Schema),
            ("TestType", ObjectKind::TableType),
            ("OpenOrders", ObjectKind::View),
        ]
    );
    assert!(captured.iter().all(|c| c.catalog == CATALOG));
    assert_eq!(captured[0].text, "CREATE SCHEMA [sales]\nGO");
    assert_eq!(
        summary,
        ScriptSummary {
            received: 3,
            selected: 3,
            emitted: 3,
            render_failures: 0,
            emit_failures: 0,
        }
    );
}

#[tokio::test]
async fn test_disallowed_kind_never_reaches_renderer_or_sink() {
    let graph = test_type_graph();
    let selection = Selection::new(
        [ObjectKind::Schema],
        ObjectFilter::default(),
        ObjectFilter::default(),
    );
    // a plain view would fail to render if it got that far
    let mut input = objects();
    input.push(plain("dbo", "Broken", ObjectKind::View));

    let (summary, captured) = run(&graph, &selection, input, None).await;

    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].kind, ObjectKind::Schema);
    assert_eq!(summary.received, 4);
    assert_eq!(summary.selected, 1);
    assert_eq!(summary.render_failures, 0);
}

#[tokio::test]
async fn test_include_and_exclude_filters_run_before_rendering() {
    let graph = test_type_graph();
    let selection = Selection::new(
        ObjectKind::ALL,
        ObjectFilter::new(["^\\[sales\\]"]).unwrap(),
        ObjectFilter::new(["OpenOrders"]).unwrap(),
    );

    let (summary, captured) = run(&graph, &selection, objects(), None).await;

    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].name, "sales");
    assert_eq!(summary.selected, 1);
}

#[tokio::test]
async fn test_render_failure_skips_only_that_object() {
    let graph = test_type_graph();
    let input = vec![
        plain("dbo", "Broken", ObjectKind::View),
        schema("sales"),
        plain("dbo", "Missing", ObjectKind::Table),
    ];

    let (summary, captured) = run(&graph, &Selection::all(), input, None).await;

    assert_eq!(captured.len(), 1);
    assert_eq!(summary.render_failures, 2);
    assert_eq!(summary.emitted, 1);
}

#[tokio::test]
async fn test_sink_failure_does_not_stop_the_run() {
    let graph = test_type_graph();
    let (summary, captured) = run(&graph, &Selection::all(), objects(), Some("TestType")).await;

    assert_eq!(captured.len(), 2);
    assert_eq!(summary.emitted, 2);
    assert_eq!(summary.emit_failures, 1);
}

#[tokio::test]
async fn test_rendered_bytes_are_identical_across_runs() {
    let graph = test_type_graph();
    let (_, first) = run(&graph, &Selection::all(), objects(), None).await;
    let (_, second) = run(&graph, &Selection::all(), objects(), None).await;
    assert_eq!(first, second);
}
