//! Index Definition Tests

use pretty_assertions::assert_eq;

use rust_sqlscripter::model::{Index, IndexType, IndexedColumn, OwnerKind};
use rust_sqlscripter::render::{render_create_index, render_index};

fn test_primary_key() -> Index {
    let mut index = Index::new("PK_Test", IndexType::Nonclustered);
    index.is_primary_key = true;
    index.is_unique = true;
    index.key_columns = vec![
        IndexedColumn::new("DeviceID", 3).descending(),
        IndexedColumn::new("Division", 2),
        IndexedColumn::new("Session", 1),
    ];
    index
}

// ============================================================================
// Table Type Form Tests
// ============================================================================

#[test]
fn test_table_type_primary_key() {
    assert_eq!(
        render_index(&test_primary_key(), OwnerKind::TableType),
        "PRIMARY KEY [PK_Test] ([Session], [Division], [DeviceID] DESC)"
    );
}

#[test]
fn test_table_type_unique_index_with_ignore_dup_key() {
    let mut index = Index::new("UK_Test", IndexType::Nonclustered);
    index.is_unique = true;
    index.ignore_dup_key = true;
    index.key_columns = vec![
        IndexedColumn::new("Session", 1),
        IndexedColumn::new("Division", 2),
    ];
    assert_eq!(
        render_index(&index, OwnerKind::TableType),
        "INDEX [UK_Test] UNIQUE ([Session], [Division]) WITH (IGNORE_DUP_KEY = ON)"
    );
}

#[test]
fn test_key_order_follows_ordinal_not_input_order() {
    let mut shuffled = test_primary_key();
    shuffled.key_columns.reverse();
    assert_eq!(
        render_index(&shuffled, OwnerKind::TableType),
        render_index(&test_primary_key(), OwnerKind::TableType),
        "Key columns should be ordered by key ordinal"
    );
}

#[test]
fn test_table_type_clustered_index_keeps_type_keyword() {
    let mut index = Index::new("IX_Clustered", IndexType::Clustered);
    index.key_columns = vec![IndexedColumn::new("Id", 1)];
    assert_eq!(
        render_index(&index, OwnerKind::TableType),
        "INDEX [IX_Clustered] CLUSTERED ([Id])"
    );
}

#[test]
fn test_table_type_index_never_renders_filter() {
    let mut index = Index::new("IX_Filtered", IndexType::Nonclustered);
    index.key_columns = vec![IndexedColumn::new("Id", 1)];
    index.filter = Some("([Id]>(0))".to_string());
    assert_eq!(
        render_index(&index, OwnerKind::TableType),
        "INDEX [IX_Filtered] ([Id])"
    );
}

#[test]
fn test_table_type_index_with_includes() {
    let mut index = Index::new("IX_Name", IndexType::Nonclustered);
    index.key_columns = vec![IndexedColumn::new("Name", 1)];
    index.included_columns = vec![
        IndexedColumn::new("Total", 3),
        IndexedColumn::new("Code", 2),
    ];
    assert_eq!(
        render_index(&index, OwnerKind::TableType),
        "INDEX [IX_Name] ([Name]) INCLUDE ([Code], [Total])"
    );
}

#[test]
fn test_table_type_ignores_storage_options() {
    let mut index = test_primary_key();
    index.fill_factor = 80;
    index.is_padded = true;
    assert_eq!(
        render_index(&index, OwnerKind::TableType),
        "PRIMARY KEY [PK_Test] ([Session], [Division], [DeviceID] DESC)"
    );
}

// ============================================================================
// Table Form Tests
// ============================================================================

#[test]
fn test_table_primary_key_constraint() {
    let mut index = Index::new("PK_Orders", IndexType::Clustered);
    index.is_primary_key = true;
    index.is_unique = true;
    index.key_columns = vec![IndexedColumn::new("OrderId", 1)];
    assert_eq!(
        render_index(&index, OwnerKind::Table),
        "CONSTRAINT [PK_Orders] PRIMARY KEY CLUSTERED ([OrderId])"
    );
}

#[test]
fn test_table_unique_constraint_with_sorted_options() {
    let mut index = Index::new("UQ_Orders_Number", IndexType::Nonclustered);
    index.is_unique = true;
    index.is_unique_constraint = true;
    index.fill_factor = 90;
    index.is_padded = true;
    index.allow_page_locks = false;
    index.key_columns = vec![IndexedColumn::new("Number", 1)];
    assert_eq!(
        render_index(&index, OwnerKind::Table),
        "CONSTRAINT [UQ_Orders_Number] UNIQUE NONCLUSTERED ([Number]) WITH (ALLOW_PAGE_LOCKS = OFF, FILLFACTOR = 90, PAD_INDEX = ON)"
    );
}

#[test]
fn test_memory_optimized_hash_index() {
    let mut index = Index::new("IX_Session", IndexType::NonclusteredHash);
    index.bucket_count = Some(1024);
    index.key_columns = vec![IndexedColumn::new("SessionId", 1)];
    assert_eq!(
        render_index(&index, OwnerKind::MemoryOptimizedTable),
        "INDEX [IX_Session] NONCLUSTERED HASH ([SessionId]) WITH (BUCKET_COUNT = 1024)"
    );
}

// ============================================================================
// CREATE INDEX Tests
// ============================================================================

#[test]
fn test_create_index_with_include_filter_and_options() {
    let mut index = Index::new("IX_Orders_Customer", IndexType::Nonclustered);
    index.is_unique = true;
    index.fill_factor = 80;
    index.filter = Some("([CustomerId] IS NOT NULL)".to_string());
    index.key_columns = vec![
        IndexedColumn::new("OrderDate", 2).descending(),
        IndexedColumn::new("CustomerId", 1),
    ];
    index.included_columns = vec![IndexedColumn::new("Total", 4)];

    assert_eq!(
        render_create_index(&index, "[dbo].[Orders]").as_deref(),
        Some("CREATE UNIQUE NONCLUSTERED INDEX [IX_Orders_Customer] ON [dbo].[Orders] ([CustomerId], [OrderDate] DESC) INCLUDE ([Total]) WHERE ([CustomerId] IS NOT NULL) WITH (FILLFACTOR = 80)")
    );
}

#[test]
fn test_create_clustered_columnstore_index_has_no_column_list() {
    let index = Index::new("CCI_Facts", IndexType::ClusteredColumnstore);
    assert_eq!(
        render_create_index(&index, "[dbo].[Facts]").as_deref(),
        Some("CREATE CLUSTERED COLUMNSTORE INDEX [CCI_Facts] ON [dbo].[Facts]")
    );
}

#[test]
fn test_create_nonclustered_columnstore_lists_columns() {
    let mut index = Index::new("NCCI_Facts", IndexType::NonclusteredColumnstore);
    index.included_columns = vec![
        IndexedColumn::new("Amount", 2),
        IndexedColumn::new("Day", 1),
    ];
    assert_eq!(
        render_create_index(&index, "[dbo].[Facts]").as_deref(),
        Some("CREATE NONCLUSTERED COLUMNSTORE INDEX [NCCI_Facts] ON [dbo].[Facts] ([Day], [Amount])")
    );
}

#[test]
fn test_xml_and_spatial_indexes_are_not_scripted() {
    let xml = Index::new("XML_Doc", IndexType::Xml);
    let spatial = Index::new("SP_Location", IndexType::Spatial);
    assert_eq!(render_create_index(&xml, "[dbo].[Docs]"), None);
    assert_eq!(render_create_index(&spatial, "[dbo].[Places]"), None);
}
