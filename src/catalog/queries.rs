//! Catalog query texts
//!
//! Every query is parameter-free and read-only. Numeric catalog columns are cast
//! to INT/BIGINT/BIT so rows decode into `i32`, `i64` and `bool`.

/// First major version each dialect applies to
pub(crate) const SQL_2016: u16 = 13;
pub(crate) const SQL_2017: u16 = 14;
pub(crate) const SQL_2019: u16 = 15;

/// Pick the newest variant whose minimum version does not exceed `major`.
///
/// Servers older than every variant get the oldest one. `variants` must be
/// sorted by version.
pub(crate) fn select_dialect<const N: usize>(
    variants: &[(u16, &'static str); N],
    major: u16,
) -> &'static str {
    let mut chosen = variants[0].1;
    for &(minimum, sql) in variants.iter() {
        if major >= minimum {
            chosen = sql;
        }
    }
    chosen
}

pub(crate) const SERVER_VERSION: &str =
    "SELECT CAST(SERVERPROPERTY('ProductVersion') AS NVARCHAR(128)) AS product_version";

pub(crate) const DATABASE_COLLATION: &str =
    "SELECT CAST(DATABASEPROPERTYEX(DB_NAME(), 'Collation') AS NVARCHAR(128)) AS collation_name";

/// Display length for a type: character count, `max`, fractional-seconds scale
/// or float precision; NULL when the type takes no length.
macro_rules! display_length {
    ($type:literal, $source:literal) => {
        concat!(
            "CASE",
            " WHEN ", $type, ".name IN (N'varchar', N'char', N'varbinary', N'binary') THEN",
            " CASE WHEN ", $source, ".max_length = -1 THEN N'max' ELSE CAST(", $source, ".max_length AS NVARCHAR(10)) END",
            " WHEN ", $type, ".name IN (N'nvarchar', N'nchar') THEN",
            " CASE WHEN ", $source, ".max_length = -1 THEN N'max' ELSE CAST(", $source, ".max_length / 2 AS NVARCHAR(10)) END",
            " WHEN ", $type, ".name IN (N'datetime2', N'time', N'datetimeoffset') AND ", $source, ".scale <> 7",
            " THEN CAST(", $source, ".scale AS NVARCHAR(10))",
            " WHEN ", $type, ".name = N'float' AND ", $source, ".precision <> 53",
            " THEN CAST(", $source, ".precision AS NVARCHAR(10))",
            " END"
        )
    };
}

macro_rules! decimal_part {
    ($type:literal, $source:literal, $part:literal) => {
        concat!(
            "CASE WHEN ", $type, ".name IN (N'decimal', N'numeric') THEN CAST(",
            $source, ".", $part, " AS INT) END"
        )
    };
}

pub(crate) const PERMISSIONS: &str = "
SELECT CAST(dp.class AS INT) AS securable_class,
       COALESCE(s.name, SCHEMA_NAME(o.schema_id), SCHEMA_NAME(t.schema_id)) AS schema_name,
       COALESCE(o.name, t.name) AS object_name,
       pr.name AS grantee,
       dp.state_desc,
       dp.permission_name
FROM sys.database_permissions AS dp
JOIN sys.database_principals AS pr ON pr.principal_id = dp.grantee_principal_id
LEFT JOIN sys.schemas AS s ON dp.class = 3 AND s.schema_id = dp.major_id
LEFT JOIN sys.objects AS o ON dp.class = 1 AND o.object_id = dp.major_id
LEFT JOIN sys.types AS t ON dp.class = 6 AND t.user_type_id = dp.major_id
WHERE (dp.class = 3 AND s.schema_id IS NOT NULL)
   OR (dp.class = 1 AND dp.minor_id = 0 AND o.object_id IS NOT NULL AND o.is_ms_shipped = 0)
   OR (dp.class = 6 AND t.user_type_id IS NOT NULL)
ORDER BY schema_name, object_name, grantee, dp.state_desc, dp.permission_name";

pub(crate) const USER_TYPES: &str = concat!(
    "SELECT SCHEMA_NAME(t.schema_id) AS schema_name, t.name, t.is_table_type, bt.name AS base_type, ",
    display_length!("bt", "t"),
    " AS max_length, ",
    decimal_part!("bt", "t", "precision"),
    " AS precision, ",
    decimal_part!("bt", "t", "scale"),
    " AS scale, t.collation_name, t.is_nullable, tt.is_memory_optimized",
    " FROM sys.types AS t",
    " LEFT JOIN sys.types AS bt ON bt.user_type_id = t.system_type_id",
    " LEFT JOIN sys.table_types AS tt ON tt.user_type_id = t.user_type_id",
    " WHERE t.is_user_defined = 1 AND t.is_assembly_type = 0",
    " ORDER BY schema_name, t.name"
);

pub(crate) const COLUMNS: &str = concat!(
    "SELECT CASE WHEN tt.user_type_id IS NULL THEN CAST(0 AS BIT) ELSE CAST(1 AS BIT) END AS is_type_owner,",
    " COALESCE(SCHEMA_NAME(tt.schema_id), SCHEMA_NAME(o.schema_id)) AS owner_schema,",
    " COALESCE(tt.name, o.name) AS owner_name,",
    " CAST(c.column_id AS INT) AS column_id, c.name AS column_name,",
    " ty.name AS type_name, SCHEMA_NAME(ty.schema_id) AS type_schema, ty.is_user_defined, ",
    display_length!("ty", "c"),
    " AS max_length, ",
    decimal_part!("ty", "c", "precision"),
    " AS precision, ",
    decimal_part!("ty", "c", "scale"),
    " AS scale,",
    " c.is_nullable, c.collation_name,",
    " c.is_identity, CAST(ic.seed_value AS BIGINT) AS seed_value,",
    " CAST(ic.increment_value AS BIGINT) AS increment_value, ic.is_not_for_replication,",
    " cc.definition AS computed_definition, cc.is_persisted,",
    " dc.name AS default_name, dc.definition AS default_definition,",
    " c.is_sparse, c.is_column_set, c.is_filestream, c.is_rowguidcol, c.is_hidden,",
    " mc.masking_function,",
    " cek.name AS encryption_key, c.encryption_type_desc, c.encryption_algorithm_name,",
    " c.is_xml_document, SCHEMA_NAME(xsc.schema_id) AS xml_collection_schema, xsc.name AS xml_collection_name,",
    " CAST(c.generated_always_type AS INT) AS generated_always_type,",
    " CAST(ep.value AS NVARCHAR(MAX)) AS description",
    " FROM sys.columns AS c",
    " LEFT JOIN sys.tables AS o ON o.object_id = c.object_id AND o.is_ms_shipped = 0",
    " LEFT JOIN sys.table_types AS tt ON tt.type_table_object_id = c.object_id",
    " JOIN sys.types AS ty ON ty.user_type_id = c.user_type_id",
    " LEFT JOIN sys.identity_columns AS ic ON ic.object_id = c.object_id AND ic.column_id = c.column_id",
    " LEFT JOIN sys.computed_columns AS cc ON cc.object_id = c.object_id AND cc.column_id = c.column_id",
    " LEFT JOIN sys.default_constraints AS dc ON dc.parent_object_id = c.object_id AND dc.parent_column_id = c.column_id",
    " LEFT JOIN sys.masked_columns AS mc ON mc.object_id = c.object_id AND mc.column_id = c.column_id",
    " LEFT JOIN sys.column_encryption_keys AS cek ON cek.column_encryption_key_id = c.column_encryption_key_id",
    " LEFT JOIN sys.xml_schema_collections AS xsc ON c.xml_collection_id <> 0 AND xsc.xml_collection_id = c.xml_collection_id",
    " LEFT JOIN sys.extended_properties AS ep ON ep.class = 1 AND ep.major_id = c.object_id",
    " AND ep.minor_id = c.column_id AND ep.name = N'MS_Description'",
    " WHERE o.object_id IS NOT NULL OR tt.user_type_id IS NOT NULL",
    " ORDER BY owner_schema, owner_name, c.column_id"
);

macro_rules! index_query {
    ($optimize_for_sequential_key:literal) => {
        concat!(
            "SELECT CASE WHEN tt.user_type_id IS NULL THEN CAST(0 AS BIT) ELSE CAST(1 AS BIT) END AS is_type_owner,",
            " COALESCE(SCHEMA_NAME(tt.schema_id), SCHEMA_NAME(o.schema_id)) AS owner_schema,",
            " COALESCE(tt.name, o.name) AS owner_name,",
            " i.name AS index_name, i.type_desc, i.is_primary_key, i.is_unique, i.is_unique_constraint,",
            " i.ignore_dup_key, CAST(hi.bucket_count AS BIGINT) AS bucket_count, i.filter_definition,",
            " CAST(i.fill_factor AS INT) AS fill_factor, i.is_padded, i.allow_row_locks, i.allow_page_locks, ",
            $optimize_for_sequential_key,
            " AS optimize_for_sequential_key, i.is_disabled,",
            " col.name AS column_name, CAST(ic.key_ordinal AS INT) AS key_ordinal,",
            " CAST(ic.index_column_id AS INT) AS index_column_id, ic.is_descending_key, ic.is_included_column,",
            " COALESCE(CAST(iep.value AS NVARCHAR(MAX)), CAST(kep.value AS NVARCHAR(MAX))) AS description",
            " FROM sys.indexes AS i",
            " JOIN sys.objects AS o ON o.object_id = i.object_id",
            " LEFT JOIN sys.table_types AS tt ON o.type = 'TT' AND tt.type_table_object_id = o.object_id",
            " LEFT JOIN sys.hash_indexes AS hi ON hi.object_id = i.object_id AND hi.index_id = i.index_id",
            " LEFT JOIN sys.index_columns AS ic ON ic.object_id = i.object_id AND ic.index_id = i.index_id",
            " LEFT JOIN sys.columns AS col ON col.object_id = ic.object_id AND col.column_id = ic.column_id",
            " LEFT JOIN sys.key_constraints AS kc ON kc.parent_object_id = i.object_id AND kc.unique_index_id = i.index_id",
            " LEFT JOIN sys.extended_properties AS iep ON iep.class = 7 AND iep.major_id = i.object_id",
            " AND iep.minor_id = i.index_id AND iep.name = N'MS_Description'",
            " LEFT JOIN sys.extended_properties AS kep ON kep.class = 1 AND kep.major_id = kc.object_id",
            " AND kep.minor_id = 0 AND kep.name = N'MS_Description'",
            " WHERE o.type IN ('U', 'TT') AND o.is_ms_shipped = 0 AND i.type > 0 AND i.is_hypothetical = 0",
            " ORDER BY owner_schema, owner_name, i.name, ic.key_ordinal, ic.index_column_id"
        )
    };
}

const INDEXES_2016: &str = index_query!("CAST(0 AS BIT)");
const INDEXES_2019: &str = index_query!("i.optimize_for_sequential_key");

pub(crate) const INDEXES: [(u16, &str); 2] = [(SQL_2016, INDEXES_2016), (SQL_2019, INDEXES_2019)];

pub(crate) const FOREIGN_KEYS: &str = "
SELECT SCHEMA_NAME(fk.schema_id) AS schema_name, OBJECT_NAME(fk.parent_object_id) AS table_name,
       fk.name AS foreign_key_name,
       SCHEMA_NAME(ro.schema_id) AS referenced_schema, ro.name AS referenced_table,
       fk.delete_referential_action_desc, fk.update_referential_action_desc,
       fk.is_disabled, fk.is_not_trusted, fk.is_not_for_replication,
       CAST(fkc.constraint_column_id AS INT) AS ordinal,
       pc.name AS column_name, rc.name AS referenced_column,
       CAST(ep.value AS NVARCHAR(MAX)) AS description
FROM sys.foreign_keys AS fk
JOIN sys.objects AS ro ON ro.object_id = fk.referenced_object_id
JOIN sys.foreign_key_columns AS fkc ON fkc.constraint_object_id = fk.object_id
JOIN sys.columns AS pc ON pc.object_id = fkc.parent_object_id AND pc.column_id = fkc.parent_column_id
JOIN sys.columns AS rc ON rc.object_id = fkc.referenced_object_id AND rc.column_id = fkc.referenced_column_id
LEFT JOIN sys.extended_properties AS ep ON ep.class = 1 AND ep.major_id = fk.object_id
     AND ep.minor_id = 0 AND ep.name = N'MS_Description'
WHERE fk.is_ms_shipped = 0
ORDER BY schema_name, table_name, foreign_key_name, ordinal";

macro_rules! table_query {
    ($graph:literal, $retention:literal) => {
        concat!(
            "SELECT SCHEMA_NAME(t.schema_id) AS schema_name, t.name,",
            " ds.name AS data_space, CASE WHEN ds.type = 'PS' THEN CAST(1 AS BIT) ELSE CAST(0 AS BIT) END AS is_partition_scheme,",
            " pcol.name AS partition_column,",
            " lds.name AS lob_data_space, fds.name AS filestream_data_space,",
            " t.lock_escalation_desc, t.is_memory_optimized, t.durability_desc,",
            " CAST(t.temporal_type AS INT) AS temporal_type,",
            " SCHEMA_NAME(h.schema_id) AS history_schema, h.name AS history_name,",
            " t.is_tracked_by_cdc, t.is_filetable, ",
            $graph,
            ", ",
            $retention,
            " FROM sys.tables AS t",
            " LEFT JOIN sys.indexes AS i ON i.object_id = t.object_id AND i.index_id IN (0, 1)",
            " LEFT JOIN sys.data_spaces AS ds ON ds.data_space_id = i.data_space_id",
            " LEFT JOIN sys.index_columns AS pic ON pic.object_id = i.object_id AND pic.index_id = i.index_id",
            " AND pic.partition_ordinal = 1",
            " LEFT JOIN sys.columns AS pcol ON pcol.object_id = pic.object_id AND pcol.column_id = pic.column_id",
            " LEFT JOIN sys.data_spaces AS lds ON lds.data_space_id = NULLIF(t.lob_data_space_id, 0)",
            " LEFT JOIN sys.data_spaces AS fds ON fds.data_space_id = NULLIF(t.filestream_data_space_id, 0)",
            " LEFT JOIN sys.tables AS h ON h.object_id = t.history_table_id",
            " WHERE t.is_ms_shipped = 0",
            " ORDER BY schema_name, t.name"
        )
    };
}

const TABLES_2016: &str = table_query!(
    "CAST(0 AS BIT) AS is_node, CAST(0 AS BIT) AS is_edge",
    "CAST(NULL AS INT) AS retention_period, CAST(NULL AS NVARCHAR(60)) AS retention_unit"
);
const TABLES_2017: &str = table_query!(
    "t.is_node, t.is_edge",
    "CAST(NULL AS INT) AS retention_period, CAST(NULL AS NVARCHAR(60)) AS retention_unit"
);
const TABLES_2019: &str = table_query!(
    "t.is_node, t.is_edge",
    "CAST(t.history_retention_period AS INT) AS retention_period, t.history_retention_period_unit_desc AS retention_unit"
);

pub(crate) const TABLES: [(u16, &str); 3] = [
    (SQL_2016, TABLES_2016),
    (SQL_2017, TABLES_2017),
    (SQL_2019, TABLES_2019),
];

/// Every scriptable object in kind order, then schema and name.
///
/// System schemas (ids below 5 and fixed-role schemas from 16384) and shipped
/// objects are left out.
pub(crate) const OBJECTS: &str = "
SELECT 1 AS kind_order, N'SCHEMA' AS object_kind, DB_NAME() AS catalog_name,
       s.name AS schema_name, s.name AS object_name, p.name AS owner_name,
       CAST(NULL AS NVARCHAR(MAX)) AS definition,
       CAST(NULL AS BIT) AS uses_ansi_nulls, CAST(NULL AS BIT) AS uses_quoted_identifier,
       CAST(ep.value AS NVARCHAR(MAX)) AS description,
       CAST(NULL AS NVARCHAR(128)) AS parent_name, CAST(NULL AS NVARCHAR(10)) AS parent_kind
FROM sys.schemas AS s
LEFT JOIN sys.database_principals AS p ON p.principal_id = s.principal_id
LEFT JOIN sys.extended_properties AS ep ON ep.class = 3 AND ep.major_id = s.schema_id
     AND ep.minor_id = 0 AND ep.name = N'MS_Description'
WHERE s.schema_id BETWEEN 5 AND 16383
UNION ALL
SELECT 2, CASE WHEN t.is_table_type = 1 THEN N'TABLE TYPE' ELSE N'DATA TYPE' END, DB_NAME(),
       SCHEMA_NAME(t.schema_id), t.name, NULL, NULL, NULL, NULL,
       CAST(ep.value AS NVARCHAR(MAX)), NULL, NULL
FROM sys.types AS t
LEFT JOIN sys.extended_properties AS ep ON ep.class = 6 AND ep.major_id = t.user_type_id
     AND ep.minor_id = 0 AND ep.name = N'MS_Description'
WHERE t.is_user_defined = 1 AND t.is_assembly_type = 0
UNION ALL
SELECT 3, N'BASE TABLE', DB_NAME(), SCHEMA_NAME(t.schema_id), t.name, NULL, NULL, NULL, NULL,
       CAST(ep.value AS NVARCHAR(MAX)), NULL, NULL
FROM sys.tables AS t
LEFT JOIN sys.extended_properties AS ep ON ep.class = 1 AND ep.major_id = t.object_id
     AND ep.minor_id = 0 AND ep.name = N'MS_Description'
WHERE t.is_ms_shipped = 0
UNION ALL
SELECT CASE o.type WHEN 'V' THEN 4 WHEN 'TR' THEN 5 WHEN 'P' THEN 7 ELSE 6 END,
       CASE o.type WHEN 'V' THEN N'VIEW' WHEN 'TR' THEN N'TRIGGER' WHEN 'P' THEN N'PROCEDURE' ELSE N'FUNCTION' END,
       DB_NAME(), SCHEMA_NAME(o.schema_id), o.name, NULL,
       m.definition, m.uses_ansi_nulls, m.uses_quoted_identifier,
       CAST(ep.value AS NVARCHAR(MAX)),
       po.name, CASE po.type WHEN 'U' THEN N'TABLE' WHEN 'V' THEN N'VIEW' END
FROM sys.objects AS o
JOIN sys.sql_modules AS m ON m.object_id = o.object_id
LEFT JOIN sys.objects AS po ON o.type = 'TR' AND po.object_id = o.parent_object_id
LEFT JOIN sys.extended_properties AS ep ON ep.class = 1 AND ep.major_id = o.object_id
     AND ep.minor_id = 0 AND ep.name = N'MS_Description'
WHERE o.is_ms_shipped = 0 AND o.type IN ('V', 'TR', 'FN', 'IF', 'TF', 'P')
ORDER BY kind_order, object_kind, schema_name, object_name";
