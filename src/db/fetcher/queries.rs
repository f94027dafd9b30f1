//! Catalog SQL used by the metadata fetchers.
//!
//! Every query aliases its output to the labels the row mappers read
//! (`name`, `column_name`, ...). Trigger queries keep the catalog's own labels;
//! MySQL reports them in uppercase and the mapper reads them case-insensitively.

/// Bound as `(schema, table)`.
pub mod mysql {
    pub const PRIMARY_KEY: &str = r#"
        SELECT
            tc.CONSTRAINT_NAME AS name,
            kcu.COLUMN_NAME AS column_name
        FROM information_schema.TABLE_CONSTRAINTS tc
        JOIN information_schema.KEY_COLUMN_USAGE kcu
            ON tc.CONSTRAINT_NAME = kcu.CONSTRAINT_NAME
            AND tc.TABLE_SCHEMA = kcu.TABLE_SCHEMA
            AND tc.TABLE_NAME = kcu.TABLE_NAME
        WHERE tc.CONSTRAINT_TYPE = 'PRIMARY KEY'
            AND tc.TABLE_SCHEMA = ?
            AND tc.TABLE_NAME = ?
        ORDER BY kcu.ORDINAL_POSITION
        "#;

    pub const FOREIGN_KEYS: &str = r#"
        SELECT
            kcu.CONSTRAINT_NAME AS name,
            kcu.COLUMN_NAME AS column_name,
            kcu.REFERENCED_TABLE_NAME AS referenced_table,
            kcu.REFERENCED_COLUMN_NAME AS referenced_column
        FROM information_schema.KEY_COLUMN_USAGE kcu
        JOIN information_schema.TABLE_CONSTRAINTS tc
            ON tc.CONSTRAINT_NAME = kcu.CONSTRAINT_NAME
            AND tc.TABLE_SCHEMA = kcu.TABLE_SCHEMA
            AND tc.TABLE_NAME = kcu.TABLE_NAME
        WHERE tc.CONSTRAINT_TYPE = 'FOREIGN KEY'
            AND kcu.TABLE_SCHEMA = ?
            AND kcu.TABLE_NAME = ?
        ORDER BY kcu.CONSTRAINT_NAME, kcu.ORDINAL_POSITION
        "#;

    pub const INDEXES: &str = r#"
        SELECT
            INDEX_NAME AS name,
            COLUMN_NAME AS column_name,
            NON_UNIQUE AS non_unique
        FROM information_schema.STATISTICS
        WHERE TABLE_SCHEMA = ?
            AND TABLE_NAME = ?
            AND INDEX_NAME <> 'PRIMARY'
        ORDER BY INDEX_NAME, SEQ_IN_INDEX
        "#;

    pub const TRIGGERS: &str = r#"
        SELECT
            TRIGGER_NAME,
            EVENT_MANIPULATION,
            ACTION_TIMING,
            ACTION_STATEMENT
        FROM information_schema.TRIGGERS
        WHERE TRIGGER_SCHEMA = ?
            AND EVENT_OBJECT_TABLE = ?
        ORDER BY TRIGGER_NAME
        "#;
}

/// Bound as `(table)`; scoped to the connected database only.
pub mod postgres {
    pub const PRIMARY_KEY: &str = r#"
        SELECT
            tc.constraint_name::text AS name,
            kcu.column_name::text AS column_name
        FROM information_schema.table_constraints tc
        JOIN information_schema.key_column_usage kcu
            ON tc.constraint_name = kcu.constraint_name
            AND tc.table_schema = kcu.table_schema
            AND tc.table_name = kcu.table_name
        WHERE tc.constraint_type = 'PRIMARY KEY'
            AND tc.table_name = $1
        ORDER BY kcu.ordinal_position
        "#;

    // Columns are paired by position in conkey/confkey, which also covers
    // keys that reference a unique index rather than a unique constraint.
    pub const FOREIGN_KEYS: &str = r#"
        SELECT
            con.conname::text AS name,
            att.attname::text AS column_name,
            ref.relname::text AS referenced_table,
            ref_att.attname::text AS referenced_column,
            k.ord::int AS position
        FROM pg_catalog.pg_constraint con
        JOIN pg_catalog.pg_class rel
            ON rel.oid = con.conrelid
        JOIN pg_catalog.pg_class ref
            ON ref.oid = con.confrelid
        CROSS JOIN LATERAL unnest(con.conkey, con.confkey)
            WITH ORDINALITY AS k(attnum, ref_attnum, ord)
        JOIN pg_catalog.pg_attribute att
            ON att.attrelid = con.conrelid
            AND att.attnum = k.attnum
        JOIN pg_catalog.pg_attribute ref_att
            ON ref_att.attrelid = con.confrelid
            AND ref_att.attnum = k.ref_attnum
        WHERE con.contype = 'f'
            AND rel.relname = $1
        ORDER BY name, position
        "#;

    pub const INDEXES: &str = r#"
        SELECT
            indexname::text AS name,
            indexdef AS definition
        FROM pg_indexes
        WHERE tablename = $1
            AND indexname NOT LIKE '%_pkey'
        ORDER BY indexname
        "#;

    pub const TRIGGERS: &str = r#"
        SELECT
            trigger_name::text AS trigger_name,
            event_manipulation::text AS event_manipulation,
            action_timing::text AS action_timing,
            action_statement::text AS action_statement
        FROM information_schema.triggers
        WHERE event_object_table = $1
        ORDER BY trigger_name, event_manipulation
        "#;
}
