//! Table definitions derived from the catalog's declarative constraint sets.
//!
//! Storage constraints mirror the validation rules, so a value the validator
//! accepts is always storable. Validation also rejects NUL characters, which
//! Postgres `TEXT` cannot hold.

use pulse_catalog::{EntitySchema, FieldKind};

/// Table holding insert-if-absent markers (see `SeedGuard`).
pub const SEED_MARKERS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS seed_markers (
    name TEXT PRIMARY KEY,
    claimed_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// Column names in storage order: id, schema fields, timestamps.
pub fn column_list(schema: &EntitySchema) -> Vec<&'static str> {
    let mut cols = vec!["id"];
    cols.extend(schema.fields.iter().map(|f| f.name));
    cols.extend(["created_at", "updated_at"]);
    cols
}

fn column_ddl(name: &str, kind: &FieldKind, default: Option<&str>) -> String {
    match kind {
        FieldKind::Text { min, max, .. } => match default {
            Some(d) => format!(
                "{name} TEXT NOT NULL DEFAULT '{d}' CHECK (char_length({name}) BETWEEN {min} AND {max})"
            ),
            None => format!("{name} TEXT NOT NULL CHECK (char_length({name}) BETWEEN {min} AND {max})"),
        },
        FieldKind::PositiveNumber => format!("{name} DOUBLE PRECISION NOT NULL CHECK ({name} > 0)"),
        // Per-item length can't be expressed as a CHECK without a subquery.
        FieldKind::TextList { max_items, .. } => format!(
            "{name} TEXT[] NOT NULL DEFAULT '{{}}' CHECK (cardinality({name}) <= {max_items})"
        ),
        FieldKind::Choice { options } => {
            let allowed = options
                .iter()
                .map(|o| format!("'{o}'"))
                .collect::<Vec<_>>()
                .join(", ");
            match default {
                Some(d) => format!("{name} TEXT NOT NULL DEFAULT '{d}' CHECK ({name} IN ({allowed}))"),
                None => format!("{name} TEXT NOT NULL CHECK ({name} IN ({allowed}))"),
            }
        }
    }
}

/// `CREATE TABLE IF NOT EXISTS` statement for an entity.
pub fn create_table_sql(schema: &EntitySchema) -> String {
    let mut columns = vec!["id UUID PRIMARY KEY".to_string()];
    columns.extend(
        schema
            .fields
            .iter()
            .map(|f| column_ddl(f.name, &f.kind, f.default)),
    );
    columns.push("created_at TIMESTAMPTZ NOT NULL".to_string());
    columns.push("updated_at TIMESTAMPTZ NOT NULL".to_string());

    format!(
        "CREATE TABLE IF NOT EXISTS {table} (\n    {cols}\n)",
        table = schema.kind.collection(),
        cols = columns.join(",\n    ")
    )
}

/// Index backing the newest-first listing.
pub fn create_index_sql(schema: &EntitySchema) -> String {
    let table = schema.kind.collection();
    format!("CREATE INDEX IF NOT EXISTS {table}_created_at_idx ON {table} (created_at DESC, id DESC)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_catalog::{contact, faq, product};

    #[test]
    fn product_columns_follow_schema_order() {
        assert_eq!(
            column_list(&product::SCHEMA),
            ["id", "name", "description", "price", "image", "category", "features", "created_at", "updated_at"]
        );
    }

    #[test]
    fn contact_columns_include_stored_only_status() {
        assert_eq!(
            column_list(&contact::SCHEMA),
            ["id", "name", "email", "message", "status", "created_at", "updated_at"]
        );
    }

    #[test]
    fn product_table_carries_validation_constraints() {
        let sql = create_table_sql(&product::SCHEMA);
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS products ("));
        assert!(sql.contains("name TEXT NOT NULL CHECK (char_length(name) BETWEEN 1 AND 100)"));
        assert!(sql.contains("description TEXT NOT NULL CHECK (char_length(description) BETWEEN 1 AND 500)"));
        assert!(sql.contains("price DOUBLE PRECISION NOT NULL CHECK (price > 0)"));
        assert!(sql.contains("features TEXT[] NOT NULL DEFAULT '{}' CHECK (cardinality(features) <= 10)"));
    }

    #[test]
    fn faq_category_default_is_shared_with_validator() {
        let sql = create_table_sql(&faq::SCHEMA);
        assert!(sql.contains(&format!("category TEXT NOT NULL DEFAULT '{}'", faq::DEFAULT_CATEGORY)));
    }

    #[test]
    fn contact_status_is_constrained_to_enum() {
        let sql = create_table_sql(&contact::SCHEMA);
        assert!(sql.contains(
            "status TEXT NOT NULL DEFAULT 'pending' CHECK (status IN ('pending', 'read', 'responded'))"
        ));
    }

    #[test]
    fn index_orders_like_the_listing() {
        assert_eq!(
            create_index_sql(&faq::SCHEMA),
            "CREATE INDEX IF NOT EXISTS faqs_created_at_idx ON faqs (created_at DESC, id DESC)"
        );
    }
}
