use crate::sql::statement;
use crate::Aggregate;

/// Queries of a [`crate::store::postgres::PgStore`], rendered once for its aggregate table.
#[derive(Clone, Debug)]
pub struct Statements {
    table_name: String,
    select_by_stream_id: String,
    select_version: String,
    insert: String,
}

impl Statements {
    pub fn new<A: Aggregate>() -> Self {
        Self {
            table_name: format!("{}_events", A::NAME),
            select_by_stream_id: statement!("postgres/statements/select_by_stream_id.sql", A),
            select_version: statement!("postgres/statements/select_version.sql", A),
            insert: statement!("postgres/statements/insert.sql", A),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn by_stream_id(&self) -> &str {
        &self.select_by_stream_id
    }

    pub fn version(&self) -> &str {
        &self.select_version
    }

    pub fn insert(&self) -> &str {
        &self.insert
    }
}
