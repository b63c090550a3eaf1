pub mod migrations;
pub mod statements;

/// Loads a Postgres statement, rendering the aggregate's events table name in place of `{0}`.
macro_rules! statement {
    ($file:expr, $ty:ty $(,)?) => {{
        format!(include_str!($file), format!("{}_events", <$ty as $crate::Aggregate>::NAME))
    }};
}

pub(crate) use statement;
