use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rusqlite::types::Value;
use rusqlite::{Connection, Params};
use thiserror::Error;
use tracing::debug;

/// Database name that opens an in-memory connection.
pub const MEMORY: &str = ":memory:";

#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Failed to read SQL file {path:?}: {source}")]
    ReadSql {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DbError {
    /// True when a SQL file could not be found on disk.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DbError::ReadSql { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

pub type Result<T> = std::result::Result<T, DbError>;

/// One result row, values in column order.
pub type Row = Vec<Value>;
/// One result row keyed by column name or alias.
pub type Record = BTreeMap<String, Value>;

pub fn connect(database: &str) -> Result<Connection> {
    let conn = if database == MEMORY {
        Connection::open_in_memory()?
    } else {
        Connection::open(database)?
    };
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn connect_in_memory() -> Result<Connection> {
    connect(MEMORY)
}

/// Run `sql` once per parameter set inside one transaction.
pub fn insert_many<P: Params>(
    conn: &Connection,
    sql: &str,
    rows: impl IntoIterator<Item = P>,
) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare(sql)?;
        for params in rows {
            count += stmt.execute(params)?;
        }
    }
    tx.commit()?;
    Ok(count)
}

// ── Sample data ──

pub const CUSTOMERS_DDL: &str = "
    CREATE TABLE customers (
        id          INTEGER,
        name        VARCHAR,
        email       VARCHAR,
        city        VARCHAR,
        signup_date DATE,
        is_premium  BOOLEAN
    )";

const SAMPLE_CUSTOMERS: &[(i64, &str, &str, &str, &str, bool)] = &[
    (1, "Alice Johnson", "alice@example.com", "New York", "2024-01-15", true),
    (2, "Bob Smith", "bob@example.com", "San Francisco", "2024-02-20", false),
    (3, "Carol White", "carol@example.com", "Boston", "2024-01-10", true),
    (4, "David Brown", "david@example.com", "Seattle", "2024-03-05", false),
    (5, "Eve Davis", "eve@example.com", "Austin", "2024-02-28", true),
];

const SAMPLE_ORDERS: &[(i64, i64, &str, f64, &str)] = &[
    (1001, 1, "Widget", 150.50, "2024-03-01"),
    (1002, 2, "Gadget", 75.00, "2024-03-02"),
    (1003, 1, "Gizmo", 200.00, "2024-03-05"),
    (1004, 3, "Widget", 50.25, "2024-03-06"),
    (1005, 4, "Doohickey", 300.00, "2024-03-07"),
];

const SAMPLE_VENDORS: &[(i64, &str, Option<&str>)] = &[
    (1, "Acme Supplies", Some("Portland")),
    (2, "Global Parts", Some("Seattle")),
    (3, "Quick Ship", None),
];

const SAMPLE_STATS: &[(f64, i64)] = &[(100.0, 5), (200.0, 0), (50.0, 10)];

/// Create `customers` and load the five sample customers.
pub fn load_sample_customers(conn: &Connection) -> Result<usize> {
    conn.execute_batch(CUSTOMERS_DDL)?;
    insert_many(
        conn,
        "INSERT INTO customers VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        SAMPLE_CUSTOMERS
            .iter()
            .map(|(id, name, email, city, signup, premium)| {
                (id, name, email, city, signup, premium)
            }),
    )
}

/// Create `orders` and load the five sample orders.
pub fn load_sample_orders(conn: &Connection) -> Result<usize> {
    conn.execute_batch(
        "CREATE TABLE orders (
            id          INTEGER,
            customer_id INTEGER,
            product     VARCHAR,
            amount      DECIMAL(10, 2),
            order_date  DATE
        )",
    )?;
    insert_many(
        conn,
        "INSERT INTO orders VALUES (?1, ?2, ?3, ?4, ?5)",
        SAMPLE_ORDERS
            .iter()
            .map(|(id, customer, product, amount, date)| (id, customer, product, amount, date)),
    )
}

/// Add nullable columns to `customers`, filled with a mix of values and NULLs.
///
/// Requires [`load_sample_customers`] first.
pub fn load_null_columns(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        ALTER TABLE customers ADD COLUMN middle_name VARCHAR;
        ALTER TABLE customers ADD COLUMN nickname VARCHAR;
        ALTER TABLE customers ADD COLUMN phone VARCHAR;
        ALTER TABLE customers ADD COLUMN state VARCHAR;
        ALTER TABLE customers ADD COLUMN status VARCHAR;

        UPDATE customers SET
            middle_name = CASE WHEN id IN (1, 3) THEN 'Marie' ELSE NULL END,
            nickname    = CASE WHEN id IN (2, 5) THEN 'Bobby' ELSE NULL END,
            phone       = CASE WHEN id IN (1, 2, 4) THEN '555-0100' ELSE NULL END,
            state       = CASE WHEN id IN (1, 3, 5) THEN 'NY' ELSE NULL END,
            status      = CASE WHEN id IN (1, 2, 3) THEN 'active' ELSE NULL END;
        ",
    )?;
    Ok(())
}

pub fn load_sample_vendors(conn: &Connection) -> Result<usize> {
    conn.execute_batch(
        "CREATE TABLE vendors (
            id                INTEGER PRIMARY KEY,
            name              TEXT NOT NULL,
            headquarters_city TEXT
        )",
    )?;
    insert_many(
        conn,
        "INSERT INTO vendors VALUES (?1, ?2, ?3)",
        SAMPLE_VENDORS.iter().map(|(id, name, city)| (id, name, city)),
    )
}

/// Totals and counts for NULLIF examples; one row has a zero count.
pub fn load_sample_stats(conn: &Connection) -> Result<usize> {
    conn.execute_batch(
        "CREATE TABLE stats (
            total DECIMAL(10, 2),
            count INTEGER
        )",
    )?;
    insert_many(
        conn,
        "INSERT INTO stats VALUES (?1, ?2)",
        SAMPLE_STATS.iter().map(|(total, count)| (total, count)),
    )
}

// ── Queries ──

pub fn query_to_list(conn: &Connection, sql: &str) -> Result<Vec<Row>> {
    let mut stmt = conn.prepare(sql)?;
    let width = stmt.column_count();
    let rows = stmt
        .query_map([], |row| {
            (0..width)
                .map(|i| row.get::<_, Value>(i))
                .collect::<rusqlite::Result<Row>>()
        })?
        .collect::<rusqlite::Result<Vec<Row>>>()?;
    Ok(rows)
}

pub fn query_to_dict_list(conn: &Connection, sql: &str) -> Result<Vec<Record>> {
    let mut stmt = conn.prepare(sql)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let rows = stmt
        .query_map([], |row| {
            columns
                .iter()
                .enumerate()
                .map(|(i, name)| Ok((name.clone(), row.get::<_, Value>(i)?)))
                .collect::<rusqlite::Result<Record>>()
        })?
        .collect::<rusqlite::Result<Vec<Record>>>()?;
    Ok(rows)
}

/// Read a SQL file, trimmed.
pub fn load_sql_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| DbError::ReadSql {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text.trim().to_string())
}

/// Run every `;`-separated statement in a file, returning the rows of the last.
///
/// Fragments holding only comments are skipped. `None` means the file had
/// nothing executable.
pub fn execute_sql_file(conn: &Connection, path: impl AsRef<Path>) -> Result<Option<Vec<Row>>> {
    let content = load_sql_file(path)?;
    let mut result = None;
    for statement in content.split(';').map(str::trim).filter(|s| is_code(s)) {
        debug!("Executing: {}", statement);
        result = Some(query_to_list(conn, statement)?);
    }
    Ok(result)
}

/// True when a fragment has at least one line that is neither blank nor a comment.
fn is_code(fragment: &str) -> bool {
    fragment
        .lines()
        .map(str::trim)
        .any(|l| !l.is_empty() && !l.starts_with("--"))
}

// ── Introspection ──

pub fn table_names(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")?;
    let names = stmt
        .query_map([], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(names)
}

/// Column names of `table` in declaration order.
pub fn column_names(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid")?;
    let names = stmt
        .query_map([table], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(names)
}

// ── Values ──

/// Numeric view of a value; DECIMAL columns come back as integer or real.
pub fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Integer(i) => Some(*i as f64),
        Value::Real(r) => Some(*r),
        Value::Text(t) => t.parse().ok(),
        _ => None,
    }
}

pub fn as_text(value: &Value) -> Option<&str> {
    match value {
        Value::Text(t) => Some(t),
        _ => None,
    }
}

pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Real(r) => r.to_string(),
        Value::Text(t) => t.clone(),
        Value::Blob(b) => format!("<{} bytes>", b.len()),
    }
}

// ── Tests ──
