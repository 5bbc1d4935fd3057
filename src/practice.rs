use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rusqlite::types::Value;

use crate::db::{self, Record, Row};

/// Seed used when the caller doesn't pick one.
pub const DEFAULT_SEED: u64 = 42;

/// Signup dates fall within this many days before "today".
const SIGNUP_WINDOW_DAYS: i64 = 730;

const FIRST_NAMES: &[&str] = &[
    "James", "Mary", "Robert", "Patricia", "John", "Jennifer", "Michael", "Linda", "David",
    "Elizabeth", "William", "Barbara", "Richard", "Susan", "Joseph", "Jessica", "Thomas", "Sarah",
    "Charles", "Karen", "Daniel", "Nancy", "Matthew", "Lisa", "Anthony", "Betty",
];
const LAST_NAMES: &[&str] = &[
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Rodriguez",
    "Martinez", "Hernandez", "Lopez", "Gonzalez", "Wilson", "Anderson", "Thomas", "Taylor",
    "Moore", "Jackson", "Martin", "Lee", "Perez", "Thompson", "White",
];
const EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "example.net"];
const CITIES: &[&str] = &[
    "New York", "Los Angeles", "Chicago", "Houston", "Phoenix", "Philadelphia", "San Antonio",
    "San Diego", "Dallas", "Austin", "Seattle", "Denver", "Boston", "Portland", "Nashville",
];
/// One in four customers is premium.
const PREMIUM_CHOICES: &[bool] = &[true, false, false, false];

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub city: String,
    pub signup_date: NaiveDate,
    pub is_premium: bool,
}

/// Run the first exercise of the series: create a tiny table and read it back.
pub fn first_query() -> db::Result<Vec<Row>> {
    let conn = db::connect_in_memory()?;
    conn.execute_batch("CREATE TABLE data(name VARCHAR, score INTEGER)")?;
    db::insert_many(
        &conn,
        "INSERT INTO data VALUES (?1, ?2)",
        [("Alice", 95), ("Bob", 87), ("Carol", 92)],
    )?;
    db::query_to_list(&conn, "SELECT name, score FROM data")
}

/// Generate `count` fake customers. The same seed and `today` always give the same data.
pub fn generate_customer_data(count: usize, seed: u64, today: NaiveDate) -> Vec<Customer> {
    let mut rng = StdRng::seed_from_u64(seed);
    (1..=count as i64)
        .map(|id| {
            let first = pick(&mut rng, FIRST_NAMES);
            let last = pick(&mut rng, LAST_NAMES);
            let domain = pick(&mut rng, EMAIL_DOMAINS);
            let days_ago = rng.gen_range(0..=SIGNUP_WINDOW_DAYS);
            Customer {
                id,
                name: format!("{} {}", first, last),
                email: format!(
                    "{}.{}{}@{}",
                    first.to_lowercase(),
                    last.to_lowercase(),
                    rng.gen_range(1..100),
                    domain
                ),
                city: pick(&mut rng, CITIES).to_string(),
                signup_date: today - Duration::days(days_ago),
                is_premium: *PREMIUM_CHOICES.choose(&mut rng).unwrap_or(&false),
            }
        })
        .collect()
}

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items.choose(rng).copied().unwrap_or_default()
}

/// Load customers into a fresh in-memory `customers` table and read them all back.
pub fn load_customer_data(customers: &[Customer]) -> db::Result<Vec<Record>> {
    let conn = db::connect_in_memory()?;
    conn.execute_batch(db::CUSTOMERS_DDL)?;
    db::insert_many(
        &conn,
        "INSERT INTO customers VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        customers.iter().map(|c| {
            (
                c.id,
                c.name.as_str(),
                c.email.as_str(),
                c.city.as_str(),
                c.signup_date.format("%Y-%m-%d").to_string(),
                c.is_premium,
            )
        }),
    )?;
    db::query_to_dict_list(&conn, "SELECT * FROM customers ORDER BY id")
}

/// Parse a stored signup date back into a calendar date.
pub fn signup_date(record: &Record) -> Option<NaiveDate> {
    match record.get("signup_date")? {
        Value::Text(t) => NaiveDate::parse_from_str(t, "%Y-%m-%d").ok(),
        _ => None,
    }
}

// ── Tests ──
