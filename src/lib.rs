//! Exercise tooling for the "SQL for Python Developers" blog series.
//!
//! [`blog`] turns series posts into numbered `.py` / `.sql` exercise files;
//! [`db`] seeds the sample tables those exercises run against.

pub mod blog;
pub mod db;
pub mod practice;
pub mod settings;
