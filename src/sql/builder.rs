//! Builds parameterized SELECT, INSERT, UPDATE, DELETE for a table from the store schema.

use crate::error::AppError;
use crate::store::TableSchema;
use regex::Regex;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// Field-keyed payload for insert and update.
pub type Record = Map<String, Value>;

/// Quote identifier for SQLite (safe: only after `check_identifier`).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn is_identifier(name: &str) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(name))
}

/// Reject anything that is not a plain SQL identifier.
pub fn check_identifier(name: &str) -> Result<(), AppError> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(AppError::InvalidIdentifier(name.to_string()))
    }
}

fn check_column(table: &TableSchema, column: &str) -> Result<(), AppError> {
    check_identifier(column)?;
    if table.columns.iter().any(|c| *c == column) {
        Ok(())
    } else {
        Err(AppError::InvalidIdentifier(format!("{}.{}", table.name, column)))
    }
}

fn checked_table(table: &TableSchema) -> Result<String, AppError> {
    check_identifier(table.name)?;
    Ok(quoted(table.name))
}

fn column_list(table: &TableSchema) -> String {
    table.columns.iter().map(|c| quoted(c)).collect::<Vec<_>>().join(", ")
}

#[derive(Debug, PartialEq)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Value>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Value) {
        self.params.push(v);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// ORDER BY a single column. Parses from clauses like `"id DESC"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn asc(column: impl Into<String>) -> Self {
        OrderBy {
            column: column.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(column: impl Into<String>) -> Self {
        OrderBy {
            column: column.into(),
            direction: Direction::Desc,
        }
    }
}

impl FromStr for OrderBy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let column = parts.next().ok_or_else(|| AppError::InvalidIdentifier(s.to_string()))?;
        check_identifier(column)?;
        let direction = match parts.next().map(str::to_ascii_uppercase).as_deref() {
            None | Some("ASC") => Direction::Asc,
            Some("DESC") => Direction::Desc,
            Some(_) => return Err(AppError::InvalidIdentifier(s.to_string())),
        };
        if parts.next().is_some() {
            return Err(AppError::InvalidIdentifier(s.to_string()));
        }
        Ok(OrderBy {
            column: column.to_string(),
            direction,
        })
    }
}

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = match self.direction {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        };
        write!(f, "{} {}", quoted(&self.column), dir)
    }
}

/// SELECT every row; storage order unless `order` is given.
pub fn select_all(table: &TableSchema, order: Option<&OrderBy>) -> Result<QueryBuf, AppError> {
    let mut q = QueryBuf::new();
    let name = checked_table(table)?;
    let order_clause = match order {
        Some(o) => {
            check_column(table, &o.column)?;
            format!(" ORDER BY {}", o)
        }
        None => String::new(),
    };
    q.sql = format!("SELECT {} FROM {}{}", column_list(table), name, order_clause);
    Ok(q)
}

/// SELECT by primary key.
pub fn select_by_id(table: &TableSchema, id: i64) -> Result<QueryBuf, AppError> {
    let mut q = QueryBuf::new();
    let name = checked_table(table)?;
    check_column(table, table.primary_key)?;
    q.push_param(Value::from(id));
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = ?",
        column_list(table),
        name,
        quoted(table.primary_key)
    );
    Ok(q)
}

pub fn exists_by_id(table: &TableSchema, id: i64) -> Result<QueryBuf, AppError> {
    let mut q = QueryBuf::new();
    let name = checked_table(table)?;
    check_column(table, table.primary_key)?;
    q.push_param(Value::from(id));
    q.sql = format!("SELECT 1 FROM {} WHERE {} = ? LIMIT 1", name, quoted(table.primary_key));
    Ok(q)
}

fn writable(table: &TableSchema, column: &str) -> Result<(), AppError> {
    check_column(table, column)?;
    if column == table.primary_key {
        return Err(AppError::InvalidIdentifier(format!(
            "{}.{} is assigned by storage",
            table.name, column
        )));
    }
    Ok(())
}

/// INSERT: one column and placeholder per record key. Empty record inserts defaults.
pub fn insert(table: &TableSchema, fields: &Record) -> Result<QueryBuf, AppError> {
    let mut q = QueryBuf::new();
    let name = checked_table(table)?;
    if fields.is_empty() {
        q.sql = format!("INSERT INTO {} DEFAULT VALUES", name);
        return Ok(q);
    }
    let mut cols = Vec::with_capacity(fields.len());
    let mut placeholders = Vec::with_capacity(fields.len());
    for (k, v) in fields {
        writable(table, k)?;
        q.push_param(v.clone());
        cols.push(quoted(k));
        placeholders.push("?");
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        name,
        cols.join(", "),
        placeholders.join(", ")
    );
    Ok(q)
}

/// UPDATE by id: SET each record key. `None` when there is nothing to set.
pub fn update(table: &TableSchema, id: i64, fields: &Record) -> Result<Option<QueryBuf>, AppError> {
    let mut q = QueryBuf::new();
    let name = checked_table(table)?;
    check_column(table, table.primary_key)?;
    let mut sets = Vec::with_capacity(fields.len());
    for (k, v) in fields {
        writable(table, k)?;
        q.push_param(v.clone());
        sets.push(format!("{} = ?", quoted(k)));
    }
    if sets.is_empty() {
        return Ok(None);
    }
    q.push_param(Value::from(id));
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = ?",
        name,
        sets.join(", "),
        quoted(table.primary_key)
    );
    Ok(Some(q))
}

/// DELETE by id.
pub fn delete(table: &TableSchema, id: i64) -> Result<QueryBuf, AppError> {
    let mut q = QueryBuf::new();
    let name = checked_table(table)?;
    check_column(table, table.primary_key)?;
    q.push_param(Value::from(id));
    q.sql = format!("DELETE FROM {} WHERE {} = ?", name, quoted(table.primary_key));
    Ok(q)
}
