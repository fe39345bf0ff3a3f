//! SQLite-backed [`EntityStore`].

use std::collections::{HashMap, HashSet};

use atlas_core::{EntityKind, EntitySet, EntityStore, StoreError, entity::Value};
use camino::Utf8Path;
use rusqlite::{Connection, OptionalExtension, params_from_iter, types::Value as SqlValue};
use wkt::ToWkt;

use super::schema::{self, CODE_COLUMN, KEY_COLUMN};

/// Entity store writing one table per kind into a SQLite database.
///
/// Tables are created on first insert. Reading a kind that was never
/// written yields an empty result.
pub struct SqliteStore {
    connection: Connection,
}

impl SqliteStore {
    /// Open or create the database at `path`, creating parent directories.
    ///
    /// # Examples
    /// ```
    /// use atlas_core::{EntityKind, EntityStore};
    /// use atlas_data::SqliteStore;
    /// use camino::Utf8PathBuf;
    ///
    /// let dir = tempfile::tempdir().expect("create temp dir");
    /// let path = Utf8PathBuf::from_path_buf(dir.path().join("atlas.sqlite")).expect("utf-8 path");
    /// let store = SqliteStore::open(&path).expect("open store");
    /// assert!(store.keys(EntityKind::Gemeente).expect("keys").is_empty());
    /// ```
    pub fn open(path: &Utf8Path) -> Result<Self, StoreError> {
        atlas_fs::ensure_parent_dir(path)
            .map_err(|source| StoreError::backend(format!("create parent of {path}"), source))?;
        let connection = Connection::open(path.as_std_path())
            .map_err(|source| StoreError::backend(format!("open {path}"), source))?;
        Ok(Self { connection })
    }

    /// Private in-memory database.
    pub fn in_memory() -> Result<Self, StoreError> {
        let connection = Connection::open_in_memory()
            .map_err(|source| StoreError::backend("open in-memory database", source))?;
        Ok(Self { connection })
    }

    /// Underlying connection, for inspection.
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    fn table_exists(&self, kind: EntityKind) -> Result<bool, StoreError> {
        self.connection
            .prepare_cached("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1")
            .and_then(|mut statement| {
                statement
                    .query_row([kind.table_name()], |_| Ok(()))
                    .optional()
            })
            .map(|found| found.is_some())
            .map_err(|source| StoreError::backend(format!("look up table {kind}"), source))
    }

    fn query_pairs(&self, sql: &str, kind: EntityKind) -> Result<Vec<(String, String)>, StoreError> {
        let to_error = |source| StoreError::backend(format!("read {kind}"), source);
        let mut statement = self.connection.prepare(sql).map_err(to_error)?;
        let rows = statement
            .query_map([], |row| {
                Ok((
                    row.get::<_, Option<String>>(0)?,
                    row.get::<_, Option<String>>(1)?,
                ))
            })
            .map_err(to_error)?;
        let mut pairs = Vec::new();
        for row in rows {
            if let (Some(first), Some(second)) = row.map_err(to_error)? {
                pairs.push((first, second));
            }
        }
        Ok(pairs)
    }
}

fn to_sql(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Text(text) => SqlValue::Text(text),
        Value::Integer(number) => SqlValue::Integer(number),
        Value::Boolean(flag) => SqlValue::Integer(i64::from(flag)),
        Value::Date(date) => SqlValue::Text(date.format("%Y-%m-%d").to_string()),
        Value::Geometry(geometry) => SqlValue::Text(geometry.wkt_string()),
    }
}

impl EntityStore for SqliteStore {
    fn clear(&mut self, kind: EntityKind) -> Result<(), StoreError> {
        if !self.table_exists(kind)? {
            return Ok(());
        }
        self.connection
            .execute(&format!("DELETE FROM {}", kind.table_name()), [])
            .map(|_| ())
            .map_err(|source| StoreError::backend(format!("clear {kind}"), source))
    }

    fn keys(&self, kind: EntityKind) -> Result<HashSet<String>, StoreError> {
        if !kind.has_natural_key() {
            return Err(StoreError::NoNaturalKey { kind });
        }
        if !self.table_exists(kind)? {
            return Ok(HashSet::new());
        }
        let sql = format!(
            "SELECT {KEY_COLUMN}, {KEY_COLUMN} FROM {}",
            kind.table_name()
        );
        Ok(self
            .query_pairs(&sql, kind)?
            .into_iter()
            .map(|(key, _)| key)
            .collect())
    }

    fn code_index(&self, kind: EntityKind) -> Result<HashMap<String, String>, StoreError> {
        if !kind.has_code() {
            return Err(StoreError::NoCodeColumn { kind });
        }
        if !self.table_exists(kind)? {
            return Ok(HashMap::new());
        }
        let sql = format!(
            "SELECT {CODE_COLUMN}, {KEY_COLUMN} FROM {}",
            kind.table_name()
        );
        Ok(self.query_pairs(&sql, kind)?.into_iter().collect())
    }

    fn bulk_insert(&mut self, set: &EntitySet, batch_size: usize) -> Result<usize, StoreError> {
        let kind = set.kind();
        let columns = set.rows().columns();
        let to_error = |source| StoreError::backend(format!("insert {kind}"), source);
        let transaction = self.connection.transaction().map_err(to_error)?;
        transaction
            .execute(&schema::create_table(kind, columns), [])
            .map_err(to_error)?;

        let per_statement = schema::rows_per_statement(columns.len(), batch_size);
        let mut written = 0;
        let mut pending: Vec<SqlValue> = Vec::with_capacity(per_statement * columns.len());
        let mut pending_rows = 0;
        let mut flush = |values: &mut Vec<SqlValue>, rows: usize| -> Result<(), StoreError> {
            if rows == 0 {
                return Ok(());
            }
            let sql = schema::insert(kind, columns, rows);
            transaction
                .prepare_cached(&sql)
                .and_then(|mut statement| statement.execute(params_from_iter(values.drain(..))))
                .map_err(to_error)?;
            written += rows;
            Ok(())
        };
        for row in set.rows().value_rows() {
            pending.extend(row.into_iter().map(to_sql));
            pending_rows += 1;
            if pending_rows == per_statement {
                flush(&mut pending, pending_rows)?;
                pending_rows = 0;
            }
        }
        flush(&mut pending, pending_rows)?;
        drop(flush);

        transaction.commit().map_err(to_error)?;
        log::debug!("wrote {written} {kind} rows");
        Ok(written)
    }
}
