//! SQLite catalog adapter.
//!
//! Exposes every user table of every attached schema as a relational entity
//! named `database.schema.table`, with declared foreign keys as defined
//! edges.
//!
//! # Catalog queries
//!
//! ```text
//! schemas       pragma_database_list            (minus "temp")
//! tables        "<schema>".sqlite_master        (type = 'table', no sqlite_*)
//! columns       pragma_table_info(table, schema)
//! foreign keys  pragma_foreign_key_list(table, schema)
//! ```

use std::cell::OnceCell;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OpenFlags};

use super::adapter::memoize;
use super::{DefinedEdge, SourceAdapter, SourceError, SourceResult, SourceShape};
use crate::model::{Entity, QualifiedName, Sample};

/// Relational source backed by a SQLite database file.
///
/// The database is opened read-only on first use and held for the lifetime
/// of the adapter.
pub struct SqliteSource {
    name: String,
    database: String,
    path: Option<PathBuf>,
    conn: OnceCell<Connection>,
    entities: OnceCell<Vec<Entity>>,
    edges: OnceCell<Vec<DefinedEdge>>,
}

impl SqliteSource {
    /// Create an adapter for a database file. Nothing is opened yet.
    ///
    /// The database component of identifiers defaults to the file stem.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let database = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "main".to_string());
        Self {
            name: database.clone(),
            database,
            path: Some(path),
            conn: OnceCell::new(),
            entities: OnceCell::new(),
            edges: OnceCell::new(),
        }
    }

    /// Wrap an already open connection (in-memory databases, tests).
    pub fn from_connection(database: impl Into<String>, conn: Connection) -> Self {
        let database = database.into();
        Self {
            name: database.clone(),
            database,
            path: None,
            conn: OnceCell::from(conn),
            entities: OnceCell::new(),
            edges: OnceCell::new(),
        }
    }

    /// Builder: set the source name stamped on entities.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder: override the database component of identifiers.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Database component of every identifier.
    pub fn database(&self) -> &str {
        &self.database
    }

    fn open_connection(&self) -> SourceResult<Connection> {
        let Some(path) = &self.path else {
            return Err(SourceError::connection(&self.database, "no database path"));
        };
        let target = path.display().to_string();
        if !path.is_file() {
            return Err(SourceError::connection(target, "database file does not exist"));
        }
        Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| SourceError::connection(target, e))
    }

    fn identifier(&self, schema: &str, table: &str) -> String {
        format!("{}.{}.{}", self.database, schema, table)
    }

    fn schemas(&self, conn: &Connection) -> SourceResult<Vec<String>> {
        let mut stmt = conn.prepare("SELECT name FROM pragma_database_list ORDER BY seq")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names.into_iter().filter(|n| n != "temp").collect())
    }

    fn tables(&self, conn: &Connection, schema: &str) -> SourceResult<Vec<String>> {
        let sql = format!(
            "SELECT name FROM {}.sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite\\_%' ESCAPE '\\' \
             ORDER BY name",
            quote_identifier(schema)
        );
        let mut stmt = conn.prepare(&sql)?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    fn load_entity(&self, conn: &Connection, schema: &str, table: &str) -> SourceResult<Entity> {
        let mut stmt =
            conn.prepare("SELECT name, type, pk FROM pragma_table_info(?1, ?2) ORDER BY cid")?;
        let rows = stmt
            .query_map(params![table, schema], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut columns = Vec::with_capacity(rows.len());
        let mut column_types = HashMap::new();
        let mut key_columns = Vec::new();
        for (column, data_type, pk) in rows {
            if pk > 0 {
                key_columns.push(column.clone());
            }
            if !data_type.is_empty() {
                column_types.insert(column.clone(), data_type);
            }
            columns.push(column);
        }

        let mut entity = Entity::new(&self.name, self.identifier(schema, table));
        // Composite keys are left to name-based election.
        if let [key] = key_columns.as_slice() {
            entity = entity.with_declared_primary_key(key.clone());
        }
        entity.set_columns(columns);
        entity.set_column_types(column_types);
        Ok(entity)
    }

    fn load_entities(&self) -> SourceResult<Vec<Entity>> {
        let conn = self.connection()?;
        let mut entities = Vec::new();
        for schema in self.schemas(conn)? {
            for table in self.tables(conn, &schema)? {
                entities.push(self.load_entity(conn, &schema, &table)?);
            }
        }
        tracing::debug!(
            source = %self.name,
            count = entities.len(),
            "listed sqlite entities"
        );
        Ok(entities)
    }

    fn load_edges(&self) -> SourceResult<Vec<DefinedEdge>> {
        let conn = self.connection()?;
        let entities = self.list_entities()?;
        let by_identifier: HashMap<String, &Entity> = entities
            .iter()
            .map(|e| (e.identifier().to_lowercase(), e))
            .collect();

        let mut edges = Vec::new();
        for entity in entities {
            let Ok(name) = QualifiedName::parse(entity.identifier()) else {
                continue;
            };
            let mut stmt = conn.prepare(
                "SELECT \"table\", \"from\", \"to\" FROM pragma_foreign_key_list(?1, ?2) ORDER BY id, seq",
            )?;
            let fks = stmt
                .query_map(params![name.table, name.schema], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, Option<String>>(2)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?;

            for (referenced_table, column, referenced_column) in fks {
                let referenced_id = self.identifier(name.schema, &referenced_table);
                let Some(referenced) = by_identifier.get(&referenced_id.to_lowercase()) else {
                    tracing::warn!(
                        entity = %entity.identifier(),
                        referenced = %referenced_id,
                        "foreign key references an unknown table, skipping"
                    );
                    continue;
                };
                if !entity.has_column(&column) {
                    tracing::warn!(
                        entity = %entity.identifier(),
                        column = %column,
                        "foreign key column not found, skipping"
                    );
                    continue;
                }
                let mut edge = DefinedEdge::new(entity.identifier(), referenced.identifier(), column);
                if let Some(referenced_column) = referenced_column {
                    edge = edge.with_referenced_column(referenced_column);
                }
                edges.push(edge);
            }
        }
        Ok(edges)
    }
}

impl SourceAdapter for SqliteSource {
    type Connection = Connection;

    fn name(&self) -> &str {
        &self.name
    }

    fn shape(&self) -> SourceShape {
        SourceShape::Relational
    }

    fn connection(&self) -> SourceResult<&Connection> {
        memoize(&self.conn, || self.open_connection())
    }

    fn list_entities(&self) -> SourceResult<&[Entity]> {
        memoize(&self.entities, || self.load_entities()).map(Vec::as_slice)
    }

    fn defined_edges(&self) -> SourceResult<&[DefinedEdge]> {
        memoize(&self.edges, || self.load_edges()).map(Vec::as_slice)
    }

    fn sample(&self, entity: &Entity, limit: usize) -> SourceResult<Sample> {
        let name = QualifiedName::parse(entity.identifier())
            .map_err(|_| SourceError::UnknownEntity(entity.identifier().to_string()))?;
        let conn = self.connection()?;

        let sql = format!(
            "SELECT * FROM {}.{} LIMIT ?1",
            quote_identifier(name.schema),
            quote_identifier(name.table)
        );
        let mut stmt = conn.prepare(&sql)?;
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let width = columns.len();

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut sample = Sample::new(columns);
        let mut rows = stmt.query(params![limit])?;
        while let Some(row) = rows.next()? {
            let mut values = Vec::with_capacity(width);
            for idx in 0..width {
                values.push(render_value(row.get_ref(idx)?));
            }
            sample.push_row(values);
        }
        Ok(sample)
    }
}

/// Quote an identifier for interpolation into SQL.
fn quote_identifier(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

fn render_value(value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(f.to_string()),
        ValueRef::Text(t) => Some(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => {
            let mut hex = String::with_capacity(b.len() * 2);
            for byte in b {
                let _ = write!(hex, "{byte:02x}");
            }
            Some(hex)
        }
    }
}
