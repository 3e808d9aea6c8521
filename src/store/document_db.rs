//! SQLite-backed document store
//!
//! Documents are schema-less JSON bodies addressed by `(collection, id)`.
//! The store assigns a UUID at insert time and echoes it inside the body, so
//! a fetched document carries its own identifier.

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Mutex;
use uuid::Uuid;

use crate::error::Result;
use crate::types::{DeleteAck, InsertAck, UpdateAck};

/// SQLite database holding all document collections
pub struct DocumentDb {
    conn: Mutex<Connection>,
}

impl DocumentDb {
    /// Open or create the database
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Open an in-memory database (tests)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                body TEXT NOT NULL,
                created_at TEXT NOT NULL,
                PRIMARY KEY (collection, id)
            );

            CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents(collection);
            "#,
        )?;

        Ok(())
    }

    /// Insert a new document, assigning it a fresh identifier
    pub fn insert_one(&self, collection: &str, mut body: Map<String, Value>) -> Result<InsertAck> {
        let id = Uuid::new_v4();
        body.insert("id".into(), Value::String(id.to_string()));

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO documents (collection, id, body, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                collection,
                id.to_string(),
                serde_json::to_string(&Value::Object(body))?,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;

        Ok(InsertAck {
            acknowledged: true,
            inserted_id: id,
        })
    }

    /// Fetch every document in a collection, in store order
    pub fn find_all(&self, collection: &str) -> Result<Vec<Value>> {
        let bodies = {
            let conn = self.conn.lock().unwrap();
            let mut stmt = conn.prepare("SELECT body FROM documents WHERE collection = ?1")?;
            let bodies: Vec<String> = stmt
                .query_map(params![collection], |row| row.get(0))?
                .collect::<std::result::Result<_, _>>()?;
            bodies
        };

        parse_bodies(bodies)
    }

    /// Fetch at most `limit` documents, in store order
    pub fn find_limit(&self, collection: &str, limit: usize) -> Result<Vec<Value>> {
        let bodies = {
            let conn = self.conn.lock().unwrap();
            let mut stmt =
                conn.prepare("SELECT body FROM documents WHERE collection = ?1 LIMIT ?2")?;
            let bodies: Vec<String> = stmt
                .query_map(params![collection, limit as i64], |row| row.get(0))?
                .collect::<std::result::Result<_, _>>()?;
            bodies
        };

        parse_bodies(bodies)
    }

    /// Fetch a single document by identifier
    pub fn find_one(&self, collection: &str, id: Uuid) -> Result<Option<Value>> {
        let body: Option<String> = {
            let conn = self.conn.lock().unwrap();
            conn.query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id.to_string()],
                |row| row.get(0),
            )
            .optional()?
        };

        match body {
            Some(body) => Ok(Some(serde_json::from_str(&body)?)),
            None => Ok(None),
        }
    }

    /// Fetch documents whose top-level `field` equals `value`
    pub fn find_eq(&self, collection: &str, field: &str, value: &str) -> Result<Vec<Value>> {
        let bodies = {
            let conn = self.conn.lock().unwrap();
            let mut stmt = conn.prepare(
                "SELECT body FROM documents WHERE collection = ?1 AND json_extract(body, ?2) = ?3",
            )?;
            let bodies: Vec<String> = stmt
                .query_map(params![collection, format!("$.{}", field), value], |row| {
                    row.get(0)
                })?
                .collect::<std::result::Result<_, _>>()?;
            bodies
        };

        parse_bodies(bodies)
    }

    /// Atomically add `delta` to a numeric field of one document.
    ///
    /// The arithmetic happens inside a single UPDATE, so concurrent callers
    /// cannot lose each other's adjustments. A missing field counts as 0, and
    /// a missing document is silently created (upsert), carrying only the
    /// identifier and the adjusted field.
    pub fn adjust_field(
        &self,
        collection: &str,
        id: Uuid,
        field: &str,
        delta: i64,
    ) -> Result<UpdateAck> {
        let conn = self.conn.lock().unwrap();

        let affected = conn.execute(
            r#"
            UPDATE documents
            SET body = json_set(body, ?1, COALESCE(json_extract(body, ?1), 0) + ?2)
            WHERE collection = ?3 AND id = ?4
            "#,
            params![format!("$.{}", field), delta, collection, id.to_string()],
        )?;

        if affected > 0 {
            return Ok(UpdateAck {
                acknowledged: true,
                matched_count: affected as u64,
                modified_count: affected as u64,
                upserted_id: None,
            });
        }

        let mut body = Map::new();
        body.insert("id".into(), Value::String(id.to_string()));
        body.insert(field.into(), Value::from(delta));

        conn.execute(
            "INSERT INTO documents (collection, id, body, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                collection,
                id.to_string(),
                serde_json::to_string(&Value::Object(body))?,
                chrono::Utc::now().to_rfc3339(),
            ],
        )?;

        Ok(UpdateAck {
            acknowledged: true,
            matched_count: 0,
            modified_count: 0,
            upserted_id: Some(id),
        })
    }

    /// Delete a single document by identifier.
    ///
    /// Deleting an absent document is a zero-count success.
    pub fn delete_one(&self, collection: &str, id: Uuid) -> Result<DeleteAck> {
        let conn = self.conn.lock().unwrap();
        let affected = conn.execute(
            "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
            params![collection, id.to_string()],
        )?;

        Ok(DeleteAck {
            acknowledged: true,
            deleted_count: affected as u64,
        })
    }

    /// Count documents in a collection
    pub fn count(&self, collection: &str) -> Result<u64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE collection = ?1",
            params![collection],
            |row| row.get(0),
        )?;

        Ok(count as u64)
    }
}

fn parse_bodies(bodies: Vec<String>) -> Result<Vec<Value>> {
    bodies
        .iter()
        .map(|body| serde_json::from_str(body).map_err(Into::into))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(fields: Value) -> Map<String, Value> {
        fields.as_object().unwrap().clone()
    }

    #[test]
    fn test_insert_and_find_one() {
        let db = DocumentDb::open_in_memory().unwrap();

        let ack = db
            .insert_one("products", doc(json!({"email": "a@x.com", "quantity": 5})))
            .unwrap();
        assert!(ack.acknowledged);

        let found = db.find_one("products", ack.inserted_id).unwrap().unwrap();
        assert_eq!(found["email"], "a@x.com");
        assert_eq!(found["quantity"], 5);
        assert_eq!(found["id"], ack.inserted_id.to_string());
    }

    #[test]
    fn test_find_one_missing_is_none() {
        let db = DocumentDb::open_in_memory().unwrap();
        assert!(db.find_one("products", Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_find_limit_caps_results() {
        let db = DocumentDb::open_in_memory().unwrap();
        for i in 0..10 {
            db.insert_one("products", doc(json!({"email": "a@x.com", "n": i})))
                .unwrap();
        }

        assert_eq!(db.find_limit("products", 6).unwrap().len(), 6);
        assert_eq!(db.find_all("products").unwrap().len(), 10);
    }

    #[test]
    fn test_find_eq_matches_field() {
        let db = DocumentDb::open_in_memory().unwrap();
        db.insert_one("products", doc(json!({"email": "a@x.com"})))
            .unwrap();
        db.insert_one("products", doc(json!({"email": "b@x.com"})))
            .unwrap();
        db.insert_one("products", doc(json!({"email": "a@x.com"})))
            .unwrap();

        let mine = db.find_eq("products", "email", "a@x.com").unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|p| p["email"] == "a@x.com"));
    }

    #[test]
    fn test_adjust_field_is_cumulative() {
        let db = DocumentDb::open_in_memory().unwrap();
        let ack = db
            .insert_one("products", doc(json!({"email": "a@x.com", "quantity": 10})))
            .unwrap();

        let up = db
            .adjust_field("products", ack.inserted_id, "quantity", -1)
            .unwrap();
        assert_eq!(up.matched_count, 1);
        assert!(up.upserted_id.is_none());

        db.adjust_field("products", ack.inserted_id, "quantity", -1)
            .unwrap();
        db.adjust_field("products", ack.inserted_id, "quantity", 5)
            .unwrap();

        let found = db.find_one("products", ack.inserted_id).unwrap().unwrap();
        assert_eq!(found["quantity"], 13);
    }

    #[test]
    fn test_adjust_field_can_go_negative() {
        let db = DocumentDb::open_in_memory().unwrap();
        let ack = db
            .insert_one("products", doc(json!({"email": "a@x.com", "quantity": 0})))
            .unwrap();

        db.adjust_field("products", ack.inserted_id, "quantity", -1)
            .unwrap();

        let found = db.find_one("products", ack.inserted_id).unwrap().unwrap();
        assert_eq!(found["quantity"], -1);
    }

    #[test]
    fn test_adjust_field_upserts_missing_document() {
        let db = DocumentDb::open_in_memory().unwrap();
        let id = Uuid::new_v4();

        let ack = db.adjust_field("products", id, "quantity", 3).unwrap();
        assert_eq!(ack.matched_count, 0);
        assert_eq!(ack.upserted_id, Some(id));

        let found = db.find_one("products", id).unwrap().unwrap();
        assert_eq!(found["quantity"], 3);
        assert_eq!(found["id"], id.to_string());
    }

    #[test]
    fn test_delete_absent_is_zero_count() {
        let db = DocumentDb::open_in_memory().unwrap();

        let ack = db.delete_one("products", Uuid::new_v4()).unwrap();
        assert!(ack.acknowledged);
        assert_eq!(ack.deleted_count, 0);
    }

    #[test]
    fn test_delete_removes_document() {
        let db = DocumentDb::open_in_memory().unwrap();
        let ack = db
            .insert_one("products", doc(json!({"email": "a@x.com"})))
            .unwrap();

        let deleted = db.delete_one("products", ack.inserted_id).unwrap();
        assert_eq!(deleted.deleted_count, 1);
        assert!(db.find_one("products", ack.inserted_id).unwrap().is_none());

        // Idempotent: a second delete succeeds with zero count
        let again = db.delete_one("products", ack.inserted_id).unwrap();
        assert_eq!(again.deleted_count, 0);
    }

    #[test]
    fn test_collections_are_isolated() {
        let db = DocumentDb::open_in_memory().unwrap();
        db.insert_one("products", doc(json!({"email": "a@x.com"})))
            .unwrap();
        db.insert_one("blogs", doc(json!({"title": "Hello"}))).unwrap();

        assert_eq!(db.count("products").unwrap(), 1);
        assert_eq!(db.count("blogs").unwrap(), 1);
        assert_eq!(db.count("reviews").unwrap(), 0);
        assert_eq!(db.find_all("blogs").unwrap().len(), 1);
    }
}
