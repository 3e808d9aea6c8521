//! Typed catalog operations over the document store
//!
//! Handlers talk to this facade; it owns the collection names and converts
//! between opaque document bodies and the typed `Product` shape. Blog and
//! review documents stay opaque — this layer never interprets them.

use std::path::Path;

use serde_json::{Map, Value};
use uuid::Uuid;

use super::document_db::DocumentDb;
use crate::error::{Error, Result};
use crate::types::{DeleteAck, InsertAck, NewProduct, Product, UpdateAck};

const PRODUCTS: &str = "products";
const BLOGS: &str = "blogs";
const REVIEWS: &str = "reviews";

/// Per-collection document counts, for the stats command
#[derive(Debug)]
pub struct CatalogCounts {
    pub products: u64,
    pub blogs: u64,
    pub reviews: u64,
}

/// Document store facade for the product catalog and content collections
pub struct CatalogStore {
    db: DocumentDb,
}

impl CatalogStore {
    /// Open or create the store at the given path
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            db: DocumentDb::open(path)?,
        })
    }

    /// Open an in-memory store (tests)
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            db: DocumentDb::open_in_memory()?,
        })
    }

    /// Insert a new product, returning the store's acknowledgment
    pub fn insert_product(&self, product: NewProduct) -> Result<InsertAck> {
        let body = match serde_json::to_value(&product)? {
            Value::Object(map) => map,
            _ => return Err(Error::InvalidDocument("product is not an object".into())),
        };
        self.db.insert_one(PRODUCTS, body)
    }

    /// All products, unfiltered and unbounded
    pub fn list_products(&self) -> Result<Vec<Product>> {
        parse_products(self.db.find_all(PRODUCTS)?)
    }

    /// At most `limit` products, in store order
    pub fn home_products(&self, limit: usize) -> Result<Vec<Product>> {
        parse_products(self.db.find_limit(PRODUCTS, limit)?)
    }

    /// A single product by identifier, or None if absent
    pub fn get_product(&self, id: Uuid) -> Result<Option<Product>> {
        match self.db.find_one(PRODUCTS, id)? {
            Some(body) => Ok(Some(parse_product(body)?)),
            None => Ok(None),
        }
    }

    /// Products whose owner email equals `email`
    pub fn products_by_owner(&self, email: &str) -> Result<Vec<Product>> {
        parse_products(self.db.find_eq(PRODUCTS, "email", email)?)
    }

    /// Delete a product by identifier; absent ids yield a zero-count ack
    pub fn delete_product(&self, id: Uuid) -> Result<DeleteAck> {
        self.db.delete_one(PRODUCTS, id)
    }

    /// Atomically decrement a product's quantity by one.
    ///
    /// No floor: the quantity may go negative. A missing product is upserted
    /// with quantity -1.
    pub fn decrement_quantity(&self, id: Uuid) -> Result<UpdateAck> {
        self.db.adjust_field(PRODUCTS, id, "quantity", -1)
    }

    /// Atomically add `amount` units to a product's quantity
    pub fn restock_quantity(&self, id: Uuid, amount: i64) -> Result<UpdateAck> {
        self.db.adjust_field(PRODUCTS, id, "quantity", amount)
    }

    /// All blog documents, opaque
    pub fn list_blogs(&self) -> Result<Vec<Value>> {
        self.db.find_all(BLOGS)
    }

    /// All review documents, opaque
    pub fn list_reviews(&self) -> Result<Vec<Value>> {
        self.db.find_all(REVIEWS)
    }

    /// Insert an opaque blog document (seeding)
    pub fn insert_blog(&self, body: Map<String, Value>) -> Result<InsertAck> {
        self.db.insert_one(BLOGS, body)
    }

    /// Insert an opaque review document (seeding)
    pub fn insert_review(&self, body: Map<String, Value>) -> Result<InsertAck> {
        self.db.insert_one(REVIEWS, body)
    }

    /// Per-collection document counts
    pub fn counts(&self) -> Result<CatalogCounts> {
        Ok(CatalogCounts {
            products: self.db.count(PRODUCTS)?,
            blogs: self.db.count(BLOGS)?,
            reviews: self.db.count(REVIEWS)?,
        })
    }
}

fn parse_product(body: Value) -> Result<Product> {
    serde_json::from_value(body).map_err(Into::into)
}

fn parse_products(bodies: Vec<Value>) -> Result<Vec<Product>> {
    bodies.into_iter().map(parse_product).collect()
}
