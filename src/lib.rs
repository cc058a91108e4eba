pub mod catalog;
pub mod config;
pub mod product;
pub mod session;
pub mod storage;

pub use catalog::*;
pub use config::*;
pub use product::*;
pub use session::*;
pub use storage::*;

use anyhow::Result;
use rust_decimal::Decimal;

pub const APP_NAME: &'static str = env!("CARGO_PKG_NAME");

// Store holds the product catalog in memory and writes all of it back to
// its storage after every change.
// The in-memory catalog is authoritative; storage is only a snapshot.
#[derive(Debug)]
pub struct Store<S: Storage> {
    storage: S,
    catalog: Catalog,
}

impl<S: Storage> Store<S> {
    // Open a store, loading whatever products the storage already holds.
    pub fn open(storage: S) -> Result<Store<S>> {
        let catalog = Catalog(storage.load()?);
        log::debug!("Loaded {} products", catalog.0.len());
        Ok(Store { storage, catalog })
    }

    // All products, in the order they were loaded or added.
    pub fn list(&self) -> &[Product] {
        &self.catalog.0
    }

    pub fn get(&self, id: i32) -> Option<&Product> {
        self.catalog.position(id).map(|idx| &self.catalog.0[idx])
    }

    // Add a new product under the next free ID and save.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        size: impl Into<String>,
        price: Decimal,
    ) -> Result<&Product> {
        let product = Product {
            id: self.catalog.next_id()?,
            name: name.into(),
            size: size.into(),
            price,
        };
        log::debug!("Adding {product:?}");
        self.catalog.0.push(product);
        self.persist()?;
        Ok(&self.catalog.0[self.catalog.0.len() - 1])
    }

    // Replace the name, size and price of the product with the given ID.
    // Returns None, without saving, if there is no such product.
    pub fn update(
        &mut self,
        id: i32,
        name: impl Into<String>,
        size: impl Into<String>,
        price: Decimal,
    ) -> Result<Option<&Product>> {
        let Some(idx) = self.catalog.position(id) else {
            log::debug!("No product {id} to update");
            return Ok(None);
        };
        let product = &mut self.catalog.0[idx];
        product.name = name.into();
        product.size = size.into();
        product.price = price;
        log::debug!("Updated {product:?}");
        self.persist()?;
        Ok(Some(&self.catalog.0[idx]))
    }

    // Remove the product with the given ID and save.
    // Returns None, without saving, if there is no such product.
    pub fn delete(&mut self, id: i32) -> Result<Option<Product>> {
        let Some(idx) = self.catalog.position(id) else {
            log::debug!("No product {id} to delete");
            return Ok(None);
        };
        let product = self.catalog.0.remove(idx);
        log::debug!("Deleted {product:?}");
        self.persist()?;
        Ok(Some(product))
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&mut self) -> Result<()> {
        self.storage.save(&self.catalog.0)
    }
}
