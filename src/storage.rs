use crate::{Catalog, Product};
use anyhow::{anyhow, bail, Context, Result};
use std::fs;
use std::io::{BufReader, BufWriter, Write as _};
use std::path::PathBuf;

// A place the store can read its products from and write them back to.
// Every save replaces whatever was stored before.
pub trait Storage {
    // Load all stored products, in stored order.
    // Storage that has never been written yields an empty list.
    fn load(&self) -> Result<Vec<Product>>;

    // Replace the stored products with `products`.
    fn save(&mut self, products: &[Product]) -> Result<()>;
}

// FileStorage keeps products in a single text file, one per line.
// The file is opened and closed within each call.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> FileStorage {
        FileStorage { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Storage for FileStorage {
    fn load(&self) -> Result<Vec<Product>> {
        let path = &self.path;
        log::debug!("Loading {path:?}");
        let file = match fs::File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("{path:?} does not exist, starting empty");
                return Ok(vec![]);
            }
            Err(e) => {
                bail!("Failed to open '{path:?}': {e}")
            }
        };
        let catalog =
            Catalog::load(BufReader::new(file)).with_context(|| format!("Loading {path:?}"))?;
        Ok(catalog.0)
    }

    // Truncates and rewrites the file in place.
    // A failure part way through leaves the file partially written.
    fn save(&mut self, products: &[Product]) -> Result<()> {
        let path = &self.path;
        log::debug!("Saving {} products to {path:?}", products.len());
        let parent = path
            .parent()
            .ok_or_else(|| anyhow!("No parent path: {path:?}"))?;
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| format!("Create {parent:?}"))?;
        }
        let file = fs::File::create(path).with_context(|| format!("Open {path:?}"))?;
        let mut writer = BufWriter::new(file);
        Catalog::save(products, &mut writer)?;
        writer.flush().with_context(|| format!("Write {path:?}"))?;
        Ok(())
    }
}

// MemoryStorage keeps the stored text in memory instead of on disk.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    bytes: Vec<u8>,
    saves: usize,
}

impl MemoryStorage {
    pub fn new() -> MemoryStorage {
        MemoryStorage::default()
    }

    // Start from previously stored text, as if read from a file.
    pub fn with_contents(text: impl Into<String>) -> MemoryStorage {
        MemoryStorage {
            bytes: text.into().into_bytes(),
            saves: 0,
        }
    }

    // The stored text exactly as a file would contain it.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    // How many times the products were saved.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Vec<Product>> {
        Ok(Catalog::load(self.bytes.as_slice())?.0)
    }

    fn save(&mut self, products: &[Product]) -> Result<()> {
        let mut bytes = Vec::new();
        Catalog::save(products, &mut bytes)?;
        self.bytes = bytes;
        self.saves += 1;
        Ok(())
    }
}

// Lets a caller keep ownership of the storage while a store uses it.
impl<S: Storage + ?Sized> Storage for &mut S {
    fn load(&self) -> Result<Vec<Product>> {
        (**self).load()
    }

    fn save(&mut self, products: &[Product]) -> Result<()> {
        (**self).save(products)
    }
}
