use crate::Product;
use anyhow::{Context, Result};

// Catalog is the full list of products in the store.
// It is stored as one product per line, in listing order:
// ```
// 1;Koszulka;M;49.99
// 2;Spodnie;L;89.50
// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Catalog(pub Vec<Product>);

impl Catalog {
    pub fn load(r: impl std::io::BufRead) -> Result<Self> {
        let mut products = vec![];
        for (idx, line) in r.lines().enumerate() {
            let line = line?;
            log::trace!("Parsing product line: {line}");
            let product = line
                .parse::<Product>()
                .with_context(|| format!("Invalid product on line {}", idx + 1))?;
            products.push(product);
        }
        Ok(Self(products))
    }

    // Write `products` in the same format `load` reads.
    pub fn save(products: &[Product], w: &mut impl std::io::Write) -> Result<()> {
        for product in products {
            writeln!(w, "{product}")?;
        }
        Ok(())
    }

    // The ID the next added product should receive.
    pub fn next_id(&self) -> Result<i32> {
        match self.0.iter().map(|p| p.id).max() {
            Some(max) => max
                .checked_add(1)
                .with_context(|| format!("No product IDs left after {max}")),
            None => Ok(1),
        }
    }

    pub fn position(&self, id: i32) -> Option<usize> {
        self.0.iter().position(|p| p.id == id)
    }
}
