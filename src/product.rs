use std::str::FromStr;

use anyhow::{bail, Context as _};
use rust_decimal::Decimal;

// The separator between fields of a stored product line.
// Fields are not escaped, so a name containing it cannot be stored.
pub const DELIMITER: char = ';';

// Product is a single entry in the store's catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i32,
    pub name: String,
    // Garment size label, e.g. "M" or "42".
    pub size: String,
    pub price: Decimal,
}

// Products are stored as "id;name;size;price".
impl std::fmt::Display for Product {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let d = DELIMITER;
        write!(f, "{}{d}{}{d}{}{d}{}", self.id, self.name, self.size, self.price)
    }
}

impl FromStr for Product {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::prelude::v1::Result<Self, Self::Err> {
        // Fields after the fourth are ignored.
        let fields: Vec<&str> = s.split(DELIMITER).collect();
        let [id, name, size, price, ..] = fields[..] else {
            bail!(
                "Expected at least 4 fields separated by '{DELIMITER}', got {}: {s:?}",
                fields.len()
            );
        };
        Ok(Self {
            id: id.parse().with_context(|| format!("Parsing id '{id}'"))?,
            name: name.into(),
            size: size.into(),
            price: price
                .parse()
                .with_context(|| format!("Parsing price '{price}'"))?,
        })
    }
}

#[cfg(test)]
fn product(id: i32, name: &str, size: &str, price: &str) -> Product {
    Product {
        id,
        name: name.into(),
        size: size.into(),
        price: price.parse().unwrap(),
    }
}

#[test]
fn test_format_product() {
    assert_eq!(
        product(1, "Koszulka", "M", "49.99").to_string(),
        "1;Koszulka;M;49.99"
    );
    // Scale is kept as entered.
    assert_eq!(
        product(2, "Spodnie", "L", "89.50").to_string(),
        "2;Spodnie;L;89.50"
    );
    assert_eq!(product(7, "Pasek", "", "15").to_string(), "7;Pasek;;15");
}

#[test]
fn test_parse_product() {
    let parse = |s: &str| s.parse::<Product>();
    assert_eq!(
        parse("1;Koszulka;M;49.99").unwrap(),
        product(1, "Koszulka", "M", "49.99")
    );
    assert_eq!(
        parse("12;Kurtka zimowa;XXL;399.00").unwrap(),
        product(12, "Kurtka zimowa", "XXL", "399.00")
    );
    assert_eq!(parse("3;;;0").unwrap(), product(3, "", "", "0"));
    assert_eq!(parse("0;Czapka;uni;10").unwrap(), product(0, "Czapka", "uni", "10"));
    assert_eq!(
        parse("-2;Koszulka;M;49.99").unwrap(),
        product(-2, "Koszulka", "M", "49.99")
    );
    assert_eq!(parse("1;a;b;5;6").unwrap(), product(1, "a", "b", "5"));
    assert_eq!(parse("1;a;b;5;").unwrap(), product(1, "a", "b", "5"));
    assert!(parse("").is_err());
    assert!(parse("1;Koszulka;M").is_err());
    assert!(parse("x;Koszulka;M;49.99").is_err());
    assert!(parse("1;Koszulka;M;tanio").is_err());
    assert!(parse("1.5;Koszulka;M;49.99").is_err());
    // An unescaped delimiter in the name shifts the fields.
    assert!(parse("1;Koszulka;polo;M;49.99").is_err());
}
