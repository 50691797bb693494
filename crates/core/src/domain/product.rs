use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price_cents: i64,
    pub stock: u32,
    pub description: Option<String>,
}

impl Product {
    pub fn price_display(&self) -> String {
        let sign = if self.price_cents < 0 { "-" } else { "" };
        let absolute = self.price_cents.unsigned_abs();
        format!("{sign}{}.{:02}", absolute / 100, absolute % 100)
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

#[cfg(test)]
mod tests {
    use super::{Product, ProductId};

    fn product(price_cents: i64) -> Product {
        Product {
            id: ProductId("1001".to_string()),
            name: "Laptop".to_string(),
            price_cents,
            stock: 10,
            description: None,
        }
    }

    #[test]
    fn price_display_formats_cents() {
        assert_eq!(product(599_900).price_display(), "5999.00");
        assert_eq!(product(99_950).price_display(), "999.50");
        assert_eq!(product(5).price_display(), "0.05");
    }

    #[test]
    fn stock_flag_reflects_quantity() {
        let mut item = product(100);
        assert!(item.in_stock());
        item.stock = 0;
        assert!(!item.in_stock());
    }
}
