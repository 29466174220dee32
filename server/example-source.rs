use std::collections::HashMap;

/// A customer order
pub struct Order {
    #[serde(rename = "orderId")]
    pub id: u64,
    pub customer: Customer,
    pub lines: Vec<OrderLine>,
    pub notes: Option<String>,
    pub attributes: HashMap<String, String>,
}

pub struct Customer {
    pub name: String,
    pub email: String,
}

pub struct OrderLine {
    pub sku: String,
    pub quantity: u32,
    pub price_cents: u64,
}

#[repr(u8)]
pub enum Status {
    Open,
    Paid,
    Shipped = 10,
}

impl Order {
    pub fn total(&self) -> u64 {
        self.lines.iter().map(|line| line.price_cents * line.quantity as u64).sum()
    }
}
