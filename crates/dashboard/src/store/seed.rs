//! Seed datasets: the built-in sample data and YAML seed files.
//!
//! A seed file has the same shape as [`SeedData`]:
//!
//! ```yaml
//! products:
//!   - id: 1
//!     name: มะเขือเทศสด
//!     price: { amount: "45" }
//!     unit: กก.
//!     stock: 50
//!     image: https://example.com/tomato.jpg
//! orders: []
//! contacts: []
//! loyalty: { balance: 0, lifetime_earned: 0 }
//! ```
//!
//! `messages`, `rewards` and `sales` may be omitted.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use farm2hand_core::chat::{ChatContact, ChatMessage, SELF_SENDER};
use farm2hand_core::loyalty::{LoyaltyAccount, Reward, default_rewards};
use farm2hand_core::order::{Order, OrderLine, TIMESTAMP_FORMAT};
use farm2hand_core::product::{Product, ProductImage};
use farm2hand_core::sales::SalesLedger;
use farm2hand_core::{
    ContactId, MAX_UNIT_PRICE_BAHT, MessageId, OrderNumber, OrderStatus, Price, ProductId,
    ProductStatus,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading a seed file.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid seed YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("seed data has {} problem(s): {}", .0.len(), .0.join("; "))]
    Invalid(Vec<String>),
}

/// Everything the dashboard starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedData {
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    pub contacts: Vec<ChatContact>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    pub loyalty: LoyaltyAccount,
    #[serde(default = "default_rewards")]
    pub rewards: Vec<Reward>,
    #[serde(default)]
    pub sales: SalesLedger,
}

impl SeedData {
    /// Parse a YAML seed and check it with [`validate_seed`].
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Parse` for malformed YAML and
    /// `SeedError::Invalid` listing every problem found.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SeedError> {
        let seed: Self = serde_yaml::from_str(yaml)?;
        let problems = validate_seed(&seed);
        if problems.is_empty() {
            Ok(seed)
        } else {
            Err(SeedError::Invalid(problems))
        }
    }

    /// Read and validate a seed file.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Io` when the file cannot be read, otherwise as
    /// [`SeedData::from_yaml_str`].
    pub fn load(path: &Path) -> Result<Self, SeedError> {
        let yaml = std::fs::read_to_string(path).map_err(|source| SeedError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    /// Serialize as YAML.
    ///
    /// # Errors
    ///
    /// Returns `SeedError::Parse` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, SeedError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// The sample farm: three products, four orders, four contacts with one
    /// conversation, and a points account.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            products: vec![
                product(1, "มะเขือเทศสด", 45, 50, 533_280, ProductStatus::Active),
                product(2, "แตงกวาญี่ปุ่น", 35, 30, 2_329_440, ProductStatus::Active),
                product(3, "ข้าวโพดหวาน", 25, 0, 547_263, ProductStatus::Inactive),
            ],
            orders: vec![
                Order {
                    number: OrderNumber::from("ORD001"),
                    customer_name: "คุณสมหญิง".to_string(),
                    customer_phone: "081-234-5678".to_string(),
                    lines: vec![line("มะเขือเทศสด", 5, 45)],
                    status: OrderStatus::Pending,
                    ordered_at: at("2024-01-15 10:30"),
                    delivery_at: None,
                    address: "123 หมู่ 5 ตำบลสามพราน อำเภอสามพราน จังหวัดนครปฐม 73110".to_string(),
                    note: Some("ขอมะเขือเทศสดใหม่ ไม่แก่จนเกินไป".to_string()),
                },
                Order {
                    number: OrderNumber::from("ORD002"),
                    customer_name: "ร้านผักสด ABC".to_string(),
                    customer_phone: "082-345-6789".to_string(),
                    lines: vec![line("แตงกวาญี่ปุ่น", 20, 35), line("ข้าวโพดหวาน", 10, 25)],
                    status: OrderStatus::Confirmed,
                    ordered_at: at("2024-01-15 09:15"),
                    delivery_at: Some(at("2024-01-16 08:00")),
                    address: "ตลาดสดเทศบาล ถนนเพชรเกษม กม.32 นครปฐม".to_string(),
                    note: None,
                },
                Order {
                    number: OrderNumber::from("ORD003"),
                    customer_name: "คุณมานี".to_string(),
                    customer_phone: "083-456-7890".to_string(),
                    lines: vec![line("มะม่วงน้ำดอกไม้", 3, 80)],
                    status: OrderStatus::Delivered,
                    ordered_at: at("2024-01-14 14:20"),
                    delivery_at: Some(at("2024-01-15 10:00")),
                    address: "456 ซอยลาดพร้าว 15 เขตจตุจักร กรุงเทพฯ 10900".to_string(),
                    note: None,
                },
                Order {
                    number: OrderNumber::from("ORD004"),
                    customer_name: "ตลาดสดใหม่".to_string(),
                    customer_phone: "084-567-8901".to_string(),
                    lines: vec![line("ผักกาดหอม", 15, 35)],
                    status: OrderStatus::Shipped,
                    ordered_at: at("2024-01-14 16:45"),
                    delivery_at: Some(at("2024-01-15 14:00")),
                    address: "ตลาดสดเมืองใหม่ ถนนพหลโยธิน กม.45 ปทุมธานี".to_string(),
                    note: None,
                },
            ],
            contacts: vec![
                contact(1, "ลูกค้าสมหญิง", "👩‍🌾", "มะเขือเทศยังมีไหมคะ", "10:30", 2, true),
                contact(2, "ร้านผักสด ABC", "🏪", "ขอสั่งแตงกวา 20 กิโล", "09:15", 0, false),
                contact(3, "คุณมานี", "👨‍💼", "ราคาข้าวโพดเท่าไหร่", "เมื่อวาน", 1, true),
                contact(4, "ตลาดสดใหม่", "🏬", "ขอบคุณสำหรับผลผลิตดีๆ", "เมื่อวาน", 0, false),
            ],
            messages: vec![
                message(1, Some("ลูกค้าสมหญิง"), "สวัสดีค่ะ มะเขือเทศยังมีไหมคะ", "10:25"),
                message(2, None, "สวัสดีครับ มีครับ เพิ่งเก็บเมื่อเช้า สดมากเลย", "10:26"),
                message(3, Some("ลูกค้าสมหญิง"), "ราคาเท่าไหร่คะ ขอ 5 กิโลได้ไหม", "10:28"),
                message(4, None, "กิโลละ 45 บาทครับ 5 กิโลรวม 225 บาท ส่งฟรีเลยครับ", "10:29"),
                message(5, Some("ลูกค้าสมหญิง"), "โอเคค่ะ สั่งเลย ส่งที่เดิมนะคะ", "10:30"),
            ],
            loyalty: LoyaltyAccount {
                balance: 1247,
                lifetime_earned: 2156,
            },
            rewards: default_rewards(),
            sales: SalesLedger {
                revenue: Price::baht(Decimal::from(2450)),
                points: 245,
                items: 12,
            },
        }
    }
}

/// Every problem with a seed dataset; empty when it is usable.
#[must_use]
pub fn validate_seed(seed: &SeedData) -> Vec<String> {
    let mut problems = Vec::new();

    let mut product_ids = HashSet::new();
    for p in &seed.products {
        if !product_ids.insert(p.id) {
            problems.push(format!("product {}: duplicate id", p.id));
        }
        if p.name.trim().is_empty() {
            problems.push(format!("product {}: name is empty", p.id));
        }
        if p.id.as_u32() == u32::MAX {
            problems.push(format!("product {}: id is out of range", p.id));
        }
        if !p.price.is_valid_unit_price() {
            problems.push(format!(
                "product {}: price must be positive and at most {MAX_UNIT_PRICE_BAHT} baht",
                p.id
            ));
        }
    }

    let mut order_numbers = HashSet::new();
    for o in &seed.orders {
        if !order_numbers.insert(&o.number) {
            problems.push(format!("order {}: duplicate number", o.number));
        }
        if o.lines.is_empty() {
            problems.push(format!("order {}: has no line items", o.number));
        }
        for line in &o.lines {
            if line.quantity == 0 {
                problems.push(format!(
                    "order {}: {} has zero quantity",
                    o.number, line.product_name
                ));
            }
            if !line.unit_price.is_valid_unit_price() {
                problems.push(format!(
                    "order {}: {} price must be positive and at most {MAX_UNIT_PRICE_BAHT} baht",
                    o.number, line.product_name
                ));
            }
        }
        let total = o.lines.iter().try_fold(Price::zero(), |sum, line| {
            line.unit_price
                .checked_times(line.quantity)
                .and_then(|line_total| sum.checked_add(line_total))
        });
        if total.is_none() {
            problems.push(format!("order {}: total is too large", o.number));
        }
    }

    let mut contact_ids = HashSet::new();
    for c in &seed.contacts {
        if !contact_ids.insert(c.id) {
            problems.push(format!("contact {}: duplicate id", c.id));
        }
    }

    let mut message_ids = HashSet::new();
    for m in &seed.messages {
        if !message_ids.insert(m.id) {
            problems.push(format!("message {}: duplicate id", m.id));
        }
        if m.id.as_u32() == u32::MAX {
            problems.push(format!("message {}: id is out of range", m.id));
        }
        if !contact_ids.contains(&m.contact_id) {
            problems.push(format!(
                "message {}: unknown contact {}",
                m.id, m.contact_id
            ));
        }
    }

    for r in &seed.rewards {
        if r.cost == 0 {
            problems.push(format!("reward {}: cost must be positive", r.title));
        }
    }

    problems
}

fn at(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).unwrap_or_default()
}

fn product(
    id: u32,
    name: &str,
    price: i64,
    stock: u32,
    photo: u32,
    status: ProductStatus,
) -> Product {
    let link = format!(
        "https://images.pexels.com/photos/{photo}/pexels-photo-{photo}.jpeg?auto=compress&cs=tinysrgb&w=300"
    );
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        price: Price::baht(Decimal::from(price)),
        unit: "กก.".to_string(),
        stock,
        image: ProductImage::from_url(&link).unwrap_or_else(|_| ProductImage::default_image()),
        status,
    }
}

fn line(name: &str, quantity: u32, unit_price: i64) -> OrderLine {
    OrderLine {
        product_name: name.to_string(),
        quantity,
        unit: "กก.".to_string(),
        unit_price: Price::baht(Decimal::from(unit_price)),
    }
}

fn contact(
    id: u32,
    name: &str,
    avatar: &str,
    last_message: &str,
    last_message_time: &str,
    unread: u32,
    online: bool,
) -> ChatContact {
    ChatContact {
        id: ContactId::new(id),
        name: name.to_string(),
        avatar: avatar.to_string(),
        last_message: last_message.to_string(),
        last_message_time: last_message_time.to_string(),
        unread,
        online,
    }
}

/// A message in the first contact's conversation; `sender: None` is the
/// seller.
fn message(id: u32, sender: Option<&str>, body: &str, clock: &str) -> ChatMessage {
    ChatMessage {
        id: MessageId::new(id),
        contact_id: ContactId::new(1),
        sender: sender.unwrap_or(SELF_SENDER).to_string(),
        body: body.to_string(),
        sent_at: at(&format!("2024-01-15 {clock}")),
        is_me: sender.is_none(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_seed_is_valid() {
        let seed = SeedData::builtin();
        assert!(validate_seed(&seed).is_empty());
        assert_eq!(seed.products.len(), 3);
        assert_eq!(seed.orders.len(), 4);
        assert_eq!(seed.contacts.len(), 4);
        assert_eq!(seed.messages.len(), 5);
    }

    #[test]
    fn test_builtin_order_totals() {
        let seed = SeedData::builtin();
        let totals: Vec<String> = seed.orders.iter().map(|o| o.total().display()).collect();
        assert_eq!(totals, ["฿225", "฿950", "฿240", "฿525"]);
    }

    #[test]
    fn test_yaml_round_trip_preserves_seed() {
        let seed = SeedData::builtin();
        let yaml = seed.to_yaml().unwrap();
        assert_eq!(SeedData::from_yaml_str(&yaml).unwrap(), seed);
    }

    #[test]
    fn test_minimal_yaml_uses_defaults() {
        let yaml = r#"
products:
  - id: 7
    name: มะนาว
    price: { amount: "3" }
    unit: ลูก
    stock: 120
    image: https://example.com/lime.jpg
orders: []
contacts: []
loyalty: { balance: 10, lifetime_earned: 10 }
"#;
        let seed = SeedData::from_yaml_str(yaml).unwrap();
        let lime = seed.products.first().unwrap();
        assert_eq!(lime.status, ProductStatus::Active);
        assert_eq!(seed.rewards, default_rewards());
        assert_eq!(seed.sales, SalesLedger::default());
        assert!(seed.messages.is_empty());
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let mut seed = SeedData::builtin();
        let first = seed.products.first().unwrap().clone();
        seed.products.push(first);
        if let Some(order) = seed.orders.first_mut() {
            order.lines.clear();
        }
        if let Some(message) = seed.messages.first_mut() {
            message.contact_id = ContactId::new(42);
        }

        let problems = validate_seed(&seed);
        assert_eq!(problems.len(), 3, "{problems:?}");
        assert!(problems.iter().any(|p| p.contains("duplicate id")));
        assert!(problems.iter().any(|p| p.contains("no line items")));
        assert!(problems.iter().any(|p| p.contains("unknown contact 42")));
    }

    #[test]
    fn test_validate_rejects_out_of_range_values() {
        let mut seed = SeedData::builtin();
        if let Some(product) = seed.products.last_mut() {
            product.id = ProductId::new(u32::MAX);
        }
        if let Some(product) = seed.products.first_mut() {
            product.price = Price::baht(Decimal::MAX);
        }
        if let Some(message) = seed.messages.last_mut() {
            message.id = MessageId::new(u32::MAX);
        }
        if let Some(line) = seed.orders.first_mut().and_then(|o| o.lines.first_mut()) {
            line.unit_price = Price::baht(Decimal::MAX);
            line.quantity = 2;
        }

        let problems = validate_seed(&seed);
        assert_eq!(problems.len(), 5, "{problems:?}");
        assert!(problems.iter().any(|p| p.starts_with("product 4294967295: id")));
        assert!(problems.iter().any(|p| p.starts_with("product 1: price")));
        assert!(problems.iter().any(|p| p.starts_with("message 4294967295: id")));
        assert!(problems.iter().any(|p| p.starts_with("order ORD001: มะเขือเทศสด price")));
        assert!(problems.iter().any(|p| p == "order ORD001: total is too large"));
    }

    #[test]
    fn test_invalid_yaml_is_rejected() {
        let err = SeedData::from_yaml_str("products: [").unwrap_err();
        assert!(matches!(err, SeedError::Parse(_)));

        let err = SeedData::from_yaml_str(
            "products: []\norders: []\ncontacts: []\nmessages:\n  - id: 1\n    contact_id: 3\n    sender: x\n    body: hi\n    sent_at: 2024-01-15 10:00\nloyalty: { balance: 0, lifetime_earned: 0 }\n",
        )
        .unwrap_err();
        assert!(matches!(err, SeedError::Invalid(ref p) if p.len() == 1));
    }
}
