use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

/// Accepts a JSON integer or a numeric string, normalizing identifier
/// representation at the boundary so membership tests stay plain equality.
fn flexible_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("an integer id or a numeric string")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<i64, E> {
            Ok(value)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<i64, E> {
            i64::try_from(value).map_err(|_| E::custom("id out of range"))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<i64, E> {
            value
                .trim()
                .parse::<i64>()
                .map_err(|_| E::custom(format!("invalid id '{value}'")))
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

/// Accepts a JSON number or a numeric string for price fields.
pub(crate) fn flexible_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    struct PriceVisitor;

    impl<'de> Visitor<'de> for PriceVisitor {
        type Value = f64;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a number or a numeric string")
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<f64, E> {
            Ok(value)
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<f64, E> {
            Ok(value as f64)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<f64, E> {
            Ok(value as f64)
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<f64, E> {
            value
                .trim()
                .parse::<f64>()
                .map_err(|_| E::custom(format!("invalid number '{value}'")))
        }
    }

    deserializer.deserialize_any(PriceVisitor)
}

pub(crate) fn flexible_f64_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "flexible_f64")] f64);

    let opt = Option::<Wrapper>::deserialize(deserializer)?;
    Ok(opt.map(|Wrapper(value)| value))
}

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        pub struct $name(pub i64);

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                flexible_i64(deserializer).map($name)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Identifier for a registered user of any role.
    UserId
);
entity_id!(
    /// Identifier for a catalog equipment entry.
    EquipmentId
);
entity_id!(
    /// Identifier for a request for quotation.
    RfqId
);
entity_id!(
    /// Identifier for a vendor bid.
    BidId
);
entity_id!(
    /// Identifier for a purchase order.
    OrderId
);

/// Caller roles recognized by the marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Vendor,
    Admin,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Vendor => "vendor",
            Role::Admin => "admin",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "client" => Some(Role::Client),
            "vendor" => Some(Role::Vendor),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// RFQ lifecycle. `open` is the only non-terminal state; transitions never
/// leave a terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RfqStatus {
    Open,
    Closed,
    Awarded,
    Cancelled,
}

impl RfqStatus {
    pub const fn label(self) -> &'static str {
        match self {
            RfqStatus::Open => "open",
            RfqStatus::Closed => "closed",
            RfqStatus::Awarded => "awarded",
            RfqStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "open" => Some(RfqStatus::Open),
            "closed" => Some(RfqStatus::Closed),
            "awarded" => Some(RfqStatus::Awarded),
            "cancelled" => Some(RfqStatus::Cancelled),
            _ => None,
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, RfqStatus::Open)
    }

    pub const fn can_transition_to(self, next: RfqStatus) -> bool {
        matches!(self, RfqStatus::Open) && next.is_terminal()
    }
}

/// Bid lifecycle: `pending` until accepted or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BidStatus {
    Pending,
    Accepted,
    Rejected,
}

impl BidStatus {
    pub const fn label(self) -> &'static str {
        match self {
            BidStatus::Pending => "pending",
            BidStatus::Accepted => "accepted",
            BidStatus::Rejected => "rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        !matches!(self, BidStatus::Pending)
    }

    pub const fn can_transition_to(self, next: BidStatus) -> bool {
        matches!(self, BidStatus::Pending) && next.is_terminal()
    }
}

/// Order lifecycle. Covered flows only ever produce `pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub const fn can_transition_to(self, next: OrderStatus) -> bool {
        matches!(self, OrderStatus::Pending) && !matches!(next, OrderStatus::Pending)
    }
}

/// Vendor-facing profile fields. Semantically meaningful only when the owning
/// user's role is `vendor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VendorProfile {
    pub company_name: Option<String>,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub certifications: Vec<String>,
    pub categories: Vec<String>,
    pub rating: f64,
    pub orders_count: u32,
    pub experience_years: u32,
}

impl Default for VendorProfile {
    fn default() -> Self {
        Self {
            company_name: None,
            contact_name: None,
            phone: None,
            certifications: Vec::new(),
            categories: Vec::new(),
            rating: 4.8,
            orders_count: 0,
            experience_years: 0,
        }
    }
}

/// A registered account. Never serialized directly; responses go through the
/// view assembler so the password hash cannot leak.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub hashed_password: String,
    pub profile: VendorProfile,
}

/// Catalog entry. Immutable reference data seeded once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Equipment {
    pub id: EquipmentId,
    pub name: String,
    pub category: String,
    pub specs: serde_json::Value,
    #[serde(rename = "certReq")]
    pub cert_required: bool,
    #[serde(rename = "rentalPeriod")]
    pub rental_period_days: u32,
}

/// A client's solicitation of bids for one equipment item from an explicit
/// set of invited vendors.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rfq {
    pub id: RfqId,
    pub client_id: UserId,
    pub equipment_id: EquipmentId,
    pub vendors: Vec<UserId>,
    pub status: RfqStatus,
    pub created_at: DateTime<Utc>,
}

impl Rfq {
    /// Invitation membership test. Identifiers are normalized at the
    /// boundary, so this is plain typed equality.
    pub fn invites(&self, vendor: UserId) -> bool {
        self.vendors.contains(&vendor)
    }
}

/// A vendor's priced response to an RFQ.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: BidId,
    pub rfq_id: RfqId,
    pub vendor_id: UserId,
    pub price: f64,
    pub cert_file: Option<String>,
    pub availability: Option<String>,
    pub status: BidStatus,
    pub created_at: DateTime<Utc>,
}

/// Purchase-order header stamped at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoDetails {
    pub po_number: String,
    pub generated_at: DateTime<Utc>,
    pub price: f64,
}

/// Append-only record of an order status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderHistoryEntry {
    pub status: OrderStatus,
    pub date: DateTime<Utc>,
    pub note: String,
}

/// The commitment record created when a client accepts a bid. Exactly one
/// order may ever reference a bid.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub bid_id: BidId,
    pub client_id: UserId,
    pub vendor_id: UserId,
    pub po_details: PoDetails,
    pub status: OrderStatus,
    pub history: Vec<OrderHistoryEntry>,
    pub created_at: DateTime<Utc>,
}
