use chrono::{DateTime, Utc};

use super::domain::{
    Bid, BidId, BidStatus, Equipment, EquipmentId, Order, PoDetails, Rfq, RfqId, RfqStatus, Role,
    User, UserId, VendorProfile,
};

/// Insert payload for a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub role: Role,
    pub hashed_password: String,
    pub profile: VendorProfile,
}

/// Insert payload for a catalog entry.
#[derive(Debug, Clone)]
pub struct NewEquipment {
    pub name: String,
    pub category: String,
    pub specs: serde_json::Value,
    pub cert_required: bool,
    pub rental_period_days: u32,
}

/// Insert payload for a new RFQ; created `open`.
#[derive(Debug, Clone)]
pub struct NewRfq {
    pub client_id: UserId,
    pub equipment_id: EquipmentId,
    pub vendors: Vec<UserId>,
}

/// Insert payload for a new bid; created `pending`.
#[derive(Debug, Clone)]
pub struct NewBid {
    pub rfq_id: RfqId,
    pub vendor_id: UserId,
    pub price: f64,
    pub cert_file: Option<String>,
    pub availability: Option<String>,
}

/// The atomic order-placement unit. See [`ProcurementStore::place_order`].
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub bid_id: BidId,
    pub client_id: UserId,
    pub po_details: PoDetails,
    pub note: String,
    pub placed_at: DateTime<Utc>,
}

/// Row filter for order listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderScope {
    Client(UserId),
    Vendor(UserId),
    All,
}

/// Error enumeration for store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("rfq is not open")]
    RfqNotOpen,
    #[error("illegal status transition")]
    InvalidTransition,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction over the five entity kinds. Durability belongs to the
/// implementation; a relational backend sits behind this same trait.
pub trait ProcurementStore: Send + Sync {
    fn insert_user(&self, user: NewUser) -> Result<User, StoreError>;
    fn fetch_user(&self, id: UserId) -> Result<Option<User>, StoreError>;
    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    fn list_users(&self, role: Option<Role>) -> Result<Vec<User>, StoreError>;
    fn update_vendor_profile(
        &self,
        id: UserId,
        profile: VendorProfile,
    ) -> Result<User, StoreError>;

    fn insert_equipment(&self, equipment: NewEquipment) -> Result<Equipment, StoreError>;
    fn fetch_equipment(&self, id: EquipmentId) -> Result<Option<Equipment>, StoreError>;
    fn list_equipment(&self) -> Result<Vec<Equipment>, StoreError>;

    fn insert_rfq(&self, rfq: NewRfq) -> Result<Rfq, StoreError>;
    fn fetch_rfq(&self, id: RfqId) -> Result<Option<Rfq>, StoreError>;
    /// Newest first; optional status filter.
    fn list_rfqs(&self, status: Option<RfqStatus>) -> Result<Vec<Rfq>, StoreError>;
    /// Rejects backward transitions with [`StoreError::InvalidTransition`].
    fn update_rfq_status(&self, id: RfqId, status: RfqStatus) -> Result<Rfq, StoreError>;

    fn insert_bid(&self, bid: NewBid) -> Result<Bid, StoreError>;
    fn fetch_bid(&self, id: BidId) -> Result<Option<Bid>, StoreError>;
    fn bids_for_rfq(&self, rfq: RfqId) -> Result<Vec<Bid>, StoreError>;
    /// Newest first, across all RFQs.
    fn list_bids(&self) -> Result<Vec<Bid>, StoreError>;
    fn update_bid_status(&self, id: BidId, status: BidStatus) -> Result<Bid, StoreError>;

    /// Place a purchase order as one transaction. Inside that transaction the
    /// implementation must re-validate that the bid exists
    /// ([`StoreError::NotFound`]), that no order references the bid yet
    /// ([`StoreError::Conflict`]), and that the owning RFQ is still open
    /// ([`StoreError::RfqNotOpen`]); on success the order is inserted, the
    /// bid becomes `accepted`, and the RFQ becomes `closed`. Of two racing
    /// calls, exactly one succeeds.
    fn place_order(&self, order: PlaceOrder) -> Result<Order, StoreError>;
    fn find_order_for_bid(&self, bid: BidId) -> Result<Option<Order>, StoreError>;
    /// Newest first within the given scope.
    fn list_orders(&self, scope: OrderScope) -> Result<Vec<Order>, StoreError>;
}
