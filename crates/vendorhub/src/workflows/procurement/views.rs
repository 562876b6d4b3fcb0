//! Read-side assembly: raw rows in, response shapes out. Every function here
//! is a pure transformation; errors can only come from the reads that feed it.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{
    Bid, BidId, BidStatus, Equipment, EquipmentId, Order, OrderHistoryEntry, OrderId, OrderStatus,
    PoDetails, Rfq, RfqId, RfqStatus, Role, User, UserId, VendorProfile,
};

/// Display-name fallback chain: name, then email, then the supplied literal.
pub fn display_name(user: Option<&User>, fallback: &str) -> String {
    match user {
        Some(user) if !user.name.trim().is_empty() => user.name.clone(),
        Some(user) if !user.email.trim().is_empty() => user.email.clone(),
        _ => fallback.to_string(),
    }
}

/// Public account shape; the password hash never crosses this boundary.
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub email: String,
    pub role: Role,
    pub name: String,
}

pub fn user_view(user: &User) -> UserView {
    UserView {
        id: user.id,
        email: user.email.clone(),
        role: user.role,
        name: user.name.clone(),
    }
}

/// Account shape including the vendor profile, for profile responses.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    pub id: UserId,
    pub email: String,
    pub role: Role,
    pub name: String,
    pub profile: VendorProfile,
}

pub fn profile_view(user: &User) -> ProfileView {
    ProfileView {
        id: user.id,
        email: user.email.clone(),
        role: user.role,
        name: user.name.clone(),
        profile: user.profile.clone(),
    }
}

/// Bid enriched with the vendor's display name.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BidView {
    pub id: BidId,
    pub rfq_id: RfqId,
    pub vendor_id: UserId,
    pub vendor_name: String,
    pub price: f64,
    pub cert_file: Option<String>,
    pub availability: Option<String>,
    pub status: BidStatus,
    pub created_at: DateTime<Utc>,
}

pub fn bid_view(bid: &Bid, vendor: Option<&User>) -> BidView {
    BidView {
        id: bid.id,
        rfq_id: bid.rfq_id,
        vendor_id: bid.vendor_id,
        vendor_name: display_name(vendor, "Vendor"),
        price: bid.price,
        cert_file: bid.cert_file.clone(),
        availability: bid.availability.clone(),
        status: bid.status,
        created_at: bid.created_at,
    }
}

/// RFQ enriched with equipment and client display fields plus its bids.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RfqView {
    pub id: RfqId,
    pub equipment_id: EquipmentId,
    pub equipment_name: String,
    pub client_name: String,
    pub vendors: Vec<UserId>,
    pub bids: Vec<BidView>,
    pub status: RfqStatus,
    pub created_at: DateTime<Utc>,
}

pub fn rfq_view(
    rfq: &Rfq,
    equipment: Option<&Equipment>,
    client: Option<&User>,
    bids: Vec<BidView>,
) -> RfqView {
    RfqView {
        id: rfq.id,
        equipment_id: rfq.equipment_id,
        equipment_name: equipment.map_or_else(|| "Unknown".to_string(), |e| e.name.clone()),
        client_name: display_name(client, "Client"),
        vendors: rfq.vendors.clone(),
        bids,
        status: rfq.status,
        created_at: rfq.created_at,
    }
}

/// Single-RFQ detail: raw rows plus the client's public view.
#[derive(Debug, Clone, Serialize)]
pub struct RfqDetailView {
    pub rfq: Rfq,
    pub equipment: Option<Equipment>,
    pub client: Option<UserView>,
    pub bids: Vec<Bid>,
}

/// Flattened bid row for the admin vetting screen.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminBidView {
    pub id: BidId,
    pub vendor_name: String,
    pub price: f64,
    pub cert_file: Option<String>,
    pub availability: Option<String>,
    pub equipment_name: String,
    pub status: BidStatus,
    pub created_at: DateTime<Utc>,
}

pub fn admin_bid_view(
    bid: &Bid,
    vendor: Option<&User>,
    equipment: Option<&Equipment>,
) -> AdminBidView {
    AdminBidView {
        id: bid.id,
        vendor_name: display_name(vendor, "Vendor"),
        price: bid.price,
        cert_file: bid.cert_file.clone(),
        availability: bid.availability.clone(),
        equipment_name: equipment.map_or_else(|| "Unknown".to_string(), |e| e.name.clone()),
        status: bid.status,
        created_at: bid.created_at,
    }
}

/// Name/email party record nested inside order history entries.
#[derive(Debug, Clone, Serialize)]
pub struct PartyView {
    pub id: UserId,
    pub name: String,
    pub email: String,
}

pub fn party_view(user: Option<&User>) -> Option<PartyView> {
    user.map(|user| PartyView {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
    })
}

/// RFQ as nested inside an order's bid, carrying its equipment row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRfqView {
    pub id: RfqId,
    pub client_id: UserId,
    pub equipment_id: EquipmentId,
    pub vendors: Vec<UserId>,
    pub status: RfqStatus,
    pub created_at: DateTime<Utc>,
    pub equipment: Option<Equipment>,
}

/// Bid as nested inside an order, carrying its RFQ.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderBidView {
    pub id: BidId,
    pub rfq_id: RfqId,
    pub vendor_id: UserId,
    pub price: f64,
    pub cert_file: Option<String>,
    pub availability: Option<String>,
    pub status: BidStatus,
    pub created_at: DateTime<Utc>,
    pub rfq: Option<OrderRfqView>,
}

/// Fully nested order record for history listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: OrderId,
    pub bid_id: BidId,
    pub client_id: UserId,
    pub vendor_id: UserId,
    pub po_details: PoDetails,
    pub status: OrderStatus,
    pub history: Vec<OrderHistoryEntry>,
    pub created_at: DateTime<Utc>,
    pub bid: Option<OrderBidView>,
    pub client: Option<PartyView>,
    pub vendor: Option<PartyView>,
}

pub fn order_view(
    order: &Order,
    bid: Option<&Bid>,
    rfq: Option<&Rfq>,
    equipment: Option<&Equipment>,
    client: Option<&User>,
    vendor: Option<&User>,
) -> OrderView {
    let nested_rfq = rfq.map(|rfq| OrderRfqView {
        id: rfq.id,
        client_id: rfq.client_id,
        equipment_id: rfq.equipment_id,
        vendors: rfq.vendors.clone(),
        status: rfq.status,
        created_at: rfq.created_at,
        equipment: equipment.cloned(),
    });
    let nested_bid = bid.map(|bid| OrderBidView {
        id: bid.id,
        rfq_id: bid.rfq_id,
        vendor_id: bid.vendor_id,
        price: bid.price,
        cert_file: bid.cert_file.clone(),
        availability: bid.availability.clone(),
        status: bid.status,
        created_at: bid.created_at,
        rfq: nested_rfq,
    });

    OrderView {
        id: order.id,
        bid_id: order.bid_id,
        client_id: order.client_id,
        vendor_id: order.vendor_id,
        po_details: order.po_details.clone(),
        status: order.status,
        history: order.history.clone(),
        created_at: order.created_at,
        bid: nested_bid,
        client: party_view(client),
        vendor: party_view(vendor),
    }
}
