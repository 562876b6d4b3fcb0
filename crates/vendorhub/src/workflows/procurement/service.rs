use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;

use crate::auth::Identity;

use super::domain::{
    flexible_f64_opt, Bid, BidId, BidStatus, Equipment, EquipmentId, Order, PoDetails, Rfq, RfqId,
    RfqStatus, Role, UserId,
};
use super::repository::{
    NewBid, NewRfq, OrderScope, PlaceOrder, ProcurementStore, StoreError,
};
use super::views::{
    self, AdminBidView, BidView, OrderView, RfqDetailView, RfqView, UserView,
};

/// Request body for RFQ creation. Required fields are optional here so that
/// missing input surfaces as the workflow's own validation error.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRfqRequest {
    #[serde(default)]
    pub equipment_id: Option<EquipmentId>,
    #[serde(default)]
    pub vendor_ids: Option<Vec<UserId>>,
}

/// Request body for bid submission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitBidRequest {
    #[serde(default)]
    pub rfq_id: Option<RfqId>,
    #[serde(default, deserialize_with = "flexible_f64_opt")]
    pub price: Option<f64>,
    #[serde(default)]
    pub cert_file: Option<String>,
    #[serde(default)]
    pub availability: Option<String>,
}

/// Request body for order creation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub bid_id: Option<BidId>,
}

/// Error raised by the procurement workflow.
#[derive(Debug, thiserror::Error)]
pub enum ProcurementError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidState(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ProcurementError {
    fn validation(message: &str) -> Self {
        Self::Validation(message.to_string())
    }

    fn forbidden(message: &str) -> Self {
        Self::Forbidden(message.to_string())
    }

    fn not_found(message: &str) -> Self {
        Self::NotFound(message.to_string())
    }
}

/// The RFQ -> Bid -> Order lifecycle: role-gated mutations plus the
/// role-scoped, view-assembled reads.
pub struct ProcurementService<S> {
    store: Arc<S>,
}

impl<S> Clone for ProcurementService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

fn require_role(identity: &Identity, role: Role) -> Result<(), ProcurementError> {
    if identity.role == role {
        Ok(())
    } else {
        Err(ProcurementError::forbidden("Forbidden"))
    }
}

impl<S: ProcurementStore> ProcurementService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create an RFQ for one equipment item addressed to a non-empty set of
    /// invited vendors. Clients only.
    pub fn create_rfq(
        &self,
        identity: &Identity,
        request: CreateRfqRequest,
    ) -> Result<Rfq, ProcurementError> {
        require_role(identity, Role::Client)?;

        let (equipment_id, vendor_ids) = match (request.equipment_id, request.vendor_ids) {
            (Some(equipment_id), Some(vendor_ids)) if !vendor_ids.is_empty() => {
                (equipment_id, vendor_ids)
            }
            _ => return Err(ProcurementError::validation("Missing fields")),
        };

        if self.store.fetch_equipment(equipment_id)?.is_none() {
            return Err(ProcurementError::validation("Invalid equipment"));
        }

        let rfq = self.store.insert_rfq(NewRfq {
            client_id: identity.user_id,
            equipment_id,
            vendors: vendor_ids,
        })?;
        Ok(rfq)
    }

    /// Submit a bid against an open RFQ. Vendors only, and only vendors on
    /// the RFQ's invited list.
    pub fn submit_bid(
        &self,
        identity: &Identity,
        request: SubmitBidRequest,
    ) -> Result<Bid, ProcurementError> {
        require_role(identity, Role::Vendor)?;

        let (rfq_id, price) = match (request.rfq_id, request.price) {
            (Some(rfq_id), Some(price)) => (rfq_id, price),
            _ => return Err(ProcurementError::validation("Missing fields")),
        };

        let rfq = self
            .store
            .fetch_rfq(rfq_id)?
            .ok_or_else(|| ProcurementError::validation("Invalid RFQ"))?;
        if rfq.status != RfqStatus::Open {
            return Err(ProcurementError::InvalidState("RFQ not open".to_string()));
        }
        if !rfq.invites(identity.user_id) {
            return Err(ProcurementError::forbidden("Vendor not invited to this RFQ"));
        }

        let bid = self.store.insert_bid(NewBid {
            rfq_id,
            vendor_id: identity.user_id,
            price,
            cert_file: request.cert_file,
            availability: request.availability,
        })?;
        Ok(bid)
    }

    /// Admin vetting step: marks the bid accepted without touching its RFQ.
    /// Order creation remains the sole authoritative RFQ transition.
    pub fn approve_bid(&self, identity: &Identity, bid_id: BidId) -> Result<Bid, ProcurementError> {
        require_role(identity, Role::Admin)?;

        if self.store.fetch_bid(bid_id)?.is_none() {
            return Err(ProcurementError::not_found("Bid not found"));
        }
        let bid = self
            .store
            .update_bid_status(bid_id, BidStatus::Accepted)
            .map_err(|err| match err {
                StoreError::InvalidTransition => {
                    ProcurementError::InvalidState("Bid already resolved".to_string())
                }
                other => ProcurementError::Store(other),
            })?;
        Ok(bid)
    }

    /// Accept a bid by creating its purchase order. The three dependent
    /// writes (order insert, bid accepted, RFQ closed) happen atomically in
    /// the store, which re-validates the preconditions inside the
    /// transaction.
    pub fn create_order(
        &self,
        identity: &Identity,
        request: CreateOrderRequest,
    ) -> Result<Order, ProcurementError> {
        require_role(identity, Role::Client)?;

        let bid_id = request
            .bid_id
            .ok_or_else(|| ProcurementError::validation("Bid ID is required"))?;
        let bid = self
            .store
            .fetch_bid(bid_id)?
            .ok_or_else(|| ProcurementError::not_found("Bid not found"))?;
        let rfq = self
            .store
            .fetch_rfq(bid.rfq_id)?
            .ok_or(ProcurementError::Store(StoreError::NotFound))?;
        if rfq.client_id != identity.user_id {
            return Err(ProcurementError::forbidden(
                "Unauthorized to create order for this bid",
            ));
        }
        if self.store.find_order_for_bid(bid_id)?.is_some() {
            return Err(ProcurementError::Conflict(
                "Order already exists for this bid".to_string(),
            ));
        }

        let now = Utc::now();
        let order = self
            .store
            .place_order(PlaceOrder {
                bid_id,
                client_id: identity.user_id,
                po_details: PoDetails {
                    po_number: format!("PO-{}", now.timestamp_millis()),
                    generated_at: now,
                    price: bid.price,
                },
                note: "PO Created".to_string(),
                placed_at: now,
            })
            .map_err(|err| match err {
                StoreError::Conflict => ProcurementError::Conflict(
                    "Order already exists for this bid".to_string(),
                ),
                StoreError::RfqNotOpen => {
                    ProcurementError::InvalidState("RFQ not open".to_string())
                }
                StoreError::NotFound => ProcurementError::not_found("Bid not found"),
                other => ProcurementError::Store(other),
            })?;
        Ok(order)
    }

    /// Role-scoped RFQ listing: clients see their own, vendors see open RFQs
    /// that invite them, admins see everything. Entries come back enriched.
    pub fn list_rfqs(
        &self,
        identity: &Identity,
        status: Option<RfqStatus>,
    ) -> Result<Vec<RfqView>, ProcurementError> {
        let rfqs = self.store.list_rfqs(status)?;
        let scoped = rfqs.into_iter().filter(|rfq| match identity.role {
            Role::Client => rfq.client_id == identity.user_id,
            Role::Vendor => rfq.status == RfqStatus::Open && rfq.invites(identity.user_id),
            Role::Admin => true,
        });

        let mut result = Vec::new();
        for rfq in scoped {
            result.push(self.assemble_rfq(&rfq)?);
        }
        Ok(result)
    }

    /// Single-RFQ detail with raw bids; the client row is reduced to its
    /// public view.
    pub fn rfq_detail(&self, rfq_id: RfqId) -> Result<RfqDetailView, ProcurementError> {
        let rfq = self
            .store
            .fetch_rfq(rfq_id)?
            .ok_or_else(|| ProcurementError::not_found("Not found"))?;
        let equipment = self.store.fetch_equipment(rfq.equipment_id)?;
        let client = self.store.fetch_user(rfq.client_id)?;
        let bids = self.store.bids_for_rfq(rfq.id)?;
        Ok(RfqDetailView {
            rfq,
            equipment,
            client: client.as_ref().map(views::user_view),
            bids,
        })
    }

    /// Bids for one RFQ with vendor names attached. A missing RFQ yields an
    /// empty list rather than an error.
    pub fn bids_for_rfq(&self, rfq_id: RfqId) -> Result<Vec<BidView>, ProcurementError> {
        let bids = self.store.bids_for_rfq(rfq_id)?;
        let mut result = Vec::with_capacity(bids.len());
        for bid in &bids {
            let vendor = self.store.fetch_user(bid.vendor_id)?;
            result.push(views::bid_view(bid, vendor.as_ref()));
        }
        Ok(result)
    }

    /// Flattened bid list for the admin vetting screen, newest first.
    pub fn admin_bids(&self, identity: &Identity) -> Result<Vec<AdminBidView>, ProcurementError> {
        require_role(identity, Role::Admin)?;

        let bids = self.store.list_bids()?;
        let mut result = Vec::with_capacity(bids.len());
        for bid in &bids {
            let vendor = self.store.fetch_user(bid.vendor_id)?;
            let equipment = match self.store.fetch_rfq(bid.rfq_id)? {
                Some(rfq) => self.store.fetch_equipment(rfq.equipment_id)?,
                None => None,
            };
            result.push(views::admin_bid_view(bid, vendor.as_ref(), equipment.as_ref()));
        }
        Ok(result)
    }

    /// Role-scoped order history with the bid, RFQ, equipment, and both
    /// parties nested into each record.
    pub fn order_history(&self, identity: &Identity) -> Result<Vec<OrderView>, ProcurementError> {
        let scope = match identity.role {
            Role::Client => OrderScope::Client(identity.user_id),
            Role::Vendor => OrderScope::Vendor(identity.user_id),
            Role::Admin => OrderScope::All,
        };

        let orders = self.store.list_orders(scope)?;
        let mut result = Vec::with_capacity(orders.len());
        for order in &orders {
            let bid = self.store.fetch_bid(order.bid_id)?;
            let rfq = match &bid {
                Some(bid) => self.store.fetch_rfq(bid.rfq_id)?,
                None => None,
            };
            let equipment = match &rfq {
                Some(rfq) => self.store.fetch_equipment(rfq.equipment_id)?,
                None => None,
            };
            let client = self.store.fetch_user(order.client_id)?;
            let vendor = self.store.fetch_user(order.vendor_id)?;
            result.push(views::order_view(
                order,
                bid.as_ref(),
                rfq.as_ref(),
                equipment.as_ref(),
                client.as_ref(),
                vendor.as_ref(),
            ));
        }
        Ok(result)
    }

    /// Full equipment catalog.
    pub fn list_equipment(&self) -> Result<Vec<Equipment>, ProcurementError> {
        Ok(self.store.list_equipment()?)
    }

    /// Public user directory, optionally filtered by role.
    pub fn list_users(&self, role: Option<Role>) -> Result<Vec<UserView>, ProcurementError> {
        let users = self.store.list_users(role)?;
        Ok(users.iter().map(views::user_view).collect())
    }

    fn assemble_rfq(&self, rfq: &Rfq) -> Result<RfqView, ProcurementError> {
        let equipment = self.store.fetch_equipment(rfq.equipment_id)?;
        let client = self.store.fetch_user(rfq.client_id)?;
        let bids = self.bids_for_rfq(rfq.id)?;
        Ok(views::rfq_view(rfq, equipment.as_ref(), client.as_ref(), bids))
    }
}
