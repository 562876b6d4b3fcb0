use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;

use super::domain::{
    Bid, BidId, BidStatus, Equipment, EquipmentId, Order, OrderHistoryEntry, OrderId, OrderStatus,
    Rfq, RfqId, RfqStatus, Role, User, UserId, VendorProfile,
};
use super::repository::{
    NewBid, NewEquipment, NewRfq, NewUser, OrderScope, PlaceOrder, ProcurementStore, StoreError,
};

#[derive(Default)]
struct StoreState {
    users: BTreeMap<i64, User>,
    equipment: BTreeMap<i64, Equipment>,
    rfqs: BTreeMap<i64, Rfq>,
    bids: BTreeMap<i64, Bid>,
    orders: BTreeMap<i64, Order>,
    next_user_id: i64,
    next_equipment_id: i64,
    next_rfq_id: i64,
    next_bid_id: i64,
    next_order_id: i64,
}

fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// Reference store: the whole state sits behind one mutex, so every trait
/// call is a single transaction. In particular `place_order` re-validates and
/// performs its three writes inside one critical section.
#[derive(Default, Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().expect("store mutex poisoned")
    }
}

impl ProcurementStore for MemoryStore {
    fn insert_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut state = self.lock();
        if state
            .users
            .values()
            .any(|existing| existing.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(StoreError::Conflict);
        }
        let id = next_id(&mut state.next_user_id);
        let record = User {
            id: UserId(id),
            email: user.email,
            name: user.name,
            role: user.role,
            hashed_password: user.hashed_password,
            profile: user.profile,
        };
        state.users.insert(id, record.clone());
        Ok(record)
    }

    fn fetch_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.lock().users.get(&id.0).cloned())
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    fn list_users(&self, role: Option<Role>) -> Result<Vec<User>, StoreError> {
        Ok(self
            .lock()
            .users
            .values()
            .filter(|user| role.map_or(true, |wanted| user.role == wanted))
            .cloned()
            .collect())
    }

    fn update_vendor_profile(
        &self,
        id: UserId,
        profile: VendorProfile,
    ) -> Result<User, StoreError> {
        let mut state = self.lock();
        let user = state.users.get_mut(&id.0).ok_or(StoreError::NotFound)?;
        user.profile = profile;
        Ok(user.clone())
    }

    fn insert_equipment(&self, equipment: NewEquipment) -> Result<Equipment, StoreError> {
        let mut state = self.lock();
        let id = next_id(&mut state.next_equipment_id);
        let record = Equipment {
            id: EquipmentId(id),
            name: equipment.name,
            category: equipment.category,
            specs: equipment.specs,
            cert_required: equipment.cert_required,
            rental_period_days: equipment.rental_period_days,
        };
        state.equipment.insert(id, record.clone());
        Ok(record)
    }

    fn fetch_equipment(&self, id: EquipmentId) -> Result<Option<Equipment>, StoreError> {
        Ok(self.lock().equipment.get(&id.0).cloned())
    }

    fn list_equipment(&self) -> Result<Vec<Equipment>, StoreError> {
        Ok(self.lock().equipment.values().cloned().collect())
    }

    fn insert_rfq(&self, rfq: NewRfq) -> Result<Rfq, StoreError> {
        let mut state = self.lock();
        let id = next_id(&mut state.next_rfq_id);
        let record = Rfq {
            id: RfqId(id),
            client_id: rfq.client_id,
            equipment_id: rfq.equipment_id,
            vendors: rfq.vendors,
            status: RfqStatus::Open,
            created_at: Utc::now(),
        };
        state.rfqs.insert(id, record.clone());
        Ok(record)
    }

    fn fetch_rfq(&self, id: RfqId) -> Result<Option<Rfq>, StoreError> {
        Ok(self.lock().rfqs.get(&id.0).cloned())
    }

    fn list_rfqs(&self, status: Option<RfqStatus>) -> Result<Vec<Rfq>, StoreError> {
        // Ids are monotonic, so descending id order is newest first.
        Ok(self
            .lock()
            .rfqs
            .values()
            .rev()
            .filter(|rfq| status.map_or(true, |wanted| rfq.status == wanted))
            .cloned()
            .collect())
    }

    fn update_rfq_status(&self, id: RfqId, status: RfqStatus) -> Result<Rfq, StoreError> {
        let mut state = self.lock();
        let rfq = state.rfqs.get_mut(&id.0).ok_or(StoreError::NotFound)?;
        if !rfq.status.can_transition_to(status) {
            return Err(StoreError::InvalidTransition);
        }
        rfq.status = status;
        Ok(rfq.clone())
    }

    fn insert_bid(&self, bid: NewBid) -> Result<Bid, StoreError> {
        let mut state = self.lock();
        if !state.rfqs.contains_key(&bid.rfq_id.0) {
            return Err(StoreError::NotFound);
        }
        let id = next_id(&mut state.next_bid_id);
        let record = Bid {
            id: BidId(id),
            rfq_id: bid.rfq_id,
            vendor_id: bid.vendor_id,
            price: bid.price,
            cert_file: bid.cert_file,
            availability: bid.availability,
            status: BidStatus::Pending,
            created_at: Utc::now(),
        };
        state.bids.insert(id, record.clone());
        Ok(record)
    }

    fn fetch_bid(&self, id: BidId) -> Result<Option<Bid>, StoreError> {
        Ok(self.lock().bids.get(&id.0).cloned())
    }

    fn bids_for_rfq(&self, rfq: RfqId) -> Result<Vec<Bid>, StoreError> {
        Ok(self
            .lock()
            .bids
            .values()
            .filter(|bid| bid.rfq_id == rfq)
            .cloned()
            .collect())
    }

    fn list_bids(&self) -> Result<Vec<Bid>, StoreError> {
        Ok(self.lock().bids.values().rev().cloned().collect())
    }

    fn update_bid_status(&self, id: BidId, status: BidStatus) -> Result<Bid, StoreError> {
        let mut state = self.lock();
        let bid = state.bids.get_mut(&id.0).ok_or(StoreError::NotFound)?;
        if bid.status != status && !bid.status.can_transition_to(status) {
            return Err(StoreError::InvalidTransition);
        }
        bid.status = status;
        Ok(bid.clone())
    }

    fn place_order(&self, order: PlaceOrder) -> Result<Order, StoreError> {
        let mut state = self.lock();

        let bid = state
            .bids
            .get(&order.bid_id.0)
            .cloned()
            .ok_or(StoreError::NotFound)?;
        if state.orders.values().any(|existing| existing.bid_id == bid.id) {
            return Err(StoreError::Conflict);
        }
        let rfq = state
            .rfqs
            .get(&bid.rfq_id.0)
            .cloned()
            .ok_or(StoreError::NotFound)?;
        if rfq.status != RfqStatus::Open {
            return Err(StoreError::RfqNotOpen);
        }

        let id = next_id(&mut state.next_order_id);
        let record = Order {
            id: OrderId(id),
            bid_id: bid.id,
            client_id: order.client_id,
            vendor_id: bid.vendor_id,
            po_details: order.po_details,
            status: OrderStatus::Pending,
            history: vec![OrderHistoryEntry {
                status: OrderStatus::Pending,
                date: order.placed_at,
                note: order.note,
            }],
            created_at: order.placed_at,
        };
        state.orders.insert(id, record.clone());

        if let Some(stored_bid) = state.bids.get_mut(&bid.id.0) {
            stored_bid.status = BidStatus::Accepted;
        }
        if let Some(stored_rfq) = state.rfqs.get_mut(&rfq.id.0) {
            stored_rfq.status = RfqStatus::Closed;
        }

        Ok(record)
    }

    fn find_order_for_bid(&self, bid: BidId) -> Result<Option<Order>, StoreError> {
        Ok(self
            .lock()
            .orders
            .values()
            .find(|order| order.bid_id == bid)
            .cloned())
    }

    fn list_orders(&self, scope: OrderScope) -> Result<Vec<Order>, StoreError> {
        Ok(self
            .lock()
            .orders
            .values()
            .rev()
            .filter(|order| match scope {
                OrderScope::Client(client) => order.client_id == client,
                OrderScope::Vendor(vendor) => order.vendor_id == vendor,
                OrderScope::All => true,
            })
            .cloned()
            .collect())
    }
}
