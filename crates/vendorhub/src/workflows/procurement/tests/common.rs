use std::sync::Arc;

use crate::auth::Identity;

use super::super::domain::{EquipmentId, Role, User, UserId, VendorProfile};
use super::super::memory::MemoryStore;
use super::super::repository::{NewEquipment, NewUser, ProcurementStore};
use super::super::service::{
    CreateOrderRequest, CreateRfqRequest, ProcurementService, SubmitBidRequest,
};

pub(super) fn identity_of(user: &User) -> Identity {
    Identity {
        user_id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role,
    }
}

pub(super) fn seed_user(store: &MemoryStore, email: &str, name: &str, role: Role) -> User {
    store
        .insert_user(NewUser {
            email: email.to_string(),
            name: name.to_string(),
            role,
            hashed_password: "argon2-hash-placeholder".to_string(),
            profile: VendorProfile::default(),
        })
        .expect("seed user")
}

pub(super) fn seed_excavator(store: &MemoryStore) -> EquipmentId {
    store
        .insert_equipment(NewEquipment {
            name: "Excavator 3000".to_string(),
            category: "Excavator".to_string(),
            specs: serde_json::json!({ "hp": 250, "weight": "30t" }),
            cert_required: true,
            rental_period_days: 30,
        })
        .expect("seed equipment")
        .id
}

/// One client, two invited vendors, one uninvited vendor, one admin, and a
/// seeded catalog entry.
pub(super) struct Fixture {
    pub store: Arc<MemoryStore>,
    pub service: ProcurementService<MemoryStore>,
    pub client: User,
    pub vendor_one: User,
    pub vendor_two: User,
    pub outsider: User,
    pub admin: User,
    pub equipment_id: EquipmentId,
}

pub(super) fn fixture() -> Fixture {
    let store = Arc::new(MemoryStore::default());
    let service = ProcurementService::new(store.clone());

    let client = seed_user(&store, "client@example.com", "Client A", Role::Client);
    let vendor_one = seed_user(&store, "vendor1@example.com", "Vendor One", Role::Vendor);
    let vendor_two = seed_user(&store, "vendor2@example.com", "Vendor Two", Role::Vendor);
    let outsider = seed_user(&store, "vendor3@example.com", "Vendor Three", Role::Vendor);
    let admin = seed_user(&store, "admin@example.com", "Admin", Role::Admin);
    let equipment_id = seed_excavator(&store);

    Fixture {
        store,
        service,
        client,
        vendor_one,
        vendor_two,
        outsider,
        admin,
        equipment_id,
    }
}

pub(super) fn create_rfq_request(
    equipment_id: EquipmentId,
    vendors: &[UserId],
) -> CreateRfqRequest {
    CreateRfqRequest {
        equipment_id: Some(equipment_id),
        vendor_ids: Some(vendors.to_vec()),
    }
}

pub(super) fn bid_request(rfq_id: super::super::domain::RfqId, price: f64) -> SubmitBidRequest {
    SubmitBidRequest {
        rfq_id: Some(rfq_id),
        price: Some(price),
        cert_file: None,
        availability: Some("Immediate".to_string()),
    }
}

pub(super) fn order_request(bid_id: super::super::domain::BidId) -> CreateOrderRequest {
    CreateOrderRequest {
        bid_id: Some(bid_id),
    }
}
