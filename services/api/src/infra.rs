use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use vendorhub::auth::hash_password;
use vendorhub::error::AppError;
use vendorhub::workflows::procurement::{
    MemoryStore, NewEquipment, NewUser, ProcurementStore, Role, VendorProfile,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// What `seed_demo_data` produced, for operator-facing summaries.
pub(crate) struct SeedSummary {
    pub(crate) vendors: usize,
    pub(crate) client: String,
    pub(crate) admin: String,
    pub(crate) equipment: usize,
}

/// Demo fixtures: three vendors, one client, one admin (password `123`), and
/// a five-item equipment catalog.
pub(crate) fn seed_demo_data(store: &MemoryStore) -> Result<SeedSummary, AppError> {
    let password = hash_password("123")?;

    let vendor_names = [
        ("vendor1@example.com", "Vendor One"),
        ("vendor2@example.com", "Vendor Two"),
        ("vendor3@example.com", "Vendor Three"),
    ];
    for (email, name) in vendor_names {
        store.insert_user(NewUser {
            email: email.to_string(),
            name: name.to_string(),
            role: Role::Vendor,
            hashed_password: password.clone(),
            profile: VendorProfile::default(),
        })?;
    }

    let client = store.insert_user(NewUser {
        email: "client@example.com".to_string(),
        name: "Client A".to_string(),
        role: Role::Client,
        hashed_password: password.clone(),
        profile: VendorProfile::default(),
    })?;
    let admin = store.insert_user(NewUser {
        email: "admin@example.com".to_string(),
        name: "Admin".to_string(),
        role: Role::Admin,
        hashed_password: password,
        profile: VendorProfile::default(),
    })?;

    let catalog = [
        NewEquipment {
            name: "Excavator 3000".to_string(),
            category: "Excavator".to_string(),
            specs: serde_json::json!({ "hp": 250, "weight": "30t" }),
            cert_required: true,
            rental_period_days: 30,
        },
        NewEquipment {
            name: "Crane Pro X".to_string(),
            category: "Crane".to_string(),
            specs: serde_json::json!({ "capacity": "20t", "reach": "40m" }),
            cert_required: true,
            rental_period_days: 14,
        },
        NewEquipment {
            name: "Forklift 2t".to_string(),
            category: "Forklift".to_string(),
            specs: serde_json::json!({ "capacity": "2t" }),
            cert_required: false,
            rental_period_days: 7,
        },
        NewEquipment {
            name: "Bulldozer B7".to_string(),
            category: "Dozer".to_string(),
            specs: serde_json::json!({ "hp": 180 }),
            cert_required: false,
            rental_period_days: 21,
        },
        NewEquipment {
            name: "Concrete Mixer 500".to_string(),
            category: "Mixer".to_string(),
            specs: serde_json::json!({ "volume": "500L" }),
            cert_required: false,
            rental_period_days: 10,
        },
    ];
    let equipment_count = catalog.len();
    for equipment in catalog {
        store.insert_equipment(equipment)?;
    }

    Ok(SeedSummary {
        vendors: vendor_names.len(),
        client: client.email,
        admin: admin.email,
        equipment: equipment_count,
    })
}
