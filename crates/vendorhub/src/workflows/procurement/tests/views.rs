use chrono::Utc;
use serde_json::Value;

use super::super::domain::{
    Bid, BidId, BidStatus, Rfq, RfqId, RfqStatus, Role, User, UserId, VendorProfile,
};
use super::super::views::{bid_view, display_name, rfq_view, user_view};

fn user(name: &str, email: &str) -> User {
    User {
        id: UserId(1),
        email: email.to_string(),
        name: name.to_string(),
        role: Role::Vendor,
        hashed_password: "secret-hash".to_string(),
        profile: VendorProfile::default(),
    }
}

fn bid() -> Bid {
    Bid {
        id: BidId(9),
        rfq_id: RfqId(4),
        vendor_id: UserId(1),
        price: 4500.0,
        cert_file: None,
        availability: Some("2 days".to_string()),
        status: BidStatus::Pending,
        created_at: Utc::now(),
    }
}

#[test]
fn display_name_falls_back_name_email_literal() {
    assert_eq!(display_name(Some(&user("Vendor One", "v1@example.com")), "Vendor"), "Vendor One");
    assert_eq!(display_name(Some(&user("", "v1@example.com")), "Vendor"), "v1@example.com");
    assert_eq!(display_name(Some(&user("", "")), "Vendor"), "Vendor");
    assert_eq!(display_name(None, "Client"), "Client");
}

#[test]
fn bid_view_serializes_price_as_float() {
    let view = bid_view(&bid(), Some(&user("Vendor One", "v1@example.com")));
    let json = serde_json::to_value(&view).expect("serialize");
    assert!(matches!(json.get("price"), Some(Value::Number(n)) if n.is_f64()));
    assert_eq!(json.get("vendorName"), Some(&Value::String("Vendor One".to_string())));
}

#[test]
fn assembly_is_idempotent() {
    let vendor = user("Vendor One", "v1@example.com");
    let bid = bid();
    let first = bid_view(&bid, Some(&vendor));
    let second = bid_view(&bid, Some(&vendor));
    assert_eq!(
        serde_json::to_value(&first).expect("first"),
        serde_json::to_value(&second).expect("second"),
    );
}

#[test]
fn rfq_view_uses_unknown_equipment_fallback() {
    let rfq = Rfq {
        id: RfqId(4),
        client_id: UserId(2),
        equipment_id: super::super::domain::EquipmentId(3),
        vendors: vec![UserId(1)],
        status: RfqStatus::Open,
        created_at: Utc::now(),
    };
    let view = rfq_view(&rfq, None, None, Vec::new());
    assert_eq!(view.equipment_name, "Unknown");
    assert_eq!(view.client_name, "Client");
}

#[test]
fn user_view_never_carries_the_password_hash() {
    let json = serde_json::to_value(user_view(&user("Vendor One", "v1@example.com")))
        .expect("serialize");
    let object = json.as_object().expect("object");
    assert!(!object.contains_key("hashedPassword"));
    assert!(!object.contains_key("hashed_password"));
    assert_eq!(object.len(), 4);
}
