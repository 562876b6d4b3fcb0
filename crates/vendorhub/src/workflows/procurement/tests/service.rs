use super::super::domain::{BidStatus, OrderStatus, RfqStatus, Role};
use super::super::repository::ProcurementStore;
use super::super::service::ProcurementError;
use super::common::{bid_request, create_rfq_request, fixture, identity_of, order_request};

#[test]
fn client_creates_open_rfq_with_invited_vendors() {
    let fx = fixture();
    let client = identity_of(&fx.client);
    let rfq = fx
        .service
        .create_rfq(
            &client,
            create_rfq_request(fx.equipment_id, &[fx.vendor_one.id, fx.vendor_two.id]),
        )
        .expect("rfq created");

    assert_eq!(rfq.status, RfqStatus::Open);
    assert_eq!(rfq.vendors, vec![fx.vendor_one.id, fx.vendor_two.id]);
    assert_eq!(rfq.client_id, fx.client.id);
}

#[test]
fn rfq_creation_requires_client_role() {
    let fx = fixture();
    let vendor = identity_of(&fx.vendor_one);
    let err = fx
        .service
        .create_rfq(&vendor, create_rfq_request(fx.equipment_id, &[fx.vendor_one.id]))
        .expect_err("vendors cannot open rfqs");
    assert!(matches!(err, ProcurementError::Forbidden(_)));
}

#[test]
fn rfq_creation_rejects_missing_or_unknown_equipment() {
    let fx = fixture();
    let client = identity_of(&fx.client);

    let err = fx
        .service
        .create_rfq(&client, create_rfq_request(fx.equipment_id, &[]))
        .expect_err("empty vendor list");
    assert!(matches!(err, ProcurementError::Validation(ref msg) if msg == "Missing fields"));

    let err = fx
        .service
        .create_rfq(
            &client,
            create_rfq_request(super::super::domain::EquipmentId(999), &[fx.vendor_one.id]),
        )
        .expect_err("unknown equipment");
    assert!(matches!(err, ProcurementError::Validation(ref msg) if msg == "Invalid equipment"));
}

#[test]
fn invited_vendor_submits_pending_bid_while_rfq_stays_open() {
    let fx = fixture();
    let client = identity_of(&fx.client);
    let rfq = fx
        .service
        .create_rfq(
            &client,
            create_rfq_request(fx.equipment_id, &[fx.vendor_one.id, fx.vendor_two.id]),
        )
        .expect("rfq");

    let bid = fx
        .service
        .submit_bid(&identity_of(&fx.vendor_one), bid_request(rfq.id, 5000.0))
        .expect("bid accepted for intake");

    assert_eq!(bid.status, BidStatus::Pending);
    assert_eq!(bid.price, 5000.0);
    let stored = fx.store.fetch_rfq(rfq.id).expect("fetch").expect("present");
    assert_eq!(stored.status, RfqStatus::Open);
}

#[test]
fn uninvited_vendor_bid_is_rejected() {
    let fx = fixture();
    let client = identity_of(&fx.client);
    let rfq = fx
        .service
        .create_rfq(
            &client,
            create_rfq_request(fx.equipment_id, &[fx.vendor_one.id, fx.vendor_two.id]),
        )
        .expect("rfq");

    let err = fx
        .service
        .submit_bid(&identity_of(&fx.outsider), bid_request(rfq.id, 4200.0))
        .expect_err("outsider must be rejected");
    assert!(
        matches!(err, ProcurementError::Forbidden(ref msg) if msg == "Vendor not invited to this RFQ")
    );
}

#[test]
fn bid_against_missing_or_closed_rfq_fails() {
    let fx = fixture();
    let client = identity_of(&fx.client);
    let vendor = identity_of(&fx.vendor_one);

    let err = fx
        .service
        .submit_bid(&vendor, bid_request(super::super::domain::RfqId(77), 1000.0))
        .expect_err("unknown rfq");
    assert!(matches!(err, ProcurementError::Validation(ref msg) if msg == "Invalid RFQ"));

    let rfq = fx
        .service
        .create_rfq(&client, create_rfq_request(fx.equipment_id, &[fx.vendor_one.id]))
        .expect("rfq");
    let bid = fx
        .service
        .submit_bid(&vendor, bid_request(rfq.id, 1000.0))
        .expect("bid");
    fx.service
        .create_order(&client, order_request(bid.id))
        .expect("order closes rfq");

    let err = fx
        .service
        .submit_bid(&vendor, bid_request(rfq.id, 900.0))
        .expect_err("closed rfq rejects bids");
    assert!(matches!(err, ProcurementError::InvalidState(ref msg) if msg == "RFQ not open"));
}

#[test]
fn create_order_accepts_bid_and_closes_rfq() {
    let fx = fixture();
    let client = identity_of(&fx.client);
    let rfq = fx
        .service
        .create_rfq(
            &client,
            create_rfq_request(fx.equipment_id, &[fx.vendor_one.id, fx.vendor_two.id]),
        )
        .expect("rfq");
    let bid = fx
        .service
        .submit_bid(&identity_of(&fx.vendor_one), bid_request(rfq.id, 5000.0))
        .expect("bid");

    let order = fx
        .service
        .create_order(&client, order_request(bid.id))
        .expect("order");

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.po_details.price, 5000.0);
    assert!(order.po_details.po_number.starts_with("PO-"));
    assert_eq!(order.history.len(), 1);
    assert_eq!(order.history[0].note, "PO Created");
    assert_eq!(order.vendor_id, fx.vendor_one.id);

    let bid = fx.store.fetch_bid(bid.id).expect("fetch").expect("present");
    assert_eq!(bid.status, BidStatus::Accepted);
    let rfq = fx.store.fetch_rfq(rfq.id).expect("fetch").expect("present");
    assert_eq!(rfq.status, RfqStatus::Closed);
}

#[test]
fn duplicate_order_for_same_bid_conflicts() {
    let fx = fixture();
    let client = identity_of(&fx.client);
    let rfq = fx
        .service
        .create_rfq(&client, create_rfq_request(fx.equipment_id, &[fx.vendor_one.id]))
        .expect("rfq");
    let bid = fx
        .service
        .submit_bid(&identity_of(&fx.vendor_one), bid_request(rfq.id, 5000.0))
        .expect("bid");

    fx.service
        .create_order(&client, order_request(bid.id))
        .expect("first order");
    let err = fx
        .service
        .create_order(&client, order_request(bid.id))
        .expect_err("second order must conflict");
    assert!(
        matches!(err, ProcurementError::Conflict(ref msg) if msg == "Order already exists for this bid")
    );
}

#[test]
fn order_for_foreign_rfq_is_forbidden() {
    let fx = fixture();
    let owner = identity_of(&fx.client);
    let rfq = fx
        .service
        .create_rfq(&owner, create_rfq_request(fx.equipment_id, &[fx.vendor_one.id]))
        .expect("rfq");
    let bid = fx
        .service
        .submit_bid(&identity_of(&fx.vendor_one), bid_request(rfq.id, 5000.0))
        .expect("bid");

    let other_client = super::common::seed_user(
        &fx.store,
        "client2@example.com",
        "Client B",
        Role::Client,
    );
    let err = fx
        .service
        .create_order(&identity_of(&other_client), order_request(bid.id))
        .expect_err("non-owner rejected");
    assert!(
        matches!(err, ProcurementError::Forbidden(ref msg) if msg == "Unauthorized to create order for this bid")
    );
}

#[test]
fn admin_approval_leaves_rfq_open() {
    let fx = fixture();
    let client = identity_of(&fx.client);
    let rfq = fx
        .service
        .create_rfq(&client, create_rfq_request(fx.equipment_id, &[fx.vendor_one.id]))
        .expect("rfq");
    let bid = fx
        .service
        .submit_bid(&identity_of(&fx.vendor_one), bid_request(rfq.id, 4800.0))
        .expect("bid");

    let approved = fx
        .service
        .approve_bid(&identity_of(&fx.admin), bid.id)
        .expect("approval");
    assert_eq!(approved.status, BidStatus::Accepted);

    // Vetting is advisory: the RFQ stays open and the order path still runs.
    let rfq = fx.store.fetch_rfq(rfq.id).expect("fetch").expect("present");
    assert_eq!(rfq.status, RfqStatus::Open);
    fx.service
        .create_order(&client, order_request(bid.id))
        .expect("order after approval");
}

#[test]
fn approve_bid_requires_admin_and_existing_bid() {
    let fx = fixture();
    let err = fx
        .service
        .approve_bid(&identity_of(&fx.client), super::super::domain::BidId(1))
        .expect_err("client cannot approve");
    assert!(matches!(err, ProcurementError::Forbidden(_)));

    let err = fx
        .service
        .approve_bid(&identity_of(&fx.admin), super::super::domain::BidId(42))
        .expect_err("unknown bid");
    assert!(matches!(err, ProcurementError::NotFound(ref msg) if msg == "Bid not found"));
}

#[test]
fn rfq_listing_is_role_scoped() {
    let fx = fixture();
    let client = identity_of(&fx.client);
    let other_client = super::common::seed_user(
        &fx.store,
        "client2@example.com",
        "Client B",
        Role::Client,
    );

    let mine = fx
        .service
        .create_rfq(
            &client,
            create_rfq_request(fx.equipment_id, &[fx.vendor_one.id, fx.vendor_two.id]),
        )
        .expect("rfq one");
    let theirs = fx
        .service
        .create_rfq(
            &identity_of(&other_client),
            create_rfq_request(fx.equipment_id, &[fx.vendor_two.id]),
        )
        .expect("rfq two");

    let client_list = fx.service.list_rfqs(&client, None).expect("client list");
    assert_eq!(client_list.len(), 1);
    assert_eq!(client_list[0].id, mine.id);

    let vendor_two_list = fx
        .service
        .list_rfqs(&identity_of(&fx.vendor_two), None)
        .expect("vendor list");
    assert_eq!(vendor_two_list.len(), 2);

    let vendor_one_list = fx
        .service
        .list_rfqs(&identity_of(&fx.vendor_one), None)
        .expect("vendor list");
    assert_eq!(vendor_one_list.len(), 1);
    assert_eq!(vendor_one_list[0].id, mine.id);

    let admin_list = fx
        .service
        .list_rfqs(&identity_of(&fx.admin), None)
        .expect("admin list");
    assert_eq!(admin_list.len(), 2);
    // Newest first.
    assert_eq!(admin_list[0].id, theirs.id);
}

#[test]
fn vendor_listing_excludes_non_open_rfqs() {
    let fx = fixture();
    let client = identity_of(&fx.client);
    let vendor = identity_of(&fx.vendor_one);

    let rfq = fx
        .service
        .create_rfq(&client, create_rfq_request(fx.equipment_id, &[fx.vendor_one.id]))
        .expect("rfq");
    let bid = fx
        .service
        .submit_bid(&vendor, bid_request(rfq.id, 3000.0))
        .expect("bid");
    fx.service
        .create_order(&client, order_request(bid.id))
        .expect("order");

    let listed = fx.service.list_rfqs(&vendor, None).expect("vendor list");
    assert!(listed.is_empty());
}

#[test]
fn rfq_views_carry_display_fields_and_bids() {
    let fx = fixture();
    let client = identity_of(&fx.client);
    let rfq = fx
        .service
        .create_rfq(&client, create_rfq_request(fx.equipment_id, &[fx.vendor_one.id]))
        .expect("rfq");
    fx.service
        .submit_bid(&identity_of(&fx.vendor_one), bid_request(rfq.id, 5000.0))
        .expect("bid");

    let listed = fx.service.list_rfqs(&client, None).expect("list");
    let view = &listed[0];
    assert_eq!(view.equipment_name, "Excavator 3000");
    assert_eq!(view.client_name, "Client A");
    assert_eq!(view.bids.len(), 1);
    assert_eq!(view.bids[0].vendor_name, "Vendor One");
}

#[test]
fn order_history_scopes_and_nests() {
    let fx = fixture();
    let client = identity_of(&fx.client);
    let rfq = fx
        .service
        .create_rfq(&client, create_rfq_request(fx.equipment_id, &[fx.vendor_one.id]))
        .expect("rfq");
    let bid = fx
        .service
        .submit_bid(&identity_of(&fx.vendor_one), bid_request(rfq.id, 5000.0))
        .expect("bid");
    fx.service
        .create_order(&client, order_request(bid.id))
        .expect("order");

    let client_orders = fx.service.order_history(&client).expect("client history");
    assert_eq!(client_orders.len(), 1);
    let order = &client_orders[0];
    let nested_bid = order.bid.as_ref().expect("bid nested");
    let nested_rfq = nested_bid.rfq.as_ref().expect("rfq nested");
    let nested_equipment = nested_rfq.equipment.as_ref().expect("equipment nested");
    assert_eq!(nested_equipment.name, "Excavator 3000");
    assert_eq!(order.client.as_ref().expect("client party").name, "Client A");
    assert_eq!(order.vendor.as_ref().expect("vendor party").name, "Vendor One");

    let vendor_orders = fx
        .service
        .order_history(&identity_of(&fx.vendor_one))
        .expect("vendor history");
    assert_eq!(vendor_orders.len(), 1);

    let uninvolved = fx
        .service
        .order_history(&identity_of(&fx.vendor_two))
        .expect("other vendor history");
    assert!(uninvolved.is_empty());

    let admin_orders = fx
        .service
        .order_history(&identity_of(&fx.admin))
        .expect("admin history");
    assert_eq!(admin_orders.len(), 1);
}

#[test]
fn admin_bid_listing_flattens_names() {
    let fx = fixture();
    let client = identity_of(&fx.client);
    let rfq = fx
        .service
        .create_rfq(&client, create_rfq_request(fx.equipment_id, &[fx.vendor_one.id]))
        .expect("rfq");
    fx.service
        .submit_bid(&identity_of(&fx.vendor_one), bid_request(rfq.id, 5000.0))
        .expect("bid");

    let listed = fx
        .service
        .admin_bids(&identity_of(&fx.admin))
        .expect("admin bids");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].vendor_name, "Vendor One");
    assert_eq!(listed[0].equipment_name, "Excavator 3000");

    let err = fx
        .service
        .admin_bids(&identity_of(&fx.vendor_one))
        .expect_err("vendors cannot read the vetting list");
    assert!(matches!(err, ProcurementError::Forbidden(_)));
}
