use crate::infra::seed_demo_data;
use clap::Args;
use std::sync::Arc;
use vendorhub::auth::Identity;
use vendorhub::error::AppError;
use vendorhub::workflows::procurement::{
    CreateOrderRequest, CreateRfqRequest, MemoryStore, ProcurementService, ProcurementStore, Role,
    SubmitBidRequest, User,
};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Bid price used by the demo vendor
    #[arg(long, default_value_t = 5000.0)]
    pub(crate) price: f64,
}

fn identity_of(user: &User) -> Identity {
    Identity {
        user_id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role,
    }
}

fn find_by_role(store: &MemoryStore, role: Role) -> Result<User, AppError> {
    let users = store.list_users(Some(role))?;
    users
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Io(std::io::Error::other("demo fixtures missing")))
}

fn print_step<T: serde::Serialize>(label: &str, value: &T) {
    println!("\n== {label} ==");
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => println!("{rendered}"),
        Err(err) => println!("<unserializable: {err}>"),
    }
}

/// Walk the full procurement lifecycle in-process: seed, open an RFQ, submit
/// a bid, accept it into a purchase order, then show the role-scoped reads.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let store = Arc::new(MemoryStore::default());
    let summary = seed_demo_data(&store)?;
    println!(
        "Seeded {} vendors, client {}, admin {}, {} equipment items",
        summary.vendors, summary.client, summary.admin, summary.equipment
    );

    let service = ProcurementService::new(store.clone());
    let client = identity_of(&find_by_role(&store, Role::Client)?);
    let vendor = find_by_role(&store, Role::Vendor)?;
    let equipment = store
        .list_equipment()?
        .into_iter()
        .next()
        .ok_or_else(|| AppError::Io(std::io::Error::other("demo catalog missing")))?;

    let rfq = service
        .create_rfq(
            &client,
            CreateRfqRequest {
                equipment_id: Some(equipment.id),
                vendor_ids: Some(vec![vendor.id]),
            },
        )
        .map_err(demo_failure)?;
    print_step("RFQ opened", &rfq);

    let bid = service
        .submit_bid(
            &identity_of(&vendor),
            SubmitBidRequest {
                rfq_id: Some(rfq.id),
                price: Some(args.price),
                cert_file: None,
                availability: Some("Immediate".to_string()),
            },
        )
        .map_err(demo_failure)?;
    print_step("Bid submitted", &bid);

    let order = service
        .create_order(
            &client,
            CreateOrderRequest {
                bid_id: Some(bid.id),
            },
        )
        .map_err(demo_failure)?;
    print_step("Purchase order created", &order);

    let rfqs = service.list_rfqs(&client, None).map_err(demo_failure)?;
    print_step("Client RFQ dashboard", &rfqs);

    let history = service.order_history(&client).map_err(demo_failure)?;
    print_step("Client order history", &history);

    Ok(())
}

fn demo_failure(err: vendorhub::workflows::procurement::ProcurementError) -> AppError {
    AppError::Io(std::io::Error::other(format!("demo workflow failed: {err}")))
}
