//! The procurement workflow: the RFQ -> Bid -> Order lifecycle, its
//! role-gated mutation rules, and the read-side view assembly.

pub mod domain;
pub mod memory;
pub mod repository;
pub mod router;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use domain::{
    Bid, BidId, BidStatus, Equipment, EquipmentId, Order, OrderHistoryEntry, OrderId, OrderStatus,
    PoDetails, Rfq, RfqId, RfqStatus, Role, User, UserId, VendorProfile,
};
pub use memory::MemoryStore;
pub use repository::{
    NewBid, NewEquipment, NewRfq, NewUser, OrderScope, PlaceOrder, ProcurementStore, StoreError,
};
pub use router::{procurement_router, ProcurementApi};
pub use service::{
    CreateOrderRequest, CreateRfqRequest, ProcurementError, ProcurementService, SubmitBidRequest,
};
pub use views::{
    AdminBidView, BidView, OrderView, PartyView, ProfileView, RfqDetailView, RfqView, UserView,
};
