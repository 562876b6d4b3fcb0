//! Account lifecycle: registration, login, and vendor profile upkeep.

pub mod router;
pub mod service;

pub use router::{accounts_router, AccountsApi};
pub use service::{
    AccountError, AccountService, LoginRequest, LoginResponse, RegisterRequest,
    UpdateProfileRequest,
};
