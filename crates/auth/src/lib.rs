//! `gatekeep-auth` — account authorization and lifecycle engine.
//!
//! Pure decisions over already-authenticated input. This crate is decoupled
//! from HTTP and storage: callers load an account, ask the engine, and
//! persist whatever state it approves.

pub mod account;
pub mod authorize;
pub mod claims;
pub mod clock;
pub mod credentials;
pub mod denial;
pub mod login;
pub mod principal;
pub mod projection;
pub mod registration;
pub mod roles;
pub mod session;
pub mod status;

pub use account::{normalize_identifier, Account};
pub use authorize::{ban, delete_account, freeze, role_change, status_change};
pub use claims::{validate_claims, SessionClaims, TokenValidationError};
pub use clock::{expiry, BanDuration};
pub use credentials::{Argon2Verifier, CredentialError, CredentialVerifier};
pub use denial::{Denial, DenialCategory};
pub use login::{admin_login, login};
pub use principal::Requester;
pub use projection::{admin_profile, AccountView, AdminProfile};
pub use registration::{
    profile_change, register, register_check, root_account, NewAccount, ProfileChange,
};
pub use roles::Role;
pub use session::{JwtSessionIssuer, SessionError, SessionIssuer};
pub use status::AccountStatus;
