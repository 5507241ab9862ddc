//! The QR check-in core: stateless signed tokens plus the pure round
//! eligibility rule. The authoritative write path lives next to the storage
//! layer in `db::models::attendance_record`.

pub mod eligibility;
pub mod token;

pub use eligibility::is_eligible;
pub use token::{CheckinClaims, TokenCodec, TokenError};
