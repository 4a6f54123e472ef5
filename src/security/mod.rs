pub mod validator;

pub use validator::{RefKind, is_full_hash, validate_ref_name};
