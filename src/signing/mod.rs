//! Order and cancel signing.
//!
//! Orders are signed as EIP-712 typed data bound to [`SigningDomain`],
//! cancels as EIP-191 personal messages. Use [`sign`] with a
//! [`SigningContext`] derived from the resolved [`crate::config::Config`].

mod builder;
mod domain;
mod signer;
mod typed_data;

pub use builder::{
    DEFAULT_ORDER_TTL_SECS, SigningContext, Timestamp, build_signed_cancel, build_signed_order,
    cancel_message, sign,
};
pub use domain::{DOMAIN_NAME, DOMAIN_TYPEHASH, DOMAIN_VERSION, SigningDomain};
pub use signer::{
    PrivateKey, RecoverableSignature, RecoveryIdFormat, SigningError, personal_message_digest,
    sign_digest,
};
pub use typed_data::{ORDER_TYPE, ORDER_TYPEHASH};
