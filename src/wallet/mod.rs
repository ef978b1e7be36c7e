pub mod custodian;

pub use custodian::{KeyCustodian, decode_keypair};
