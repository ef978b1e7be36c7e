pub mod rpc;
pub mod serialization;

pub use rpc::RpcLedgerClient;
