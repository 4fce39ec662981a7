pub mod encoder;
pub mod node;
pub mod relay;

pub use encoder::InputPolicy;
pub use node::{LedgerNode, RpcNode};
pub use relay::{BurnRequest, ContractTarget, RelayError, Relayer, SigningIdentity, TxParams};
