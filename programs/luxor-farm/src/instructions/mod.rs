pub mod initialise_config;
pub use initialise_config::*;

pub mod update_config;
pub use update_config::*;

pub mod create_pool;
pub use create_pool::*;

pub mod destroy_pool;
pub use destroy_pool::*;

pub mod provide;
pub use provide::*;

pub mod lock;
pub use lock::*;

pub mod unlock;
pub use unlock::*;

pub mod claim;
pub use claim::*;

pub mod credit_rewards;
pub use credit_rewards::*;

pub mod whitelist;
pub use whitelist::*;
