// Route exports
pub mod gateway;
pub mod lookup;

pub use gateway::GatewayState;
pub use lookup::LookupState;
