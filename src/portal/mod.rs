pub mod client;
pub mod roster;

pub use client::{
    ActionDispatcher,
    ActionOutcome,
    PortalAction,
    PortalClient,
};
