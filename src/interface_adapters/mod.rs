// Interface adapters: wire protocol, HTTP client, stores and host-side ports.

pub mod clients;
pub mod events;
pub mod protocol;
pub mod state;
pub mod ui;
