//! Wire types for the WhatsApp providers.

pub mod cloud;
pub mod twilio;

pub use cloud::*;
pub use twilio::*;
