//! Transport layer.
//!
//! TCP accept loop, HTTP request-head routing (static content vs WebSocket
//! upgrade), and the per-connection session loop that feeds the frame
//! decoder and the router.

pub mod conn;
pub mod listener;
pub mod statics;
