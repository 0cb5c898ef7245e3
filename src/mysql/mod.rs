// ABOUTME: MySQL utilities module
// ABOUTME: Exports connection management, value conversion, and the live session

pub mod connection;
pub mod session;
pub mod value;

pub use connection::connect;
pub use session::MySqlSession;
pub use value::{convert_value, ColumnKind};
