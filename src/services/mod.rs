//! Business logic services.

pub mod contact;
pub mod notification;
pub mod pictures;
pub mod slug;
pub mod storage;

pub use notification::{Notifier, start_delivery_worker};
pub use storage::Storage;
