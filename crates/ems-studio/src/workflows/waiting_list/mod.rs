//! Waiting list queue: client requests move through
//! pending → approved → notified → booked, or sideways to cancelled.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    QueueFilter, WaitingListEntry, WaitingListEntryId, WaitingListRequest, WaitingListStatus,
};
pub use repository::{ClientNotification, NotificationError, Notifier, WaitingListRepository};
pub use router::waiting_list_router;
pub use service::{WaitingListError, WaitingListService, DEFAULT_PAGE_SIZE, DEFAULT_PRIORITY};
