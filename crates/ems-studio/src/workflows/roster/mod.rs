//! Client and coach directory plus the coach-matching rule used when a
//! waiting-list entry is turned into a booking.

pub mod domain;
pub mod matching;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{Client, ClientId, Coach, CoachGenderPreference, CoachId, Gender, StudioId};
pub use matching::eligible_coaches;
pub use repository::RosterRepository;
pub use router::roster_router;
pub use service::{RosterError, RosterService};
