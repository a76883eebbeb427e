//! Session booking with coach eligibility plus coach and room overlap checks.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{RoomId, Session, SessionId, SessionRequest};
pub use repository::SessionRepository;
pub use router::scheduling_router;
pub use service::{SchedulingError, SchedulingService};
