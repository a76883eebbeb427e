use std::sync::Arc;

use axum::http::StatusCode;
use tracing::{info, warn};

use super::domain::{Session, SessionId, SessionRequest};
use super::repository::SessionRepository;
use crate::workflows::repository::{IdSequence, RepositoryError};
use crate::workflows::roster::{eligible_coaches, ClientId, CoachId, RosterRepository, StudioId};

static SESSION_SEQUENCE: IdSequence = IdSequence::new("ses");

/// Books sessions with an eligible coach, refusing double-booked coaches
/// and rooms.
pub struct SchedulingService<S, R> {
    repository: Arc<S>,
    roster: Arc<R>,
}

impl<S, R> SchedulingService<S, R>
where
    S: SessionRepository + 'static,
    R: RosterRepository + 'static,
{
    pub fn new(repository: Arc<S>, roster: Arc<R>) -> Self {
        Self { repository, roster }
    }

    pub fn book(&self, request: SessionRequest) -> Result<Session, SchedulingError> {
        if request.end_time <= request.start_time {
            return Err(SchedulingError::InvalidWindow);
        }
        self.ensure_eligible(&request)?;

        let coach_busy = self
            .repository
            .for_coach(&request.coach_id)?
            .iter()
            .any(|session| session.overlaps(request.start_time, request.end_time));
        if coach_busy {
            warn!(coach_id = %request.coach_id, "coach already booked for slot");
            return Err(SchedulingError::CoachUnavailable);
        }

        let room_busy = self
            .repository
            .for_room(&request.room_id)?
            .iter()
            .any(|session| session.overlaps(request.start_time, request.end_time));
        if room_busy {
            warn!(room_id = %request.room_id.0, "room already booked for slot");
            return Err(SchedulingError::RoomUnavailable);
        }

        let session = Session {
            id: SessionId(SESSION_SEQUENCE.next_id()),
            client_id: request.client_id,
            coach_id: request.coach_id,
            room_id: request.room_id,
            studio_id: request.studio_id,
            start_time: request.start_time,
            end_time: request.end_time,
            waiting_list_entry_id: request.waiting_list_entry_id,
        };
        let stored = self.repository.insert(session)?;

        info!(
            session_id = %stored.id.0,
            client_id = %stored.client_id,
            coach_id = %stored.coach_id,
            start = %stored.start_time,
            "session booked"
        );
        Ok(stored)
    }

    pub fn get(&self, id: &SessionId) -> Result<Session, SchedulingError> {
        let session = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(session)
    }

    pub fn for_coach(&self, coach_id: &CoachId) -> Result<Vec<Session>, SchedulingError> {
        let mut sessions = self.repository.for_coach(coach_id)?;
        sessions.sort_by_key(|session| session.start_time);
        Ok(sessions)
    }

    /// The coach must pass the matching rule for this client at the
    /// requested studio.
    fn ensure_eligible(&self, request: &SessionRequest) -> Result<(), SchedulingError> {
        let client = self
            .roster
            .fetch_client(&request.client_id)?
            .ok_or_else(|| SchedulingError::UnknownClient(request.client_id.clone()))?;
        let coaches = self.roster.coaches(&request.studio_id)?;
        let eligible = eligible_coaches(&client, &request.studio_id, &coaches)
            .into_iter()
            .any(|coach| coach.id == request.coach_id);
        if !eligible {
            warn!(
                coach_id = %request.coach_id,
                client_id = %request.client_id,
                studio_id = %request.studio_id,
                "coach not eligible for booking"
            );
            return Err(SchedulingError::IneligibleCoach {
                coach_id: request.coach_id.clone(),
                studio_id: request.studio_id.clone(),
            });
        }
        Ok(())
    }
}

/// Error raised by the scheduling service.
#[derive(Debug, thiserror::Error)]
pub enum SchedulingError {
    #[error("session must end after it starts")]
    InvalidWindow,
    #[error("client {0} is not registered")]
    UnknownClient(ClientId),
    #[error("coach {coach_id} cannot take this client at studio {studio_id}")]
    IneligibleCoach {
        coach_id: CoachId,
        studio_id: StudioId,
    },
    #[error("coach already has a session in this slot")]
    CoachUnavailable,
    #[error("room already has a session in this slot")]
    RoomUnavailable,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl SchedulingError {
    pub(crate) fn status_code(&self) -> StatusCode {
        match self {
            SchedulingError::InvalidWindow
            | SchedulingError::UnknownClient(_)
            | SchedulingError::IneligibleCoach { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            SchedulingError::CoachUnavailable | SchedulingError::RoomUnavailable => {
                StatusCode::CONFLICT
            }
            SchedulingError::Repository(err) => err.status_code(),
        }
    }
}
