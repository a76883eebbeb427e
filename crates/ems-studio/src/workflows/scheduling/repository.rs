use super::domain::{RoomId, Session, SessionId};
use crate::workflows::repository::RepositoryError;
use crate::workflows::roster::CoachId;

pub trait SessionRepository: Send + Sync {
    fn insert(&self, session: Session) -> Result<Session, RepositoryError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<Session>, RepositoryError>;
    fn for_coach(&self, coach_id: &CoachId) -> Result<Vec<Session>, RepositoryError>;
    fn for_room(&self, room_id: &RoomId) -> Result<Vec<Session>, RepositoryError>;
}
