use std::sync::Arc;

use axum::http::StatusCode;
use tracing::info;

use super::domain::{Client, ClientId, Coach, StudioId};
use super::matching::eligible_coaches;
use super::repository::RosterRepository;
use crate::workflows::repository::RepositoryError;

/// Service fronting the client/coach directory and the coach-matching rule.
pub struct RosterService<R> {
    repository: Arc<R>,
}

impl<R> RosterService<R>
where
    R: RosterRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn register_client(&self, client: Client) -> Result<Client, RosterError> {
        if client.name.trim().is_empty() {
            return Err(RosterError::MissingName);
        }
        let stored = self.repository.insert_client(client)?;
        info!(client_id = %stored.id, studio_id = %stored.studio_id, "client registered");
        Ok(stored)
    }

    pub fn register_coach(&self, coach: Coach) -> Result<Coach, RosterError> {
        if coach.name.trim().is_empty() {
            return Err(RosterError::MissingName);
        }
        let stored = self.repository.insert_coach(coach)?;
        info!(coach_id = %stored.id, studio_id = %stored.studio_id, "coach registered");
        Ok(stored)
    }

    pub fn client(&self, id: &ClientId) -> Result<Client, RosterError> {
        let client = self
            .repository
            .fetch_client(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(client)
    }

    pub fn coaches(&self, studio_id: &StudioId) -> Result<Vec<Coach>, RosterError> {
        let mut coaches = self.repository.coaches(studio_id)?;
        coaches.sort_by(|left, right| left.id.cmp(&right.id));
        Ok(coaches)
    }

    /// Coaches a waiting-list entry for `client_id` can be booked with.
    pub fn eligible_coaches(
        &self,
        studio_id: &StudioId,
        client_id: &ClientId,
    ) -> Result<Vec<Coach>, RosterError> {
        let client = self.client(client_id)?;
        let coaches = self.coaches(studio_id)?;
        Ok(eligible_coaches(&client, studio_id, &coaches)
            .into_iter()
            .cloned()
            .collect())
    }
}

/// Error raised by the roster service.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("name is required")]
    MissingName,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl RosterError {
    pub(crate) fn status_code(&self) -> StatusCode {
        match self {
            RosterError::MissingName => StatusCode::UNPROCESSABLE_ENTITY,
            RosterError::Repository(err) => err.status_code(),
        }
    }
}
