use super::domain::{Client, ClientId, Coach, StudioId};
use crate::workflows::repository::RepositoryError;

/// Client and coach directory.
pub trait RosterRepository: Send + Sync {
    fn insert_client(&self, client: Client) -> Result<Client, RepositoryError>;
    fn fetch_client(&self, id: &ClientId) -> Result<Option<Client>, RepositoryError>;
    fn insert_coach(&self, coach: Coach) -> Result<Coach, RepositoryError>;
    fn coaches(&self, studio_id: &StudioId) -> Result<Vec<Coach>, RepositoryError>;
}
