use super::domain::{Client, Coach, StudioId};

/// Coaches who can take a booking for `client` at `studio_id`.
///
/// A coach qualifies when they are active, work at the studio and their
/// gender preference accepts the client. Clients who prefer not to state a
/// gender pass every coach's preference.
pub fn eligible_coaches<'a, I>(client: &Client, studio_id: &StudioId, coaches: I) -> Vec<&'a Coach>
where
    I: IntoIterator<Item = &'a Coach>,
{
    coaches
        .into_iter()
        .filter(|coach| coach.is_active && &coach.studio_id == studio_id)
        .filter(|coach| coach.preferred_client_gender.accepts(client.gender))
        .collect()
}
