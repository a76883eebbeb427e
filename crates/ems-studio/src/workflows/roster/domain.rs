use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Tenant boundary: every roster row and queue entry belongs to one studio.
    StudioId
);
string_id!(ClientId);
string_id!(CoachId);

/// Gender recorded on the client profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Female,
    Male,
    #[default]
    PreferNotToSay,
}

/// Which clients a coach prefers to train.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoachGenderPreference {
    #[default]
    Any,
    Female,
    Male,
}

impl CoachGenderPreference {
    pub const fn accepts(self, gender: Gender) -> bool {
        match (self, gender) {
            (Self::Any, _) | (_, Gender::PreferNotToSay) => true,
            (Self::Female, Gender::Female) | (Self::Male, Gender::Male) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub studio_id: StudioId,
    pub name: String,
    #[serde(default)]
    pub gender: Gender,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coach {
    pub id: CoachId,
    pub studio_id: StudioId,
    pub name: String,
    #[serde(default)]
    pub preferred_client_gender: CoachGenderPreference,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}
