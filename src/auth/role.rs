//! Authorization roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::auth::AuthError;

/// Role held by the current user.
///
/// `Guest` is the least-privileged role and the fallback whenever a role
/// cannot be determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Client,
    Influencer,
    #[default]
    Guest,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Client => "client",
            Role::Influencer => "influencer",
            Role::Guest => "guest",
        }
    }
}

impl FromStr for Role {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "client" => Ok(Role::Client),
            "influencer" => Ok(Role::Influencer),
            "guest" => Ok(Role::Guest),
            other => Err(AuthError::InvalidResponse(format!(
                "Unknown role '{}'. Valid roles are: admin, client, influencer, guest",
                other
            ))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_str() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("Client".parse::<Role>().unwrap(), Role::Client);
        assert_eq!(" influencer ".parse::<Role>().unwrap(), Role::Influencer);
        assert_eq!("guest".parse::<Role>().unwrap(), Role::Guest);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_default_is_guest() {
        assert_eq!(Role::default(), Role::Guest);
    }

    #[test]
    fn test_role_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Influencer).unwrap(), "\"influencer\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
    }
}
