use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Access roles, ordered by rank: admin > supervisor > operator > readonly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Supervisor,
    Operator,
    Readonly,
}

impl Role {
    pub fn rank(self) -> u8 {
        match self {
            Role::Admin => 4,
            Role::Supervisor => 3,
            Role::Operator => 2,
            Role::Readonly => 1,
        }
    }

    /// True iff this role meets or exceeds the required minimum.
    pub fn satisfies(self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Supervisor => "supervisor",
            Role::Operator => "operator",
            Role::Readonly => "readonly",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "supervisor" => Ok(Role::Supervisor),
            "operator" => Ok(Role::Operator),
            "readonly" => Ok(Role::Readonly),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRole(pub String);

impl fmt::Display for UnknownRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown role: {}", self.0)
    }
}

impl std::error::Error for UnknownRole {}

/// Role gate used by every access-control decision in the service.
///
/// Unknown role names fail closed: they satisfy no requirement, not even
/// readonly.
pub fn has_permission(actor_role: &str, required: Role) -> bool {
    match actor_role.parse::<Role>() {
        Ok(role) => role.satisfies(required),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_are_strictly_ordered() {
        assert!(Role::Admin.rank() > Role::Supervisor.rank());
        assert!(Role::Supervisor.rank() > Role::Operator.rank());
        assert!(Role::Operator.rank() > Role::Readonly.rank());
    }

    #[test]
    fn satisfying_a_role_satisfies_everything_below_it() {
        let all = [Role::Admin, Role::Supervisor, Role::Operator, Role::Readonly];
        for actor in all {
            for required in all {
                if actor.satisfies(required) {
                    // Monotonic: anything ranked below `required` passes too.
                    for lower in all.iter().filter(|r| r.rank() <= required.rank()) {
                        assert!(
                            actor.satisfies(*lower),
                            "{actor} satisfies {required} but not {lower}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn supervisor_cannot_act_as_admin() {
        assert!(!Role::Supervisor.satisfies(Role::Admin));
        assert!(Role::Supervisor.satisfies(Role::Supervisor));
        assert!(Role::Supervisor.satisfies(Role::Operator));
    }

    #[test]
    fn unknown_roles_fail_closed() {
        assert!(!has_permission("superuser", Role::Readonly));
        assert!(!has_permission("", Role::Readonly));
        assert!(!has_permission("Admin", Role::Readonly)); // case-sensitive on purpose
        assert!(has_permission("readonly", Role::Readonly));
        assert!(!has_permission("readonly", Role::Operator));
    }

    #[test]
    fn role_names_round_trip() {
        for role in [Role::Admin, Role::Supervisor, Role::Operator, Role::Readonly] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }
}
