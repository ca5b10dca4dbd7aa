pub const ROLE_OWNER: &str = "owner";
pub const ROLE_STAFF: &str = "staff";
pub const ROLE_DEVICE: &str = "device";

pub const USER_ROLES: &[&str] = &[ROLE_OWNER, ROLE_STAFF];
