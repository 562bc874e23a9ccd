//! Owner identity resolution for callers of the lifecycle operations.

/// Picks the effective owner id: the organization if the caller belongs to
/// one, otherwise the caller's own user id.
///
/// Returns `None` when neither is available; the lifecycle operations must
/// not be invoked in that case.
pub fn resolve_owner(organization_id: Option<&str>, user_id: Option<&str>) -> Option<String> {
    owner_id(organization_id)
        .or_else(|| owner_id(user_id))
        .map(str::to_string)
}

/// Trims an owner id; a blank id counts as absent.
pub fn owner_id(id: Option<&str>) -> Option<&str> {
    id.map(str::trim).filter(|id| !id.is_empty())
}
