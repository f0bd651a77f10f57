//! Access gate in front of every transfer operation.
//!
//! Denial is silent from the caller's perspective: gated operations answer
//! with an empty stream or a zero report, never with an error that would
//! confirm the resource exists. The refusal is still visible in our own
//! logs.

use tracing::debug;

use lb_proto::CallerIdentity;

/// True if the caller holds at least one of `required_roles`.
pub fn authorize(caller: &CallerIdentity, required_roles: &[&str]) -> bool {
    let granted = caller.has_any_role(required_roles);
    if !granted {
        debug!(required = ?required_roles, held = ?caller.roles, "access denied");
    }
    granted
}
