use std::sync::{Mutex, OnceLock};

pub const NETWORK_POLICY_ENV: &str = "UMPIRE_NETWORK_POLICY";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NetworkPolicy {
    Allow,
    Deny(String),
}

#[derive(Debug)]
struct NetworkState {
    policy: NetworkPolicy,
}

fn state() -> &'static Mutex<NetworkState> {
    static STATE: OnceLock<Mutex<NetworkState>> = OnceLock::new();
    STATE.get_or_init(|| {
        Mutex::new(NetworkState {
            policy: NetworkPolicy::Allow,
        })
    })
}

/// Scoped override of the process-wide policy; the previous policy comes back
/// on drop.
pub struct NetworkPolicyGuard {
    previous: NetworkPolicy,
}

impl NetworkPolicyGuard {
    pub fn set(policy: NetworkPolicy) -> Self {
        let mut s = state().lock().unwrap_or_else(|p| p.into_inner());
        let previous = s.policy.clone();
        s.policy = policy;
        Self { previous }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self::set(NetworkPolicy::Deny(reason.into()))
    }
}

impl Drop for NetworkPolicyGuard {
    fn drop(&mut self) {
        if let Ok(mut s) = state().lock() {
            s.policy = self.previous.clone();
        }
    }
}

/// Called by every provider right before a live HTTP request.
pub fn check_outbound(target: &str) -> anyhow::Result<()> {
    match effective_policy() {
        NetworkPolicy::Allow => Ok(()),
        NetworkPolicy::Deny(reason) => anyhow::bail!(
            "config error: outbound network blocked by policy (target={}): {}",
            target,
            reason
        ),
    }
}

fn effective_policy() -> NetworkPolicy {
    if let Ok(raw) = std::env::var(NETWORK_POLICY_ENV) {
        if raw.trim().eq_ignore_ascii_case("deny") {
            return NetworkPolicy::Deny(format!("{}=deny", NETWORK_POLICY_ENV));
        }
    }
    let s = state().lock().unwrap_or_else(|p| p.into_inner());
    s.policy.clone()
}
