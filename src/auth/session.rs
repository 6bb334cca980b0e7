use std::collections::HashMap;
use std::time::{Duration, Instant};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Social login providers offered on the sign-in modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Google,
    Facebook,
    Apple,
    Twitter,
    Instagram,
    Email,
}

impl Provider {
    pub const ALL: [Provider; 6] = [
        Provider::Google,
        Provider::Facebook,
        Provider::Apple,
        Provider::Twitter,
        Provider::Instagram,
        Provider::Email,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Facebook => "facebook",
            Provider::Apple => "apple",
            Provider::Twitter => "twitter",
            Provider::Instagram => "instagram",
            Provider::Email => "email",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == value)
    }

    pub fn label(self) -> &'static str {
        match self {
            Provider::Google => "Continue with Google",
            Provider::Facebook => "Continue with Facebook",
            Provider::Apple => "Continue with Apple",
            Provider::Twitter => "Continue with X",
            Provider::Instagram => "Continue with Instagram",
            Provider::Email => "Continue with Email",
        }
    }
}

/// A signed-in traveler. Lives only as long as the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub provider: Provider,
}

/// Simulated social login: no provider is contacted.
pub fn simulated_login(provider: Provider) -> User {
    User {
        id: chrono::Utc::now().timestamp_millis().to_string(),
        name: "Traveler Kim".to_string(),
        email: format!("user@{}.com", provider.as_str()),
        avatar_url: Some(format!(
            "https://api.dicebear.com/7.x/avataaars/svg?seed={}",
            provider.as_str()
        )),
        provider,
    }
}

/// Lifetime of a traveler session, matching the cookie's Max-Age.
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 7);

/// Traveler sessions keyed by cookie token. Sessions unused for longer than
/// the idle TTL are dropped.
pub struct UserSessions {
    users: HashMap<String, (Instant, User)>,
    idle_ttl: Duration,
}

impl UserSessions {
    pub fn new(idle_ttl: Duration) -> Self {
        Self {
            users: HashMap::new(),
            idle_ttl,
        }
    }

    pub fn sign_in(&mut self, user: User) -> String {
        self.clear_stale();
        let token = generate_token();
        tracing::info!("Traveler signed in via {}", user.provider.as_str());
        self.users.insert(token.clone(), (Instant::now(), user));
        token
    }

    /// Signed-in user for `token`; refreshes the idle timer.
    pub fn current(&mut self, token: &str) -> Option<&User> {
        self.clear_stale();
        let (seen, user) = self.users.get_mut(token)?;
        *seen = Instant::now();
        Some(user)
    }

    pub fn sign_out(&mut self, token: &str) -> Option<User> {
        self.users.remove(token).map(|(_, user)| user)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    fn clear_stale(&mut self) {
        let ttl = self.idle_ttl;
        self.users.retain(|_, (seen, _)| seen.elapsed() < ttl);
    }
}

/// Generate a cryptographically random 32-byte hex token.
pub fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
