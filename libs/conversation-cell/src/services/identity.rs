use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use shared_backend::SchedulerClient;

use crate::models::{Role, Session};

/// Sign-in with an explicit role plus a server-side directory lookup for
/// doctor identity. No fuzzy role detection: the caller states who they are,
/// the directory only resolves the id.
pub struct IdentityService {
    client: Arc<SchedulerClient>,
}

fn normalized(name: &str) -> String {
    name.to_lowercase()
        .replace("dr.", "")
        .replace("dr ", "")
        .trim()
        .to_string()
}

impl IdentityService {
    pub fn new(client: Arc<SchedulerClient>) -> Self {
        Self { client }
    }

    /// Directory lookups are best-effort: a failed fetch degrades to the
    /// default doctor id rather than blocking sign-in.
    pub async fn sign_in(&self, role: Role, name: &str) -> Session {
        let doctor_id = match role {
            Role::Doctor => Some(self.lookup_doctor_id(name).await),
            Role::Patient => None,
        };

        debug!("Signed in {:?} as {:?}", name, role);
        Session {
            id: Uuid::new_v4(),
            role,
            display_name: name.trim().to_string(),
            doctor_id,
        }
    }

    async fn lookup_doctor_id(&self, name: &str) -> i64 {
        let doctors = match self.client.doctors().await {
            Ok(doctors) => doctors,
            Err(e) => {
                warn!("Doctor directory lookup failed: {}", e);
                Vec::new()
            }
        };

        let needle = normalized(name);
        doctors
            .iter()
            .find(|d| normalized(&d.name).contains(&needle))
            .map(|d| d.doctor_id)
            .unwrap_or(1)
    }
}
