use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoctorEntry {
    pub doctor_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientEntry {
    pub patient_id: i64,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}
