use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    /// Employees sharing a team are checked against each other's leave.
    pub team: String,
    pub site_id: Option<String>,
}
