use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

#[derive(Serialize, Deserialize)]
pub struct StatsResponse {
    pub posts: u64,
    pub projects: u64,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize)]
pub struct StreamComplete {
    pub count: usize,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub author: Option<String>,
}
