use serde::Serialize;

/// `{"status": "..."}` body used by update/delete/send endpoints.
#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub status: &'static str,
}

impl StatusMessage {
    pub fn updated() -> Self {
        Self { status: "updated" }
    }

    pub fn deleted() -> Self {
        Self { status: "deleted" }
    }

    pub fn sent() -> Self {
        Self { status: "sent" }
    }
}

/// `{"id": n}` body returned by create endpoints.
#[derive(Debug, Serialize)]
pub struct IdResponse {
    pub id: i32,
}
