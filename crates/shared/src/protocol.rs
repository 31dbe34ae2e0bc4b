use serde::{Deserialize, Serialize};

/// Body shape shared by both mutation endpoints: `{ "message": ... }` on a
/// 2xx response, `{ "detail": ... }` on a rejection. Parsed best-effort, so
/// every field is optional and an absent or malformed body decodes to the
/// default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MutationOutcomeBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}
