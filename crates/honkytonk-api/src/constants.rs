//! API constants

/// API base path prefix
pub const API_BASE: &str = "/api";

pub const API_VERSION: &str = "v1";

/// Prefix for every JSON route
pub const API_PREFIX: &str = "/api/v1";

/// Path the OpenAPI document is served from
pub const OPENAPI_JSON_PATH: &str = "/api/openapi.json";

/// Header carrying the admin key (alternative to `Authorization: Bearer`)
pub const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

/// Default number of sync runs returned by the admin run history
pub const DEFAULT_RUNS_LIMIT: i64 = 20;
pub const MAX_RUNS_LIMIT: i64 = 200;

/// Max JSON body accepted by admin endpoints
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;
