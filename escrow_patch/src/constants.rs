//! Constants for record fields, response envelopes, configuration and display
//!
//! Field names that appear on the wire live here so the client, the patch
//! builder and the tests agree on spelling.

// ============================================================================
// RECORD FIELD CONSTANTS
// ============================================================================

/// Field holding the record identifier
pub const RECORD_ID: &str = "id";

/// Separator between segments of a UI path
pub const PATH_SEPARATOR: char = '.';

// ============================================================================
// RESPONSE ENVELOPE CONSTANTS
// ============================================================================

/// Envelope flag reporting whether the backend accepted the request
pub const RESPONSE_SUCCESS: &str = "success";
/// Envelope payload on success
pub const RESPONSE_DATA: &str = "data";
/// Envelope error object on failure
pub const RESPONSE_ERROR: &str = "error";
/// Human readable message inside the error object
pub const RESPONSE_ERROR_MESSAGE: &str = "message";

// ============================================================================
// NETWORK CONSTANTS
// ============================================================================

/// Default API base URL when none is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5050/api/v1";

/// Default per-request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Environment variable overriding the API base URL
pub const ENV_API_URL: &str = "ESCROW_API_URL";
/// Environment variable holding the bearer token
pub const ENV_API_TOKEN: &str = "ESCROW_API_TOKEN";
/// Environment variable overriding the request timeout in seconds
pub const ENV_API_TIMEOUT_SECS: &str = "ESCROW_API_TIMEOUT_SECS";

// ============================================================================
// DISPLAY CONSTANTS
// ============================================================================

/// Display text for a field without a value
pub const NOT_SET_DISPLAY: &str = "Not set";
/// Display text for a true boolean
pub const BOOLEAN_TRUE_DISPLAY: &str = "Yes";
/// Display text for a false boolean
pub const BOOLEAN_FALSE_DISPLAY: &str = "No";
/// `chrono` format used when displaying dates
pub const DATE_DISPLAY_FORMAT: &str = "%m/%d/%Y";
/// `chrono` format used on the wire and in edit buffers
pub const DATE_WIRE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// File name of the trace log written to the temp directory
pub const TRACE_LOG_FILE_NAME: &str = "escrow_patch_trace.log";
