/// Constants module to avoid magic strings in the codebase

// Network Configuration
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000/api";
pub const CONTENT_TYPE_JSON: &str = "application/json";

// Envelope
pub const ENVELOPE_SUCCESS_CODE: i64 = 200;

// Persisted storage keys (shared with the existing mobile client)
pub const STORAGE_KEY_SERVER_URL: &str = "serverUrl";
pub const STORAGE_KEY_COOKIE: &str = "cookie";
pub const STORAGE_KEY_USER_INFO: &str = "userInfo";
pub const STORAGE_KEY_LOGS: &str = "logs";
pub const STORAGE_FILE_NAME: &str = "storage.json";

// User-facing notices
pub const UNREACHABLE_NOTICE: &str =
    "Network unreachable, check the server address or firewall";

// Backend paths
pub const PATH_LOGIN: &str = "/login";
pub const PATH_LOGOUT: &str = "/logout";
pub const PATH_REGISTER: &str = "/register";
pub const PATH_FORGOT_PASSWORD: &str = "/forgot_password";
pub const PATH_BUILDINGS: &str = "/buildings";
pub const PATH_STUDENT_INFO: &str = "/student/info";
pub const PATH_STUDENT_DORM: &str = "/student/dorm";
pub const PATH_STUDENT_PHOTO: &str = "/student/photo";
pub const PATH_REPAIRS: &str = "/repairs";
pub const PATH_VISITORS: &str = "/visitors";
pub const PATH_DORM_CHANGES: &str = "/dorm_changes";
pub const PATH_UTILITY_BILLS: &str = "/utility_bills";
pub const PATH_UTILITY_BILLS_PAY: &str = "/utility_bills/pay";

// Upload
pub const PHOTO_FIELD_NAME: &str = "photo";
pub const DEFAULT_PAYMENT_METHOD: &str = "wechat";
