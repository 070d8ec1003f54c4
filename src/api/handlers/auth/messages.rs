//! User-facing message strings shared across auth responses.

pub const ALREADY_EXISTS: &str = "Account already exists";
pub const SUCCESS_CREATE_USER: &str = "User successfully created. Check your email for confirmation.";
pub const INVALID_EMAIL: &str = "Invalid email";
pub const INVALID_PASSWORD: &str = "Invalid password";
pub const EMAIL_NOT_CONFIRMED: &str = "Email not confirmed";
pub const USER_NOT_ACTIVE: &str = "User is banned";
pub const INVALID_TOKEN: &str = "Invalid refresh token";
pub const VERIFICATION_ERROR: &str = "Verification error";
pub const EMAIL_CONFIRMED: &str = "Email successfully confirmed";
pub const EMAIL_ALREADY_CONFIRMED: &str = "Your email is already confirmed";
pub const CHECK_YOUR_EMAIL: &str = "Check your email for confirmation.";
pub const USER_IS_LOGOUT: &str = "Successfully logged out!";
pub const OPERATION_FORBIDDEN: &str = "Operation forbidden";
pub const TOO_MANY_REQUESTS: &str = "No more than 10 requests per minute";
pub const NOT_VALIDATE_CREDENTIALS: &str = "Could not validate credentials";
pub const SERVICE_UNAVAILABLE: &str = "Service temporarily unavailable";
pub const WELCOME_MESSAGE: &str = "Welcome to Photoshare!";
