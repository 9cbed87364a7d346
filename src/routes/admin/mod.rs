mod handlers;
mod types;

pub use handlers::{login, login_status, logout, me};
pub use types::{LoginRequest, LoginResponse};

pub use handlers::{__path_login, __path_login_status, __path_logout, __path_me};
