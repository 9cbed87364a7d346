mod handlers;
mod types;

pub use handlers::{list_sms, list_sms_by_date, send_sms};
pub use types::SendSmsRequest;

pub use handlers::{__path_list_sms, __path_list_sms_by_date, __path_send_sms};
