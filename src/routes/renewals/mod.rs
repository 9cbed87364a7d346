mod handlers;
mod types;

pub use handlers::{create_renewal, list_module_renewals, list_renewals};
pub use types::CreateRenewalRequest;

pub use handlers::{__path_create_renewal, __path_list_module_renewals, __path_list_renewals};
