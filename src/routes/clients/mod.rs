mod handlers;
mod types;

pub use handlers::{create_client, delete_client, get_client, list_clients, update_client};
pub use types::CreateClientRequest;

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{
    __path_create_client, __path_delete_client, __path_get_client, __path_list_clients,
    __path_update_client,
};
