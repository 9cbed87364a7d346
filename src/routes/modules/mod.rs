mod handlers;
mod types;

pub use handlers::{
    create_module, delete_module, get_module, list_modules, patch_module, unassign_module,
    update_module,
};
pub use types::CreateModuleRequest;

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{
    __path_create_module, __path_delete_module, __path_get_module, __path_list_modules,
    __path_patch_module, __path_unassign_module, __path_update_module,
};
