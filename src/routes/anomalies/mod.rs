mod handlers;
mod types;

pub use handlers::{get_module_anomalies, list_anomalies, search_anomalies_by_date};
pub use types::SearchByDateRequest;

pub use handlers::{
    __path_get_module_anomalies, __path_list_anomalies, __path_search_anomalies_by_date,
};
