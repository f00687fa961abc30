// Service exports
pub mod forms_api;

pub use forms_api::{FormsApiClient, FormsApiError};
