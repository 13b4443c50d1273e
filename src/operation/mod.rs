mod factory;
mod response;
mod status;

pub use factory::OperationResponseFactory;
pub use response::OperationResponse;
pub use status::OperationStatus;
