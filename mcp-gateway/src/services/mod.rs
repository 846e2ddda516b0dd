pub mod backend_client;
pub mod gateway;
pub mod metrics;

pub use backend_client::{BackendClient, BackendEndpoint, api_url};
pub use gateway::{ForwardError, ForwardRoute, ForwardedRequest, Gateway};
