pub mod endpoint;
pub mod key_convention;
pub mod response_mapper;
pub mod transport;

pub use endpoint::{CachePolicy, Endpoint};
pub use key_convention::KeyConvention;
pub use response_mapper::JsonResponseMapper;
pub use transport::ReqwestTransport;
