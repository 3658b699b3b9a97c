pub mod json;
pub mod mysql;
pub mod raw;
pub mod registry;

pub use json::JsonTransformer;
pub use mysql::MysqlSlowLogTransformer;
pub use raw::RawTransformer;
pub use registry::{Constructor, Registry, TYPE_JSON, TYPE_MYSQL, TYPE_RAW};
