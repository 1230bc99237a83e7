mod generated;
pub(crate) mod utils;
