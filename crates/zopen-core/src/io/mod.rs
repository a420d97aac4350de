//! IO modules - side effects (network, archives)

pub mod download;
pub mod extract;
