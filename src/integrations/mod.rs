//! External service integrations.

pub mod services {
    pub use crate::services::*;
}

pub mod analytics {
    pub use crate::analytics::*;
}
