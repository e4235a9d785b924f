// Extraction pipeline and shared errors/models
pub mod locator {
    pub use crate::locator::*;
}

pub mod extractor {
    pub use crate::extractor::*;
}

pub mod orchestrator {
    pub use crate::orchestrator::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
