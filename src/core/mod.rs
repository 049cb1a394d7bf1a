// Normalization engine and shared errors/models
pub mod tree {
    pub use crate::tree::*;
}

pub mod normalizer {
    pub use crate::normalizer::*;
}

pub mod coercion {
    pub use crate::coercion::*;
}

pub mod address {
    pub use crate::address::*;
}

pub mod extractor {
    pub use crate::extractor::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
