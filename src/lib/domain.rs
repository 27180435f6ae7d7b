//! Domain layer

pub mod mailing;
