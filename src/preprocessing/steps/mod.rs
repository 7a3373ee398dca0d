//! Individual normalization steps

pub mod background;
pub mod codec;
pub mod crop;
pub mod flatten;
pub mod pad;
pub mod scan;
