//! Serializers and builders for the individual tables

pub mod cff;
pub mod cmap;
pub mod glyf;
pub mod head;
pub mod hhea;
pub mod hmtx;
pub mod kern;
pub mod maxp;
pub mod name;
pub mod post;
