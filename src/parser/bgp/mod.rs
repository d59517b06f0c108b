pub mod attributes;

pub use attributes::parse_attributes;
