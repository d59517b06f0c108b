use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::fmt::{Display, Formatter};

/// ORIGIN attribute value.
///
/// <https://datatracker.ietf.org/doc/html/rfc4271#section-5.1.1>
#[allow(non_camel_case_types)]
#[derive(Debug, TryFromPrimitive, IntoPrimitive, PartialEq, Eq, Hash, Copy, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Origin {
    #[default]
    IGP = 0,
    EGP = 1,
    INCOMPLETE = 2,
}

impl Display for Origin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Origin::IGP => write!(f, "IGP"),
            Origin::EGP => write!(f, "EGP"),
            Origin::INCOMPLETE => write!(f, "INCOMPLETE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_codes() {
        assert_eq!(u8::from(Origin::IGP), 0);
        assert_eq!(u8::from(Origin::EGP), 1);
        assert_eq!(u8::from(Origin::INCOMPLETE), 2);
        assert_eq!(Origin::try_from(2u8).unwrap(), Origin::INCOMPLETE);
        assert!(Origin::try_from(3u8).is_err());
        assert_eq!(Origin::default(), Origin::IGP);
    }

    #[test]
    fn test_display() {
        assert_eq!(Origin::IGP.to_string(), "IGP");
        assert_eq!(Origin::INCOMPLETE.to_string(), "INCOMPLETE");
    }
}
