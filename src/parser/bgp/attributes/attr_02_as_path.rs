use crate::error::ParserError;
use crate::models::*;
use crate::parser::ReadUtils;
use bytes::{Buf, Bytes};

/// Parses an AS_PATH made of AS_SEQUENCE segments with four-byte AS numbers.
///
/// The AS numbers of all segments are returned as one path.
pub fn parse_as_path(mut input: Bytes) -> Result<AttributeValue, ParserError> {
    let mut path = Vec::with_capacity(MAX_AS_PATH_LEN);
    while input.remaining() > 0 {
        let segment_type = input.read_u8()?;
        match AsPathSegmentType::try_from(segment_type) {
            Ok(AsPathSegmentType::AsSequence) => {}
            _ => {
                return Err(ParserError::ParseError(format!(
                    "Unsupported AS path segment type: {segment_type}"
                )))
            }
        }
        let count = input.read_u8()? as usize;
        input.has_n_remaining(count * 4)?;
        for _ in 0..count {
            path.push(input.read_u32()?);
        }
    }
    Ok(AttributeValue::AsPath(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_as_path() {
        let data = Bytes::from_static(&[2, 2, 0, 1, 0x86, 0xa0, 0, 0, 0xfd, 0xe8]);
        assert_eq!(
            parse_as_path(data).unwrap(),
            AttributeValue::AsPath(vec![100000, 65000])
        );
    }

    #[test]
    fn test_parse_empty_as_path() {
        assert_eq!(
            parse_as_path(Bytes::from_static(&[2, 0])).unwrap(),
            AttributeValue::AsPath(vec![])
        );
        assert_eq!(
            parse_as_path(Bytes::new()).unwrap(),
            AttributeValue::AsPath(vec![])
        );
    }

    #[test]
    fn test_parse_as_path_errors() {
        // count says two AS numbers, only one present
        assert!(parse_as_path(Bytes::from_static(&[2, 2, 0, 0, 0, 1])).is_err());
        // AS_SET
        assert!(parse_as_path(Bytes::from_static(&[1, 1, 0, 0, 0, 1])).is_err());
    }
}
