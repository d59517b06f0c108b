use crate::error::ParserError;
use crate::models::*;
use crate::parser::ReadUtils;
use bytes::Bytes;

pub fn parse_local_pref(mut input: Bytes) -> Result<AttributeValue, ParserError> {
    input.expect_remaining_eq(4, "LOCAL_PREFERENCE")?;
    Ok(AttributeValue::LocalPreference(input.read_u32()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_pref() {
        assert_eq!(
            parse_local_pref(Bytes::from(vec![0, 0, 0, 123])).unwrap(),
            AttributeValue::LocalPreference(123)
        );
        assert!(parse_local_pref(Bytes::from(vec![0, 123])).is_err());
    }
}
