use crate::error::ParserError;
use crate::models::*;
use crate::parser::ReadUtils;
use bytes::Bytes;

pub fn parse_origin(mut input: Bytes) -> Result<AttributeValue, ParserError> {
    input.expect_remaining_eq(1, "ORIGIN")?;
    Ok(AttributeValue::Origin(Origin::try_from(input.read_u8()?)?))
}
