use crate::LoadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Utf8Bom,
    Utf16BigEndian,
    Utf16LittleEndian,
}

/// Turns the raw bytes of a file into text, honouring a leading byte order
/// mark. The mark itself is not part of the returned string.
pub fn decode(input: Vec<u8>) -> Result<(String, Encoding), LoadError> {
    match input.as_slice() {
        [0xEF, 0xBB, 0xBF, ..] => match String::from_utf8(input[3..].to_vec()) {
            Ok(str) => Ok((str, Encoding::Utf8Bom)),
            Err(err) => Err(LoadError::Encoding(format!(
                "Found Byte Order Mark signifying UTF-8 encoding in input, but failed to parse as UTF-8. Message: {}",
                err
            ))),
        },
        [0xFE, 0xFF, rest @ ..] => {
            let units = utf16_units(rest, u16::from_be_bytes, "Big")?;
            match String::from_utf16(&units) {
                Ok(str) => Ok((str, Encoding::Utf16BigEndian)),
                Err(err) => Err(LoadError::Encoding(format!(
                    "Found Byte Order Mark signifying UTF-16 Big Endian encoding in input, but failed to parse as UTF-16 BE. Message: {}",
                    err
                ))),
            }
        }
        [0xFF, 0xFE, rest @ ..] => {
            let units = utf16_units(rest, u16::from_le_bytes, "Little")?;
            match String::from_utf16(&units) {
                Ok(str) => Ok((str, Encoding::Utf16LittleEndian)),
                Err(err) => Err(LoadError::Encoding(format!(
                    "Found Byte Order Mark signifying UTF-16 Little Endian encoding in input, but failed to parse as UTF-16 LE. Message: {}",
                    err
                ))),
            }
        }
        _ => match String::from_utf8(input) {
            Ok(str) => Ok((str, Encoding::Utf8)),
            Err(err) => Err(LoadError::Encoding(format!(
                "No known Byte Order Mark was found, so input was parsed as UTF-8. The string was not valid UTF-8. Message: {}",
                err
            ))),
        },
    }
}

fn utf16_units(
    bytes: &[u8],
    from_bytes: fn([u8; 2]) -> u16,
    endianness: &str,
) -> Result<Vec<u16>, LoadError> {
    if bytes.len() % 2 != 0 {
        return Err(LoadError::Encoding(format!(
            "Found Byte Order Mark signifying UTF-16 {} Endian encoding in input, but the input has an odd number of bytes.",
            endianness
        )));
    }

    Ok(bytes
        .chunks_exact(2)
        .map(|pair| from_bytes([pair[0], pair[1]]))
        .collect())
}
