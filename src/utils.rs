const DUMP_ROW_WIDTH: usize = 16;

/// Formats bytes as uppercase hexadecimal pairs separated by spaces.
pub(crate) fn format_hex(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return "<empty>".to_string();
    }

    bytes
        .iter()
        .map(|byte| hex::encode_upper([*byte]))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Formats bytes as offset-prefixed rows of sixteen hexadecimal pairs.
pub(crate) fn hex_dump(bytes: &[u8]) -> Vec<String> {
    bytes
        .chunks(DUMP_ROW_WIDTH)
        .enumerate()
        .map(|(row, chunk)| format!("{:04X}  {}", row * DUMP_ROW_WIDTH, format_hex(chunk)))
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn format_hex_handles_empty_payload() {
        assert_eq!("<empty>", format_hex(&[]));
    }

    #[test]
    fn format_hex_formats_uppercase_pairs() {
        assert_eq!("05 00 A1 FF", format_hex(&[0x05, 0x00, 0xA1, 0xFF]));
    }

    #[test]
    fn hex_dump_breaks_rows_at_sixteen_bytes() {
        let bytes: Vec<u8> = (0..18).collect();

        let rows = hex_dump(&bytes);

        assert_eq!(2, rows.len());
        assert_eq!("0010  10 11", rows[1]);
    }
}
