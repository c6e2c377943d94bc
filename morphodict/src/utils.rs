//! 内部で共有する小さな変換とパーサ

use csv_core::{ReadFieldResult, Reader};

use crate::errors::{MorphoDictError, Result};

/// アーカイブ内の`u32`オフセットを添字に変換するトレイト
pub trait FromU32 {
    fn from_u32(src: u32) -> Self;
}

#[cfg(any(target_pointer_width = "32", target_pointer_width = "64"))]
impl FromU32 for usize {
    #[inline(always)]
    fn from_u32(src: u32) -> Self {
        // Lossless: the crate refuses to compile on narrower targets.
        src as usize
    }
}

/// 1行のCSVをフィールドに分割します。
///
/// 引用符で囲まれたフィールドでは、カンマや`""`によるエスケープを扱えます。
///
/// ```
/// # use morphodict_rkyv::utils::parse_csv_row;
/// assert_eq!(parse_csv_row("è$,e'").unwrap(), vec!["è$", "e'"]);
/// assert_eq!(parse_csv_row("\"a,b\",c").unwrap(), vec!["a,b", "c"]);
/// ```
///
/// # エラー
///
/// フィールドがUTF-8として不正な場合にエラーを返します。
pub fn parse_csv_row(row: &str) -> Result<Vec<String>> {
    let mut rdr = Reader::new();
    let mut input = row.as_bytes();
    // A field never grows when unquoted, so the row length bounds every field.
    let mut field = vec![0; row.len() + 1];
    let mut fields = vec![];
    loop {
        let (result, nin, nout) = rdr.read_field(input, &mut field);
        input = &input[nin..];
        match result {
            ReadFieldResult::Field { .. } => {
                fields.push(std::str::from_utf8(&field[..nout])?.to_string());
            }
            ReadFieldResult::InputEmpty | ReadFieldResult::End => {
                fields.push(std::str::from_utf8(&field[..nout])?.to_string());
                return Ok(fields);
            }
            ReadFieldResult::OutputFull => {
                return Err(MorphoDictError::invalid_format("csv row", "Field too large"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_row() {
        assert_eq!(parse_csv_row("à$,a'").unwrap(), vec!["à$", "a'"]);
    }

    #[test]
    fn test_parse_csv_row_with_quote() {
        assert_eq!(
            parse_csv_row("(x|y),\"z,w\"").unwrap(),
            vec!["(x|y)", "z,w"]
        );
        assert_eq!(parse_csv_row("\"say \"\"hi\"\"\",x").unwrap(), vec!["say \"hi\"", "x"]);
    }

    #[test]
    fn test_parse_csv_row_single_field() {
        assert_eq!(parse_csv_row("solo").unwrap(), vec!["solo"]);
    }
}
