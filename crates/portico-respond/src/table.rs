//! CSV response encoding.

use http::header::CONTENT_TYPE;
use http::{HeaderValue, StatusCode};
use portico_config::CsvConfig;
use portico_core::mime;

use crate::{ResponseWriter, WriteError};

/// Writes `rows` as a CSV response, one record per row.
///
/// Sets `Content-Type: text/csv`, commits `status`, then encodes the rows.
/// Fields are quoted only when needed. Rows may have different lengths.
///
/// # Errors
///
/// Returns [`WriteError::InvalidDelimiter`] before writing anything if the
/// configured delimiter is not ASCII, and [`WriteError::Csv`] or
/// [`WriteError::Io`] if encoding fails after the status was committed.
///
/// # Example
///
/// ```rust
/// use portico_config::CsvConfig;
/// use portico_respond::{write_csv, BufferedResponse};
/// use http::StatusCode;
///
/// let rows = vec![vec!["a", "b"], vec!["1", "2"]];
///
/// let mut w = BufferedResponse::new();
/// write_csv(&mut w, StatusCode::OK, &rows, &CsvConfig::default()).unwrap();
///
/// let response = w.into_response();
/// assert_eq!(response.headers()["content-type"], "text/csv");
/// assert_eq!(response.body().as_ref(), b"a,b\n1,2\n");
/// ```
pub fn write_csv<W, I, R, F>(
    w: &mut W,
    status: StatusCode,
    rows: I,
    config: &CsvConfig,
) -> Result<(), WriteError>
where
    W: ResponseWriter + ?Sized,
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = F>,
    F: AsRef<[u8]>,
{
    let delimiter = config
        .delimiter_byte()
        .ok_or(WriteError::InvalidDelimiter(config.delimiter))?;
    let terminator = if config.crlf {
        csv::Terminator::CRLF
    } else {
        csv::Terminator::Any(b'\n')
    };

    w.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(mime::TEXT_CSV));
    w.write_status(status);

    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(terminator)
        .flexible(true)
        .from_writer(&mut *w);

    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
