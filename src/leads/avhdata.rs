use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::common::{QueryWindow, DATE_FORMAT};

// path segment set from the WHATWG URL spec, plus '%' so the token survives as given
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ').add(b'"').add(b'#').add(b'<').add(b'>')
    .add(b'?').add(b'`').add(b'{').add(b'}')
    .add(b'/').add(b'%');

/// Builds `{root}/{token}/avhdata/range?startdate=..&enddate=..`.
/// Dates are already URL-safe and are interpolated directly.
pub fn range_url(root: &str, token: &str, window: &QueryWindow) -> String {
    format!(
        "{root}/{token}/avhdata/range?startdate={start}&enddate={end}",
        root=root.trim_end_matches('/'),
        token=utf8_percent_encode(token, PATH_SEGMENT),
        start=window.start_date.format(DATE_FORMAT),
        end=window.end_date.format(DATE_FORMAT)
    )
}
