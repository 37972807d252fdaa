use std::io::{self, Write};

/// Write `fields` joined by `sep`, followed by a newline.
#[inline]
pub fn write_fields<W, S>(wtr: &mut W, fields: &[S], sep: &str) -> io::Result<()>
where
    W: Write + ?Sized,
    S: AsRef<str>,
{
    for (n, field) in fields.iter().enumerate() {
        if n > 0 {
            wtr.write_all(sep.as_bytes())?;
        }
        wtr.write_all(field.as_ref().as_bytes())?;
    }
    wtr.write_all(b"\n")
}
