use crate::error::{IOError, IOErrorKind};
use crate::io::prelude::*;

/// Fill `buf` from `reader` until it is full or the end of the stream is met,
/// returning the number of bytes read.
///
/// Unlike `read_exact`, hitting the end of the stream early isn't an error
pub(crate) fn read_up_to<R>(reader: &mut R, buf: &mut [u8]) -> Result<usize, R::Error>
where
    R: Read,
{
    let mut filled = 0;

    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(ref e) if e.kind().is_interrupted() => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(filled)
}
