//! Cursor over a received DNS message.
//!
//! [`MessageReader`] owns the offset bookkeeping needed to undo RFC 1035 name
//! compression: every label it decodes is remembered in an offset index, keyed by
//! the position of the label inside the message and mapped to the fully expanded
//! suffix starting there. Later compression pointers are resolved against that
//! index, so a pointer may target any suffix of a previously seen name.
//!
//! The index lives exactly as long as the reader, which lives for one decode call.
use crate::dns::errors::DecodeErrors;
use std::collections::HashMap;
use tracing::trace;

/// Top two bits of a length byte marking a compression pointer.
pub(crate) const POINTER_MARKER: u8 = 0b1100_0000;
/// Low 14 bits of a pointer hold the offset from the start of the message.
pub(crate) const OFFSET_MASK: u16 = 0b0011_1111_1111_1111;
/// Jumps to unindexed offsets allowed while reading a single name.
pub(crate) const MAX_POINTER_JUMPS: usize = 128;

pub(crate) struct MessageReader<'a> {
    buf: &'a [u8],
    cursor: usize,
    domain_index: HashMap<usize, String>,
}

impl<'a> MessageReader<'a> {
    pub(crate) fn new(buf: &'a [u8]) -> Self {
        Self {
            buf,
            cursor: 0,
            domain_index: HashMap::new(),
        }
    }

    /// Current offset from the start of the message.
    pub(crate) fn position(&self) -> usize {
        self.cursor
    }

    pub(crate) fn next(&mut self, n: usize) -> Result<&'a [u8], DecodeErrors> {
        let end = self
            .cursor
            .checked_add(n)
            .filter(|&end| end <= self.buf.len())
            .ok_or(DecodeErrors::TruncatedBuffer {
                offset: self.cursor,
                needed: n,
            })?;
        let bytes = &self.buf[self.cursor..end];
        self.cursor = end;
        Ok(bytes)
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, DecodeErrors> {
        Ok(self.next(1)?[0])
    }

    pub(crate) fn read_u16(&mut self) -> Result<u16, DecodeErrors> {
        let b = self.next(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    pub(crate) fn read_u32(&mut self) -> Result<u32, DecodeErrors> {
        let b = self.next(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Raw bytes interpreted as text, without any escaping.
    pub(crate) fn read_text(&mut self, n: usize) -> Result<String, DecodeErrors> {
        Ok(String::from_utf8_lossy(self.next(n)?).into_owned())
    }

    /// Reads a (possibly compressed) domain name at the cursor.
    ///
    /// The cursor ends up right after the encoded bytes of the name, i.e. after the
    /// terminating zero byte or after the two bytes of the first pointer.
    ///
    /// A pointer to an offset missing from the index is followed in place. At most
    /// [`MAX_POINTER_JUMPS`] such jumps are taken for one name; one more fails with
    /// [`DecodeErrors::PointerLoop`].
    pub(crate) fn read_name(&mut self) -> Result<String, DecodeErrors> {
        let mut labels: Vec<String> = Vec::with_capacity(8);
        // (position in the message, labels decoded before it)
        let mut positions: Vec<(usize, usize)> = Vec::with_capacity(8);
        let mut resume: Option<usize> = None;
        let mut jumps = 0usize;

        loop {
            let start = self.cursor;
            let length = self.read_u8()?;
            if length == 0 {
                break;
            }

            positions.push((start, labels.len()));
            if length & POINTER_MARKER == 0 {
                labels.push(self.read_text(length as usize)?);
                continue;
            }

            let low = self.read_u8()?;
            let offset = (u16::from_be_bytes([length, low]) & OFFSET_MASK) as usize;
            resume.get_or_insert(self.cursor);

            if let Some(name) = self.domain_index.get(&offset) {
                labels.push(name.clone());
                break;
            }
            if jumps == MAX_POINTER_JUMPS {
                return Err(DecodeErrors::PointerLoop { offset: start });
            }
            if offset >= self.buf.len() {
                return Err(DecodeErrors::TruncatedBuffer { offset, needed: 1 });
            }

            jumps += 1;
            trace!(target_offset = offset, jumps, "following compression pointer");
            self.cursor = offset;
        }

        if let Some(after_pointer) = resume {
            self.cursor = after_pointer;
        }

        for (position, first_label) in positions {
            self.domain_index
                .entry(position)
                .or_insert_with(|| labels[first_label..].join("."));
        }

        Ok(labels.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_integers_are_big_endian() {
        let buf = [0x12, 0x34, 0xde, 0xad, 0xbe, 0xef, 0x07];
        let mut reader = MessageReader::new(&buf);

        assert_eq!(reader.read_u16().unwrap(), 0x1234);
        assert_eq!(reader.read_u32().unwrap(), 0xdead_beef);
        assert_eq!(reader.read_u8().unwrap(), 7);
        assert_eq!(reader.position(), buf.len());
    }

    #[test]
    fn test_reader_truncated_read_is_an_error() {
        let buf = [0x00, 0x01, 0x02];
        let mut reader = MessageReader::new(&buf);
        reader.read_u16().unwrap();

        let err = reader.read_u32().unwrap_err();
        assert_eq!(
            err,
            DecodeErrors::TruncatedBuffer {
                offset: 2,
                needed: 4
            }
        );
        // A failed read leaves the cursor alone.
        assert_eq!(reader.position(), 2);
    }

    #[test]
    fn test_read_name_plain_labels() {
        let buf = [
            7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 3, b'c', b'o', b'm', 0, 0xff,
        ];
        let mut reader = MessageReader::new(&buf);

        assert_eq!(reader.read_name().unwrap(), "example.com");
        assert_eq!(reader.position(), 13);
    }

    #[test]
    fn test_read_name_root() {
        let buf = [0];
        let mut reader = MessageReader::new(&buf);
        assert_eq!(reader.read_name().unwrap(), "");
    }

    #[test]
    fn test_read_name_indexes_every_suffix() {
        let buf = [
            3, b'w', b'w', b'w', 7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 3, b'c', b'o', b'm',
            0,
        ];
        let mut reader = MessageReader::new(&buf);
        reader.read_name().unwrap();

        assert_eq!(reader.domain_index[&0], "www.example.com");
        assert_eq!(reader.domain_index[&4], "example.com");
        assert_eq!(reader.domain_index[&12], "com");
    }

    #[test]
    fn test_read_name_pointer_to_suffix() {
        let mut buf = vec![
            3, b'w', b'w', b'w', 7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 3, b'c', b'o', b'm',
            0,
        ];
        // "mail" + pointer to offset 4 ("example.com")
        buf.extend_from_slice(&[4, b'm', b'a', b'i', b'l', 0xc0, 0x04]);
        let mut reader = MessageReader::new(&buf);

        assert_eq!(reader.read_name().unwrap(), "www.example.com");
        assert_eq!(reader.read_name().unwrap(), "mail.example.com");
        // Cursor sits right after the pointer, not after the expanded name.
        assert_eq!(reader.position(), buf.len());
        assert_eq!(reader.domain_index[&17], "mail.example.com");
        assert_eq!(reader.domain_index[&22], "example.com");
    }

    #[test]
    fn test_read_name_follows_pointer_to_unindexed_offset() {
        // Name at offset 2 was never read through the reader before the pointer.
        let buf = [
            0xaa, 0xbb, 3, b'c', b'o', b'm', 0, 3, b'f', b'o', b'o', 0xc0, 0x02,
        ];
        let mut reader = MessageReader::new(&buf);
        reader.next(7).unwrap();

        assert_eq!(reader.read_name().unwrap(), "foo.com");
        assert_eq!(reader.position(), buf.len());
    }

    #[test]
    fn test_read_name_self_pointer_is_bounded() {
        // A pointer to itself; guarded so it cannot spin forever.
        let buf = [0x00, 0x00, 0xc0, 0x02];
        let mut reader = MessageReader::new(&buf);
        reader.next(2).unwrap();

        let err = reader.read_name().unwrap_err();
        assert!(matches!(err, DecodeErrors::PointerLoop { .. }));
    }

    #[test]
    fn test_read_name_self_pointer_in_large_message() {
        let mut buf = vec![0u8; 64 * 1024];
        buf[12] = 0xc0;
        buf[13] = 0x0c;
        let mut reader = MessageReader::new(&buf);
        reader.next(12).unwrap();

        assert_eq!(
            reader.read_name().unwrap_err(),
            DecodeErrors::PointerLoop { offset: 12 }
        );
    }

    #[test]
    fn test_read_name_label_loop_is_bounded() {
        // "ab" followed by a pointer back to the label itself.
        let buf = [2, b'a', b'b', 0xc0, 0x00];
        let mut reader = MessageReader::new(&buf);

        assert_eq!(
            reader.read_name().unwrap_err(),
            DecodeErrors::PointerLoop { offset: 3 }
        );
    }

    #[test]
    fn test_read_name_chain_of_jumps_resumes_after_first_pointer() {
        // offset 0: "com", offset 5: "example" + ptr(0), offset 15: ptr(5)
        let buf = [
            3, b'c', b'o', b'm', 0, 7, b'e', b'x', b'a', b'm', b'p', b'l', b'e', 0xc0, 0x00,
            0xc0, 0x05, 0xff,
        ];
        let mut reader = MessageReader::new(&buf);
        reader.next(15).unwrap();

        assert_eq!(reader.read_name().unwrap(), "example.com");
        assert_eq!(reader.position(), 17);
        assert_eq!(reader.domain_index[&15], "example.com");
        assert_eq!(reader.domain_index[&5], "example.com");
        assert_eq!(reader.domain_index[&13], "com");
        assert_eq!(reader.domain_index[&0], "com");
    }

    #[test]
    fn test_read_name_mutual_pointer_loop_is_bounded() {
        let buf = [0xc0, 0x02, 0xc0, 0x00];
        let mut reader = MessageReader::new(&buf);

        let err = reader.read_name().unwrap_err();
        assert!(matches!(err, DecodeErrors::PointerLoop { .. }));
    }

    #[test]
    fn test_read_name_pointer_out_of_range() {
        let buf = [0xc0, 0x40];
        let mut reader = MessageReader::new(&buf);

        let err = reader.read_name().unwrap_err();
        assert_eq!(
            err,
            DecodeErrors::TruncatedBuffer {
                offset: 0x40,
                needed: 1
            }
        );
    }

    #[test]
    fn test_read_name_label_past_end() {
        let buf = [5, b'a', b'b'];
        let mut reader = MessageReader::new(&buf);

        assert!(matches!(
            reader.read_name(),
            Err(DecodeErrors::TruncatedBuffer { offset: 1, needed: 5 })
        ));
    }
}
