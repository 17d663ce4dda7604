//! Little-endian read helpers over the in-memory document buffer.
//! All short reads surface as `TruncatedInput` with the offset at which
//! the read started.

use std::io::{Read, Seek, SeekFrom};

use byteorder::{ReadBytesExt, LE};

use crate::{AxmlError, Result};

pub(crate) trait ByteCursor: Read + Seek {
    /// Current position. Position queries are infallible for the
    /// in-memory cursors this crate drives.
    fn pos(&mut self) -> u64 {
        self.stream_position().unwrap_or_default()
    }

    fn goto(&mut self, offset: u64) -> Result<()> {
        self.seek(SeekFrom::Start(offset))
            .map(drop)
            .map_err(|_| AxmlError::TruncatedInput { offset })
    }

    fn read_u8(&mut self) -> Result<u8> {
        let offset = self.pos();
        ReadBytesExt::read_u8(self).map_err(|_| AxmlError::TruncatedInput { offset })
    }

    fn read_u16(&mut self) -> Result<u16> {
        let offset = self.pos();
        ReadBytesExt::read_u16::<LE>(self).map_err(|_| AxmlError::TruncatedInput { offset })
    }

    fn read_u32(&mut self) -> Result<u32> {
        let offset = self.pos();
        ReadBytesExt::read_u32::<LE>(self).map_err(|_| AxmlError::TruncatedInput { offset })
    }

    fn read_i32(&mut self) -> Result<i32> {
        let offset = self.pos();
        ReadBytesExt::read_i32::<LE>(self).map_err(|_| AxmlError::TruncatedInput { offset })
    }

    fn read_bytes(&mut self, len: usize) -> Result<Vec<u8>> {
        let offset = self.pos();
        let mut buffer = vec![0u8; len];
        self.read_exact(&mut buffer)
            .map_err(|_| AxmlError::TruncatedInput { offset })?;
        Ok(buffer)
    }
}

impl<R: Read + Seek> ByteCursor for R {}
