use std::io::{self, Read};

use crate::{ExpectedDigest, Hasher, Result, hasher_for};

/// Streaming reader that hashes data as it passes through.
pub struct VerifiedReader<R> {
    reader:   R,
    hasher:   Box<dyn Hasher>,
    expected: ExpectedDigest,
    read:     u64,
}

impl<R> VerifiedReader<R> {
    pub fn new(reader: R, expected: ExpectedDigest) -> Self {
        Self {
            reader,
            hasher: hasher_for(expected.algorithm()),
            expected,
            read: 0,
        }
    }

    /// Bytes read so far.
    pub fn bytes_read(&self) -> u64 { self.read }

    /// Finalize against the expected digest. Returns the number of bytes hashed.
    pub fn finish(self) -> Result<u64> {
        let actual = self.hasher.finalize();
        self.expected.check(actual)?;
        Ok(self.read)
    }
}

impl<R: Read> Read for VerifiedReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.reader.read(buf)?;
        if n > 0 {
            self.hasher.update(&buf[..n]);
            self.read += n as u64;
        }
        Ok(n)
    }
}
