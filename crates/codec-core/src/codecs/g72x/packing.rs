//! Codeword packing
//!
//! Codewords are packed least-significant-bit first into a little-endian bit
//! accumulator: the first codeword of a batch occupies the lowest bits of the
//! first octet, and codewords may straddle octet boundaries.

/// Packs fixed-width codewords into an octet slice
pub struct CodewordWriter<'a> {
    output: &'a mut [u8],
    position: usize,
    accumulator: u32,
    bits: u32,
    width: u32,
}

impl<'a> CodewordWriter<'a> {
    /// Writer of `width`-bit codewords into `output`
    pub fn new(output: &'a mut [u8], width: u32) -> Self {
        Self {
            output,
            position: 0,
            accumulator: 0,
            bits: 0,
            width,
        }
    }

    /// Append one codeword
    ///
    /// Returns false once the output is full.
    pub fn push(&mut self, code: u8) -> bool {
        let mask = (1u32 << self.width) - 1;
        self.accumulator |= (code as u32 & mask) << self.bits;
        self.bits += self.width;

        while self.bits >= 8 {
            let Some(slot) = self.output.get_mut(self.position) else {
                return false;
            };
            *slot = self.accumulator as u8;
            self.position += 1;
            self.accumulator >>= 8;
            self.bits -= 8;
        }
        true
    }

    /// Flush a trailing partial octet and return the octets written
    pub fn finish(mut self) -> usize {
        if self.bits > 0 {
            if let Some(slot) = self.output.get_mut(self.position) {
                *slot = self.accumulator as u8;
                self.position += 1;
            }
            self.bits = 0;
        }
        self.position
    }
}

/// Unpacks fixed-width codewords from an octet slice
pub struct CodewordReader<'a> {
    input: &'a [u8],
    position: usize,
    accumulator: u32,
    bits: u32,
    width: u32,
}

impl<'a> CodewordReader<'a> {
    /// Reader of `width`-bit codewords from `input`
    pub fn new(input: &'a [u8], width: u32) -> Self {
        Self {
            input,
            position: 0,
            accumulator: 0,
            bits: 0,
            width,
        }
    }
}

impl Iterator for CodewordReader<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        while self.bits < self.width {
            let byte = *self.input.get(self.position)?;
            self.accumulator |= (byte as u32) << self.bits;
            self.position += 1;
            self.bits += 8;
        }

        let code = self.accumulator & ((1u32 << self.width) - 1);
        self.accumulator >>= self.width;
        self.bits -= self.width;
        Some(code as u8)
    }
}

/// Pack `codes` into `ceil(len * width / 8)` octets
pub fn pack(codes: &[u8], width: u32) -> Vec<u8> {
    let mut output = vec![0u8; (codes.len() * width as usize).div_ceil(8)];
    let mut writer = CodewordWriter::new(&mut output, width);
    for &code in codes {
        writer.push(code);
    }
    let written = writer.finish();
    output.truncate(written);
    output
}

/// Unpack up to `count` codewords from `data`
pub fn unpack(data: &[u8], width: u32, count: usize) -> Vec<u8> {
    CodewordReader::new(data, width).take(count).collect()
}
