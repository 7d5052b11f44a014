mod bitfile;
mod rawfile;

pub use self::bitfile::{
	FormatError,
	decode_bit_file,
	encode_bit_file,
	load_bit_file,
	store_bit_file,
};

pub use self::rawfile::{
	decode_raw,
	encode_raw,
	load_raw_file,
	store_raw_file,
};

use std::fmt;

/// Size of the configuration space of one memory region.
pub const IMAGE_SIZE: usize = 256;

#[derive(Debug, Fail)]
#[fail(display = "image holds {} bytes, expected exactly 256", _0)]
pub struct LengthError(pub usize);

/// Complete 256-byte configuration image of one memory space.
///
/// An image is transient: it is produced by exactly one device read or
/// file decode and consumed by exactly one device write, file encode or
/// display. The fixed-size array makes short buffers unrepresentable.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct MemoryImage(pub [u8; IMAGE_SIZE]);

impl MemoryImage {
	pub fn zeroed() -> Self {
		MemoryImage([0u8; IMAGE_SIZE])
	}

	/// Fails unless `data` is exactly 256 bytes; never truncates or pads.
	pub fn from_bytes(data: &[u8]) -> Result<Self, LengthError> {
		if data.len() != IMAGE_SIZE {
			return Err(LengthError(data.len()));
		}
		let mut image = [0u8; IMAGE_SIZE];
		image.copy_from_slice(data);
		Ok(MemoryImage(image))
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}
}

impl fmt::Debug for MemoryImage {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "MemoryImage({})", self)
	}
}

/// Hex dump, 16 bytes per line with the offset up front.
impl fmt::Display for MemoryImage {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		for (i, b) in self.0.iter().enumerate() {
			if 0 == i % 16 {
				write!(f, "{:02x}: ", i)?;
			} else if 0 == i % 8 {
				write!(f, " ")?;
			}
			write!(f, " {:02x}", b)?;
			if 15 == i % 16 {
				writeln!(f)?;
			}
		}
		Ok(())
	}
}
