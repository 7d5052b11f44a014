//! Raw byte file: exactly 256 bytes in index order, no framing, no
//! checksum. Anything but the exact length is rejected outright; a short
//! buffer must never reach a device write.

use std::fs;
use std::path::Path;

use super::{
	LengthError,
	MemoryImage,
};

pub fn decode_raw(data: &[u8]) -> Result<MemoryImage, LengthError> {
	MemoryImage::from_bytes(data)
}

pub fn encode_raw(image: &MemoryImage) -> &[u8] {
	image.as_bytes()
}

pub fn load_raw_file(path: &Path) -> crate::AResult<MemoryImage> {
	with_context!(("couldn't load raw file {:?}", path), {
		Ok(decode_raw(&fs::read(path)?)?)
	})
}

pub fn store_raw_file(path: &Path, image: &MemoryImage) -> crate::AResult<()> {
	with_context!(("couldn't store raw file {:?}", path), {
		fs::write(path, encode_raw(image))?;
		Ok(())
	})
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn round_trip() {
		let mut image = MemoryImage::zeroed();
		for (i, b) in image.0.iter_mut().enumerate() {
			*b = i as u8;
		}
		assert_eq!(decode_raw(encode_raw(&image)).unwrap(), image);
	}

	#[test]
	fn length_is_enforced() {
		assert_eq!(decode_raw(&[0u8; 255]).unwrap_err().0, 255);
		assert_eq!(decode_raw(&[0u8; 257]).unwrap_err().0, 257);
	}
}
