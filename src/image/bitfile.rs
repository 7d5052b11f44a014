//! Codec for the vendor-style textual bit file: one data row per bit of
//! the 256-byte image.
//!
//! Rows look like `<decimal bit index>\t\t<value>\t\t<comment>`, fields
//! separated by exactly two tabs. Only lines starting with a decimal
//! digit carry data; the header, blank lines and comments are skipped.
//! Bits appear in file order and are packed LSB-first: the first row of
//! a group of eight becomes bit 0 of the byte.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use super::{
	IMAGE_SIZE,
	MemoryImage,
};

/// A valid bit file holds one row per bit of the image.
pub const BIT_COUNT: usize = IMAGE_SIZE * 8;

const FIELD_SEPARATOR: &str = "\t\t";
const HEADER: &str = "index\t\tvalue\t\tcomment";

#[derive(Debug, Fail, PartialEq, Eq)]
pub enum FormatError {
	#[fail(display = "bit file holds {} data rows, expected exactly 2048", _0)]
	WrongRowCount(usize),
	#[fail(display = "data row {} has no value field", _0)]
	MissingValueField(usize),
}

/// Decode bit file text into an image.
///
/// Fails unless exactly 2048 data rows are present; a partial buffer is
/// never returned, as it would be unsafe to write to a device.
pub fn decode_bit_file(text: &str) -> Result<MemoryImage, FormatError> {
	let mut buf = Vec::with_capacity(IMAGE_SIZE);
	let mut rows = 0usize;
	let mut acc = 0u8;

	for line in text.lines() {
		// every interesting line starts with a digit
		match line.bytes().next() {
			Some(c) if c.is_ascii_digit() => (),
			_ => continue,
		}

		let mut fields = line.split(FIELD_SEPARATOR);
		let _index = fields.next();
		let value = match fields.next() {
			Some(v) => v,
			None => return Err(FormatError::MissingValueField(rows)),
		};

		// shift the accumulator down and insert the new bit on top;
		// after eight rows the first bit has arrived at position 0
		acc >>= 1;
		if value == "1" {
			acc |= 0x80;
		}
		rows += 1;
		if 0 == rows % 8 {
			buf.push(acc);
			acc = 0;
		}
	}

	if rows != BIT_COUNT {
		return Err(FormatError::WrongRowCount(rows));
	}

	let mut image = [0u8; IMAGE_SIZE];
	image.copy_from_slice(&buf);
	Ok(MemoryImage(image))
}

/// Encode an image as bit file text, one row per bit, LSB first.
pub fn encode_bit_file(image: &MemoryImage) -> String {
	let mut out = String::with_capacity(BIT_COUNT * 12);
	out.push_str(HEADER);
	out.push('\n');
	for (index, byte) in image.0.iter().enumerate() {
		for bit in 0..8 {
			let value = (byte >> bit) & 1;
			// the unwrap can't fail: writing to a String
			writeln!(out, "{}\t\t{}\t\t//", index * 8 + bit, value).unwrap();
		}
	}
	out
}

pub fn load_bit_file(path: &Path) -> crate::AResult<MemoryImage> {
	with_context!(("couldn't load bit file {:?}", path), {
		Ok(decode_bit_file(&fs::read_to_string(path)?)?)
	})
}

pub fn store_bit_file(path: &Path, image: &MemoryImage) -> crate::AResult<()> {
	with_context!(("couldn't store bit file {:?}", path), {
		fs::write(path, encode_bit_file(image))?;
		Ok(())
	})
}

#[cfg(test)]
mod test {
	use super::*;

	fn rows(values: &[u8]) -> String {
		let mut text = String::from("index\t\tvalue\t\tcomment\n");
		for (i, v) in values.iter().enumerate() {
			text.push_str(&format!("{}\t\t{}\t\t//\n", i, v));
		}
		text
	}

	fn zero_rows(count: usize) -> String {
		rows(&vec![0u8; count])
	}

	#[test]
	fn round_trip() {
		let mut image = MemoryImage::zeroed();
		for (i, b) in image.0.iter_mut().enumerate() {
			*b = (i as u8).wrapping_mul(37).wrapping_add(11);
		}
		assert_eq!(decode_bit_file(&encode_bit_file(&image)).unwrap(), image);
	}

	#[test]
	fn bit_order_is_lsb_first() {
		let mut image = MemoryImage::zeroed();
		image.0[0] = 0x01;
		let text = encode_bit_file(&image);
		let data: Vec<&str> = text.lines().skip(1).take(8).collect();
		assert_eq!(data[0], "0\t\t1\t\t//");
		for (i, row) in data.iter().enumerate().skip(1) {
			assert_eq!(*row, format!("{}\t\t0\t\t//", i));
		}
	}

	#[test]
	fn first_group_packs_into_first_byte() {
		let mut values = vec![0u8; BIT_COUNT];
		values[0] = 1;
		let image = decode_bit_file(&rows(&values)).unwrap();
		assert_eq!(image.0[0], 0x01);
		assert_eq!(&image.0[1..], &[0u8; 255][..]);
	}

	#[test]
	fn all_zero_rows_decode_and_reencode() {
		let text = zero_rows(BIT_COUNT);
		let image = decode_bit_file(&text).unwrap();
		assert_eq!(image, MemoryImage::zeroed());
		assert_eq!(encode_bit_file(&image), text);
	}

	#[test]
	fn row_count_is_enforced() {
		assert_eq!(
			decode_bit_file(&zero_rows(BIT_COUNT - 1)),
			Err(FormatError::WrongRowCount(BIT_COUNT - 1))
		);
		assert_eq!(
			decode_bit_file(&zero_rows(BIT_COUNT + 1)),
			Err(FormatError::WrongRowCount(BIT_COUNT + 1))
		);
	}

	#[test]
	fn uninteresting_lines_are_skipped() {
		let mut text = String::new();
		text.push_str("some header talk\n\n");
		text.push_str(&zero_rows(BIT_COUNT));
		text.push_str("// trailing comment\n\n");
		assert!(decode_bit_file(&text).is_ok());
	}

	#[test]
	fn non_one_values_read_as_zero() {
		let mut values = vec![0u8; BIT_COUNT];
		values[1] = 1;
		let mut text = rows(&values);
		// damage row 1's value field; anything but "1" counts as 0
		text = text.replace("1\t\t1\t\t//", "1\t\tx\t\t//");
		let image = decode_bit_file(&text).unwrap();
		assert_eq!(image, MemoryImage::zeroed());
	}

	#[test]
	fn missing_value_field_is_an_error() {
		let mut text = zero_rows(BIT_COUNT);
		text = text.replace("5\t\t0\t\t//", "5");
		assert_eq!(
			decode_bit_file(&text),
			Err(FormatError::MissingValueField(5))
		);
	}
}
