//! In-memory stand-in for an adapter with an SLG47004 behind it.
//!
//! Emulates the register interface far enough for the paged driver:
//! three memory spaces on their own bus addresses, a latched
//! auto-incrementing read pointer per space, the erase register in the
//! Config space, and non-volatile write semantics (writes can only clear
//! bits; erase sets a page back to all ones).

use crate::image::{
	IMAGE_SIZE,
	MemoryImage,
};
use crate::slg47004::{
	ERASE_REGISTER,
	MemorySpace,
	PAGE_SIZE,
};

use super::I2cPort;

const SPACES: [MemorySpace; 3] = [MemorySpace::Config, MemorySpace::Nvm, MemorySpace::Eeprom];

pub struct DummyDevice {
	memory: [[u8; IMAGE_SIZE]; 3],
	pointer: [u8; 3],
}

fn space_index(address: u8) -> Option<usize> {
	SPACES.iter().position(|s| s.device_address() == address)
}

impl DummyDevice {
	/// Fresh device, all spaces erased.
	pub fn new() -> Self {
		DummyDevice {
			memory: [[0xff; IMAGE_SIZE]; 3],
			pointer: [0; 3],
		}
	}

	/// Seed one space with known content.
	pub fn with_image(space: MemorySpace, image: &MemoryImage) -> Self {
		let mut device = Self::new();
		let index = space_index(space.device_address()).unwrap();
		device.memory[index].copy_from_slice(&image.0);
		device
	}

	fn erase(&mut self, control: u8) -> bool {
		// top two bits select the erase function
		if control & 0xc0 != 0xc0 {
			return false;
		}
		let space = if 0 != control & 0x10 { MemorySpace::Eeprom } else { MemorySpace::Nvm };
		let index = space_index(space.device_address()).unwrap();
		let page = (control & 0x0f) as usize;
		for b in &mut self.memory[index][page * PAGE_SIZE..][..PAGE_SIZE] {
			*b = 0xff;
		}
		true
	}
}

impl Default for DummyDevice {
	fn default() -> Self {
		Self::new()
	}
}

impl I2cPort for DummyDevice {
	fn write(&mut self, address: u8, offset: u8, data: &[u8], hold: bool) -> bool {
		let index = match space_index(address) {
			Some(index) => index,
			None => return false,
		};

		if hold && data.is_empty() {
			self.pointer[index] = offset;
			return true;
		}

		if address == MemorySpace::Config.device_address()
			&& offset == ERASE_REGISTER && data.len() == 1
		{
			return self.erase(data[0]);
		}

		for (i, b) in data.iter().enumerate() {
			let target = (offset as usize + i) % IMAGE_SIZE;
			// cells only support 1→0 transitions without an erase
			self.memory[index][target] &= b;
		}
		true
	}

	fn read(&mut self, address: u8, length: usize) -> Option<Vec<u8>> {
		let index = space_index(address)?;
		let mut out = Vec::with_capacity(length);
		for _ in 0..length {
			let pointer = self.pointer[index];
			out.push(self.memory[index][pointer as usize]);
			self.pointer[index] = pointer.wrapping_add(1);
		}
		Some(out)
	}

	fn probe(&mut self, address: u8) -> bool {
		space_index(address).is_some()
	}
}

#[cfg(test)]
mod test {
	use crate::adapter::{
		I2cPort,
		scan_bus,
	};
	use crate::image::MemoryImage;
	use crate::slg47004::MemorySpace;

	use super::DummyDevice;

	#[test]
	fn answers_on_the_three_space_addresses() {
		let mut device = DummyDevice::new();
		assert_eq!(scan_bus(&mut device), vec![0x08, 0x0a, 0x0b]);
	}

	#[test]
	fn ignores_other_addresses() {
		let mut device = DummyDevice::new();
		assert!(!device.write(0x42, 0, &[1, 2, 3], false));
		assert!(device.read(0x42, 4).is_none());
	}

	#[test]
	fn hold_write_latches_the_read_pointer() {
		let mut image = MemoryImage([0xff; 256]);
		image.0[0x20] = 0x12;
		image.0[0x21] = 0x34;
		let mut device = DummyDevice::with_image(MemorySpace::Nvm, &image);

		let data = device.read_at(0x0a, 0x20, 2).unwrap();
		assert_eq!(data, vec![0x12, 0x34]);
	}

	#[test]
	fn pointers_are_independent_per_space() {
		let mut device = DummyDevice::new();
		assert!(device.write(0x0a, 0x10, &[], true));
		assert!(device.write(0x0b, 0x30, &[], true));
		device.write(0x0a, 0x10, &[0x00], false);
		assert_eq!(device.read(0x0a, 1).unwrap(), vec![0x00]);
		assert_eq!(device.read(0x0b, 1).unwrap(), vec![0xff]);
	}

	#[test]
	fn erase_register_restores_a_page_to_ones() {
		let mut device = DummyDevice::new();
		device.write(0x0b, 0x30, &[0x00; 16], false);
		assert_eq!(device.read_at(0x0b, 0x30, 1).unwrap(), vec![0x00]);

		// EEPROM page 3
		assert!(device.write(0x08, 0xe3, &[0xd3], false));
		assert_eq!(device.read_at(0x0b, 0x30, 1).unwrap(), vec![0xff]);
	}
}
