use std::fmt;

use crate::adapter::I2cPort;
use crate::image::{
	IMAGE_SIZE,
	MemoryImage,
};

use super::spaces::{
	ERASE_REGISTER,
	MemorySpace,
};

pub const PAGE_SIZE: usize = 16;
pub const PAGE_COUNT: usize = IMAGE_SIZE / PAGE_SIZE;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum PageOp {
	Read,
	Write,
	Erase,
}

impl fmt::Display for PageOp {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			PageOp::Read => write!(f, "page read"),
			PageOp::Write => write!(f, "page write"),
			PageOp::Erase => write!(f, "page erase"),
		}
	}
}

/// A page transaction failed or returned no data. Fatal to the running
/// multi-page operation; the state of the memory space is undefined until
/// a fresh cycle succeeds.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Fail)]
#[fail(display = "{} failed on {} space page {}", op, space, page)]
pub struct PageError {
	pub op: PageOp,
	pub space: MemorySpace,
	pub page: u8,
}

/// Read the full 256-byte image of `space`, page by page.
///
/// Each page is a two-phase transaction: latch the read pointer at the
/// page offset while holding the bus, then burst-read 16 bytes. A failed
/// or short page read fails the whole operation; partial results are
/// discarded so a caller can never mistake them for a complete image.
pub fn read_all<P: I2cPort + ?Sized>(port: &mut P, space: MemorySpace) -> crate::AResult<MemoryImage> {
	let address = space.device_address();
	let mut image = MemoryImage::zeroed();
	for page in 0..PAGE_COUNT {
		let offset = (page * PAGE_SIZE) as u8;
		debug!("reading {} page {} at offset 0x{:02x}", space, page, offset);
		let data = match port.read_at(address, offset, PAGE_SIZE) {
			Some(data) if data.len() == PAGE_SIZE => data,
			Some(data) => {
				debug!("short read on {} page {}: {} bytes instead of {}", space, page, data.len(), PAGE_SIZE);
				return Err(PageError { op: PageOp::Read, space, page: page as u8 }.into());
			}
			None => return Err(PageError { op: PageOp::Read, space, page: page as u8 }.into()),
		};
		image.0[page * PAGE_SIZE..][..PAGE_SIZE].copy_from_slice(&data);
	}
	Ok(image)
}

/// Write the full image to `space`, one 16-byte page per transaction.
///
/// The first failing page aborts immediately; later pages are never
/// issued, as a half-written image with invisible gaps is strictly worse
/// than a cleanly aborted write. The cells only support 1→0 transitions,
/// so the target pages must have been erased beforehand (see [`program`]).
pub fn write_all<P: I2cPort + ?Sized>(port: &mut P, space: MemorySpace, image: &MemoryImage) -> crate::AResult<()> {
	let address = space.device_address();
	for page in 0..PAGE_COUNT {
		let offset = page * PAGE_SIZE;
		debug!("writing {} page {} at offset 0x{:02x}", space, page, offset);
		if !port.write(address, offset as u8, &image.0[offset..][..PAGE_SIZE], false) {
			return Err(PageError { op: PageOp::Write, space, page: page as u8 }.into());
		}
	}
	Ok(())
}

/// Erase one page of NVM or EEPROM.
///
/// The erase goes through the erase register in the *Config* space, not
/// the target space: top two bits of the control byte are fixed at 0b11,
/// bit 4 picks EEPROM over NVM, the low nibble is the page index. This
/// layout is taken verbatim from the vendor datasheet.
pub fn erase_page<P: I2cPort + ?Sized>(port: &mut P, space: MemorySpace, page: u8) -> crate::AResult<()> {
	assert!((page as usize) < PAGE_COUNT);
	let select = match space.erase_select() {
		Some(select) => select,
		None => bail!("the {} space cannot be erased", space),
	};
	let control = 0xc0 | select | page;
	debug!("erasing {} page {}: control byte 0x{:02x}", space, page, control);
	if !port.write(MemorySpace::Config.device_address(), ERASE_REGISTER, &[control], false) {
		return Err(PageError { op: PageOp::Erase, space, page }.into());
	}
	Ok(())
}

/// Erase all sixteen pages of NVM or EEPROM.
pub fn erase_all<P: I2cPort + ?Sized>(port: &mut P, space: MemorySpace) -> crate::AResult<()> {
	info!("erasing {}", space);
	for page in 0..PAGE_COUNT {
		erase_page(port, space, page as u8)?;
	}
	Ok(())
}

/// Full reprogram cycle: erase all pages, then write all pages.
///
/// There is no partial resume; an aborted cycle leaves the space in an
/// indeterminate state and must be restarted from the erase.
pub fn program<P: I2cPort + ?Sized>(port: &mut P, space: MemorySpace, image: &MemoryImage) -> crate::AResult<()> {
	erase_all(port, space)?;
	info!("writing 256 bytes to {}", space);
	write_all(port, space, image)
}

/// Read the space back and compare against `image`.
pub fn verify<P: I2cPort + ?Sized>(port: &mut P, space: MemorySpace, image: &MemoryImage) -> crate::AResult<()> {
	let device = read_all(port, space)?;
	for offset in 0..IMAGE_SIZE {
		ensure!(device.0[offset] == image.0[offset],
			"verify failed on {} at 0x{:02x}: expected 0x{:02x}, device has 0x{:02x}",
			space, offset, image.0[offset], device.0[offset]);
	}
	Ok(())
}
