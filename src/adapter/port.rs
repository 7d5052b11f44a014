//! Transaction port of a USB-to-I2C bridge adapter.
//!
//! The device exposes its memory as registers behind 7-bit bus addresses;
//! all the port has to offer are addressed register transactions. USB
//! enumeration and low-level bus framing stay inside the implementation.

/// One adapter session. All transactions are blocking round trips; the
/// exclusive `&mut self` receivers make overlapping paged operations on a
/// shared port a compile error.
pub trait I2cPort {
	/// Addressed write of `data` starting at register `offset`.
	///
	/// With `hold` the adapter keeps the bus claimed after the transfer,
	/// so the device retains its internal register pointer for a
	/// following read. Returns false when the device didn't acknowledge.
	fn write(&mut self, address: u8, offset: u8, data: &[u8], hold: bool) -> bool;

	/// Burst read of `length` bytes from the device's current register
	/// pointer. None when the device didn't answer.
	fn read(&mut self, address: u8, length: usize) -> Option<Vec<u8>>;

	/// Empty addressed transfer; true when a device acknowledges.
	fn probe(&mut self, address: u8) -> bool;

	/// Two-phase paged read: latch the register pointer at `offset`
	/// without releasing the bus, then burst-read `length` bytes.
	fn read_at(&mut self, address: u8, offset: u8, length: usize) -> Option<Vec<u8>> {
		if !self.write(address, offset, &[], true) {
			return None;
		}
		self.read(address, length)
	}
}

impl<'a, P: I2cPort + ?Sized> I2cPort for &'a mut P {
	fn write(&mut self, address: u8, offset: u8, data: &[u8], hold: bool) -> bool {
		(**self).write(address, offset, data, hold)
	}

	fn read(&mut self, address: u8, length: usize) -> Option<Vec<u8>> {
		(**self).read(address, length)
	}

	fn probe(&mut self, address: u8) -> bool {
		(**self).probe(address)
	}
}

/// Linear probe of all valid 7-bit addresses (0 is the general call
/// address and skipped). Returns every address that acknowledged.
pub fn scan_bus<P: I2cPort + ?Sized>(port: &mut P) -> Vec<u8> {
	let mut found = Vec::new();
	for address in 1u8..0x80 {
		if port.probe(address) {
			debug!("device acknowledged at 0x{:02x}", address);
			found.push(address);
		}
	}
	found
}
